//! Weft CLI
//!
//! Parse, check and run `.wft` documents.

use std::io;
use std::path::Path;

use weftc::commands::{check_file, parse_file, parse_run_options, run_file, CliError};

fn main() {
    weftc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let mut out = io::stdout().lock();
    let mut err = io::stderr();

    let result = match command.as_str() {
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: weftc parse <file.wft>");
                std::process::exit(1);
            }
            parse_file(Path::new(&args[2]), &mut out, &mut err)
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: weftc check <file.wft>");
                std::process::exit(1);
            }
            check_file(Path::new(&args[2]), &mut out, &mut err)
        }
        "run" => {
            if args.len() < 3 {
                print_run_usage();
                std::process::exit(1);
            }
            match parse_run_options(&args[2..]) {
                Ok((path, options)) => run_file(&path, &options, &mut out, &mut err),
                Err(e) => Err(e),
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("weftc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(CliError::Usage(msg)) => {
            eprintln!("error: {msg}");
            print_run_usage();
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Weft - markup interpreter");
    println!();
    println!("Usage: weftc <command> [options]");
    println!();
    println!("Commands:");
    println!("  parse <file>       Print the document tree as JSON");
    println!("  check <file>       Validate a document without running it");
    println!("  run <file>         Execute a document");
    println!("  help               Show this message");
    println!("  version            Show the version");
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Enable tracing (e.g. weft_eval=debug)");
    println!("  WEFT_LOG_TREE        Show tracing output as an indented tree");
    println!("  WEFT_COMPONENTS_DIR  Component directory for `run`");
}

fn print_run_usage() {
    eprintln!("Usage: weftc run <file.wft> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --components <dir>   Component directory (default: ./components)");
    eprintln!("  --session <k=v>      Set a session variable; may repeat");
}
