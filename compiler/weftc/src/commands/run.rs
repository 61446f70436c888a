//! The `run` command: execute a document and print what it produced.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;
use weft_eval::{buffer_output, Interpreter, Session, Value};
use weft_resolve::{ComponentResolver, ResolverConfig};

use super::{load_document, report_validation, CliError};

/// Options accepted after `weftc run <file>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Component directory; `WEFT_COMPONENTS_DIR` or `./components` if unset.
    pub components: Option<PathBuf>,
    /// Initial session variables, as given.
    pub session: Vec<(String, String)>,
}

/// Split `args` (everything after `run`) into the file and its options.
///
/// Accepts `--components DIR`, `--components=DIR`, `--session k=v` and
/// `--session=k=v`, in any order around the file path.
pub fn parse_run_options(args: &[String]) -> Result<(PathBuf, RunOptions), CliError> {
    let mut options = RunOptions::default();
    let mut file = None;
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg, None),
        };
        match flag {
            "--components" | "--session" => {
                let value = match inline {
                    Some(value) => value,
                    None => {
                        i += 1;
                        args.get(i)
                            .cloned()
                            .ok_or_else(|| CliError::Usage(format!("{flag} needs a value")))?
                    }
                };
                if flag == "--components" {
                    options.components = Some(PathBuf::from(value));
                } else {
                    let (key, value) = value.split_once('=').ok_or_else(|| {
                        CliError::Usage(format!("--session expects key=value, got `{value}`"))
                    })?;
                    options.session.push((key.to_string(), value.to_string()));
                }
            }
            other if other.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option `{other}`")));
            }
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            _ => return Err(CliError::Usage(format!("unexpected argument `{arg}`"))),
        }
        i += 1;
    }
    let file = file.ok_or_else(|| CliError::Usage("missing file path".to_string()))?;
    Ok((file, options))
}

/// Execute the document at `path`.
///
/// Rendered output goes to `out`, followed by the returned value as JSON
/// when it is not null. Validation findings are reported but do not stop
/// the run; an evaluation error does.
pub fn run_file(
    path: &Path,
    options: &RunOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool, CliError> {
    let parsed = load_document(path)?;
    if !parsed.is_valid() {
        warn!(
            path = %path.display(),
            findings = parsed.errors.len(),
            "running a document with validation errors"
        );
        report_validation(path, &parsed, err)?;
    }

    let config = match &options.components {
        Some(dir) => ResolverConfig::new(dir),
        None => ResolverConfig::from_env(),
    };
    let session = Session::default();
    {
        let mut vars = session.write();
        for (key, value) in &options.session {
            vars.insert(key.clone(), Value::str(value.as_str()));
        }
    }

    let mut builder = Interpreter::builder()
        .resolver(Arc::new(ComponentResolver::new(config)))
        .session(session)
        .output(buffer_output());
    if let Some(dir) = path.parent() {
        builder = builder.data_dir(dir);
    }
    let interp = builder.build();

    let result = interp.execute(&parsed.root);
    out.write_all(interp.output().contents().as_bytes())?;
    match result {
        Ok(Value::Null) => Ok(true),
        Ok(value) => {
            let json = serde_json::to_string(&value).map_err(|e| CliError::Io(e.into()))?;
            if !interp.output().contents().is_empty() {
                writeln!(out)?;
            }
            writeln!(out, "=> {json}")?;
            Ok(true)
        }
        Err(e) => {
            writeln!(err, "error: {}", e.display_with_trail())?;
            Ok(false)
        }
    }
}
