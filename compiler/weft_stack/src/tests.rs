use super::*;

/// Mimics the parser's per-element recursion.
fn nest(depth: u32) -> u32 {
    ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
}

#[test]
fn test_shallow_nesting() {
    assert_eq!(nest(16), 16);
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    assert_eq!(nest(200_000), 200_000);
}

#[test]
fn test_propagates_result() {
    let result: Result<&str, String> = ensure_sufficient_stack(|| Ok("done"));
    assert_eq!(result, Ok("done"));
}
