//! Variable scopes addressable by `set` and the execution context.

use std::fmt;
use std::str::FromStr;

/// One of the four named variable scopes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum VarScope {
    /// Frame-local; invisible to the enclosing frame.
    #[default]
    Local,
    /// Arguments and locals of the current function invocation.
    Function,
    /// Shared by every frame of one component execution (stored on the root frame).
    Component,
    /// Shared by every frame descended from one root, across component calls.
    Session,
}

impl VarScope {
    pub const ALL: [VarScope; 4] = [
        VarScope::Local,
        VarScope::Function,
        VarScope::Component,
        VarScope::Session,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VarScope::Local => "local",
            VarScope::Function => "function",
            VarScope::Component => "component",
            VarScope::Session => "session",
        }
    }
}

impl fmt::Display for VarScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scope name outside the four known scopes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown variable scope `{0}` (expected local, function, component or session)")]
pub struct UnknownScope(pub String);

impl FromStr for VarScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(VarScope::Local),
            "function" => Ok(VarScope::Function),
            "component" => Ok(VarScope::Component),
            "session" => Ok(VarScope::Session),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for scope in VarScope::ALL {
            assert_eq!(scope.as_str().parse::<VarScope>(), Ok(scope));
        }
    }

    #[test]
    fn test_unknown_scope() {
        let err = "global".parse::<VarScope>().unwrap_err();
        assert!(err.to_string().contains("global"));
    }
}
