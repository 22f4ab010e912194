//! Error taxonomy. Matches the four kinds in the error-handling design:
//! invariant violations panic at the point of failure (they are bugs, not
//! recoverable conditions); configuration and I/O errors are the two
//! variants callers actually construct and propagate through
//! [`anyhow::Result`].
use std::fmt;

/// Fatal-at-startup errors: bad configuration, missing resources.
#[derive(Debug)]
pub enum ConfigError {
    PlayerCountMismatch { configured: usize, actual: usize },
    UnknownClusterTable(String),
    DirectoryCreation { path: String, source: std::io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PlayerCountMismatch { configured, actual } => write!(
                f,
                "player count mismatch: config declares {configured} but initial state has {actual}"
            ),
            Self::UnknownClusterTable(name) => write!(f, "unknown cluster table file: {name}"),
            Self::DirectoryCreation { path, source } => {
                write!(f, "failed to create directory {path}: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryCreation { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Display text names both the configured and observed player counts.
    #[test]
    fn player_count_mismatch_message() {
        let e = ConfigError::PlayerCountMismatch { configured: 6, actual: 2 };
        let msg = e.to_string();
        assert!(msg.contains('6') && msg.contains('2'));
    }
}
