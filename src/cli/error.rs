use crate::config::ConfigError;
use crate::lifecycle::{ErrorKind, LifecycleError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("Please provide a valid ADB name for the second command-line argument (got '{name}'); known names: {}", format_known(.known))]
    InvalidName { name: String, known: Vec<String> },

    #[error("Please provide a number as the first command-line argument for new ECPU count (got '{0}')")]
    InvalidNumber(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

fn format_known(known: &[String]) -> String {
    if known.is_empty() {
        "(none, add them to the target map)".to_string()
    } else {
        known.join(", ")
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnsupportedPlatform(msg) => CliError::UnsupportedPlatform(msg),
            other => CliError::ConfigError(other.to_string()),
        }
    }
}

impl CliError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CliError::Usage(_) | CliError::InvalidName { .. } | CliError::InvalidNumber(_) => {
                ErrorKind::Usage
            }
            CliError::UnsupportedPlatform(_) => ErrorKind::Platform,
            CliError::ConfigError(_) => ErrorKind::Config,
            CliError::Lifecycle(e) => e.kind(),
            CliError::OperationFailed(_) => ErrorKind::Unexpected,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 3,
            CliError::InvalidName { .. } => 4,
            CliError::InvalidNumber(_) => 5,
            CliError::UnsupportedPlatform(_) => 2,
            _ if self.kind() == ErrorKind::NoOp => 0,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Usage("missing".into()).exit_code(), 3);
        assert_eq!(
            CliError::InvalidName {
                name: "X".into(),
                known: vec![]
            }
            .exit_code(),
            4
        );
        assert_eq!(CliError::InvalidNumber("five".into()).exit_code(), 5);
        assert_eq!(
            CliError::from(ConfigError::UnsupportedPlatform("no home".into())).exit_code(),
            2
        );
        assert_eq!(
            CliError::from(ConfigError::MissingProfile("PROD".into())).exit_code(),
            1
        );

        let no_op = CliError::Lifecycle(LifecycleError::NoOp("already scaled".into()));
        assert_eq!(no_op.exit_code(), 0);

        let service = CliError::Lifecycle(LifecycleError::Service(ProviderError::service(
            500,
            "InternalError",
            "boom",
        )));
        assert_eq!(service.kind(), ErrorKind::Service);
        assert_eq!(service.exit_code(), 1);
    }

    #[test]
    fn test_invalid_name_lists_known_names() {
        let err = CliError::InvalidName {
            name: "PROD".into(),
            known: vec!["MY_DEV_ADB".into(), "MY_PROD_ADB".into()],
        };
        assert!(err.to_string().contains("MY_DEV_ADB, MY_PROD_ADB"));
    }
}
