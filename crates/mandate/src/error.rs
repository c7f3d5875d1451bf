//! Error types.
//!
//! Two families of errors exist, matching when they can happen:
//!
//! - [`SetupError`]: programmer mistakes detected while registering commands.
//!   They are raised immediately by the registration call and are never
//!   deferred to invocation time.
//! - [`Error`]: failures while handling a command line. User input errors are
//!   owned by clap and carried as [`Error::Usage`]; [`Program::parse`] and
//!   [`Program::execute`] turn them into a process exit with usage text.
//!
//! Errors raised by a command's own handler are not wrapped: they reach the
//! caller of [`Program::try_execute`] as the same `anyhow::Error` the handler
//! returned.
//!
//! [`Program::parse`]: crate::Program::parse
//! [`Program::execute`]: crate::Program::execute
//! [`Program::try_execute`]: crate::Program::try_execute

use thiserror::Error;

/// Configuration errors raised at registration time.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A command or group name is already taken in the same registry.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),

    /// A group option destination is already taken.
    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    /// An alias or keyword set that the parser cannot express.
    #[error("invalid option for `{param}`: {reason}")]
    InvalidOption { param: String, reason: String },

    /// A parameter list that breaks the signature invariants.
    #[error("invalid signature for `{function}`: {reason}")]
    InvalidSignature { function: String, reason: String },
}

impl SetupError {
    pub(crate) fn invalid_option(param: &str, reason: impl Into<String>) -> Self {
        SetupError::InvalidOption {
            param: param.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors produced while parsing a command line.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed invocation, failed coercion, missing argument, `--help` or
    /// `--version`. Exiting through [`clap::Error::exit`] prints the right
    /// text to the right stream.
    #[error(transparent)]
    Usage(#[from] clap::Error),
}

impl Error {
    /// Exits the process the way clap would.
    pub fn exit(&self) -> ! {
        match self {
            Error::Usage(err) => err.exit(),
        }
    }

    /// Exit code clap would use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(err) => err.exit_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::DuplicateCommand("alias".into());
        assert_eq!(err.to_string(), "duplicate command: alias");

        let err = SetupError::invalid_option("y", "`-yy` is not a valid flag");
        assert_eq!(
            err.to_string(),
            "invalid option for `y`: `-yy` is not a valid flag"
        );
    }

    #[test]
    fn test_usage_error_exit_code() {
        let err = clap::Command::new("app")
            .try_get_matches_from(["app", "--nope"])
            .unwrap_err();
        assert_eq!(Error::from(err).exit_code(), 2);
    }
}
