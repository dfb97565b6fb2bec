use thiserror::Error;

/// Errors produced by parsing, evaluating, integrating and by the curvature routines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("no numerical value for symbol `{0}`")]
    UnboundSymbol(String),
    #[error("function `{0}` cannot be evaluated numerically")]
    UnknownFunction(String),
    #[error("no antiderivative found for {0}")]
    NoAntiderivative(String),
    #[error("numerical integration on [{lower}, {upper}] did not converge: {reason}")]
    NoConvergence {
        lower: f64,
        upper: f64,
        reason: String,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn parse<S: Into<String>>(position: usize, message: S) -> Error {
        Error::Parse {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_parameter<S: Into<String>>(name: &'static str, reason: S) -> Error {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
