//! Domain error types.

/// A parse error with position information for predicate parsing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for tickergrid.
#[derive(Debug, thiserror::Error)]
pub enum TickergridError {
    #[error("invalid input for {symbol}: {reason}")]
    InvalidInput { symbol: String, reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    PredicateParse(#[from] ParseError),

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TickergridError> for std::process::ExitCode {
    fn from(err: &TickergridError) -> Self {
        let code: u8 = match err {
            TickergridError::Io(_) => 1,
            TickergridError::ConfigParse { .. }
            | TickergridError::ConfigMissing { .. }
            | TickergridError::ConfigInvalid { .. } => 2,
            TickergridError::Data { .. } => 3,
            TickergridError::PredicateParse(_) | TickergridError::InvalidParameter { .. } => 4,
            TickergridError::InvalidInput { .. } | TickergridError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
