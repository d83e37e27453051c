use thiserror::Error;

/// Raised while resolving modal or global options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid type for option, `{option}`. Expecting type {expected}, got {found}.")]
    InvalidType {
        option: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid value for option, `{option}`: {reason}.")]
    InvalidValue {
        option: &'static str,
        reason: String,
    },

    #[error("Invalid button at position {index}. Expecting type object.")]
    InvalidButton { index: usize },

    #[error("Invalid button option, `{key}`.")]
    UnknownButtonOption { key: String },

    #[error("Invalid type for button option, `{key}`. Expecting type {expected}, got {found}.")]
    InvalidButtonOptionType {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Raised when an instance method is called with arguments or at a time it cannot honour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("Invalid value given for {operation}, expecting type string.")]
    ExpectedString { operation: &'static str },

    #[error("Cannot {operation} before the modal has been shown.")]
    NotShown { operation: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error("Platform unavailable: {0}")]
    Platform(String),
}
