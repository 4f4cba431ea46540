use thiserror::Error;

use crate::parse::ParseError;

/// Configuration errors in rules or button definitions.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("button '{button}' has no useAction configured")]
    MissingUseAction { button: String },

    #[error("button '{button}' has no txFo configured")]
    MissingTxFo { button: String },

    #[error("button '{button}' has an unparsable txFo: {source}")]
    InvalidTxFo {
        button: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("button '{button}' has an empty txFo")]
    EmptyTxFo { button: String },

    #[error("button '{button}' opens '{txcode}' without a url")]
    MissingUrl { button: String, txcode: String },

    #[error("rule #{index} has an invalid component_manager: {message}")]
    InvalidComponentManager { index: usize, message: String },

    #[error("rule #{index} has an invalid function_cal: {source}")]
    InvalidCalculator {
        index: usize,
        #[source]
        source: ParseError,
    },
}
