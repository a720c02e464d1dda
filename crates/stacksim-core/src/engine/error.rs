use thiserror::Error;

use crate::core::catalog::interactions::InteractionLoadError;
use crate::core::catalog::library::CatalogLoadError;
use crate::core::models::stack::StackError;

use super::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Compound catalog error: {source}")]
    Catalog {
        #[from]
        source: CatalogLoadError,
    },

    #[error("Interaction matrix error: {source}")]
    Interactions {
        #[from]
        source: InteractionLoadError,
    },

    #[error("Stack error: {source}")]
    Stack {
        #[from]
        source: StackError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
