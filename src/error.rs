use thiserror::Error;

use crate::api_connection::ApiConnectionError;
use crate::store::StoreError;

/// Everything a fridge command can fail with. The message is meant to be
/// shown to the user as-is.
#[derive(Debug, Error)]
pub enum FridgeError {
    #[error("Sub command not recognized: {0}")]
    UnknownSubcommand(String),

    #[error("An ingredient flag is required")]
    MissingIngredientFlag,

    #[error("Ingredient '{0}' is not valid; add one ingredient at a time without commas")]
    InvalidIngredient(String),

    #[error("Flag '{0}' is not supported for this command")]
    UnsupportedFlag(String),

    #[error("Your fridge is empty")]
    FridgeEmpty,

    #[error("Fridge store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Could not decode recipe response: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Recipe lookup failed: {0}")]
    Lookup(#[from] ApiConnectionError),
}
