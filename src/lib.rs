pub mod api_connection;
pub mod cli;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod fridge;
pub mod recipe_interpreter;
pub mod recipe_query;
pub mod store;

pub use command::{CommandRequest, FridgeCommandHandler};
pub use display::DisplayEntry;
pub use error::FridgeError;
