//! LSP request/notification handlers.

mod commands;
mod documents;
mod formatting;
mod initialize;

pub use commands::handle_execute_command;
pub use documents::{handle_did_change, handle_did_close, handle_did_open, handle_did_save};
pub use formatting::{handle_formatting, handle_will_save_wait_until};
pub use initialize::{
    FIX_COMMAND, SET_FIX_ON_SAVE_COMMAND, handle_initialize, handle_initialized, handle_shutdown,
};
