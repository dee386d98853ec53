//! LSP Protocol Implementation
//!
//! Runs the save-time checks on `didSave` and publishes their diagnostics.

pub mod backend;
pub mod handlers;
pub mod notifier;
pub mod published;
pub mod server;

pub use backend::Backend;
