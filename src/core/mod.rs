//! Core module - client configuration and its errors
//!
//! - [`ClientSettings`] - server endpoint, poll interval, request timeout
//! - `settings_persistence` - JSON file in the platform config directory
//! - [`CoreError`] - I/O, serialization and URL validation failures

pub mod error;
pub mod settings_persistence;

pub use error::{CoreError, CoreResult};
pub use settings_persistence::{
    load_settings, load_settings_from, save_settings, save_settings_to, settings_path,
    ClientSettings,
};
