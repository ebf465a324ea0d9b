//! Configuration loading, environment helpers, and logging setup shared
//! across the workspace (§6 "Configuration surface").

pub mod env;
pub mod error;
pub mod loader;
pub mod logging;
pub mod settings;

pub use error::{Result, ToolingError};
pub use settings::Settings;
