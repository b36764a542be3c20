//! the main application
pub mod cli;
pub mod core;
pub mod logging;
pub mod preview;

pub use self::core::TcApp;
