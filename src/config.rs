//! layered configuration
//!
//! embedded defaults < global `themecap.toml` < nearest local `themecap.toml` < `THEMECAP_*`
//! environment variables, with command line flags applied on top by the app
pub mod instance;
pub mod options;
pub mod validate;
