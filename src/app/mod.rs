//! Application module
//!
//! Wiring, logging setup and fatal error reporting for the binary.

pub mod context;
pub mod error_handling;
pub mod logging;

pub use context::AppContext;
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;
