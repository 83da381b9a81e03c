//! Core utilities: configuration, logging, errors, the conversation state
//! model and working-day arithmetic.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;
pub mod validation;
pub mod workdays;

pub use error::FlowError;
pub use logging::init_logger;
