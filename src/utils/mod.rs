//! Utility modules shared by hosts

pub mod logging;

pub use logging::init_logger;
