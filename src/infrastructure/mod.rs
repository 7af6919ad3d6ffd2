//! Infrastructure layer providing external service integrations.
//!
//! This module contains implementations for external concerns like
//! file I/O, persistence, configuration and logging.

pub mod config;
pub mod csv_io;
pub mod logging;
pub mod persistence;

pub use config::*;
pub use csv_io::*;
pub use logging::*;
pub use persistence::*;
