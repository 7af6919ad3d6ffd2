//! Formula engine: scanning, bracket and operator resolution, cell
//! references and the grid they live in.

pub mod brackets;
pub mod errors;
pub mod expression;
pub mod models;
pub mod operators;
pub mod references;
pub mod scanner;
pub mod services;
mod stack;

pub use brackets::*;
pub use errors::*;
pub use expression::*;
pub use models::*;
pub use operators::*;
pub use references::*;
pub use scanner::*;
pub use services::*;
