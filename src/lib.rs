//! gridcalc - Terminal Grid Calculator Library
//!
//! A grid of cells holding text or formulas, evaluated by rewriting the
//! formula text until a single number remains.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
