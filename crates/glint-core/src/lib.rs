//! Glint Core
//!
//! Engine-wide utilities shared by the Glint rendering crates.

pub mod logging;
pub mod math;
