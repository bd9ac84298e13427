//! Common types and utilities shared across the landsat-catalog crates.

pub mod error;
pub mod geom;
pub mod product;

pub use error::{LandsatError, LandsatResult};
pub use product::{parse_date, ProductId, SENSORS, TIERS};
