//! Common types shared across the radar product checker workspace.

pub mod compare;
pub mod grid;
pub mod product;
pub mod time;

pub use compare::{compare_masked, compare_slices, CellMismatch, Tolerance, ValueMismatch};
pub use grid::{GridError, GridShape, MaskedGrid};
pub use product::{ProductDataset, ProductError, ProductResult};
pub use time::{offset_from_epoch, parse_time_units, TimeUnitError};
