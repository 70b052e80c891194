//! # PawBox Core
//!
//! Shared building blocks for the PawBox workspace: length units and their
//! display formatting, and the error type used at the file-system edges.

pub mod error;
pub mod units;

pub use error::{Error, Result, UnitsError};
pub use units::{format_length, get_unit_label, parse_length, MeasurementSystem, MM_PER_INCH};
