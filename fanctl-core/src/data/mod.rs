//! Data types, coercion, and persistence modules
//!
//! Contains the strategy value object and everything that touches the
//! configuration file on disk.

mod coercion;
mod persistence;
mod strategy;

pub use coercion::ParamType;
pub use persistence::{read_document, seed_from_template, to_pretty_json, write_document};
pub use strategy::{SpeedCurvePoint, Strategy};
