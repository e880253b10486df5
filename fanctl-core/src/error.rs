//! Error types re-exported from fanctl-error

pub use fanctl_error::{FanctlError, Result};
