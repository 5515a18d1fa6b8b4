//! Tracing setup: a bootstrap subscriber whose filter is swapped once settings are read.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
