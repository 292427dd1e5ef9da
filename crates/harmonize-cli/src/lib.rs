//! CLI library components for the sample harmonizer.

pub mod logging;
pub mod run;
