//! Cell normalizers.
//!
//! Each normalizer takes one raw cell and returns either a canonical value or
//! [`Unresolved`](harmonize_model::Unresolved).
//!
//! - **cleaner**: synonym-table lookups for controlled fields
//! - **temporal**: dates, times, elapsed days, and age inference
//! - **units**: height/weight conversion and BMI

pub mod cleaner;
pub mod temporal;
pub mod units;

pub use cleaner::Cleaner;
pub use temporal::{elapsed_days, infer_age, normalize_date, normalize_time, parse_instant};
pub use units::{UnitConverter, bmi, round2};
