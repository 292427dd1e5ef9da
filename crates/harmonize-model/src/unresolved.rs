use thiserror::Error;

/// A cell for which no value could be determined.
///
/// Distinct from an empty input and from the [`NOT_RECEIVED`] backfill. An
/// unresolved cell is written as null and may be backfilled later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("value could not be resolved")]
pub struct Unresolved;

/// Outcome of normalizing a single cell.
pub type Resolution<T> = std::result::Result<T, Unresolved>;

/// Written into required fields that no rule populated.
pub const NOT_RECEIVED: &str = "not received";

/// HER2 call for an equivocal 2+ score without a usable FISH/ISH result.
pub const HER2_FISH_MISSING: &str = "HER2 2+ (FISH/ISH missing)";
