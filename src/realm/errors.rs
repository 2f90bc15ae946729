use thiserror::Error;

use super::types::PocketType;

/// Errors that can arise inside the realm item pipeline.
///
/// Validation rejections are NOT errors; they are normal guard-chain outcomes
/// (see `rules::GuardOutcome`). An `Err` here means the single action was
/// malformed or an invariant was violated, and is always raised before the
/// inventory mutation commits.
#[derive(Debug, Error)]
pub enum RealmError {
    /// Wrapper around IO errors (seed file reads, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around seed-file deserialization errors.
    #[error("seed parse error: {0}")]
    SeedParse(#[from] serde_json::Error),

    /// The action referenced an item template that is not in the catalog.
    #[error("unknown item template: {0}")]
    UnknownTemplate(u32),

    /// The action referenced an empty inventory address.
    #[error("no item at {pocket:?} slot {slot}")]
    EmptySlot { pocket: PocketType, slot: i16 },

    /// Destination slot is occupied and swapping was not allowed.
    #[error("slot occupied: {pocket:?} slot {slot}")]
    SlotOccupied { pocket: PocketType, slot: i16 },

    /// Internal error (unexpected conditions).
    #[error("internal error: {0}")]
    Internal(String),
}
