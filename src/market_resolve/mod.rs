// ============================================================================
// Market Resolve Module - Binary Escrow Market
// ============================================================================
//
// Lifecycle:
//   Open ──resolve(admin)──▶ Resolved
//
// While open, bets move value from custody into the YES or NO pool.
// Resolution only records the outcome. Winning positions are then paid
// their stake back from their own side's pool, one claim at a time
// (see `positions::claim`).
//
// ============================================================================

pub mod markets;

pub use markets::*;
