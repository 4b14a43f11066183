//! Canonical config hashing (`rules_hash`/`rules_version`) and the
//! hash-chained kill receipts that tie every payout to the rules version
//! it was resolved under.
//!
//! ## Config hashing
//!
//! - [`rules_hash`] — SHA-256 of the canonicalized weapons/fish/tier union
//! - [`RulesRegistry`] — tracks the current hash, auto-bumps `rules_version`
//!
//! ## Receipts
//!
//! - [`Receipt`] — one kill's audit record
//! - [`ReceiptChain`] — per-room hash chain, mints and appends receipts
//! - [`ReceiptSink`] — the narrow interface an external append-only store implements

mod canonical;
mod receipt;
mod rules_hash;

pub use receipt::{Receipt, ReceiptChain, ReceiptError, ReceiptSink};
pub use rules_hash::{rules_hash, RulesRegistry};
