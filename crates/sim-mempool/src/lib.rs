//! # Bounded Mempool
//!
//! Per-miner associative store of unconfirmed transactions, supporting the
//! three selection modes the simulation compares:
//!
//! - approximately-uniform random pick (honest block building),
//! - highest-fee pick (malicious block building),
//! - bulk lowest-fee eviction (rational pressure relief).
//!
//! ## Data Structures
//!
//! One slab owns the entries; two non-owning views index them:
//!
//! - `buckets`: a fixed array of `capacity` buckets keyed by a deterministic
//!   hash of `(owner, tx_id)` — O(1) expected point lookup, and the array the
//!   bucket-walking random pick operates on;
//! - `by_fee`: a `BTreeMap` keyed by `(fee, insertion seq)` ascending —
//!   O(log n) ordered access from both ends, with a stable first-in
//!   tie-break among equal fees.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Both views reference exactly the same entries | every mutation goes through `insert` / `erase` |
//! | `len() ≤ capacity()` | the caller evicts before inserting |
//! | Bucket index is deterministic for a key | fixed-key SipHash over the `(owner, tx_id)` pair |

mod pool;

pub use pool::{Handle, Mempool};
