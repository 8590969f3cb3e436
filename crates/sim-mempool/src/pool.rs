//! Slab-backed mempool with a bucket hash view and a fee-ordered view.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::Hasher;

use rand::Rng;

/// Stable reference to a mempool entry.
///
/// A handle stays valid until the entry it names is erased; the sentinel
/// [`Handle::INVALID`] is returned by lookups that find nothing and is
/// accepted (as a no-op) by [`Mempool::erase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handle(usize);

impl Handle {
    /// Sentinel for "no entry".
    pub const INVALID: Handle = Handle(usize::MAX);

    /// Whether this handle names an entry.
    pub fn is_valid(self) -> bool {
        self.0 != usize::MAX
    }
}

/// Fee-view key: ascending fee, insertion order among equal fees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FeeKey {
    fee: u32,
    seq: u64,
}

#[derive(Clone, Debug)]
struct Entry {
    owner: u32,
    tx_id: u64,
    fee: u32,
    seq: u64,
    bucket: usize,
}

/// Bounded per-miner transaction store.
///
/// The bucket array has exactly `capacity` buckets, so the bucket-walking
/// random pick stays O(1) amortised at any load the simulation produces.
/// Capacity is enforced by the caller: eviction runs before insertion, so
/// `len()` never exceeds `capacity()` after an insert returns.
pub struct Mempool {
    slots: Vec<Option<Entry>>,
    free: Vec<usize>,
    buckets: Vec<Vec<usize>>,
    by_fee: BTreeMap<FeeKey, usize>,
    len: usize,
    next_seq: u64,
}

impl Mempool {
    /// Creates an empty mempool with room for `capacity` transactions.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (rejected by configuration validation
    /// long before a mempool is built).
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "mempool capacity must be positive");
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            buckets: vec![Vec::new(); capacity],
            by_fee: BTreeMap::new(),
            len: 0,
            next_seq: 0,
        }
    }

    /// Number of stored transactions.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the mempool holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of transactions the caller may keep in this pool.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Inserts a transaction owned by `owner`.
    ///
    /// The caller must have made room first; see the capacity invariant on
    /// the type.
    pub fn insert(&mut self, owner: u32, tx_id: u64, fee: u32) -> Handle {
        let bucket = self.bucket_index(owner, tx_id);
        let seq = self.next_seq;
        self.next_seq += 1;

        let entry = Entry {
            owner,
            tx_id,
            fee,
            seq,
            bucket,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        self.buckets[bucket].push(slot);
        self.by_fee.insert(FeeKey { fee, seq }, slot);
        self.len += 1;

        Handle(slot)
    }

    /// Point lookup by composite key. O(1) expected.
    pub fn find(&self, owner: u32, tx_id: u64) -> Handle {
        let bucket = self.bucket_index(owner, tx_id);
        for &slot in &self.buckets[bucket] {
            if let Some(entry) = &self.slots[slot] {
                if entry.owner == owner && entry.tx_id == tx_id {
                    return Handle(slot);
                }
            }
        }
        Handle::INVALID
    }

    /// Returns `(tx_id, fee)` for a handle, or `None` for the sentinel or a
    /// handle whose entry is gone.
    pub fn get(&self, handle: Handle) -> Option<(u64, u32)> {
        if !handle.is_valid() {
            return None;
        }
        self.slots
            .get(handle.0)?
            .as_ref()
            .map(|entry| (entry.tx_id, entry.fee))
    }

    /// Removes the entry named by `handle` from both views.
    ///
    /// A sentinel handle is ignored, which makes "find then erase" cleanup
    /// loops silent on misses.
    pub fn erase(&mut self, handle: Handle) {
        if !handle.is_valid() {
            return;
        }
        let Some(entry) = self.slots.get_mut(handle.0).and_then(|slot| slot.take()) else {
            return;
        };

        self.by_fee.remove(&FeeKey {
            fee: entry.fee,
            seq: entry.seq,
        });
        let bucket = &mut self.buckets[entry.bucket];
        if let Some(pos) = bucket.iter().position(|&slot| slot == handle.0) {
            bucket.swap_remove(pos);
        }

        self.free.push(handle.0);
        self.len -= 1;
    }

    /// Approximately-uniform random pick.
    ///
    /// Draws a uniform start bucket, then walks `start, start+1, start−1,
    /// start+2, …` (wrapping) until it hits a non-empty bucket, and finally
    /// draws uniformly inside that bucket. Uniform across bucket positions
    /// rather than across entries; adequate for the simulation's statistics
    /// and O(1) amortised at bounded load.
    pub fn random_pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Handle {
        if self.len == 0 {
            return Handle::INVALID;
        }

        let buckets = self.buckets.len();
        let start = rng.gen_range(0..buckets);
        let rounds = buckets / 2 + 1;

        let mut down = start;
        let mut up = if start == buckets - 1 { 0 } else { start + 1 };
        for _ in 0..rounds {
            if let Some(handle) = self.pick_in_bucket(down, rng) {
                return handle;
            }
            down = if down == 0 { buckets - 1 } else { down - 1 };

            if let Some(handle) = self.pick_in_bucket(up, rng) {
                return handle;
            }
            up = if up == buckets - 1 { 0 } else { up + 1 };
        }

        Handle::INVALID
    }

    /// Maximum-fee entry; the first-inserted one among equal top fees.
    pub fn highest_fee_pick(&self) -> Handle {
        let Some((&FeeKey { fee, .. }, _)) = self.by_fee.last_key_value() else {
            return Handle::INVALID;
        };
        match self.by_fee.range(FeeKey { fee, seq: 0 }..).next() {
            Some((_, &slot)) => Handle(slot),
            None => Handle::INVALID,
        }
    }

    /// Removes the `n` lowest-fee entries (insertion order among ties);
    /// removes everything if `n` exceeds the current size.
    pub fn evict_lowest(&mut self, n: usize) {
        for _ in 0..n {
            let Some((_, &slot)) = self.by_fee.first_key_value() else {
                break;
            };
            self.erase(Handle(slot));
        }
    }

    /// Removes up to `n` entries, each chosen by an independent
    /// [`random_pick`](Self::random_pick) with its own bucket draw.
    pub fn evict_random<R: Rng + ?Sized>(&mut self, rng: &mut R, n: usize) {
        for _ in 0..n {
            let picked = self.random_pick(rng);
            if !picked.is_valid() {
                break;
            }
            self.erase(picked);
        }
    }

    /// Drops every entry from both views.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.by_fee.clear();
        self.len = 0;
    }

    /// Iterates stored `(tx_id, fee)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|entry| (entry.tx_id, entry.fee)))
    }

    fn pick_in_bucket<R: Rng + ?Sized>(&self, bucket: usize, rng: &mut R) -> Option<Handle> {
        let slots = &self.buckets[bucket];
        match slots.len() {
            0 => None,
            // A lone entry costs no extra draw.
            1 => Some(Handle(slots[0])),
            n => Some(Handle(slots[rng.gen_range(0..n)])),
        }
    }

    fn bucket_index(&self, owner: u32, tx_id: u64) -> usize {
        // Fixed-key SipHash over the (owner, tx_id) pair: deterministic for
        // a given key and bucket count, injective before reduction.
        let mut hasher = DefaultHasher::new();
        hasher.write_u32(owner);
        hasher.write_u64(tx_id);
        (hasher.finish() % self.buckets.len() as u64) as usize
    }
}
