use std::num::NonZeroU32;

use crate::key::ShardingKey;

/// Thomas Wang's 32-bit integer avalanche hash, in the shift/add form used by
/// Bob Jenkins.
///
/// All additions wrap and right shifts are arithmetic. Changing either changes
/// which bucket a key lands in.
pub fn wang_jenkins_hash(key: i32) -> i32 {
    let mut key = (!key).wrapping_add(key << 21);
    key ^= key >> 24;
    key = key.wrapping_add(key << 3).wrapping_add(key << 8);
    key ^= key >> 14;
    key = key.wrapping_add(key << 2).wrapping_add(key << 4);
    key ^= key >> 28;
    key.wrapping_add(key << 31)
}

/// Non-negative hash of a sharding key, widened to 64 bits before `abs` so
/// that `i32::MIN` maps to `2^31` instead of staying negative.
pub fn hash_sharding_value<K: ShardingKey + ?Sized>(key: &K) -> i64 {
    i64::from(wang_jenkins_hash(key.sharding_hash())).abs()
}

/// Maps a hash onto `[0, sharding_count)`.
///
/// The masking strategy is fixed when the rule is built: a power-of-two count
/// uses `hash & (count - 1)`, anything else uses the Euclidean remainder. Both
/// agree on every input, negative hashes included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BucketRule {
    sharding_count: i64,
    bitmask: bool,
}

impl BucketRule {
    pub fn new(sharding_count: NonZeroU32) -> Self {
        let count = sharding_count.get();
        Self {
            sharding_count: i64::from(count),
            bitmask: count & (count - 1) == 0,
        }
    }

    pub fn sharding_count(&self) -> i64 {
        self.sharding_count
    }

    pub fn uses_bitmask(&self) -> bool {
        self.bitmask
    }

    pub fn bucket(&self, hash: i64) -> i64 {
        if self.bitmask {
            hash & (self.sharding_count - 1)
        } else {
            hash.rem_euclid(self.sharding_count)
        }
    }

    pub fn bucket_of<K: ShardingKey + ?Sized>(&self, key: &K) -> i64 {
        self.bucket(hash_sharding_value(key))
    }
}
