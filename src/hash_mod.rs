use std::num::NonZeroU32;

use tracing::{debug, trace};

use crate::error::Result;
use crate::hash::BucketRule;
use crate::key::ShardingKey;
use crate::props::{Props, SHARDING_COUNT_KEY};
use crate::sharding::{find_target, RangeShardingValue, ShardingAlgorithm};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashModConfig {
    pub sharding_count: NonZeroU32,
}

impl HashModConfig {
    pub fn from_props(props: &Props) -> Result<Self> {
        Ok(Self {
            sharding_count: props.sharding_count()?,
        })
    }
}

/// Routes a key to one of `sharding-count` equally weighted tables by
/// `wang_jenkins_hash(key) mod sharding-count`.
///
/// Range conditions cannot be pruned since the hash does not preserve
/// ordering, so every target is returned for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WangJenkinsHashMod {
    config: HashModConfig,
    rule: BucketRule,
}

impl WangJenkinsHashMod {
    pub const TYPE: &'static str = "WJ_HASH_MOD";
    pub const PROPERTY_KEYS: &'static [&'static str] = &[SHARDING_COUNT_KEY];

    pub fn new(config: HashModConfig) -> Self {
        let rule = BucketRule::new(config.sharding_count);
        debug!(
            sharding_count = config.sharding_count.get(),
            bitmask = rule.uses_bitmask(),
            "initialized {} sharding algorithm",
            Self::TYPE
        );
        Self { config, rule }
    }

    pub fn from_props(props: &Props) -> Result<Self> {
        Ok(Self::new(HashModConfig::from_props(props)?))
    }

    pub fn config(&self) -> &HashModConfig {
        &self.config
    }

    pub fn sharding_count(&self) -> u32 {
        self.config.sharding_count.get()
    }

    pub fn uses_bitmask(&self) -> bool {
        self.rule.uses_bitmask()
    }

    /// Shard index in `[0, sharding-count)` for `key`.
    pub fn bucket_of<K: ShardingKey + ?Sized>(&self, key: &K) -> i64 {
        self.rule.bucket_of(key)
    }
}

impl ShardingAlgorithm for WangJenkinsHashMod {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn property_keys(&self) -> &'static [&'static str] {
        Self::PROPERTY_KEYS
    }

    fn auto_tables_amount(&self) -> usize {
        self.sharding_count() as usize
    }

    fn route_one<'a, T, K>(&self, targets: &'a [T], key: &K) -> Result<Option<&'a T>>
    where
        T: AsRef<str>,
        K: ShardingKey + ?Sized,
    {
        let bucket = self.bucket_of(key);
        trace!(bucket, "computed {} bucket", Self::TYPE);
        Ok(find_target(targets, bucket))
    }

    fn route_range<'a, T, K>(&self, targets: &'a [T], _range: &RangeShardingValue<K>) -> Result<&'a [T]>
    where
        T: AsRef<str>,
    {
        Ok(targets)
    }
}
