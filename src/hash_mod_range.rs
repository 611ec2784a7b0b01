use std::fmt;
use std::num::NonZeroU32;
use std::time::Instant;

use tracing::{debug, trace};

use crate::error::{Result, ShardingError};
use crate::hash::BucketRule;
use crate::key::ShardingKey;
use crate::props::{Props, SHARDING_COUNT_KEY, SHARDING_RANGES_KEY};
use crate::sharding::{find_target, RangeShardingValue, ShardingAlgorithm};

/// Half-open bucket interval `[low, high)` owned by one partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionRange {
    pub partition: i64,
    pub low: i64,
    pub high: i64,
}

impl PartitionRange {
    /// Parses one `id,low,high` entry.
    ///
    /// Fields that are not integers are skipped and the remaining numbers are
    /// sorted before assignment, so the smallest becomes the partition id and
    /// the other two the bounds. `"0,0,2"` and `"2,0,0"` are the same entry.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut values: Vec<i64> = spec
            .split(',')
            .filter_map(|field| field.trim().parse::<i64>().ok())
            .collect();
        if values.len() != 3 {
            return Err(ShardingError::InvalidRange {
                spec: spec.to_string(),
                found: values.len(),
            });
        }
        values.sort_unstable();
        Ok(Self {
            partition: values[0],
            low: values[1],
            high: values[2],
        })
    }

    pub fn contains(&self, bucket: i64) -> bool {
        self.low <= bucket && bucket < self.high
    }
}

impl fmt::Display for PartitionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[{}, {})", self.partition, self.low, self.high)
    }
}

/// Parses a `;`-separated `sharding-ranges` value into the partition table.
///
/// A repeated partition id replaces the earlier interval in place.
pub fn parse_partition_ranges(ranges: &str) -> Result<Vec<PartitionRange>> {
    let mut table: Vec<PartitionRange> = Vec::new();
    for spec in ranges.split(';').map(str::trim) {
        let range = PartitionRange::parse(spec)?;
        match table.iter_mut().find(|r| r.partition == range.partition) {
            Some(existing) => *existing = range,
            None => table.push(range),
        }
    }
    Ok(table)
}

/// Validated `WJ_HASH_MOD_RANGE` settings.
///
/// The partition table is non-empty and every interval has `low < high`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashModRangeConfig {
    sharding_count: NonZeroU32,
    ranges: Vec<PartitionRange>,
}

impl HashModRangeConfig {
    pub fn new(sharding_count: NonZeroU32, ranges: Vec<PartitionRange>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(ShardingError::InvalidProperty {
                key: SHARDING_RANGES_KEY,
                value: String::new(),
                reason: "partition table is empty".to_string(),
            });
        }
        if let Some(range) = ranges.iter().find(|r| r.low >= r.high) {
            return Err(ShardingError::InvalidProperty {
                key: SHARDING_RANGES_KEY,
                value: range.to_string(),
                reason: "interval low bound must be below its high bound".to_string(),
            });
        }
        Ok(Self { sharding_count, ranges })
    }

    pub fn from_props(props: &Props) -> Result<Self> {
        let sharding_count = props.sharding_count()?;
        let ranges = parse_partition_ranges(props.require(SHARDING_RANGES_KEY)?)?;
        Self::new(sharding_count, ranges)
    }

    pub fn sharding_count(&self) -> NonZeroU32 {
        self.sharding_count
    }

    pub fn ranges(&self) -> &[PartitionRange] {
        &self.ranges
    }
}

/// Hashes a key into `sharding-count` buckets like [`WangJenkinsHashMod`], then
/// maps the bucket to a partition through the configured interval table.
///
/// The interval table must cover every bucket. A bucket outside all intervals
/// is an error rather than a routing miss, and so is any range condition.
///
/// [`WangJenkinsHashMod`]: crate::hash_mod::WangJenkinsHashMod
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WangJenkinsHashModRange {
    config: HashModRangeConfig,
    rule: BucketRule,
}

impl WangJenkinsHashModRange {
    pub const TYPE: &'static str = "WJ_HASH_MOD_RANGE";
    pub const PROPERTY_KEYS: &'static [&'static str] = &[SHARDING_RANGES_KEY, SHARDING_COUNT_KEY];

    pub fn new(config: HashModRangeConfig) -> Self {
        let rule = BucketRule::new(config.sharding_count);
        debug!(
            sharding_count = config.sharding_count.get(),
            bitmask = rule.uses_bitmask(),
            partitions = config.ranges.len(),
            "initialized {} sharding algorithm",
            Self::TYPE
        );
        Self { config, rule }
    }

    pub fn from_props(props: &Props) -> Result<Self> {
        let start = Instant::now();
        let config = HashModRangeConfig::from_props(props)?;
        debug!("partition table built in {:?}", start.elapsed());
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &HashModRangeConfig {
        &self.config
    }

    pub fn partitions(&self) -> &[PartitionRange] {
        &self.config.ranges
    }

    pub fn sharding_count(&self) -> u32 {
        self.config.sharding_count.get()
    }

    pub fn uses_bitmask(&self) -> bool {
        self.rule.uses_bitmask()
    }

    pub fn bucket_of<K: ShardingKey + ?Sized>(&self, key: &K) -> i64 {
        self.rule.bucket_of(key)
    }

    /// Partition whose interval contains `bucket`, first match in table order.
    pub fn partition_for_bucket(&self, bucket: i64) -> Result<i64> {
        self.config
            .ranges
            .iter()
            .find(|range| range.contains(bucket))
            .map(|range| range.partition)
            .ok_or(ShardingError::NoPartition { bucket })
    }
}

impl ShardingAlgorithm for WangJenkinsHashModRange {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn property_keys(&self) -> &'static [&'static str] {
        Self::PROPERTY_KEYS
    }

    fn auto_tables_amount(&self) -> usize {
        self.config.ranges.len()
    }

    fn route_one<'a, T, K>(&self, targets: &'a [T], key: &K) -> Result<Option<&'a T>>
    where
        T: AsRef<str>,
        K: ShardingKey + ?Sized,
    {
        let bucket = self.bucket_of(key);
        let partition = self.partition_for_bucket(bucket)?;
        trace!(bucket, partition, "resolved {} partition", Self::TYPE);
        Ok(find_target(targets, partition))
    }

    fn route_range<'a, T, K>(&self, _targets: &'a [T], _range: &RangeShardingValue<K>) -> Result<&'a [T]>
    where
        T: AsRef<str>,
    {
        Err(ShardingError::RangeUnsupported { algorithm: Self::TYPE })
    }
}
