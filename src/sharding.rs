use std::ops::{Bound, RangeBounds};

use tracing::{trace, warn};

use crate::error::{Result, ShardingError};
use crate::hash_mod::WangJenkinsHashMod;
use crate::hash_mod_range::WangJenkinsHashModRange;
use crate::key::ShardingKey;
use crate::props::Props;

/// Sharding key of an equality condition, e.g. `WHERE order_id = ?`.
#[derive(Clone, Debug, PartialEq)]
pub struct PreciseShardingValue<K> {
    pub logic_table_name: String,
    pub column_name: String,
    pub value: K,
}

impl<K> PreciseShardingValue<K> {
    pub fn new(logic_table_name: impl Into<String>, column_name: impl Into<String>, value: K) -> Self {
        Self {
            logic_table_name: logic_table_name.into(),
            column_name: column_name.into(),
            value,
        }
    }
}

/// Sharding key of a range condition, e.g. `WHERE create_time BETWEEN ? AND ?`.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeShardingValue<K> {
    pub logic_table_name: String,
    pub column_name: String,
    pub value_range: (Bound<K>, Bound<K>),
}

impl<K: Clone> RangeShardingValue<K> {
    pub fn new(
        logic_table_name: impl Into<String>,
        column_name: impl Into<String>,
        value_range: impl RangeBounds<K>,
    ) -> Self {
        Self {
            logic_table_name: logic_table_name.into(),
            column_name: column_name.into(),
            value_range: (value_range.start_bound().cloned(), value_range.end_bound().cloned()),
        }
    }
}

impl<K> RangeBounds<K> for RangeShardingValue<K> {
    fn start_bound(&self) -> Bound<&K> {
        self.value_range.0.as_ref()
    }

    fn end_bound(&self) -> Bound<&K> {
        self.value_range.1.as_ref()
    }
}

/// Routing capability shared by every hash sharding strategy.
///
/// Targets are physical table names; a target is chosen when its name ends
/// with the decimal form of the computed shard index. `Ok(None)` means no
/// target carries that suffix, which callers are expected to handle.
pub trait ShardingAlgorithm {
    /// Identifier the strategy is registered under.
    fn type_name(&self) -> &'static str;

    /// Property keys the strategy reads, in declaration order.
    fn property_keys(&self) -> &'static [&'static str];

    /// Number of physical tables the strategy distributes over.
    fn auto_tables_amount(&self) -> usize;

    fn route_one<'a, T, K>(&self, targets: &'a [T], key: &K) -> Result<Option<&'a T>>
    where
        T: AsRef<str>,
        K: ShardingKey + ?Sized;

    fn route_range<'a, T, K>(&self, targets: &'a [T], range: &RangeShardingValue<K>) -> Result<&'a [T]>
    where
        T: AsRef<str>;

    fn do_sharding<'a, T, K>(&self, targets: &'a [T], value: &PreciseShardingValue<K>) -> Result<Option<&'a T>>
    where
        T: AsRef<str>,
        K: ShardingKey,
    {
        let routed = self.route_one(targets, &value.value)?;
        match routed {
            Some(target) => trace!(
                table = %value.logic_table_name,
                column = %value.column_name,
                routed = AsRef::<str>::as_ref(target),
                "routed precise sharding value"
            ),
            None => warn!(
                table = %value.logic_table_name,
                column = %value.column_name,
                algorithm = self.type_name(),
                "no available target matches sharding value"
            ),
        }
        Ok(routed)
    }
}

/// Finds the first target whose name ends with `index`.
pub(crate) fn find_target<T: AsRef<str>>(targets: &[T], index: i64) -> Option<&T> {
    let suffix = index.to_string();
    for each in targets {
        let name: &str = each.as_ref();
        if name.ends_with(&suffix) {
            return Some(each);
        }
    }
    None
}

/// The hash sharding strategies, selected by type name.
#[derive(Clone, Debug)]
pub enum Algorithm {
    HashMod(WangJenkinsHashMod),
    HashModRange(WangJenkinsHashModRange),
}

impl Algorithm {
    pub fn type_names() -> [&'static str; 2] {
        [WangJenkinsHashMod::TYPE, WangJenkinsHashModRange::TYPE]
    }

    /// Builds the strategy registered under `type_name` (ASCII case-insensitive).
    pub fn create(type_name: &str, props: &Props) -> Result<Self> {
        let type_name = type_name.trim();
        if type_name.eq_ignore_ascii_case(WangJenkinsHashMod::TYPE) {
            Ok(Algorithm::HashMod(WangJenkinsHashMod::from_props(props)?))
        } else if type_name.eq_ignore_ascii_case(WangJenkinsHashModRange::TYPE) {
            Ok(Algorithm::HashModRange(WangJenkinsHashModRange::from_props(props)?))
        } else {
            Err(ShardingError::UnknownAlgorithm(type_name.to_string()))
        }
    }
}

impl From<WangJenkinsHashMod> for Algorithm {
    fn from(algorithm: WangJenkinsHashMod) -> Self {
        Algorithm::HashMod(algorithm)
    }
}

impl From<WangJenkinsHashModRange> for Algorithm {
    fn from(algorithm: WangJenkinsHashModRange) -> Self {
        Algorithm::HashModRange(algorithm)
    }
}

impl ShardingAlgorithm for Algorithm {
    fn type_name(&self) -> &'static str {
        match self {
            Algorithm::HashMod(a) => a.type_name(),
            Algorithm::HashModRange(a) => a.type_name(),
        }
    }

    fn property_keys(&self) -> &'static [&'static str] {
        match self {
            Algorithm::HashMod(a) => a.property_keys(),
            Algorithm::HashModRange(a) => a.property_keys(),
        }
    }

    fn auto_tables_amount(&self) -> usize {
        match self {
            Algorithm::HashMod(a) => a.auto_tables_amount(),
            Algorithm::HashModRange(a) => a.auto_tables_amount(),
        }
    }

    fn route_one<'a, T, K>(&self, targets: &'a [T], key: &K) -> Result<Option<&'a T>>
    where
        T: AsRef<str>,
        K: ShardingKey + ?Sized,
    {
        match self {
            Algorithm::HashMod(a) => a.route_one(targets, key),
            Algorithm::HashModRange(a) => a.route_one(targets, key),
        }
    }

    fn route_range<'a, T, K>(&self, targets: &'a [T], range: &RangeShardingValue<K>) -> Result<&'a [T]>
    where
        T: AsRef<str>,
    {
        match self {
            Algorithm::HashMod(a) => a.route_range(targets, range),
            Algorithm::HashModRange(a) => a.route_range(targets, range),
        }
    }
}
