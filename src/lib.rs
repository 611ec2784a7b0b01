//! Hash sharding algorithms built on the Wang/Jenkins 32-bit integer hash.
//!
//! Two strategies are provided:
//!
//! * [`WangJenkinsHashMod`] (`WJ_HASH_MOD`) routes a key to
//!   `hash mod sharding-count` and returns every table for range conditions.
//! * [`WangJenkinsHashModRange`] (`WJ_HASH_MOD_RANGE`) resolves the same bucket
//!   through a configured interval table to a partition id and refuses range
//!   conditions.
//!
//! ```
//! use wjshard::{Props, ShardingAlgorithm, WangJenkinsHashMod};
//!
//! let props = Props::new().with("sharding-count", "4");
//! let algorithm = WangJenkinsHashMod::from_props(&props).unwrap();
//! let tables = ["t_order_0", "t_order_1", "t_order_2", "t_order_3"];
//! assert_eq!(algorithm.route_one(&tables, "a").unwrap(), Some(&"t_order_2"));
//! ```

pub mod error;
pub mod hash;
pub mod hash_mod;
pub mod hash_mod_range;
pub mod key;
pub mod props;
pub mod rule;
pub mod sharding;

pub use error::{ErrorKind, Result, ShardingError};
pub use hash::{hash_sharding_value, wang_jenkins_hash, BucketRule};
pub use hash_mod::{HashModConfig, WangJenkinsHashMod};
pub use hash_mod_range::{parse_partition_ranges, HashModRangeConfig, PartitionRange, WangJenkinsHashModRange};
pub use key::{ShardingKey, Value};
pub use props::{Props, SHARDING_COUNT_KEY, SHARDING_RANGES_KEY};
pub use rule::{AlgorithmConfig, RuleConfig, ShardingRule};
pub use sharding::{Algorithm, PreciseShardingValue, RangeShardingValue, ShardingAlgorithm};
