use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, ShardingError};
use crate::key::ShardingKey;
use crate::props::Props;
use crate::sharding::{Algorithm, RangeShardingValue, ShardingAlgorithm};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub props: Props,
}

impl AlgorithmConfig {
    pub fn new(type_name: impl Into<String>, props: Props) -> Self {
        Self {
            type_name: type_name.into(),
            props,
        }
    }

    pub fn build(&self) -> Result<Algorithm> {
        Algorithm::create(&self.type_name, &self.props)
    }
}

/// Sharding algorithms per logic table, as stored in a rule file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub tables: BTreeMap<String, AlgorithmConfig>,
}

/// Logic table name to sharding algorithm.
///
/// Algorithms are immutable and shared behind `Arc`. Lookups hand out a
/// snapshot, so replacing a table's algorithm never affects a routing call
/// that already holds the previous one.
#[derive(Debug, Default)]
pub struct ShardingRule {
    algorithms: DashMap<String, Arc<Algorithm>>,
}

impl ShardingRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every algorithm before publishing any of them.
    pub fn from_config(config: &RuleConfig) -> Result<Self> {
        let mut built = Vec::with_capacity(config.tables.len());
        for (table, algorithm) in &config.tables {
            built.push((table.clone(), Arc::new(algorithm.build()?)));
        }
        let rule = Self::new();
        for (table, algorithm) in built {
            rule.algorithms.insert(table, algorithm);
        }
        Ok(rule)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: RuleConfig = serde_json::from_str(json)?;
        Self::from_config(&config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        let rule = Self::from_json(&json)?;
        info!(path = %path.display(), tables = rule.len(), "loaded sharding rule");
        Ok(rule)
    }

    /// Builds the algorithm for `table` and swaps it in. On error the previous
    /// algorithm, if any, stays registered.
    pub fn register(&self, table: impl Into<String>, config: &AlgorithmConfig) -> Result<Arc<Algorithm>> {
        let table = table.into();
        let algorithm = match config.build() {
            Ok(algorithm) => Arc::new(algorithm),
            Err(e) => {
                warn!(table = %table, error = %e, "rejected sharding algorithm");
                return Err(e);
            }
        };
        self.publish(table, Arc::clone(&algorithm));
        Ok(algorithm)
    }

    pub fn insert(&self, table: impl Into<String>, algorithm: impl Into<Algorithm>) -> Arc<Algorithm> {
        let algorithm = Arc::new(algorithm.into());
        self.publish(table.into(), Arc::clone(&algorithm));
        algorithm
    }

    fn publish(&self, table: String, algorithm: Arc<Algorithm>) {
        let type_name = algorithm.type_name();
        if self.algorithms.insert(table.clone(), algorithm).is_some() {
            debug!(table = %table, algorithm = type_name, "replaced sharding algorithm");
        } else {
            debug!(table = %table, algorithm = type_name, "registered sharding algorithm");
        }
    }

    pub fn remove(&self, table: &str) -> Option<Arc<Algorithm>> {
        self.algorithms.remove(table).map(|(_, algorithm)| algorithm)
    }

    pub fn algorithm(&self, table: &str) -> Result<Arc<Algorithm>> {
        self.algorithms
            .get(table)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ShardingError::UnknownTable(table.to_string()))
    }

    pub fn tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = self.algorithms.iter().map(|entry| entry.key().clone()).collect();
        tables.sort();
        tables
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    pub fn route_one<'a, T, K>(&self, table: &str, targets: &'a [T], key: &K) -> Result<Option<&'a T>>
    where
        T: AsRef<str>,
        K: ShardingKey + ?Sized,
    {
        self.algorithm(table)?.route_one(targets, key)
    }

    pub fn route_range<'a, T, K>(
        &self,
        table: &str,
        targets: &'a [T],
        range: &RangeShardingValue<K>,
    ) -> Result<&'a [T]>
    where
        T: AsRef<str>,
    {
        self.algorithm(table)?.route_range(targets, range)
    }
}
