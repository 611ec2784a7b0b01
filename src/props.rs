use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShardingError};

pub const SHARDING_COUNT_KEY: &str = "sharding-count";
pub const SHARDING_RANGES_KEY: &str = "sharding-ranges";

/// Key-value properties handed to a sharding algorithm.
///
/// Values are kept as strings. When read from JSON, number and boolean
/// values are accepted and stored in their plain string form. Floats keep
/// their fraction, so `4.0` stays `"4.0"` and is not a valid count.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, RawProp>", into = "BTreeMap<String, String>")]
pub struct Props {
    entries: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProp {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for RawProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawProp::Text(s) => write!(f, "{}", s),
            RawProp::Integer(i) => write!(f, "{}", i),
            RawProp::Float(v) => write!(f, "{:?}", v),
            RawProp::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<BTreeMap<String, RawProp>> for Props {
    fn from(raw: BTreeMap<String, RawProp>) -> Self {
        raw.into_iter().map(|(k, v)| (k, v.to_string())).collect()
    }
}

impl From<Props> for BTreeMap<String, String> {
    fn from(props: Props) -> Self {
        props.entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Props {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn require(&self, key: &'static str) -> Result<&str> {
        self.get(key).ok_or(ShardingError::MissingProperty { key })
    }

    pub fn require_i32(&self, key: &'static str) -> Result<i32> {
        let raw = self.require(key)?;
        raw.trim().parse::<i32>().map_err(|e| ShardingError::InvalidProperty {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        })
    }

    /// Reads `sharding-count`, which must be a positive integer.
    pub fn sharding_count(&self) -> Result<NonZeroU32> {
        let count = self.require_i32(SHARDING_COUNT_KEY)?;
        u32::try_from(count)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| ShardingError::InvalidProperty {
                key: SHARDING_COUNT_KEY,
                value: count.to_string(),
                reason: "sharding count must be positive".to_string(),
            })
    }
}
