use std::io;

/// Broad class of a [`ShardingError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised while building a router or rule; the deployment is broken.
    Configuration,
    /// Raised at routing time for a query shape or bucket the router cannot serve.
    UnsupportedOperation,
}

#[derive(Debug, thiserror::Error)]
pub enum ShardingError {
    #[error("{key} cannot be null")]
    MissingProperty { key: &'static str },

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidProperty {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("sharding range {spec:?} is not valid: expected exactly three integers, found {found}")]
    InvalidRange { spec: String, found: usize },

    #[error("unknown sharding algorithm type {0:?}")]
    UnknownAlgorithm(String),

    #[error("no sharding algorithm registered for table {0:?}")]
    UnknownTable(String),

    #[error("no applicable partition for bucket {bucket}")]
    NoPartition { bucket: i64 },

    #[error("{algorithm} sharding algorithm can not tackle with range query")]
    RangeUnsupported { algorithm: &'static str },

    #[error("failed to read sharding rule: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse sharding rule: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ShardingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShardingError::NoPartition { .. } | ShardingError::RangeUnsupported { .. } => {
                ErrorKind::UnsupportedOperation
            }
            _ => ErrorKind::Configuration,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    pub fn is_unsupported(&self) -> bool {
        self.kind() == ErrorKind::UnsupportedOperation
    }
}

pub type Result<T> = std::result::Result<T, ShardingError>;
