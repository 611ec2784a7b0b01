use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A value that can be used as a sharding key.
///
/// `sharding_hash` is the structural 32-bit hash code of the value. It must
/// depend only on the value itself, never on process state or a seeded hasher,
/// so the same key routes to the same table everywhere.
pub trait ShardingKey {
    fn sharding_hash(&self) -> i32;
}

fn long_hash(value: i64) -> i32 {
    (value ^ ((value as u64) >> 32) as i64) as i32
}

impl ShardingKey for i32 {
    fn sharding_hash(&self) -> i32 {
        *self
    }
}

macro_rules! widening_key {
    ($($t:ty),*) => {
        $(impl ShardingKey for $t {
            fn sharding_hash(&self) -> i32 {
                i32::from(*self)
            }
        })*
    };
}

widening_key!(i8, i16, u8, u16);

impl ShardingKey for i64 {
    fn sharding_hash(&self) -> i32 {
        long_hash(*self)
    }
}

impl ShardingKey for u32 {
    fn sharding_hash(&self) -> i32 {
        long_hash(i64::from(*self))
    }
}

impl ShardingKey for u64 {
    fn sharding_hash(&self) -> i32 {
        long_hash(*self as i64)
    }
}

impl ShardingKey for bool {
    fn sharding_hash(&self) -> i32 {
        if *self {
            1231
        } else {
            1237
        }
    }
}

impl ShardingKey for char {
    fn sharding_hash(&self) -> i32 {
        *self as i32
    }
}

impl ShardingKey for str {
    fn sharding_hash(&self) -> i32 {
        self.encode_utf16()
            .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)))
    }
}

impl ShardingKey for String {
    fn sharding_hash(&self) -> i32 {
        self.as_str().sharding_hash()
    }
}

impl ShardingKey for f64 {
    fn sharding_hash(&self) -> i32 {
        let bits = if self.is_nan() {
            0x7ff8_0000_0000_0000u64
        } else {
            self.to_bits()
        };
        long_hash(bits as i64)
    }
}

impl ShardingKey for f32 {
    fn sharding_hash(&self) -> i32 {
        if self.is_nan() {
            0x7fc0_0000
        } else {
            self.to_bits() as i32
        }
    }
}

impl ShardingKey for NaiveDate {
    fn sharding_hash(&self) -> i32 {
        let year = self.year();
        let month = self.month() as i32;
        let day = self.day() as i32;
        (year & !0x7ff) ^ ((year << 11) + (month << 6) + day)
    }
}

impl ShardingKey for NaiveTime {
    fn sharding_hash(&self) -> i32 {
        let nano_of_day = i64::from(self.num_seconds_from_midnight()) * 1_000_000_000
            + i64::from(self.nanosecond());
        long_hash(nano_of_day)
    }
}

impl ShardingKey for NaiveDateTime {
    fn sharding_hash(&self) -> i32 {
        self.date().sharding_hash() ^ self.time().sharding_hash()
    }
}

/// Instants hash by their epoch milliseconds, whatever the zone.
impl<Tz: TimeZone> ShardingKey for DateTime<Tz> {
    fn sharding_hash(&self) -> i32 {
        long_hash(self.timestamp_millis())
    }
}

impl ShardingKey for Uuid {
    fn sharding_hash(&self) -> i32 {
        let bits = self.as_u128();
        let hilo = ((bits >> 64) as u64) ^ (bits as u64);
        ((hilo >> 32) as i32) ^ (hilo as i32)
    }
}

impl<T: ShardingKey + ?Sized> ShardingKey for &T {
    fn sharding_hash(&self) -> i32 {
        (**self).sharding_hash()
    }
}

impl<T: ShardingKey + ?Sized> ShardingKey for Box<T> {
    fn sharding_hash(&self) -> i32 {
        (**self).sharding_hash()
    }
}

/// Dynamically typed sharding key, used where the key type is only known at
/// runtime (rule lookups, the command line).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    String(String),
    Float(f64),
    Boolean(bool),
    Null,
}

impl ShardingKey for Value {
    fn sharding_hash(&self) -> i32 {
        match self {
            Value::Integer(i) => i.sharding_hash(),
            Value::String(s) => s.sharding_hash(),
            Value::Float(f) => f.sharding_hash(),
            Value::Boolean(b) => b.sharding_hash(),
            Value::Null => 0,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::String(s) => write!(f, "{}", s),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}
