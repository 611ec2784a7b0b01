use std::ops::Bound;
use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use wjshard::{RangeShardingValue, ShardingRule, Value};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyType {
    String,
    Int,
    Float,
    Bool,
}

/// Route a sharding key to a physical table using a sharding rule file.
#[derive(Debug, Parser)]
#[command(name = "wjshard", version)]
#[command(group(ArgGroup::new("lookup").required(true).multiple(true).args(["key", "lower", "upper"])))]
struct Args {
    /// JSON rule file mapping logic tables to sharding algorithms
    #[arg(long, env = "WJSHARD_RULES")]
    rules: PathBuf,

    /// Logic table name
    #[arg(long)]
    table: String,

    /// Candidate physical tables
    #[arg(long, value_delimiter = ',', required = true)]
    targets: Vec<String>,

    /// Sharding key for an equality lookup
    #[arg(long, conflicts_with_all = ["lower", "upper"])]
    key: Option<String>,

    #[arg(long, value_enum, default_value = "string")]
    key_type: KeyType,

    /// Inclusive lower bound of a range lookup
    #[arg(long)]
    lower: Option<String>,

    /// Inclusive upper bound of a range lookup
    #[arg(long)]
    upper: Option<String>,
}

fn parse_key(raw: &str, key_type: KeyType) -> Result<Value, String> {
    match key_type {
        KeyType::String => Ok(Value::String(raw.to_string())),
        KeyType::Int => raw.parse().map(Value::Integer).map_err(|e| format!("invalid int {:?}: {}", raw, e)),
        KeyType::Float => raw.parse().map(Value::Float).map_err(|e| format!("invalid float {:?}: {}", raw, e)),
        KeyType::Bool => raw.parse().map(Value::Boolean).map_err(|e| format!("invalid bool {:?}: {}", raw, e)),
    }
}

fn bound(raw: Option<&str>, key_type: KeyType) -> Result<Bound<Value>, String> {
    match raw {
        Some(raw) => parse_key(raw, key_type).map(Bound::Included),
        None => Ok(Bound::Unbounded),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rule = ShardingRule::load(&args.rules).await?;

    match &args.key {
        Some(raw) => {
            let key = parse_key(raw, args.key_type)?;
            match rule.route_one(&args.table, &args.targets, &key)? {
                Some(target) => println!("{}", target),
                None => println!("<no match>"),
            }
        }
        None => {
            let range = RangeShardingValue::new(
                args.table.clone(),
                "",
                (
                    bound(args.lower.as_deref(), args.key_type)?,
                    bound(args.upper.as_deref(), args.key_type)?,
                ),
            );
            for target in rule.route_range(&args.table, &args.targets, &range)? {
                println!("{}", target);
            }
        }
    }
    Ok(())
}
