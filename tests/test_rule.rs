#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use wjshard::{
        Algorithm, AlgorithmConfig, ErrorKind, Props, RangeShardingValue, RuleConfig, ShardingAlgorithm,
        ShardingError, ShardingRule, Value, WangJenkinsHashMod,
    };

    const RULES: &str = r#"{
        "tables": {
            "t_order": { "type": "WJ_HASH_MOD", "props": { "sharding-count": 4 } },
            "t_item": {
                "type": "WJ_HASH_MOD_RANGE",
                "props": { "sharding-count": "4", "sharding-ranges": "0,0,2;1,2,4" }
            }
        }
    }"#;

    fn orders() -> Vec<String> {
        (0..4).map(|i| format!("t_order_{}", i)).collect()
    }

    fn items() -> Vec<String> {
        (0..2).map(|i| format!("t_item_{}", i)).collect()
    }

    #[test]
    fn test_route_by_table() {
        let rule = ShardingRule::from_json(RULES).unwrap();
        assert_eq!(rule.tables(), vec!["t_item".to_string(), "t_order".to_string()]);

        let orders = orders();
        let routed = rule.route_one("t_order", &orders, &Value::from("a")).unwrap();
        assert_eq!(routed.map(String::as_str), Some("t_order_2"));

        let items = items();
        let routed = rule.route_one("t_item", &items, &Value::from("a")).unwrap();
        assert_eq!(routed.map(String::as_str), Some("t_item_1"));

        assert_eq!(rule.algorithm("t_order").unwrap().auto_tables_amount(), 4);
        assert_eq!(rule.algorithm("t_item").unwrap().auto_tables_amount(), 2);
    }

    #[test]
    fn test_range_by_table() {
        let rule = ShardingRule::from_json(RULES).unwrap();
        let range = RangeShardingValue::new("t_order", "create_time", Value::Integer(1)..Value::Integer(9));

        let orders = orders();
        assert_eq!(rule.route_range("t_order", &orders, &range).unwrap().len(), 4);

        let items = items();
        let err = rule.route_range("t_item", &items, &range).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn test_unknown_table() {
        let rule = ShardingRule::from_json(RULES).unwrap();
        let err = rule.route_one("t_user", &orders(), "a").unwrap_err();
        assert!(matches!(err, ShardingError::UnknownTable(ref t) if t == "t_user"));
    }

    #[test]
    fn test_type_name_lookup() {
        let props = Props::new().with("sharding-count", "4");
        assert_eq!(Algorithm::create("wj_hash_mod", &props).unwrap().type_name(), "WJ_HASH_MOD");
        assert_eq!(Algorithm::type_names(), ["WJ_HASH_MOD", "WJ_HASH_MOD_RANGE"]);

        let err = Algorithm::create("MOD", &props).unwrap_err();
        assert!(matches!(err, ShardingError::UnknownAlgorithm(ref t) if t == "MOD"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_table_rejects_whole_rule() {
        let json = r#"{
            "tables": {
                "t_order": { "type": "WJ_HASH_MOD", "props": { "sharding-count": 4 } },
                "t_item": { "type": "WJ_HASH_MOD_RANGE", "props": { "sharding-count": 4, "sharding-ranges": "0,0" } }
            }
        }"#;
        let err = ShardingRule::from_json(json).unwrap_err();
        assert!(matches!(err, ShardingError::InvalidRange { .. }));

        let json = r#"{ "tables": { "t_order": { "type": "WJ_HASH_MOD", "props": { "sharding-count": 4.0 } } } }"#;
        let err = ShardingRule::from_json(json).unwrap_err();
        assert!(matches!(err, ShardingError::InvalidProperty { key: "sharding-count", .. }));

        let err = ShardingRule::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ShardingError::Parse(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_failed_register_keeps_previous_algorithm() {
        let rule = ShardingRule::from_json(RULES).unwrap();
        let before = rule.algorithm("t_item").unwrap();

        let bad = AlgorithmConfig::new("WJ_HASH_MOD_RANGE", Props::new().with("sharding-count", "4").with("sharding-ranges", "0,0"));
        assert!(rule.register("t_item", &bad).is_err());

        let after = rule.algorithm("t_item").unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        match &*after {
            Algorithm::HashModRange(algorithm) => assert_eq!(algorithm.partitions().len(), 2),
            other => panic!("unexpected algorithm {:?}", other),
        }
    }

    #[test]
    fn test_register_replaces_algorithm() {
        let rule = ShardingRule::new();
        assert!(rule.is_empty());

        let props = Props::new().with("sharding-count", "4");
        let snapshot = rule.register("t_order", &AlgorithmConfig::new("WJ_HASH_MOD", props)).unwrap();

        let props = Props::new().with("sharding-count", "2");
        rule.register("t_order", &AlgorithmConfig::new("WJ_HASH_MOD", props)).unwrap();

        assert_eq!(snapshot.auto_tables_amount(), 4);
        assert_eq!(rule.algorithm("t_order").unwrap().auto_tables_amount(), 2);
        assert_eq!(rule.len(), 1);

        assert!(rule.remove("t_order").is_some());
        assert!(rule.algorithm("t_order").is_err());
    }

    #[test]
    fn test_insert_algorithm() {
        let rule = ShardingRule::new();
        let algorithm = WangJenkinsHashMod::from_props(&Props::new().with("sharding-count", "4")).unwrap();
        rule.insert("t_order", algorithm);
        let orders = orders();
        let routed = rule.route_one("t_order", &orders, "b").unwrap();
        assert_eq!(routed.map(String::as_str), Some("t_order_0"));
    }

    #[test]
    fn test_config_round_trip() {
        let config: RuleConfig = serde_json::from_str(RULES).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let reparsed: RuleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, reparsed);
        assert_eq!(reparsed.tables["t_order"].props.get("sharding-count"), Some("4"));
    }

    #[tokio::test]
    async fn test_load_rule_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RULES.as_bytes()).unwrap();

        let rule = ShardingRule::load(file.path()).await.unwrap();
        assert_eq!(rule.len(), 2);

        let missing = file.path().with_extension("missing");
        let err = ShardingRule::load(&missing).await.unwrap_err();
        assert!(matches!(err, ShardingError::Io(_)));
    }

    #[tokio::test]
    async fn test_concurrent_routing() {
        let rule = Arc::new(ShardingRule::from_json(RULES).unwrap());
        let keys: Vec<String> = (0..200).map(|i| format!("user-{}", i)).collect();
        let orders = orders();
        let expected: Vec<Option<String>> = keys
            .iter()
            .map(|key| rule.route_one("t_order", &orders, key).unwrap().cloned())
            .collect();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let rule = Arc::clone(&rule);
            let keys = keys.clone();
            let orders = orders.clone();
            handles.push(tokio::spawn(async move {
                keys.iter()
                    .map(|key| rule.route_one("t_order", &orders, key).unwrap().cloned())
                    .collect::<Vec<_>>()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), expected);
        }
        assert!(expected.iter().all(Option::is_some));
    }
}
