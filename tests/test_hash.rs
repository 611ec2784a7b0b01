#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use proptest::prelude::*;
    use rand::Rng;
    use wjshard::{hash_sharding_value, wang_jenkins_hash, BucketRule};

    // Same mix written with 64-bit integers masked back to 32 bits after every
    // step, the way a language without wrapping i32 would have to do it.
    fn masked_mix(key: i32) -> i32 {
        fn wrap(v: i64) -> i64 {
            (v & 0xffff_ffff) as u32 as i32 as i64
        }
        let mut k = key as i64;
        k = wrap(!k + (k << 21));
        k = wrap(k ^ (k >> 24));
        k = wrap(k + (k << 3) + (k << 8));
        k = wrap(k ^ (k >> 14));
        k = wrap(k + (k << 2) + (k << 4));
        k = wrap(k ^ (k >> 28));
        k = wrap(k + (k << 31));
        k as i32
    }

    fn rule(count: u32) -> BucketRule {
        BucketRule::new(NonZeroU32::new(count).unwrap())
    }

    #[test]
    fn test_reference_values() {
        let expected = [
            (0, 0),
            (1, 1214973726),
            (2, 1865025060),
            (3, -1497384099),
            (5, -369219105),
            (42, -1608554407),
            (97, 1820608906),
            (98, 1260819464),
            (123456789, -1181513841),
            (-1, -932515117),
            (i32::MAX, -1216965659),
            (i32::MIN, 2145443398),
        ];
        for (key, hash) in expected {
            assert_eq!(wang_jenkins_hash(key), hash, "key {}", key);
        }
    }

    #[test]
    fn test_double_mix_is_stable() {
        assert_eq!(wang_jenkins_hash(wang_jenkins_hash(97)), -611788195);
        for key in [0, 1, -1, 97, i32::MAX, i32::MIN] {
            let first = wang_jenkins_hash(wang_jenkins_hash(key));
            let second = wang_jenkins_hash(wang_jenkins_hash(key));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_router_hash_is_widened() {
        for key in [0, 1, -1, 97, i32::MAX, i32::MIN, 123456789] {
            let hash = hash_sharding_value(&key);
            assert!(hash >= 0);
            assert_eq!(hash, i64::from(wang_jenkins_hash(key)).abs());
        }
        assert_eq!(hash_sharding_value("a"), 1820608906);
    }

    #[test]
    fn test_bitmask_boundaries() {
        let mut rng = rand::thread_rng();
        for shift in 0..31 {
            let count = 1u32 << shift;
            let rule = rule(count);
            assert!(rule.uses_bitmask());
            let n = i64::from(count);
            let sampled = rng.gen_range(0..=i64::from(i32::MAX) + 1);
            for hash in [0, n - 1, n, i64::from(i32::MAX), i64::from(i32::MAX) + 1, sampled] {
                assert_eq!(rule.bucket(hash), hash % n, "count {} hash {}", count, hash);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_matches_masked_arithmetic(key in any::<i32>()) {
            prop_assert_eq!(wang_jenkins_hash(key), masked_mix(key));
        }

        #[test]
        fn prop_bitmask_agrees_with_modulo(shift in 0u32..31, hash in 0i64..=(1i64 << 31)) {
            let count = 1u32 << shift;
            prop_assert_eq!(rule(count).bucket(hash), hash % i64::from(count));
        }

        #[test]
        fn prop_bitmask_agrees_on_any_hash(shift in 0u32..31, hash in any::<i64>()) {
            let count = 1u32 << shift;
            let bucket = rule(count).bucket(hash);
            prop_assert_eq!(bucket, hash.rem_euclid(i64::from(count)));
            prop_assert!(bucket >= 0 && bucket < i64::from(count));
        }

        #[test]
        fn prop_bucket_in_range(key in any::<i32>(), count in 1u32..10_000) {
            let bucket = rule(count).bucket_of(&key);
            prop_assert!(bucket >= 0 && bucket < i64::from(count));
        }
    }
}
