use freqidx::services::normalizer::{words_per_million, Normalization, SoftMax, DEFAULT_FACTOR};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Words-per-million normalization
#[cfg(test)]
mod words_per_million_tests {
    use super::*;

    #[test]
    fn test_values_sum_to_factor() {
        let pairs = vec![("the", 56_271_872_u64), ("of", 33_950_064), ("and", 29_944_184)];
        let map = words_per_million(&pairs, DEFAULT_FACTOR);

        let total: f64 = map.values().sum();
        assert!((total - DEFAULT_FACTOR).abs() < 1e-6);
        assert!(map["the"] > map["of"]);
        assert!(map["of"] > map["and"]);
    }

    #[test]
    fn test_custom_factor() {
        let pairs = vec![("a", 1_u64), ("b", 3)];
        let map = words_per_million(&pairs, 100.0);

        assert!(close(map["a"], 25.0));
        assert!(close(map["b"], 75.0));
    }

    #[test]
    fn test_empty_input() {
        let pairs: Vec<(&str, u64)> = Vec::new();
        assert!(words_per_million(&pairs, DEFAULT_FACTOR).is_empty());
    }
}

/// Softmax with range rescaling
#[cfg(test)]
mod softmax_tests {
    use super::*;

    #[test]
    fn test_large_counts_do_not_overflow() {
        let softmax = SoftMax::from_counts(&[u64::from(u32::MAX), 1, 500_000], 0.0, 10.0);
        let values: Vec<f64> = (0..softmax.len()).filter_map(|i| softmax.index_value(i)).collect();

        assert!(values.iter().all(|value| value.is_finite()));
        assert!(close(values.iter().sum(), 1.0));
        assert!(values[0] > values[2]);
        assert!(values[2] > values[1] || close(values[2], values[1]));
    }

    #[test]
    fn test_equal_counts_share_probability() {
        let softmax = SoftMax::from_counts(&[7, 7, 7, 7], 0.0, 10.0);
        for i in 0..4 {
            assert!(close(softmax.index_value(i).unwrap(), 0.25));
        }
    }

    #[test]
    fn test_empty_distribution() {
        let softmax = SoftMax::from_counts(&[], 0.0, 10.0);
        assert!(softmax.is_empty());
        assert_eq!(softmax.index_value(0), None);
        assert!(close(softmax.value(1.0), 0.0));
    }

    #[test]
    fn test_value_against_distribution() {
        let softmax = SoftMax::from_values(&[1.0, 2.0, 3.0]);
        let expected = 3.0_f64.exp() / (1.0_f64.exp() + 2.0_f64.exp() + 3.0_f64.exp());

        assert!(close(softmax.value(3.0), expected));
        assert!(close(softmax.min(), 1.0));
        assert!(close(softmax.max(), 3.0));
        assert!(close(softmax.sum(), 6.0));
    }

    #[test]
    fn test_map_keys_follow_pairs() {
        let pairs = vec![("rare".to_string(), 1_u64), ("common".to_string(), 100)];
        let map = SoftMax::map(&pairs, 0.0, 10.0);

        assert_eq!(map.len(), 2);
        assert!(map["common"] > map["rare"]);
    }
}

#[test]
fn test_normalization_serde() {
    let value: Normalization = serde_json::from_str("\"softmax\"").unwrap();
    assert_eq!(value, Normalization::Softmax);
    assert_eq!(
        serde_json::to_string(&Normalization::WordsPerMillion).unwrap(),
        "\"words-per-million\""
    );
}
