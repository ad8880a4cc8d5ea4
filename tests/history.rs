use sensorstream::{ConfigError, DerivedPoint, HistoryBuffer};

fn pt(index: u64) -> DerivedPoint {
    DerivedPoint {
        index,
        raw: index as f64,
        smoothed: index as f64,
        classified: false,
    }
}

#[test]
fn zero_capacity_is_a_config_error() {
    assert!(matches!(HistoryBuffer::new(0), Err(ConfigError::ZeroCapacity)));
}

#[test]
fn keeps_last_n_in_insertion_order() {
    let mut h = HistoryBuffer::new(3).unwrap();
    for n in 0..10u64 {
        h.append(pt(n));
        let expected_len = ((n + 1) as usize).min(3);
        assert_eq!(h.len(), expected_len);
        let idx: Vec<u64> = h.snapshot().iter().map(|p| p.index).collect();
        let first = (n + 1).saturating_sub(3);
        assert_eq!(idx, (first..=n).collect::<Vec<_>>());
    }
}

#[test]
fn snapshot_is_independent_copy() {
    let mut h = HistoryBuffer::new(2).unwrap();
    h.append(pt(0));
    let snap = h.snapshot();
    h.append(pt(1));
    h.append(pt(2));
    assert_eq!(snap, vec![pt(0)]);
    assert_eq!(h.capacity(), 2);
    assert!(!h.is_empty());
}
