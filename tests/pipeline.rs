use std::cell::RefCell;
use std::rc::Rc;

use sensorstream::{
    DerivedPoint, Pipeline, ReplaySource, SharedSnapshot, StopReason, StreamConfig,
};

type Published = Rc<RefCell<Vec<Vec<DerivedPoint>>>>;

fn cfg(capacity: usize) -> StreamConfig {
    StreamConfig {
        history_capacity: capacity,
        threshold: 5.0,
        ..StreamConfig::default()
    }
}

/// Pipeline that records every published snapshot. Sampling stays off; tests
/// feed it through its own sender.
fn recording_pipeline(capacity: usize) -> (Pipeline, Published) {
    let published: Published = Rc::new(RefCell::new(Vec::new()));
    let sink = published.clone();
    let pipeline = Pipeline::new(
        &cfg(capacity),
        ReplaySource::default(),
        move |snap: &[DerivedPoint]| sink.borrow_mut().push(snap.to_vec()),
    )
    .unwrap();
    (pipeline, published)
}

fn tuple(p: &DerivedPoint) -> (u64, f64, f64, bool) {
    (p.index, p.raw, p.smoothed, p.classified)
}

#[test]
fn concrete_scenario_capacity_three() {
    let (mut pipeline, published) = recording_pipeline(3);
    let tx = pipeline.sample_sender();
    for raw in [2.0, 10.0, 10.0, 1.0] {
        tx.deliver(raw).unwrap();
    }
    assert_eq!(pipeline.pump(), 4);

    let published = published.borrow();
    assert_eq!(published.len(), 4);
    let newest: Vec<_> = published.iter().map(|s| tuple(s.last().unwrap())).collect();
    assert_eq!(
        newest,
        vec![
            (0, 2.0, 1.0, false),
            (1, 10.0, 6.0, true),
            (2, 10.0, 10.0, true),
            (3, 1.0, 5.5, true),
        ]
    );
    let last: Vec<u64> = published[3].iter().map(|p| p.index).collect();
    assert_eq!(last, vec![1, 2, 3]);
}

#[test]
fn published_window_is_last_min_n_points() {
    let (mut pipeline, published) = recording_pipeline(4);
    let raws: Vec<f64> = (0..11).map(|i| ((i * 7) % 11) as f64).collect();
    for (n, raw) in raws.iter().enumerate() {
        pipeline.accept(*raw).unwrap();
        let published = published.borrow();
        let snap = published.last().unwrap();
        assert_eq!(snap.len(), (n + 1).min(4));
        let first = (n + 1).saturating_sub(4);
        let expected_raw: Vec<f64> = raws[first..=n].to_vec();
        let got_raw: Vec<f64> = snap.iter().map(|p| p.raw).collect();
        assert_eq!(got_raw, expected_raw);
    }
}

#[test]
fn smoothing_uses_previous_raw_seeded_at_zero() {
    let (mut pipeline, _published) = recording_pipeline(20);
    let raws = [3.0, 9.0, 4.0, 0.0, 10.0];
    let points: Vec<DerivedPoint> = raws.iter().map(|r| pipeline.accept(*r).unwrap()).collect();
    assert_eq!(points[0].smoothed, 1.5);
    for i in 1..raws.len() {
        assert_eq!(points[i].smoothed, (raws[i] + raws[i - 1]) / 2.0);
        assert_eq!(points[i].classified, points[i].smoothed > 5.0);
    }
}

#[test]
fn indices_increase_by_one_across_eviction() {
    let (mut pipeline, _published) = recording_pipeline(2);
    let idx: Vec<u64> = (0..50)
        .map(|i| pipeline.accept(i as f64).unwrap().index)
        .collect();
    assert_eq!(idx, (0..50).collect::<Vec<u64>>());
    let window: Vec<u64> = pipeline.history().iter().map(|p| p.index).collect();
    assert_eq!(window, vec![48, 49]);
}

#[test]
fn samples_while_paused_are_dropped_not_queued() {
    let (mut pipeline, published) = recording_pipeline(20);
    let tx = pipeline.sample_sender();

    tx.deliver(1.0).unwrap();
    pipeline.pump();
    pipeline.set_forwarding(false);
    for raw in [100.0, 200.0, 300.0] {
        tx.deliver(raw).unwrap();
    }
    assert_eq!(pipeline.pump(), 0);
    pipeline.set_forwarding(true);
    tx.deliver(2.0).unwrap();
    assert_eq!(pipeline.pump(), 1);

    let published = published.borrow();
    assert_eq!(published.len(), 2);
    for snap in published.iter() {
        assert!(snap.iter().all(|p| p.raw < 100.0));
    }
    let last: Vec<(u64, f64)> = published[1].iter().map(|p| (p.index, p.raw)).collect();
    assert_eq!(last, vec![(0, 1.0), (1, 2.0)]);
    // Dropped samples do not feed the smoothing either.
    assert_eq!(published[1][1].smoothed, 1.5);

    let stats = pipeline.stats();
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.dropped, 3);
}

#[test]
fn toggled_off_during_second_sample_publishes_only_index_zero() {
    let (mut pipeline, published) = recording_pipeline(20);
    assert!(pipeline.accept(8.0).is_some());
    pipeline.set_forwarding(false);
    assert!(pipeline.accept(8.0).is_none());
    pipeline.set_forwarding(true);
    pipeline.pump();

    let published = published.borrow();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].len(), 1);
    assert_eq!(tuple(&published[0][0]), (0, 8.0, 4.0, false));
}

#[test]
fn stop_event_is_recorded_without_publishing() {
    let (mut pipeline, published) = recording_pipeline(20);
    let tx = pipeline.sample_sender();
    tx.deliver(4.0).unwrap();
    tx.report_stop(StopReason::SourceFailures(5)).unwrap();
    assert_eq!(pipeline.pump(), 1);
    assert_eq!(pipeline.last_stop(), Some(StopReason::SourceFailures(5)));
    assert_eq!(published.borrow().len(), 1);
}

#[test]
fn shared_snapshot_tracks_latest_window() {
    let snapshot = SharedSnapshot::new();
    let mut pipeline = Pipeline::new(&cfg(2), ReplaySource::default(), snapshot.clone()).unwrap();
    for raw in [1.0, 2.0, 3.0] {
        pipeline.accept(raw);
    }
    assert_eq!(snapshot.publishes(), 3);
    let raws: Vec<f64> = snapshot.points().iter().map(|p| p.raw).collect();
    assert_eq!(raws, vec![2.0, 3.0]);
}

#[test]
fn invalid_config_fails_fast() {
    let bad = StreamConfig {
        history_capacity: 0,
        ..StreamConfig::default()
    };
    assert!(Pipeline::new(&bad, ReplaySource::default(), SharedSnapshot::new()).is_err());
}

#[test]
fn new_pipeline_starts_idle_and_forwarding() {
    let (pipeline, _published) = recording_pipeline(20);
    assert!(!pipeline.is_sampling());
    assert!(pipeline.is_forwarding());
    assert_eq!(pipeline.launches(), 0);
    assert!(pipeline.sample_sender().deliver(1.0).is_ok());
}
