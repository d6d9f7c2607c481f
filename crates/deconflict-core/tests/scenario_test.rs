//! End-to-end deconfliction scenarios: missions in, conflict reports out.

use deconflict_core::{
    classify, distance_3d, ConflictSeverity, ConflictType, DeconflictionEngine, EngineConfig,
    Mission, Trajectory, TrajectoryCalculator, Waypoint,
};

fn mission(id: &str, waypoints: &[(f64, f64, f64, f64)], start: f64, end: f64) -> Mission {
    let waypoints = waypoints
        .iter()
        .map(|&(x, y, z, t)| Waypoint::new(x, y, z, t))
        .collect();
    Mission::new(id, waypoints, start, end).expect("valid mission")
}

fn sample(m: &Mission, time_step: f64) -> Trajectory {
    TrajectoryCalculator::new()
        .compute(m, time_step)
        .expect("trajectory")
}

fn sample_primary(m: &Mission, time_step: f64) -> Trajectory {
    TrajectoryCalculator::new()
        .compute_primary(m, time_step)
        .expect("trajectory")
}

#[test]
fn test_straight_line_no_conflict() {
    let primary = sample_primary(
        &mission("PRIMARY", &[(0.0, 0.0, 50.0, 0.0), (100.0, 0.0, 50.0, 100.0)], 0.0, 100.0),
        10.0,
    );
    let other = sample(
        &mission("UAV_002", &[(0.0, 500.0, 50.0, 0.0), (100.0, 500.0, 50.0, 100.0)], 0.0, 100.0),
        10.0,
    );

    let report = DeconflictionEngine::default()
        .analyze(&primary, &[other], 50.0, 10.0)
        .unwrap();
    assert!(report.is_safe());
    assert!(report.conflicts().is_empty());
    assert_eq!(report.primary_id(), "PRIMARY");
    assert_eq!(report.summary().flights_analyzed, 1);
}

#[test]
fn test_head_on_spatial_conflict() {
    let primary = sample_primary(
        &mission("PRIMARY", &[(0.0, 0.0, 50.0, 0.0), (100.0, 0.0, 50.0, 100.0)], 0.0, 100.0),
        10.0,
    );
    let other = sample(
        &mission("HEAD_ON", &[(100.0, 0.0, 50.0, 0.0), (0.0, 0.0, 50.0, 100.0)], 0.0, 100.0),
        10.0,
    );

    let report = DeconflictionEngine::default()
        .analyze(&primary, &[other], 50.0, 10.0)
        .unwrap();
    assert!(!report.is_safe());

    // The sustained approach from t=30..70 is one event at the closest point.
    assert_eq!(report.conflicts().len(), 1);
    let c = &report.conflicts()[0];
    assert_eq!(c.conflict_type, ConflictType::Spatial);
    assert!((c.time - 50.0).abs() < 1e-9);
    assert!(c.distance < 1e-9);
    assert_eq!(c.severity, ConflictSeverity::High);
    assert!((c.location.x - 50.0).abs() < 1e-9);
    assert_eq!(c.involved_ids, vec!["PRIMARY".to_string(), "HEAD_ON".to_string()]);
}

#[test]
fn test_corridor_reuse_is_temporal_only() {
    // Primary crosses (50,50,50) eastbound at t=10; the other crosses the same
    // point northbound at t=200. Their windows never overlap.
    let primary = sample_primary(
        &mission(
            "PRIMARY",
            &[(-50.0, 50.0, 50.0, 0.0), (50.0, 50.0, 50.0, 10.0), (1050.0, 50.0, 50.0, 110.0)],
            0.0,
            110.0,
        ),
        10.0,
    );
    let other = sample(
        &mission(
            "LATER",
            &[(50.0, -450.0, 50.0, 0.0), (50.0, 50.0, 50.0, 50.0), (50.0, 650.0, 50.0, 110.0)],
            150.0,
            260.0,
        ),
        10.0,
    );

    let engine = DeconflictionEngine::new(EngineConfig::default().with_temporal_window_steps(20.0));
    let report = engine.analyze(&primary, &[other], 50.0, 10.0).unwrap();

    assert_eq!(report.conflicts().len(), 1);
    let c = &report.conflicts()[0];
    assert_eq!(c.conflict_type, ConflictType::Temporal);
    assert!((c.time - 10.0).abs() < 1e-9);
    assert!(c.distance < 1e-9);
    assert_eq!(report.summary().temporal_conflicts, 1);
    assert_eq!(report.summary().spatial_conflicts, 0);
}

#[test]
fn test_crossing_does_not_hide_separate_corridor_reuse() {
    // Primary flies east along y=0 at 1 m/s and is at (100,0) at t=100.
    // The other crosses it at (200,0) at t=200, loops north and west, then
    // passes south through (100,0) at t=240.
    let primary = sample_primary(
        &mission("PRIMARY", &[(0.0, 0.0, 50.0, 0.0), (400.0, 0.0, 50.0, 400.0)], 0.0, 400.0),
        10.0,
    );
    let other = sample(
        &mission(
            "LOOP",
            &[
                (200.0, -96.0, 50.0, 0.0),
                (200.0, 0.0, 50.0, 96.0),
                (200.0, 40.0, 50.0, 106.0),
                (100.0, 40.0, 50.0, 126.0),
                (100.0, 0.0, 50.0, 136.0),
                (100.0, -120.0, 50.0, 256.0),
            ],
            104.0,
            360.0,
        ),
        10.0,
    );

    let report = DeconflictionEngine::default()
        .analyze(&primary, &[other], 50.0, 10.0)
        .unwrap();
    assert_eq!(report.conflicts().len(), 2, "{:?}", report.conflicts());

    let reuse = &report.conflicts()[0];
    assert_eq!(reuse.conflict_type, ConflictType::Temporal);
    assert!((reuse.time - 100.0).abs() < 1e-9);
    assert!((reuse.location.x - 100.0).abs() < 1e-6);
    assert!(reuse.distance < 5.0);

    let crossing = &report.conflicts()[1];
    assert_eq!(crossing.conflict_type, ConflictType::Spatial);
    assert!((crossing.time - 200.0).abs() < 1e-9);
    assert_eq!(crossing.severity, ConflictSeverity::High);
    assert_eq!(report.summary().spatial_conflicts, 1);
    assert_eq!(report.summary().temporal_conflicts, 1);
}

#[test]
fn test_corridor_reuse_outside_window_is_ignored() {
    let primary = sample_primary(
        &mission("PRIMARY", &[(-50.0, 50.0, 50.0, 0.0), (1050.0, 50.0, 50.0, 110.0)], 0.0, 110.0),
        10.0,
    );
    let other = sample(
        &mission("LATER", &[(50.0, -450.0, 50.0, 0.0), (50.0, 650.0, 50.0, 110.0)], 150.0, 260.0),
        10.0,
    );

    // 190 s separation, window of 5 steps is only 50 s
    let engine = DeconflictionEngine::new(EngineConfig::default().with_temporal_window_steps(5.0));
    let report = engine.analyze(&primary, &[other], 50.0, 10.0).unwrap();
    assert!(report.is_safe());
}

#[test]
fn test_single_waypoint_mission_holds_position() {
    let traj = sample(&mission("HOVER", &[(10.0, 10.0, 10.0, 0.0)], 0.0, 60.0), 10.0);
    assert_eq!(traj.points().len(), 7);
    for p in traj.points() {
        assert_eq!((p.x, p.y, p.z), (10.0, 10.0, 10.0));
        assert_eq!(p.speed, 0.0);
    }
}

#[test]
fn test_sampling_is_strictly_increasing_and_ends_on_window() {
    let m = mission(
        "M",
        &[(0.0, 0.0, 30.0, 0.0), (80.0, 10.0, 60.0, 33.0), (10.0, 90.0, 40.0, 71.0)],
        17.5,
        301.25,
    );
    for step in [0.7, 1.0, 3.0, 7.3, 10.0, 30.0, 500.0] {
        let traj = sample(&m, step);
        let times: Vec<f64> = traj.points().iter().map(|p| p.t).collect();
        assert_eq!(times[0], 17.5);
        assert_eq!(*times.last().unwrap(), 301.25, "step {step}");
        assert!(times.windows(2).all(|w| w[1] > w[0]), "step {step}");
        assert!(times.windows(2).all(|w| w[1] - w[0] <= step * (1.0 + 1e-6)), "step {step}");
    }
}

#[test]
fn test_distance_is_symmetric_between_trajectories() {
    let a = sample(
        &mission("A", &[(0.0, 0.0, 50.0, 0.0), (120.0, 40.0, 70.0, 90.0)], 0.0, 90.0),
        7.0,
    );
    let b = sample(
        &mission("B", &[(60.0, -30.0, 40.0, 0.0), (-20.0, 80.0, 60.0, 50.0)], 10.0, 80.0),
        4.0,
    );
    for t in [10.0, 23.5, 44.0, 61.1, 80.0] {
        let (pa, pb) = (a.position_at(t).unwrap(), b.position_at(t).unwrap());
        assert_eq!(distance_3d(pa, pb), distance_3d(pb, pa));
    }
    assert!(b.position_at(5.0).is_none());
    assert!(b.position_at(85.0).is_none());
}

#[test]
fn test_severity_boundaries_through_the_engine() {
    let buffer = 50.0;
    let primary = sample_primary(&mission("P", &[(0.0, 0.0, 50.0, 0.0)], 0.0, 60.0), 10.0);
    let engine = DeconflictionEngine::default();

    let cases = [
        (0.4999 * buffer, Some(ConflictSeverity::High)),
        (0.5 * buffer, Some(ConflictSeverity::Medium)),
        (0.8 * buffer, Some(ConflictSeverity::Low)),
        (buffer, None),
    ];
    for (offset, expected) in cases {
        let other = sample(&mission("O", &[(offset, 0.0, 50.0, 0.0)], 0.0, 60.0), 10.0);
        let report = engine.analyze(&primary, &[other], buffer, 10.0).unwrap();
        assert_eq!(report.highest_severity(), expected, "offset {offset}");
        assert_eq!(classify(offset, buffer), expected);
        if expected.is_some() {
            // Stationary proximity across the whole window is one record.
            assert_eq!(report.conflicts().len(), 1);
            assert_eq!(report.conflicts()[0].conflict_type, ConflictType::Spatial);
        }
    }
}

#[test]
fn test_no_false_positives_for_separated_hovering() {
    let primary = sample_primary(&mission("P", &[(0.0, 0.0, 50.0, 0.0)], 0.0, 300.0), 5.0);
    let others: Vec<Trajectory> = [(60.0, 0.0), (0.0, -75.0), (-50.5, 0.0)]
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            sample(&mission(&format!("O{i}"), &[(x, y, 50.0, 0.0)], 0.0, 300.0), 5.0)
        })
        .collect();
    let report = DeconflictionEngine::default()
        .analyze(&primary, &others, 50.0, 5.0)
        .unwrap();
    assert!(report.is_safe());
    assert_eq!(report.summary().flights_analyzed, 3);
}

#[test]
fn test_analysis_is_deterministic_and_sorted() {
    let primary = mission(
        "PRIMARY",
        &[(-50.0, -50.0, 60.0, 0.0), (0.0, 0.0, 60.0, 60.0), (50.0, 50.0, 60.0, 120.0), (100.0, 100.0, 65.0, 180.0)],
        0.0,
        180.0,
    );
    let others = vec![
        mission(
            "UAV_CONFLICT",
            &[(50.0, -50.0, 55.0, 0.0), (0.0, 0.0, 55.0, 60.0), (-50.0, 50.0, 55.0, 120.0)],
            20.0,
            140.0,
        ),
        mission("UAV_SAFE", &[(-100.0, 100.0, 80.0, 0.0), (-80.0, 120.0, 80.0, 100.0)], 0.0, 100.0),
    ];

    let engine = DeconflictionEngine::new(EngineConfig::default().with_time_step(5.0));
    let first = engine.analyze_missions(&primary, &others).unwrap();
    let second = engine.analyze_missions(&primary, &others).unwrap();
    assert_eq!(first.report, second.report);
    assert!(first.primary.is_primary());
    assert_eq!(first.others.len(), 2);

    let report = &first.report;
    assert!(!report.is_safe());
    assert!(report.conflicts_with("UAV_SAFE").next().is_none());
    assert!(report
        .conflicts()
        .windows(2)
        .all(|w| w[0].time < w[1].time || (w[0].time == w[1].time && w[0].distance <= w[1].distance)));
    assert!(report.conflicts().iter().all(|c| c.distance < report.safety_buffer()));
}

#[test]
fn test_invalid_time_step_is_rejected_before_any_work() {
    let primary = mission("P", &[(0.0, 0.0, 50.0, 0.0)], 0.0, 60.0);
    let engine = DeconflictionEngine::new(EngineConfig::default().with_time_step(0.0));
    assert!(engine.analyze_missions(&primary, &[]).is_err());
}
