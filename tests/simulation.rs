//! End-to-end runs of the transport and failure processes.

use petroflow::{
    FailureProcess, Leg, SampleKind, Scheduler, SimError, SimulationConfig, Time, TransportConfig,
    TransportProcess, UniformRange, simulate,
};

fn leg() -> Leg {
    Leg::new("Refinery_A", "Distributor")
}

fn run(config: &SimulationConfig) -> Scheduler {
    let mut sim = Scheduler::seeded(config.seed);
    sim.register(TransportProcess::new(leg(), config.transport.clone()).unwrap());
    sim.register(FailureProcess::new(leg(), config.failure.clone()).unwrap());
    sim.run(config.until_time()).unwrap();
    sim
}

#[test]
fn fifty_hour_run() {
    let config = SimulationConfig::default().with_seed(2024).with_until(50.);
    let sim = run(&config);
    let history = sim.history();

    assert!(!history.samples().is_empty());
    assert!(history.samples().is_sorted_by_key(|s| s.time));
    assert!(history.samples().iter().all(|s| s.time <= config.until_time()));

    // The first failure is due within 30h, so at least one is recorded.
    assert!(!history.failures().is_empty());
    assert!(history.failures().is_sorted());

    // Every failure falls strictly between two transport samples.
    let transport: Vec<Time> = history.samples_of(SampleKind::Nominal).map(|s| s.time).collect();
    for &failure in history.failures() {
        assert!(transport.iter().any(|&t| t < failure), "nothing before {failure}");
        assert!(transport.iter().any(|&t| t > failure), "nothing after {failure}");
    }
}

#[test]
fn same_seed_same_history() {
    let config = SimulationConfig::default().with_seed(77).with_until(200.);
    let first = simulate(&config, &leg()).unwrap();
    let second = simulate(&config, &leg()).unwrap();
    assert_eq!(first, second);

    let other = simulate(&config.clone().with_seed(78), &leg()).unwrap();
    assert_ne!(first, other);
}

#[test]
fn until_zero_only_records_time_zero() {
    let config = SimulationConfig::default().with_until(0.);
    let sim = run(&config);
    let history = sim.history();

    assert_eq!(history.samples().len(), 1);
    assert_eq!(history.samples()[0].time, Time::zero());
    assert!(history.failures().is_empty());
    assert_eq!(sim.pending(), 2);
}

#[test]
fn per_process_timestamps_are_non_decreasing() {
    let config = SimulationConfig::default().with_seed(9).with_until(400.);
    let history = simulate(&config, &leg()).unwrap();

    let transport: Vec<Time> = history.samples_of(SampleKind::Nominal).map(|s| s.time).collect();
    let failures: Vec<Time> = history
        .samples()
        .iter()
        .filter(|s| s.kind != SampleKind::Nominal)
        .map(|s| s.time)
        .collect();
    assert!(transport.is_sorted());
    assert!(failures.is_sorted());

    // Degraded and restored samples alternate, starting degraded.
    let kinds: Vec<SampleKind> = history
        .samples()
        .iter()
        .map(|s| s.kind)
        .filter(|&k| k != SampleKind::Nominal)
        .collect();
    for (i, kind) in kinds.iter().enumerate() {
        let expected = if i % 2 == 0 { SampleKind::Degraded } else { SampleKind::Restored };
        assert_eq!(*kind, expected);
    }
}

#[test]
fn labelled_rows_mark_failures() {
    let config = SimulationConfig::default().with_seed(31).with_until(300.);
    let history = simulate(&config, &leg()).unwrap();

    let rows = history.labelled_samples();
    assert_eq!(rows.len(), history.samples().len());
    let flagged = rows.iter().filter(|r| r.failure).count();
    assert!(flagged >= history.failures().len());

    let summary = history.summary().unwrap();
    assert_eq!(summary.failures, history.failures().len());
    assert!(summary.min_flow >= 20. && summary.max_flow <= 100.);
}

#[test]
fn invalid_config_is_rejected_before_running() {
    let config = SimulationConfig::default()
        .with_transport(TransportConfig::default().with_duration(UniformRange::new(10., 1.)));
    assert!(matches!(simulate(&config, &leg()), Err(SimError::Config(_))));
}

#[test]
fn zero_length_trips_are_rejected_before_running() {
    let config = SimulationConfig::default()
        .with_until(1.)
        .with_transport(TransportConfig::default().with_duration(UniformRange::fixed(0.)));
    assert!(config.validate().is_err());
    assert!(matches!(simulate(&config, &leg()), Err(SimError::Config(_))));
}
