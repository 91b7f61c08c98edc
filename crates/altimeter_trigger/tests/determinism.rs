//! Тесты детерминизма
//!
//! Синтетический полёт с одинаковым seed → идентичные staged actions (тик, высота, группа)

use altimeter_trigger::flight::FlightProfile;
use altimeter_trigger::*;

/// Один полёт до посадки, frame tick после каждого physics tick'а
fn run_flight(seed: u64, config: TriggerConfig) -> Vec<StagedActionFired> {
    run_flight_with_frames(seed, config, 1)
}

/// Полёт с frame tick'ом раз в `physics_per_frame` physics tick'ов
fn run_flight_with_frames(
    seed: u64,
    config: TriggerConfig,
    physics_per_frame: u64,
) -> Vec<StagedActionFired> {
    let mut controller = AltimeterController::new(config, true);
    let mut flight = FlightProfile::new(seed);
    let mut fired = Vec::new();

    while !flight.is_landed() {
        controller.on_physics_tick(flight.step());
        if controller.physics_tick() % physics_per_frame == 0 {
            fired.extend(controller.on_frame_tick());
        }
    }
    fired.extend(controller.on_frame_tick());

    fired
}

fn both_ways_at_1500() -> TriggerConfig {
    TriggerConfig::new(1_500.0, TriggerDirection::All)
        .unwrap()
        .with_auto_reset(true)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let run1 = run_flight(SEED, both_ways_at_1500());
    let run2 = run_flight(SEED, both_ways_at_1500());

    assert!(!run1.is_empty());
    assert_eq!(
        run1, run2,
        "Полёт с одинаковым seed ({}) дал разные срабатывания!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    let runs: Vec<_> = (0..5)
        .map(|_| run_flight(SEED, both_ways_at_1500()))
        .collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(runs[0], *run, "Прогон {} отличается от прогона 0", i);
    }
}

/// All + auto reset: ровно одно срабатывание на подъёме и одно на снижении, для любого seed
#[test]
fn test_one_fire_per_crossing_across_seeds() {
    for seed in 0..20 {
        let fired = run_flight(seed, both_ways_at_1500());
        assert_eq!(fired.len(), 2, "seed {}: {:?}", seed, fired);

        let (ascent, descent) = (fired[0], fired[1]);
        assert!(ascent.physics_tick < descent.physics_tick);

        // Подъём ~219 m/s → окно ~4.6 m над target
        assert!(
            ascent.altitude > 1_500.0 && ascent.altitude < 1_510.0,
            "seed {}: ascent fire at {}",
            seed,
            ascent.altitude
        );
        // Снижение 60 m/s → окно ~1.26 m под target
        assert!(
            descent.altitude > 1_497.0 && descent.altitude < 1_500.0,
            "seed {}: descent fire at {}",
            seed,
            descent.altitude
        );
    }
}

#[test]
fn test_direction_filter_over_full_flight() {
    const SEED: u64 = 7;

    let ascent_only = TriggerConfig::new(1_500.0, TriggerDirection::Ascent)
        .unwrap()
        .with_auto_reset(true);
    let descent_only = TriggerConfig::new(1_500.0, TriggerDirection::Descent)
        .unwrap()
        .with_auto_reset(true)
        .with_group(ActionGroup::Custom1);

    let both = run_flight(SEED, both_ways_at_1500());
    let up = run_flight(SEED, ascent_only);
    let down = run_flight(SEED, descent_only);

    assert_eq!(up.len(), 1);
    assert_eq!(down.len(), 1);
    assert_eq!(up[0].physics_tick, both[0].physics_tick);
    assert_eq!(down[0].physics_tick, both[1].physics_tick);
    assert_eq!(down[0].group, ActionGroup::Custom1);
}

/// Без auto reset второй проход через target молчит
#[test]
fn test_single_shot_without_auto_reset() {
    let config = TriggerConfig::new(1_500.0, TriggerDirection::All).unwrap();
    let fired = run_flight(3, config);

    assert_eq!(fired.len(), 1);
    assert!(fired[0].altitude > 1_500.0);
}

/// Редкие frame'ы не сдвигают высоту и tick в событиях
#[test]
fn test_frame_cadence_does_not_change_fire_records() {
    for seed in 0..5 {
        let every_tick = run_flight(seed, both_ways_at_1500());
        let every_fifth = run_flight_with_frames(seed, both_ways_at_1500(), 5);

        assert_eq!(every_tick.len(), 2, "seed {}", seed);
        assert_eq!(every_tick, every_fifth, "seed {}: frame cadence leaked into events", seed);
    }
}
