//! Системы altimeter'а
//!
//! Physics фаза (AltimeterPhysics, после increment_physics_tick и apply_altimeter_commands):
//! 1. report_invalid_telemetry — NaN/∞ → warning, tick пропускается
//! 2. track_altitude — sample высоты + окно
//! 3. evaluate_triggers — fire / rearm / hold
//!
//! Frame фаза (AltimeterFrame):
//! 1. settle_rearmed_indicators — rearm гасит лампу
//! 2. refresh_indicators — IndicatorLight + IndicatorController
//! 3. dispatch_pending_fires — drain PendingFire → ActionDispatcher + StagedActionFired

use bevy::prelude::*;
use crate::components::{Altimeter, IndicatorLight, PendingFire, TriggerState, VehicleTelemetry};
use crate::config::TriggerConfig;
use crate::evaluator::{apply_decision, evaluate, TickOutcome};
use crate::host::{DispatchHost, IndicatorHost, StagedActionFired};
use crate::logger;
use crate::schedules::PhysicsTickCounter;

/// Run condition: telemetry этого tick'а пригодна для sample
pub fn telemetry_is_finite(telemetry: Res<VehicleTelemetry>) -> bool {
    telemetry.is_finite()
}

/// Система: warning при битой telemetry (аппарат уничтожен посреди tick'а и т.п.)
///
/// State всех altimeter'ов замораживается до следующего валидного sample.
pub fn report_invalid_telemetry(telemetry: Res<VehicleTelemetry>) {
    if !telemetry.is_finite() {
        logger::log_warning(&format!(
            "Non-finite vehicle telemetry, altimeter tick skipped: {:?}",
            *telemetry
        ));
    }
}

/// Система: sample высоты и пересчёт окна для каждого altimeter'а
pub fn track_altitude(
    telemetry: Res<VehicleTelemetry>,
    mut altimeters: Query<&mut TriggerState, With<Altimeter>>,
) {
    for mut state in altimeters.iter_mut() {
        state.observe(&telemetry);
    }
}

/// Система: trigger state machine
///
/// Snapshot `armed` читается один раз на altimeter: fire и rearm в одном tick'е невозможны.
pub fn evaluate_triggers(
    mut altimeters: Query<
        (Entity, &TriggerConfig, &mut TriggerState, &mut PendingFire),
        With<Altimeter>,
    >,
    counter: Res<PhysicsTickCounter>,
) {
    for (entity, config, mut state, mut mailbox) in altimeters.iter_mut() {
        let decision = evaluate(&state, config);
        match apply_decision(&mut state, &mut mailbox, config.group, counter.tick, decision) {
            TickOutcome::Fired(group) => logger::log_info(&format!(
                "Altimeter {:?} triggered at {:.1} m ({}, target {:.1} m, window {:.2} m) → {}",
                entity,
                state.altitude,
                if state.ascending { "ascending" } else { "descending" },
                config.target_meters(),
                state.window,
                group
            )),
            TickOutcome::FireDeferred => logger::log_warning(&format!(
                "Altimeter {:?}: previous fire not dispatched yet, trigger held armed",
                entity
            )),
            TickOutcome::Rearmed => logger::log_info(&format!(
                "Altimeter {:?} re-armed at {:.1} m",
                entity, state.altitude
            )),
            TickOutcome::Held => {}
        }
    }
}

/// Система: rearm (auto или ручной) гасит лампу
pub fn settle_rearmed_indicators(mut altimeters: Query<&mut TriggerState, With<Altimeter>>) {
    for mut state in altimeters.iter_mut() {
        state.settle_indicator();
    }
}

/// Система: синхронизация индикатора
///
/// IndicatorController вызывается каждый frame (идемпотентно), IndicatorLight меняется только по факту.
pub fn refresh_indicators(
    mut altimeters: Query<(Entity, &TriggerState, &mut IndicatorLight), With<Altimeter>>,
    mut indicator_host: Option<ResMut<IndicatorHost>>,
) {
    for (entity, state, mut light) in altimeters.iter_mut() {
        if light.lit != state.illuminated {
            light.lit = state.illuminated;
            logger::log(&format!(
                "Altimeter {:?} indicator {}",
                entity,
                if light.lit { "on" } else { "off" }
            ));
        }

        if let Some(host) = indicator_host.as_mut() {
            host.0.set_illuminated(entity, state.illuminated);
        }
    }
}

/// Система: drain PendingFire → dispatch
///
/// Единственное место, где mailbox читается и очищается.
/// Событие строится из FireRecord: высота и tick срабатывания, а не текущего frame'а.
pub fn dispatch_pending_fires(
    mut altimeters: Query<(Entity, &mut PendingFire), With<Altimeter>>,
    mut dispatch_host: Option<ResMut<DispatchHost>>,
    mut fired_events: EventWriter<StagedActionFired>,
) {
    for (entity, mut mailbox) in altimeters.iter_mut() {
        if !mailbox.is_pending() {
            continue;
        }
        let Some(record) = mailbox.take() else {
            continue;
        };
        let group = record.group;

        if let Some(host) = dispatch_host.as_mut() {
            host.0.fire(group);
        }

        fired_events.write(StagedActionFired {
            altimeter: entity,
            group,
            altitude: record.altitude,
            physics_tick: record.physics_tick,
        });

        logger::log_info(&format!("Altimeter {:?} dispatched {} (id {})", entity, group, group.id()));
    }
}
