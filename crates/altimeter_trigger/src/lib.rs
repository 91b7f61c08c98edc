//! Altimeter Trigger Core
//!
//! Altitude-triggered staging на Bevy ECS: каждый physics tick берём высоту аппарата,
//! считаем detection window из вертикальной скорости и однократно срабатываем,
//! когда аппарат входит в окно вокруг target height в нужном направлении.
//!
//! Архитектура (две фазы):
//! - AltimeterPhysics (fixed step) — sample, window, state machine, PendingFire.post
//! - AltimeterFrame (render step) — индикатор, PendingFire.take → ActionDispatcher
//!
//! Host (игра/симулятор) владеет физикой, лампой и staging'ом — см. host.rs.

use bevy::prelude::*;

pub mod bridge;
pub mod commands;
pub mod components;
pub mod config;
pub mod evaluator;
pub mod flight;
pub mod host;
pub mod logger;
pub mod sampler;
pub mod schedules;
pub mod systems;
pub mod window;


// Re-export основных типов
pub use bridge::AltimeterController;
pub use commands::{AltimeterCommand, AltimeterCommands, ConfigChange};
pub use components::{
    Altimeter, FireRecord, IndicatorLight, PendingFire, TriggerState, VehicleTelemetry,
};
pub use config::{
    ActionGroup, ConfigError, TargetHeight, TriggerConfig, TriggerDirection, PHYSICS_HZ,
};
pub use evaluator::{TickOutcome, TriggerDecision};
pub use host::{ActionDispatcher, DispatchHost, IndicatorController, IndicatorHost, StagedActionFired};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use schedules::{AltimeterFrame, AltimeterPhysics, PhysicsTickCounter};

/// Altimeter Plugin
///
/// Регистрирует обе фазы и запускает их из FixedUpdate / Update.
///
/// Порядок physics фазы:
/// 1. increment_physics_tick
/// 2. apply_altimeter_commands — конфигурация до sample'а
/// 3. report_invalid_telemetry — warning на NaN/∞
/// 4. track_altitude + evaluate_triggers — только при валидной telemetry
///
/// Порядок frame фазы:
/// 1. settle_rearmed_indicators
/// 2. refresh_indicators
/// 3. dispatch_pending_fires
pub struct AltimeterPlugin;

impl Plugin for AltimeterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VehicleTelemetry>()
            .init_resource::<PhysicsTickCounter>()
            .init_resource::<AltimeterCommands>()
            .add_event::<StagedActionFired>();

        app.add_systems(
            AltimeterPhysics,
            (
                schedules::increment_physics_tick,
                commands::apply_altimeter_commands,
                systems::report_invalid_telemetry,
                (systems::track_altitude, systems::evaluate_triggers)
                    .chain()
                    .run_if(systems::telemetry_is_finite),
            )
                .chain(), // Последовательное выполнение
        );

        app.add_systems(
            AltimeterFrame,
            (
                systems::settle_rearmed_indicators,
                systems::refresh_indicators,
                systems::dispatch_pending_fires,
            )
                .chain(),
        );

        app.add_systems(FixedUpdate, schedules::run_altimeter_physics)
            .add_systems(Update, schedules::run_altimeter_frame);
    }
}

/// Создаёт App с AltimeterPlugin без render/time плагинов
///
/// Фазы запускаются явно (`run_schedule`) — детерминистично, без зависимости от wall clock.
pub fn create_headless_app() -> App {
    init_logger();
    let mut app = App::new();
    app.insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ))
        .add_plugins(AltimeterPlugin);
    app
}

/// Spawn altimeter'а с конфигурацией и стартовым armed
pub fn spawn_altimeter(world: &mut World, config: TriggerConfig, armed: bool) -> Entity {
    let entity = world
        .spawn((Altimeter, config.clone(), TriggerState::new(armed)))
        .id();

    logger::log_info(&format!(
        "Altimeter {:?} started: target {:.1} m, direction {}, auto reset {}, group {}, armed {}",
        entity,
        config.target_meters(),
        config.direction,
        config.auto_reset,
        config.group,
        armed
    ));

    entity
}
