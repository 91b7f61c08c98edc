//! Мост между внешним host'ом и ECS altimeter'ом
//!
//! Host (игровой движок) сам решает, когда physics step, а когда frame:
//! - on_physics_tick(telemetry) — из fixed-step callback'а
//! - on_frame_tick() — из update callback'а (здесь и только здесь вызывается dispatcher)
//!
//! Setters ставят команды в очередь — применятся в начале следующего physics tick'а.

use bevy::ecs::event::Events;
use bevy::prelude::*;
use crate::commands::{AltimeterCommands, ConfigChange};
use crate::components::{IndicatorLight, PendingFire, TriggerState, VehicleTelemetry};
use crate::config::{ActionGroup, ConfigError, TargetHeight, TriggerConfig, TriggerDirection};
use crate::host::{ActionDispatcher, DispatchHost, IndicatorController, IndicatorHost, StagedActionFired};
use crate::schedules::{AltimeterFrame, AltimeterPhysics, PhysicsTickCounter};
use crate::{create_headless_app, spawn_altimeter};

/// AltimeterController: один altimeter + собственный App
pub struct AltimeterController {
    app: App,
    altimeter: Entity,
}

impl AltimeterController {
    /// Старт контроллера: `armed` — persisted состояние "Detection"
    pub fn new(config: TriggerConfig, armed: bool) -> Self {
        let mut app = create_headless_app();
        let altimeter = spawn_altimeter(app.world_mut(), config, armed);
        Self { app, altimeter }
    }

    pub fn with_indicator(mut self, indicator: impl IndicatorController) -> Self {
        self.app.insert_resource(IndicatorHost(Box::new(indicator)));
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: impl ActionDispatcher) -> Self {
        self.app.insert_resource(DispatchHost(Box::new(dispatcher)));
        self
    }

    pub fn altimeter(&self) -> Entity {
        self.altimeter
    }

    /// Fixed-step callback: sample → window → evaluate
    pub fn on_physics_tick(&mut self, telemetry: VehicleTelemetry) {
        self.app.insert_resource(telemetry);
        self.app.world_mut().run_schedule(AltimeterPhysics);
    }

    /// Update callback: индикатор + dispatch
    ///
    /// Возвращает staged actions, отправленные в этом frame (обычно 0 или 1).
    pub fn on_frame_tick(&mut self) -> Vec<StagedActionFired> {
        let world = self.app.world_mut();
        world.run_schedule(AltimeterFrame);
        // Bridge — единственный reader событий, drain заодно чистит буфер
        let fired: Vec<StagedActionFired> = world
            .resource_mut::<Events<StagedActionFired>>()
            .drain()
            .collect();
        fired
    }

    // === Configuration setters (применяются до следующего physics tick'а) ===

    pub fn set_armed(&mut self, armed: bool) {
        self.queue(ConfigChange::SetArmed(armed));
    }

    pub fn set_direction(&mut self, direction: TriggerDirection) {
        self.queue(ConfigChange::SetDirection(direction));
    }

    /// Legacy строковая форма ("All" / "Ascent" / "Descent")
    pub fn set_direction_label(&mut self, label: &str) -> Result<(), ConfigError> {
        let direction: TriggerDirection = label.parse()?;
        self.set_direction(direction);
        Ok(())
    }

    pub fn set_auto_reset(&mut self, auto_reset: bool) {
        self.queue(ConfigChange::SetAutoReset(auto_reset));
    }

    /// Метры. Невалидная высота отклоняется сразу, ничего не ставится в очередь.
    pub fn set_target_height(&mut self, meters: f64) -> Result<(), ConfigError> {
        TargetHeight::default().with_meters(meters)?;
        self.queue(ConfigChange::SetTargetHeight(meters));
        Ok(())
    }

    pub fn set_group(&mut self, group: ActionGroup) {
        self.queue(ConfigChange::SetGroup(group));
    }

    /// Числовой id группы (0..=15)
    pub fn set_group_id(&mut self, id: u8) -> Result<(), ConfigError> {
        let group = ActionGroup::try_from(id)?;
        self.set_group(group);
        Ok(())
    }

    pub fn use_kilometers(&mut self) {
        self.queue(ConfigChange::UseKilometers);
    }

    pub fn use_meters(&mut self) {
        self.queue(ConfigChange::UseMeters);
    }

    fn queue(&mut self, change: ConfigChange) {
        self.app
            .world_mut()
            .resource_mut::<AltimeterCommands>()
            .push(self.altimeter, change);
    }

    // === Read-only доступ для host'а (UI, persistence) ===

    pub fn state(&self) -> TriggerState {
        self.app
            .world()
            .get::<TriggerState>(self.altimeter)
            .copied()
            .unwrap_or_default()
    }

    /// Применённая конфигурация (команды в очереди ещё не видны)
    pub fn config(&self) -> TriggerConfig {
        self.app
            .world()
            .get::<TriggerConfig>(self.altimeter)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_armed(&self) -> bool {
        self.state().armed
    }

    pub fn is_illuminated(&self) -> bool {
        self.state().illuminated
    }

    pub fn fire_pending(&self) -> bool {
        self.app
            .world()
            .get::<PendingFire>(self.altimeter)
            .is_some_and(|mailbox| mailbox.is_pending())
    }

    /// Состояние лампы после последнего frame tick'а
    pub fn indicator_lit(&self) -> bool {
        self.app
            .world()
            .get::<IndicatorLight>(self.altimeter)
            .is_some_and(|light| light.lit)
    }

    pub fn physics_tick(&self) -> u64 {
        self.app.world().resource::<PhysicsTickCounter>().tick
    }
}
