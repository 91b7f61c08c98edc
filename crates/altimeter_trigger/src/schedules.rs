//! Две фазы altimeter'а как отдельные schedules
//!
//! **AltimeterPhysics** (fixed step) — commands → sample → evaluate.
//! **AltimeterFrame** (render/update) — indicator → drain PendingFire → dispatch.
//!
//! Host запрещает staging внутри physics callback'а, поэтому dispatch живёт только во frame фазе.
//! Bevy-native host: AltimeterPlugin запускает фазы из FixedUpdate / Update.
//! Внешний host: AltimeterController вызывает `run_schedule` напрямую.

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::{ResMut, Resource, World};

/// Счётчик physics tick'ов (инкремент в начале каждой physics фазы)
///
/// Wraparound safe: при 50 Hz u64 хватит на миллиарды лет.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsTickCounter {
    pub tick: u64,
}

/// Custom schedule: physics фаза (один раз на fixed step)
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AltimeterPhysics;

/// Custom schedule: frame фаза (один раз на render/update step)
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AltimeterFrame;

/// System: запуск physics фазы из FixedUpdate
///
/// Exclusive system (требует &mut World для run_schedule).
pub fn run_altimeter_physics(world: &mut World) {
    world.run_schedule(AltimeterPhysics);
}

/// System: запуск frame фазы из Update
pub fn run_altimeter_frame(world: &mut World) {
    world.run_schedule(AltimeterFrame);
}

/// System: инкремент tick counter (physics фаза, запускается ПЕРВЫМ)
pub fn increment_physics_tick(mut counter: ResMut<PhysicsTickCounter>) {
    counter.tick = counter.tick.wrapping_add(1);
}
