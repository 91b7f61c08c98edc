//! ECS компоненты altimeter'а + vehicle telemetry resource
//!
//! - Altimeter: маркер, через Required Components добавляет runtime state
//! - TriggerState: altitude/window/armed/illuminated (пишется только physics фазой)
//! - PendingFire: single-slot mailbox physics → frame
//! - IndicatorLight: видимое состояние лампы (зеркало для renderer'а)
//! - VehicleTelemetry: данные аппарата, которые host пишет перед каждым physics tick

use bevy::prelude::*;
use crate::config::{ActionGroup, TriggerConfig};
use crate::sampler::sample;
use crate::window::compute_window;

/// Altimeter — детектор высоты на аппарате
///
/// Автоматически добавляет TriggerConfig, TriggerState, PendingFire, IndicatorLight.
/// Для стартового `armed = false` спавнить вместе с `TriggerState::new(false)`.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(TriggerConfig, TriggerState, PendingFire, IndicatorLight)]
pub struct Altimeter;

/// Runtime state trigger'а
///
/// Инварианты:
/// - window ≥ 0
/// - illuminated → !armed (кроме окна между rearm и ближайшим frame tick)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TriggerState {
    pub altitude: f64,
    pub previous_altitude: f64,
    pub ascending: bool,
    /// Полуширина detection window (метры)
    pub window: f64,
    pub armed: bool,
    pub illuminated: bool,
    /// Был ли хотя бы один валидный sample (первый засевает previous_altitude)
    seeded: bool,
}

impl Default for TriggerState {
    fn default() -> Self {
        Self::new(true) // Detection включен по умолчанию
    }
}

impl TriggerState {
    pub fn new(armed: bool) -> Self {
        Self {
            altitude: 0.0,
            previous_altitude: 0.0,
            ascending: false,
            window: 0.0,
            armed,
            illuminated: false,
            seeded: false,
        }
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Sample высоты + пересчёт окна из telemetry текущего tick'а
    ///
    /// Первый вызов: previous = altitude → ascending = false.
    pub fn observe(&mut self, telemetry: &VehicleTelemetry) {
        let previous = if self.seeded {
            self.altitude
        } else {
            telemetry.altitude()
        };
        let reading = sample(
            telemetry.sea_level_altitude,
            telemetry.terrain_relative_altitude,
            previous,
        );

        self.previous_altitude = previous;
        self.altitude = reading.altitude;
        self.ascending = reading.ascending;
        self.window = compute_window(telemetry.vertical_speed, telemetry.tick_duration);
        self.seeded = true;
    }

    /// Rearm гасит лампу. Возвращает true если лампа была погашена.
    pub fn settle_indicator(&mut self) -> bool {
        if self.armed && self.illuminated {
            self.illuminated = false;
            true
        } else {
            false
        }
    }
}

/// Снимок срабатывания: что и где сработало
///
/// Фиксируется в physics фазе. Frame фаза может прийти через несколько physics tick'ов,
/// к этому моменту state.altitude и tick counter уже ушли вперёд.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct FireRecord {
    pub group: ActionGroup,
    /// Sample высоты на tick'е срабатывания
    pub altitude: f64,
    pub physics_tick: u64,
}

impl FireRecord {
    pub fn new(group: ActionGroup, altitude: f64, physics_tick: u64) -> Self {
        Self {
            group,
            altitude,
            physics_tick,
        }
    }
}

/// Single-slot mailbox между physics фазой (post) и frame фазой (take)
///
/// Group фиксируется в момент срабатывания: смена group до drain'а не перенаправляет fire.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PendingFire {
    slot: Option<FireRecord>,
}

impl PendingFire {
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// Кладёт fire в слот. false если слот занят (fire не принят).
    pub fn post(&mut self, record: FireRecord) -> bool {
        if self.slot.is_some() {
            return false;
        }
        self.slot = Some(record);
        true
    }

    /// Read-and-clear
    pub fn take(&mut self) -> Option<FireRecord> {
        self.slot.take()
    }
}

/// Видимое состояние индикатора ("light-go" + "glow" анимация у host'а)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct IndicatorLight {
    pub lit: bool,
}

/// Telemetry аппарата на текущий physics tick
///
/// Host пишет перед каждым tick'ом. Неинициализированная физика — нули.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleTelemetry {
    pub sea_level_altitude: f64,
    pub terrain_relative_altitude: f64,
    /// m/s, положительная — вверх
    pub vertical_speed: f64,
    /// Длительность fixed step (секунды)
    pub tick_duration: f64,
}

impl VehicleTelemetry {
    pub fn new(
        sea_level_altitude: f64,
        terrain_relative_altitude: f64,
        vertical_speed: f64,
        tick_duration: f64,
    ) -> Self {
        Self {
            sea_level_altitude,
            terrain_relative_altitude,
            vertical_speed,
            tick_duration,
        }
    }

    /// Terrain-relative высота считается из высоты рельефа под аппаратом
    pub fn over_terrain(
        sea_level_altitude: f64,
        terrain_height: f64,
        vertical_speed: f64,
        tick_duration: f64,
    ) -> Self {
        Self::new(
            sea_level_altitude,
            crate::sampler::terrain_relative(sea_level_altitude, terrain_height),
            vertical_speed,
            tick_duration,
        )
    }

    /// Высота, которую использует sampler (минимум из двух)
    pub fn altitude(&self) -> f64 {
        self.sea_level_altitude.min(self.terrain_relative_altitude)
    }

    /// NaN/∞ в любом поле → tick пропускается
    pub fn is_finite(&self) -> bool {
        self.sea_level_altitude.is_finite()
            && self.terrain_relative_altitude.is_finite()
            && self.vertical_speed.is_finite()
            && self.tick_duration.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_state_first_observe_is_descending() {
        let mut state = TriggerState::new(true);
        assert!(!state.is_seeded());

        state.observe(&VehicleTelemetry::new(990.0, 990.0, 100.0, 0.02));
        assert!(state.is_seeded());
        assert_eq!(state.altitude, 990.0);
        assert_eq!(state.previous_altitude, 990.0);
        assert!(!state.ascending);

        state.observe(&VehicleTelemetry::new(992.0, 992.0, 100.0, 0.02));
        assert_eq!(state.previous_altitude, 990.0);
        assert!(state.ascending);
        assert!((state.window - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_settle_indicator_only_when_armed() {
        let mut state = TriggerState::new(false);
        state.illuminated = true;
        assert!(!state.settle_indicator());
        assert!(state.illuminated);

        state.armed = true;
        assert!(state.settle_indicator());
        assert!(!state.illuminated);
        assert!(!state.settle_indicator());
    }

    #[test]
    fn test_pending_fire_single_slot() {
        let mut mailbox = PendingFire::default();
        assert!(!mailbox.is_pending());

        let first = FireRecord::new(ActionGroup::Stage, 1005.0, 2);
        assert!(mailbox.post(first));
        assert!(!mailbox.post(FireRecord::new(ActionGroup::Abort, 1010.0, 3))); // Слот занят
        assert!(mailbox.is_pending());

        // Первый record не перезаписан
        assert_eq!(mailbox.take(), Some(first));
        assert_eq!(mailbox.take(), None);
        assert!(!mailbox.is_pending());
    }

    #[test]
    fn test_telemetry_over_terrain() {
        let telemetry = VehicleTelemetry::over_terrain(2000.0, 1200.0, -30.0, 0.02);
        assert_eq!(telemetry.terrain_relative_altitude, 800.0);
        assert_eq!(telemetry.altitude(), 800.0);
        assert!(telemetry.is_finite());

        let broken = VehicleTelemetry::new(f64::NAN, 0.0, 0.0, 0.02);
        assert!(!broken.is_finite());
    }
}
