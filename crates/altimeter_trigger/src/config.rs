//! Конфигурация altimeter'а: target height, direction, auto reset, action group
//!
//! Все значения — закрытые enum'ы, валидируются при установке.
//! Строковые/числовые legacy-формы (persisted host config) парсятся через FromStr/TryFrom.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Частота physics tick (fixed step 0.02 s)
pub const PHYSICS_HZ: f64 = 50.0;

/// Метров в километре (kilometer mode → core всегда считает в метрах)
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// Ошибки конфигурации (никогда не доходят до tick'а)
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Неизвестная метка направления (ожидается All / Ascent / Descent)
    UnknownDirection(String),
    /// Group id вне 0..=15 или не число
    UnknownGroup(String),
    /// Высота NaN/∞ или отрицательная
    InvalidHeight(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownDirection(label) => {
                write!(f, "unknown trigger direction '{}' (expected All, Ascent or Descent)", label)
            }
            ConfigError::UnknownGroup(raw) => {
                write!(f, "unknown action group '{}' (expected 0..=15)", raw)
            }
            ConfigError::InvalidHeight(value) => {
                write!(f, "invalid target height {} (must be finite and >= 0)", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Направление пересечения, которое может сработать
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum TriggerDirection {
    /// Срабатываем в обе стороны
    #[default]
    All,
    Ascent,
    Descent,
}

impl TriggerDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerDirection::All => "All",
            TriggerDirection::Ascent => "Ascent",
            TriggerDirection::Descent => "Descent",
        }
    }

    /// Разрешено ли срабатывание при наборе высоты
    pub fn allows_ascent(&self) -> bool {
        *self != TriggerDirection::Descent
    }

    /// Разрешено ли срабатывание при снижении
    pub fn allows_descent(&self) -> bool {
        *self != TriggerDirection::Ascent
    }
}

impl fmt::Display for TriggerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerDirection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "All" => Ok(TriggerDirection::All),
            "Ascent" => Ok(TriggerDirection::Ascent),
            "Descent" => Ok(TriggerDirection::Descent),
            other => Err(ConfigError::UnknownDirection(other.to_string())),
        }
    }
}

/// Host action group (staging, action groups 1-10, toggles, abort)
///
/// Числовой id — то, что хранит host; display label — то, что видит игрок.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum ActionGroup {
    #[default]
    Stage,
    Custom1,
    Custom2,
    Custom3,
    Custom4,
    Custom5,
    Custom6,
    Custom7,
    Custom8,
    Custom9,
    Custom10,
    Lights,
    Rcs,
    Sas,
    Brakes,
    Abort,
}

impl ActionGroup {
    pub const ALL: [ActionGroup; 16] = [
        ActionGroup::Stage,
        ActionGroup::Custom1,
        ActionGroup::Custom2,
        ActionGroup::Custom3,
        ActionGroup::Custom4,
        ActionGroup::Custom5,
        ActionGroup::Custom6,
        ActionGroup::Custom7,
        ActionGroup::Custom8,
        ActionGroup::Custom9,
        ActionGroup::Custom10,
        ActionGroup::Lights,
        ActionGroup::Rcs,
        ActionGroup::Sas,
        ActionGroup::Brakes,
        ActionGroup::Abort,
    ];

    /// Числовой id (0 = Stage, 1..=10 = AG1..AG10, 11..=15 = toggles + abort)
    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionGroup::Stage => "Stage",
            ActionGroup::Custom1 => "AG1",
            ActionGroup::Custom2 => "AG2",
            ActionGroup::Custom3 => "AG3",
            ActionGroup::Custom4 => "AG4",
            ActionGroup::Custom5 => "AG5",
            ActionGroup::Custom6 => "AG6",
            ActionGroup::Custom7 => "AG7",
            ActionGroup::Custom8 => "AG8",
            ActionGroup::Custom9 => "AG9",
            ActionGroup::Custom10 => "AG10",
            ActionGroup::Lights => "Lights",
            ActionGroup::Rcs => "RCS",
            ActionGroup::Sas => "SAS",
            ActionGroup::Brakes => "Brakes",
            ActionGroup::Abort => "Abort",
        }
    }
}

impl fmt::Display for ActionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for ActionGroup {
    type Error = ConfigError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        ActionGroup::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| ConfigError::UnknownGroup(id.to_string()))
    }
}

impl FromStr for ActionGroup {
    type Err = ConfigError;

    /// Legacy persisted форма: group хранился строкой "0".."15"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u8 = s
            .trim()
            .parse()
            .map_err(|_| ConfigError::UnknownGroup(s.to_string()))?;
        ActionGroup::try_from(id)
    }
}

/// Target height с единицей отображения
///
/// Core всегда работает в метрах (`meters()`), единица — только UI-представление.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum TargetHeight {
    Meters(f32),
    Kilometers(f32),
}

impl Default for TargetHeight {
    fn default() -> Self {
        TargetHeight::Meters(0.0)
    }
}

impl TargetHeight {
    pub fn meters(&self) -> f64 {
        match *self {
            TargetHeight::Meters(m) => m as f64,
            TargetHeight::Kilometers(km) => km as f64 * METERS_PER_KILOMETER,
        }
    }

    pub fn uses_kilometers(&self) -> bool {
        matches!(self, TargetHeight::Kilometers(_))
    }

    /// Та же единица, новое значение (в метрах)
    ///
    /// Проверяется уже сохраняемое f32: всё выше f32::MAX превратилось бы в inf.
    pub fn with_meters(&self, meters: f64) -> Result<TargetHeight, ConfigError> {
        if meters.is_nan() || meters < 0.0 {
            return Err(ConfigError::InvalidHeight(meters));
        }
        let (height, stored) = match self {
            TargetHeight::Meters(_) => {
                let stored = meters as f32;
                (TargetHeight::Meters(stored), stored)
            }
            TargetHeight::Kilometers(_) => {
                let stored = (meters / METERS_PER_KILOMETER) as f32;
                (TargetHeight::Kilometers(stored), stored)
            }
        };
        if !stored.is_finite() {
            return Err(ConfigError::InvalidHeight(meters));
        }
        Ok(height)
    }

    /// Переключение в kilometer mode. Значение скрываемой шкалы сбрасывается в 0.
    pub fn into_kilometers(self) -> TargetHeight {
        match self {
            TargetHeight::Kilometers(_) => self,
            TargetHeight::Meters(_) => TargetHeight::Kilometers(0.0),
        }
    }

    /// Переключение в meter mode. Значение скрываемой шкалы сбрасывается в 0.
    pub fn into_meters(self) -> TargetHeight {
        match self {
            TargetHeight::Meters(_) => self,
            TargetHeight::Kilometers(_) => TargetHeight::Meters(0.0),
        }
    }
}

/// Конфигурация одного altimeter'а
///
/// Меняется только через AltimeterCommands (применяются в начале physics tick).
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct TriggerConfig {
    pub target_height: TargetHeight,
    pub direction: TriggerDirection,
    pub auto_reset: bool,
    pub group: ActionGroup,
}

impl TriggerConfig {
    pub fn new(target_meters: f64, direction: TriggerDirection) -> Result<Self, ConfigError> {
        Ok(Self {
            target_height: TargetHeight::default().with_meters(target_meters)?,
            direction,
            ..Default::default()
        })
    }

    pub fn with_auto_reset(mut self, auto_reset: bool) -> Self {
        self.auto_reset = auto_reset;
        self
    }

    pub fn with_group(mut self, group: ActionGroup) -> Self {
        self.group = group;
        self
    }

    pub fn target_meters(&self) -> f64 {
        self.target_height.meters()
    }
}
