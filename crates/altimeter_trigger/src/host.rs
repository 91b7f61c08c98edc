//! Host adapters — внешние коллабораторы altimeter'а
//!
//! Core не знает, как host зажигает лампу и выполняет staging. Он видит только:
//! - IndicatorController: set_illuminated (идемпотентно, каждый frame tick)
//! - ActionDispatcher: fire(group) (не чаще одного раза на срабатывание, только из frame фазы)
//!
//! Оба resource'а опциональны: без них core всё равно обновляет IndicatorLight
//! и пишет StagedActionFired события (Bevy-native host читает их сам).

use bevy::prelude::*;
use crate::config::ActionGroup;

/// Визуальный индикатор (лампа + glow анимация)
pub trait IndicatorController: Send + Sync + 'static {
    fn set_illuminated(&mut self, altimeter: Entity, lit: bool);
}

/// Выполнение staged action на аппарате
///
/// Вызывается вне physics callback'а: structural изменения аппарата безопасны.
pub trait ActionDispatcher: Send + Sync + 'static {
    fn fire(&mut self, group: ActionGroup);
}

/// Resource-обёртка для IndicatorController
#[derive(Resource)]
pub struct IndicatorHost(pub Box<dyn IndicatorController>);

/// Resource-обёртка для ActionDispatcher
#[derive(Resource)]
pub struct DispatchHost(pub Box<dyn ActionDispatcher>);

/// Событие: staged action отправлен host'у
///
/// Пишется frame фазой при drain'е PendingFire. Используется для UI, звуков, логов.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StagedActionFired {
    pub altimeter: Entity,
    pub group: ActionGroup,
    /// Высота в момент срабатывания (sample того physics tick'а)
    pub altitude: f64,
    /// Physics tick срабатывания (dispatch может быть позже)
    pub physics_tick: u64,
}
