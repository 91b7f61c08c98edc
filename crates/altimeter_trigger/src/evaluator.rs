//! Trigger evaluation — state machine altimeter'а
//!
//! Armed → (fire) → Disarmed → (auto reset, выход из окна) → Armed
//!
//! Проверка идёт по "передней кромке" окна относительно направления движения:
//! при подъёме сравниваем `alt − window`, при снижении `alt + window`.
//! Fire: distance < window (строго). Rearm: distance > window (строго).
//! Ровно на границе окна — ни fire, ни rearm.

use crate::components::{FireRecord, PendingFire, TriggerState};
use crate::config::{ActionGroup, TriggerConfig};

/// Решение на один tick (до применения)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    Fire,
    Rearm,
    Hold,
}

/// Что фактически произошло после применения решения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Fired(ActionGroup),
    /// Условие fire выполнено, но mailbox ещё не разобран — остаёмся armed
    FireDeferred,
    Rearmed,
    Held,
}

/// Расстояние от передней кромки окна до target height
pub fn edge_distance(altitude: f64, window: f64, ascending: bool, target: f64) -> f64 {
    let edge = if ascending {
        altitude - window
    } else {
        altitude + window
    };
    (edge - target).abs()
}

/// Решение по snapshot'у состояния, прочитанному в начале tick'а
///
/// Fire и rearm взаимоисключающие: rearm проверяется только если trigger не armed.
pub fn evaluate(state: &TriggerState, config: &TriggerConfig) -> TriggerDecision {
    let distance = edge_distance(
        state.altitude,
        state.window,
        state.ascending,
        config.target_meters(),
    );

    if state.armed {
        let permitted = if state.ascending {
            config.direction.allows_ascent()
        } else {
            config.direction.allows_descent()
        };

        if permitted && distance < state.window {
            TriggerDecision::Fire
        } else {
            TriggerDecision::Hold
        }
    } else if config.auto_reset && distance > state.window {
        TriggerDecision::Rearm
    } else {
        TriggerDecision::Hold
    }
}

/// Применяет решение к state + mailbox
///
/// Fire атомарен: armed = false, illuminated = true, mailbox занят — всё в одном tick'е.
/// В mailbox уходит высота и номер tick'а срабатывания, не drain'а.
/// Rearm не трогает illuminated (гасит frame фаза через `settle_indicator`).
pub fn apply_decision(
    state: &mut TriggerState,
    mailbox: &mut PendingFire,
    group: ActionGroup,
    physics_tick: u64,
    decision: TriggerDecision,
) -> TickOutcome {
    match decision {
        TriggerDecision::Fire => {
            if !mailbox.post(FireRecord::new(group, state.altitude, physics_tick)) {
                return TickOutcome::FireDeferred;
            }
            state.armed = false;
            state.illuminated = true;
            TickOutcome::Fired(group)
        }
        TriggerDecision::Rearm => {
            state.armed = true;
            TickOutcome::Rearmed
        }
        TriggerDecision::Hold => TickOutcome::Held,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriggerDirection;

    fn state_at(altitude: f64, window: f64, ascending: bool, armed: bool) -> TriggerState {
        let mut state = TriggerState::new(armed);
        state.altitude = altitude;
        state.window = window;
        state.ascending = ascending;
        state
    }

    #[test]
    fn test_edge_distance_direction_bias() {
        // Подъём: кромка ниже аппарата
        assert_eq!(edge_distance(1005.0, 10.0, true, 1000.0), 5.0);
        // Снижение: кромка выше аппарата
        assert_eq!(edge_distance(995.0, 10.0, false, 1000.0), 5.0);
        assert_eq!(edge_distance(1005.0, 10.0, false, 1000.0), 15.0);
    }

    #[test]
    fn test_fire_on_ascent_inside_window() {
        let config = TriggerConfig::new(1000.0, TriggerDirection::Ascent).unwrap();
        let state = state_at(1005.0, 10.0, true, true);
        assert_eq!(evaluate(&state, &config), TriggerDecision::Fire);
    }

    #[test]
    fn test_direction_filter_blocks_fire() {
        let config = TriggerConfig::new(1000.0, TriggerDirection::Descent).unwrap();
        let ascending = state_at(1005.0, 10.0, true, true);
        assert_eq!(evaluate(&ascending, &config), TriggerDecision::Hold);

        let config = TriggerConfig::new(1000.0, TriggerDirection::Ascent).unwrap();
        let descending = state_at(995.0, 10.0, false, true);
        assert_eq!(evaluate(&descending, &config), TriggerDecision::Hold);
    }

    #[test]
    fn test_boundary_neither_fires_nor_rearms() {
        let config = TriggerConfig::new(1000.0, TriggerDirection::All)
            .unwrap()
            .with_auto_reset(true);

        // Ровно window от кромки: |(1020 - 10) - 1000| = 10
        let armed = state_at(1020.0, 10.0, true, true);
        assert_eq!(evaluate(&armed, &config), TriggerDecision::Hold);

        let disarmed = state_at(1020.0, 10.0, true, false);
        assert_eq!(evaluate(&disarmed, &config), TriggerDecision::Hold);
    }

    #[test]
    fn test_zero_window_never_fires() {
        // Стоим ровно на target: |alt - target| = 0, 0 < 0 — false
        let config = TriggerConfig::new(1000.0, TriggerDirection::All).unwrap();
        let state = state_at(1000.0, 0.0, false, true);
        assert_eq!(evaluate(&state, &config), TriggerDecision::Hold);
    }

    #[test]
    fn test_rearm_requires_auto_reset() {
        let config = TriggerConfig::new(1000.0, TriggerDirection::All).unwrap();
        let far_away = state_at(1500.0, 10.0, true, false);
        assert_eq!(evaluate(&far_away, &config), TriggerDecision::Hold);

        let config = config.with_auto_reset(true);
        assert_eq!(evaluate(&far_away, &config), TriggerDecision::Rearm);
    }

    #[test]
    fn test_apply_fire_is_atomic() {
        let mut state = state_at(1005.0, 10.0, true, true);
        let mut mailbox = PendingFire::default();

        let outcome = apply_decision(&mut state, &mut mailbox, ActionGroup::Custom2, 12, TriggerDecision::Fire);
        assert_eq!(outcome, TickOutcome::Fired(ActionGroup::Custom2));
        assert!(!state.armed);
        assert!(state.illuminated);
        assert_eq!(
            mailbox.take(),
            Some(FireRecord::new(ActionGroup::Custom2, 1005.0, 12))
        );
    }

    #[test]
    fn test_apply_fire_deferred_when_mailbox_busy() {
        let mut state = state_at(1005.0, 10.0, true, true);
        let mut mailbox = PendingFire::default();
        mailbox.post(FireRecord::new(ActionGroup::Stage, 990.0, 1));

        let outcome = apply_decision(&mut state, &mut mailbox, ActionGroup::Stage, 2, TriggerDecision::Fire);
        assert_eq!(outcome, TickOutcome::FireDeferred);
        assert!(state.armed);
        assert!(!state.illuminated);
    }

    #[test]
    fn test_apply_rearm_keeps_indicator() {
        let mut state = state_at(1500.0, 10.0, true, false);
        state.illuminated = true;
        let mut mailbox = PendingFire::default();

        let outcome = apply_decision(&mut state, &mut mailbox, ActionGroup::Stage, 7, TriggerDecision::Rearm);
        assert_eq!(outcome, TickOutcome::Rearmed);
        assert!(state.armed);
        assert!(state.illuminated); // Гасит frame фаза
        assert!(!mailbox.is_pending());
    }
}
