//! Очередь изменений конфигурации (user toggles, action groups host'а)
//!
//! Любой writer (UI, host bridge, Bevy система) только кладёт команду в очередь.
//! Единственный reader — `apply_altimeter_commands`, первая система physics tick'а.
//! Evaluator поэтому всегда видит консистентный snapshot конфигурации.

use bevy::prelude::*;
use crate::components::TriggerState;
use crate::config::{ActionGroup, ConfigError, TriggerConfig, TriggerDirection};
use crate::logger;

/// Изменение конфигурации одного altimeter'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigChange {
    /// "Activate Detection" / "Deactivate Detection"
    SetArmed(bool),
    SetDirection(TriggerDirection),
    SetAutoReset(bool),
    /// Метры, единица отображения сохраняется
    SetTargetHeight(f64),
    SetGroup(ActionGroup),
    UseKilometers,
    UseMeters,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltimeterCommand {
    pub altimeter: Entity,
    pub change: ConfigChange,
}

/// FIFO очередь команд до следующего physics tick'а
#[derive(Resource, Debug, Default)]
pub struct AltimeterCommands {
    queue: Vec<AltimeterCommand>,
}

impl AltimeterCommands {
    pub fn push(&mut self, altimeter: Entity, change: ConfigChange) {
        self.queue.push(AltimeterCommand { altimeter, change });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn drain(&mut self) -> std::vec::Drain<'_, AltimeterCommand> {
        self.queue.drain(..)
    }
}

/// Применяет одно изменение. Ошибка → конфигурация не меняется.
pub fn apply_change(
    config: &mut TriggerConfig,
    state: &mut TriggerState,
    change: ConfigChange,
) -> Result<(), ConfigError> {
    match change {
        ConfigChange::SetArmed(armed) => state.armed = armed,
        ConfigChange::SetDirection(direction) => config.direction = direction,
        ConfigChange::SetAutoReset(auto_reset) => config.auto_reset = auto_reset,
        ConfigChange::SetTargetHeight(meters) => {
            config.target_height = config.target_height.with_meters(meters)?;
        }
        ConfigChange::SetGroup(group) => config.group = group,
        ConfigChange::UseKilometers => config.target_height = config.target_height.into_kilometers(),
        ConfigChange::UseMeters => config.target_height = config.target_height.into_meters(),
    }
    Ok(())
}

/// Система: применить очередь команд (physics фаза, запускается ПЕРВОЙ)
pub fn apply_altimeter_commands(
    mut commands: ResMut<AltimeterCommands>,
    mut altimeters: Query<(&mut TriggerConfig, &mut TriggerState)>,
) {
    if commands.is_empty() {
        return;
    }

    for command in commands.drain() {
        let Ok((mut config, mut state)) = altimeters.get_mut(command.altimeter) else {
            logger::log_warning(&format!(
                "Altimeter command {:?} for unknown entity {:?} dropped",
                command.change, command.altimeter
            ));
            continue;
        };

        match apply_change(&mut config, &mut state, command.change) {
            Ok(()) => logger::log(&format!(
                "Altimeter {:?}: applied {:?}",
                command.altimeter, command.change
            )),
            Err(e) => logger::log_warning(&format!(
                "Altimeter {:?}: rejected {:?}: {}",
                command.altimeter, command.change, e
            )),
        }
    }
}
