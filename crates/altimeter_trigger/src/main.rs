//! Headless demo altimeter'а
//!
//! Прогоняет синтетический полёт (Burn → Coast → Descent) через AltimeterController.
//! Physics tick 50 Hz, frame tick каждые 2 physics tick'а (как у host'а с 25 FPS).

use bevy::prelude::Entity;
use altimeter_trigger::flight::FlightProfile;
use altimeter_trigger::{
    log_info, ActionDispatcher, ActionGroup, AltimeterController, IndicatorController,
    TriggerConfig, TriggerDirection,
};

const FRAME_EVERY_PHYSICS_TICKS: u64 = 2;

struct ConsoleStaging;

impl ActionDispatcher for ConsoleStaging {
    fn fire(&mut self, group: ActionGroup) {
        log_info(&format!("HOST: activating group {} (id {})", group, group.id()));
    }
}

#[derive(Default)]
struct ConsoleLamp {
    lit: bool,
}

impl IndicatorController for ConsoleLamp {
    fn set_illuminated(&mut self, altimeter: Entity, lit: bool) {
        if lit != self.lit {
            self.lit = lit;
            log_info(&format!(
                "HOST: altimeter {:?} lamp {}",
                altimeter,
                if lit { "ON" } else { "OFF" }
            ));
        }
    }
}

fn main() {
    let seed = 42;
    println!("Starting altimeter demo flight (seed: {})", seed);

    // Парашют на снижении через 2 km
    let config = match TriggerConfig::new(2_000.0, TriggerDirection::Descent) {
        Ok(config) => config.with_group(ActionGroup::Custom1),
        Err(e) => {
            eprintln!("Invalid demo config: {}", e);
            return;
        }
    };

    let mut controller = AltimeterController::new(config, true)
        .with_dispatcher(ConsoleStaging)
        .with_indicator(ConsoleLamp::default());
    let mut flight = FlightProfile::new(seed);
    let mut fired = Vec::new();

    while !flight.is_landed() {
        controller.on_physics_tick(flight.step());

        let tick = controller.physics_tick();
        if tick % FRAME_EVERY_PHYSICS_TICKS == 0 {
            fired.extend(controller.on_frame_tick());
        }

        if tick % 500 == 0 {
            let state = controller.state();
            println!(
                "Tick {}: {} | alt {:.1} m | window {:.2} m | armed {}",
                tick,
                flight.phase().name(),
                state.altitude,
                state.window,
                state.armed
            );
        }
    }
    fired.extend(controller.on_frame_tick());

    for event in &fired {
        println!(
            "Fired {} at {:.1} m (physics tick {})",
            event.group, event.altitude, event.physics_tick
        );
    }
    println!("Flight complete: {} staged action(s)", fired.len());
}
