//! Headless sounding flight для демо и детерминизм-тестов
//!
//! Простейший профиль: Burn → Coast → Descent → Landed над ровным рельефом.
//! Барометрический шум детерминистичный (ChaCha8, seed), vertical speed — без шума.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use crate::components::VehicleTelemetry;
use crate::config::PHYSICS_HZ;

pub const GRAVITY: f64 = 9.81;

/// Фазы синтетического полёта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    Burn,
    Coast,
    Descent,
    Landed,
}

impl FlightPhase {
    pub fn name(&self) -> &'static str {
        match self {
            FlightPhase::Burn => "Burn",
            FlightPhase::Coast => "Coast",
            FlightPhase::Descent => "Descent",
            FlightPhase::Landed => "Landed",
        }
    }
}

/// Параметры профиля
#[derive(Debug, Clone, Copy)]
pub struct FlightParams {
    /// Высота площадки над уровнем моря (m)
    pub pad_elevation: f64,
    /// Ускорение двигателя без учёта гравитации (m/s²)
    pub thrust_acceleration: f64,
    pub burn_seconds: f64,
    /// Скорость снижения под парашютом (m/s, положительная)
    pub descent_speed: f64,
    /// Амплитуда барометрического шума (m)
    pub altitude_jitter: f64,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self {
            pad_elevation: 75.0,
            thrust_acceleration: 40.0, // ~30 m/s² net
            burn_seconds: 8.0,
            descent_speed: 60.0,
            altitude_jitter: 0.05,
        }
    }
}

/// Детерминистичный генератор telemetry
pub struct FlightProfile {
    params: FlightParams,
    rng: ChaCha8Rng,
    pub seed: u64,
    tick_duration: f64,
    /// Sea-level высота центра масс (без шума)
    altitude: f64,
    vertical_speed: f64,
    elapsed: f64,
    phase: FlightPhase,
}

impl FlightProfile {
    pub fn new(seed: u64) -> Self {
        Self::with_params(seed, FlightParams::default())
    }

    pub fn with_params(seed: u64, params: FlightParams) -> Self {
        Self {
            params,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            tick_duration: 1.0 / PHYSICS_HZ,
            altitude: params.pad_elevation,
            vertical_speed: 0.0,
            elapsed: 0.0,
            phase: FlightPhase::Burn,
        }
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn is_landed(&self) -> bool {
        self.phase == FlightPhase::Landed
    }

    /// Высота над площадкой (без шума)
    pub fn height_above_pad(&self) -> f64 {
        self.altitude - self.params.pad_elevation
    }

    /// Один fixed step. Возвращает telemetry для physics tick'а altimeter'а.
    pub fn step(&mut self) -> VehicleTelemetry {
        let dt = self.tick_duration;
        self.elapsed += dt;

        match self.phase {
            FlightPhase::Burn => {
                self.vertical_speed += (self.params.thrust_acceleration - GRAVITY) * dt;
                if self.elapsed >= self.params.burn_seconds {
                    self.phase = FlightPhase::Coast;
                }
            }
            FlightPhase::Coast => {
                self.vertical_speed -= GRAVITY * dt;
                if self.vertical_speed <= 0.0 {
                    self.phase = FlightPhase::Descent;
                }
            }
            FlightPhase::Descent => {
                self.vertical_speed =
                    (self.vertical_speed - GRAVITY * dt).max(-self.params.descent_speed);
            }
            FlightPhase::Landed => {
                self.vertical_speed = 0.0;
            }
        }

        self.altitude += self.vertical_speed * dt;
        if self.phase == FlightPhase::Descent && self.altitude <= self.params.pad_elevation {
            self.altitude = self.params.pad_elevation;
            self.vertical_speed = 0.0;
            self.phase = FlightPhase::Landed;
        }

        let jitter = self.params.altitude_jitter;
        let noise = if jitter > 0.0 {
            self.rng.gen_range(-jitter..jitter)
        } else {
            0.0
        };
        VehicleTelemetry::over_terrain(
            self.altitude + noise,
            self.params.pad_elevation,
            self.vertical_speed,
            dt,
        )
    }
}
