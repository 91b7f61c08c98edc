//! Altitude sampling: текущая высота + направление движения
//!
//! Берём минимум из sea-level и terrain-relative высот: над горой ближе к земле
//! terrain-relative, над водой (terrain ниже уровня моря) — sea-level.

/// Результат одного sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeSample {
    pub altitude: f64,
    /// true только если высота строго выросла с прошлого tick'а
    pub ascending: bool,
}

/// Чистая функция sample (без состояния)
///
/// Равные высоты → `ascending = false` (tie-break: считаем снижением).
pub fn sample(
    sea_level_altitude: f64,
    terrain_relative_altitude: f64,
    previous: f64,
) -> AltitudeSample {
    let altitude = sea_level_altitude.min(terrain_relative_altitude);
    AltitudeSample {
        altitude,
        ascending: altitude > previous,
    }
}

/// Terrain-relative высота из sea-level высоты и высоты рельефа под аппаратом
///
/// Рельеф ниже уровня моря (дно океана) даёт значение больше sea-level,
/// и `sample` тогда выберет sea-level.
pub fn terrain_relative(sea_level_altitude: f64, terrain_height: f64) -> f64 {
    sea_level_altitude - terrain_height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_uses_lower_reading() {
        let over_mountain = sample(3000.0, 450.0, 0.0);
        assert_eq!(over_mountain.altitude, 450.0);

        let over_ocean = sample(120.0, 900.0, 0.0);
        assert_eq!(over_ocean.altitude, 120.0);
    }

    #[test]
    fn test_direction_inference() {
        assert!(sample(101.0, 200.0, 100.0).ascending);
        assert!(!sample(99.0, 200.0, 100.0).ascending);
        // Tie-break: равные высоты — не подъём
        assert!(!sample(100.0, 200.0, 100.0).ascending);
    }

    #[test]
    fn test_terrain_relative() {
        assert_eq!(terrain_relative(1500.0, 400.0), 1100.0);
        // Дно океана ниже нуля
        assert_eq!(terrain_relative(50.0, -200.0), 250.0);
    }
}
