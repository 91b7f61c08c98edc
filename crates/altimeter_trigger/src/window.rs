//! Detection window sizing
//!
//! Окно — расстояние, которое аппарат проходит за один tick, плюс 5% запаса,
//! чтобы target height нельзя было "перепрыгнуть" между двумя sample'ами.

/// Запас на дискретизацию (5%)
pub const WINDOW_MARGIN: f64 = 1.05;

/// Полуширина окна в метрах
///
/// Всегда ≥ 0. NaN/∞ (уничтоженный аппарат, неинициализированная физика) → 0.
pub fn compute_window(vertical_speed: f64, tick_duration: f64) -> f64 {
    let window = (vertical_speed * tick_duration).abs() * WINDOW_MARGIN;
    if window.is_finite() { window } else { 0.0 }
}
