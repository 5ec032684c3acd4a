pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn normalize_distance(current_distance: f32, max_distance: f32, curve: f32) -> f32 {
    if max_distance.is_nan() || max_distance <= 0.0 || !current_distance.is_finite() {
        return 0.0;
    }
    let clamped = current_distance.clamp(0.0, max_distance);
    let normalized = 1.0 - clamped / max_distance;
    let shaped = normalized.powf(curve);
    if shaped.is_finite() {
        shaped.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

pub(crate) fn percent_to_unit(percent: f32) -> f32 {
    clamp_unit(percent / 100.0)
}
