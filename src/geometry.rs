use glam::Vec2;

use crate::config;

/// Normalize, returning the zero vector for degenerate input instead of NaN.
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > config::EPS {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Clamp a vector to a maximum length, preserving its direction.
pub fn clamp_to_length(v: Vec2, max_len: f32) -> Vec2 {
    let len = v.length();
    if len > max_len && len > config::EPS {
        v * (max_len / len)
    } else {
        v
    }
}

/// Rotate a vector counterclockwise by an angle in degrees.
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    let (sin, cos) = rad.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Angle in degrees between two unit vectors.
///
/// The dot product is clamped to [-1, 1] before `acos`; floating-point
/// overshoot would otherwise produce NaN.
pub fn angle_between_degrees(a: Vec2, b: Vec2) -> f32 {
    let dot = a.dot(b).clamp(-1.0, 1.0);
    dot.acos().to_degrees()
}
