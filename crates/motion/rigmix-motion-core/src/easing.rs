//! Easing used by fade weights.

/// Sine ease: 0 for x <= 0, 1 for x >= 1, else `0.5 - 0.5*cos(pi*x)`.
///
/// The exact curve matters: fade weights computed here must match reference
/// renders numerically, so do not swap this for another smoothstep.
#[inline]
pub fn ease_sine(x: f32) -> f32 {
    if x <= 0.0 {
        0.0
    } else if x >= 1.0 {
        1.0
    } else {
        0.5 - 0.5 * (core::f32::consts::PI * x).cos()
    }
}

/// Eased progress through a fade window. `fade_seconds <= 0` means no fade:
/// full weight immediately.
#[inline]
pub fn fade_factor(elapsed: f32, fade_seconds: f32) -> f32 {
    if fade_seconds <= 0.0 {
        1.0
    } else {
        ease_sine(elapsed / fade_seconds)
    }
}
