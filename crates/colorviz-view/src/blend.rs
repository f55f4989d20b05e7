//! Colorspace switch animation.

use crate::config::DEFAULT_BLEND_DURATION;

/// Blend factor moving linearly between 0 and 1.
///
/// [`switch`](Self::switch) flips the destination; calling it mid-flight
/// reverses from the current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorspaceBlend {
    value: f32,
    target: f32,
    duration: f32,
}

impl Default for ColorspaceBlend {
    fn default() -> Self {
        Self::new(DEFAULT_BLEND_DURATION)
    }
}

impl ColorspaceBlend {
    /// Resting at 0. `duration` is the full 0 to 1 travel time in seconds.
    pub fn new(duration: f32) -> Self {
        Self {
            value: 0.0,
            target: 0.0,
            duration,
        }
    }

    /// Current factor.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Destination, 0 or 1.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True while moving.
    pub fn is_animating(&self) -> bool {
        self.value != self.target
    }

    /// Heads toward the other end.
    pub fn switch(&mut self) {
        self.target = if self.target > 0.5 { 0.0 } else { 1.0 };
    }

    /// Advances by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.duration <= 0.0 {
            self.value = self.target;
            return;
        }
        let step = dt / self.duration;
        self.value = if self.target > self.value {
            (self.value + step).min(self.target)
        } else {
            (self.value - step).max(self.target)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_one_second() {
        let mut blend = ColorspaceBlend::new(1.0);
        blend.switch();
        blend.update(0.25);
        assert_abs_diff_eq!(blend.value(), 0.25, epsilon = 1e-6);
        blend.update(0.5);
        assert_abs_diff_eq!(blend.value(), 0.75, epsilon = 1e-6);
        blend.update(1.0);
        assert_eq!(blend.value(), 1.0);
        assert!(!blend.is_animating());
    }

    #[test]
    fn test_reverse_mid_flight() {
        let mut blend = ColorspaceBlend::new(1.0);
        blend.switch();
        blend.update(0.4);
        blend.switch();
        assert_eq!(blend.target(), 0.0);
        blend.update(0.1);
        assert_abs_diff_eq!(blend.value(), 0.3, epsilon = 1e-6);
        blend.update(5.0);
        assert_eq!(blend.value(), 0.0);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut blend = ColorspaceBlend::new(0.0);
        blend.switch();
        blend.update(0.0);
        assert_eq!(blend.value(), 1.0);
    }
}
