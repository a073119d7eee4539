/// Scene configuration: viewport, projection and control ranges
use crate::animation::{AnimationConfig, DEFAULT_SPEED};
use crate::projection::{ProjectionMode, Viewport};
use crate::style::{DEFAULT_DEPTH, DEFAULT_SPACING};

/// Declared bounds of a numeric slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// Clamp into range; NaN falls back to the default
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }
}

/// Everything fixed for the lifetime of a [`Scene`](crate::Scene)
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub viewport: Viewport,
    pub projection: ProjectionMode,
    pub depth: SliderRange,
    pub spacing: SliderRange,
    pub speed: SliderRange,
    pub animation: AnimationConfig,
}

impl SceneConfig {
    /// Default configuration for a canvas of the given aspect ratio
    pub fn for_aspect(aspect: f32) -> Self {
        Self {
            viewport: Viewport::for_aspect(aspect),
            ..Self::default()
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            projection: ProjectionMode::Orthographic,
            depth: SliderRange::new(0.1, 1.0, DEFAULT_DEPTH),
            spacing: SliderRange::new(0.0, 1.0, DEFAULT_SPACING),
            speed: SliderRange::new(0.1, 5.0, DEFAULT_SPEED),
            animation: AnimationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_clamp() {
        let range = SliderRange::new(0.1, 1.0, 0.3);
        assert_eq!(range.clamp(-1.0), 0.1);
        assert_eq!(range.clamp(0.5), 0.5);
        assert_eq!(range.clamp(3.0), 1.0);
        assert_eq!(range.clamp(f32::NAN), 0.3);
        assert_eq!(range.clamp(f32::INFINITY), 1.0);
    }

    #[test]
    fn test_defaults_within_ranges() {
        let config = SceneConfig::for_aspect(1.0);
        for range in [config.depth, config.spacing, config.speed] {
            assert_eq!(range.clamp(range.default), range.default);
        }
        assert!((config.viewport.half_width - 3.0).abs() < 1e-6);
    }
}
