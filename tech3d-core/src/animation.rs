/// Scripted animation driver
///
/// The choreography is a fixed list of stages. Each stage is a handler that
/// moves one value toward a target and reports when it got there; a path only
/// decides the order in which the stages run and whether rotation targets are
/// mirrored. One call to `tick` advances one frame.
use std::fmt;
use std::str::FromStr;

use nalgebra::{Vector2, Vector3};

use crate::error::ParseError;
use crate::geometry::WordExtent;
use crate::projection::Viewport;
use crate::transform::TransformState;

/// Default animation speed (degrees per tick while rotating)
pub const DEFAULT_SPEED: f32 = 0.5;

/// Axis the rotation stages turn about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl FromStr for Axis {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(ParseError::UnknownAxis(s.to_string())),
        }
    }
}

/// One phase of the choreography
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// Turn about the active axis until the angle equals `target` degrees
    Rotate { target: f32 },
    /// Recenter, then grow toward the largest scale that fits the viewport
    ScaleUp,
    /// Shrink back to 1.0 while pulling translation toward the origin
    ScaleDown,
    /// Drift with constant velocity, reflecting off the viewport bounds
    Bounce,
}

impl Stage {
    fn mirrored(self) -> Self {
        match self {
            Stage::Rotate { target } => Stage::Rotate { target: -target },
            other => other,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Rotate { target } => write!(f, "rotate to {:.0}°", target),
            Stage::ScaleUp => f.write_str("scale up"),
            Stage::ScaleDown => f.write_str("scale down"),
            Stage::Bounce => f.write_str("bounce"),
        }
    }
}

/// Canonical stage order
pub const CHOREOGRAPHY: [Stage; 7] = [
    Stage::Rotate { target: 180.0 },
    Stage::Rotate { target: 0.0 },
    Stage::Rotate { target: -180.0 },
    Stage::Rotate { target: 0.0 },
    Stage::ScaleUp,
    Stage::ScaleDown,
    Stage::Bounce,
];

/// Selectable ordering of the choreography
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Path {
    #[default]
    Forward,
    /// Stages in reverse order with mirrored rotation targets
    Reverse,
    /// No automatic stages; driven by [`Nudge`]s
    Manual,
}

impl Path {
    /// Selector index as shown in the path picker (1-based)
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            1 => Some(Path::Forward),
            2 => Some(Path::Reverse),
            3 => Some(Path::Manual),
            _ => None,
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Path::Forward => 1,
            Path::Reverse => 2,
            Path::Manual => 3,
        }
    }

    /// Number of automatic stages on this path
    pub fn stage_count(self) -> usize {
        match self {
            Path::Manual => 0,
            _ => CHOREOGRAPHY.len(),
        }
    }

    /// Stage at 1-based position `stage`
    pub fn stage(self, stage: usize) -> Option<Stage> {
        let i = stage.checked_sub(1)?;
        match self {
            Path::Forward => CHOREOGRAPHY.get(i).copied(),
            Path::Reverse => CHOREOGRAPHY
                .len()
                .checked_sub(i + 1)
                .map(|j| CHOREOGRAPHY[j].mirrored()),
            Path::Manual => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Path::Forward => Path::Reverse,
            Path::Reverse => Path::Manual,
            Path::Manual => Path::Forward,
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Path::Forward => "forward",
            Path::Reverse => "reverse",
            Path::Manual => "manual",
        })
    }
}

impl FromStr for Path {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "forward" => return Ok(Path::Forward),
            "reverse" => return Ok(Path::Reverse),
            "manual" => return Ok(Path::Manual),
            _ => {}
        }
        s.parse::<u32>()
            .ok()
            .and_then(Path::from_index)
            .ok_or_else(|| ParseError::UnknownPath(s.to_string()))
    }
}

/// Where the driver is within its path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceState {
    pub path: Path,
    /// 1-based position in the path's stage order
    pub stage: usize,
    pub frames_in_stage: u32,
}

impl SequenceState {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            stage: 1,
            frames_in_stage: 0,
        }
    }

    pub fn current(&self) -> Option<Stage> {
        self.path.stage(self.stage)
    }

    /// Move to the next stage, wrapping from the last back to the first
    pub fn advance(&mut self) {
        let count = self.path.stage_count().max(1);
        self.stage = self.stage % count + 1;
        self.frames_in_stage = 0;
    }
}

impl Default for SequenceState {
    fn default() -> Self {
        Self::new(Path::default())
    }
}

/// Tunables of the choreography
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Scale never drops below this
    pub min_scale: f32,
    /// Scale change per tick at speed 1.0
    pub scale_step: f32,
    /// Translation multiplier applied each tick while scaling down
    pub recenter_decay: f32,
    /// Length of the bounce stage
    pub bounce_ticks: u32,
    /// Bounce velocity per tick at speed 1.0
    pub bounce_velocity: Vector2<f32>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.7,
            scale_step: 0.005,
            recenter_decay: 0.9,
            bounce_ticks: 600,
            bounce_velocity: Vector2::new(0.02, 0.015),
        }
    }
}

/// Everything a tick reads besides the state it mutates
#[derive(Debug, Clone, Copy)]
pub struct DriverParams<'a> {
    pub config: &'a AnimationConfig,
    pub viewport: &'a Viewport,
    pub word: WordExtent,
    pub speed: f32,
    pub axis: Axis,
}

impl DriverParams<'_> {
    /// Half extents of the un-scaled word at `rotation`
    pub fn footprint(&self, rotation: &Vector3<f32>) -> Vector2<f32> {
        self.word.footprint(rotation)
    }

    /// Largest scale at which the word, turned by `rotation`, fits the viewport
    pub fn max_scale(&self, rotation: &Vector3<f32>) -> f32 {
        self.viewport
            .max_scale_to_fit(self.footprint(rotation))
            .max(self.config.min_scale)
    }
}

/// Discrete manual adjustments, honored on the manual path only
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Nudge {
    /// Add degrees about an axis
    Rotate { axis: Axis, degrees: f32 },
    /// Shift translation by a delta
    Translate { dx: f32, dy: f32 },
    /// Place the word at an absolute offset
    SetTranslation { x: f32, y: f32 },
    /// Add to the uniform scale
    Scale(f32),
}

/// Advance the animation by one frame. A no-op on the manual path.
pub fn tick(transform: &mut TransformState, sequence: &mut SequenceState, params: &DriverParams) {
    let Some(stage) = sequence.current() else {
        return;
    };

    let done = match stage {
        Stage::Rotate { target } => rotate_toward(transform, params.axis, target, params.speed),
        Stage::ScaleUp => scale_up(transform, params),
        Stage::ScaleDown => scale_down(transform, params),
        Stage::Bounce => bounce(transform, sequence.frames_in_stage, params),
    };

    if done {
        log::debug!(
            "{} path: stage {} ({}) complete after {} ticks",
            sequence.path,
            sequence.stage,
            stage,
            sequence.frames_in_stage + 1
        );
        sequence.advance();
    } else {
        sequence.frames_in_stage += 1;
    }

    clamp(transform, params);
}

/// Keep scale within its limits and the rotated word inside the viewport.
///
/// Rotation is never undone; a turn that widens the footprint shrinks the
/// word instead.
pub fn clamp(transform: &mut TransformState, params: &DriverParams) {
    let footprint = params.footprint(&transform.rotation);
    let max_scale = params
        .viewport
        .max_scale_to_fit(footprint)
        .max(params.config.min_scale);
    transform.scale = transform.scale.clamp(params.config.min_scale, max_scale);
    params
        .viewport
        .clamp_translation(&mut transform.translation, footprint, transform.scale);
}

/// Apply a manual adjustment, then clamp
pub fn apply_nudge(transform: &mut TransformState, nudge: Nudge, params: &DriverParams) {
    match nudge {
        Nudge::Rotate { axis, degrees } => transform.rotation[axis.index()] += degrees,
        Nudge::Translate { dx, dy } => transform.translation += Vector3::new(dx, dy, 0.0),
        Nudge::SetTranslation { x, y } => {
            transform.translation.x = x;
            transform.translation.y = y;
        }
        Nudge::Scale(delta) => transform.scale += delta,
    }
    clamp(transform, params);
}

/// Step `value` toward `target` by at most `step`; true once it arrives
fn approach(value: &mut f32, target: f32, step: f32) -> bool {
    let remaining = target - *value;
    if remaining.abs() <= step.abs() {
        *value = target;
        true
    } else {
        *value += step.abs() * remaining.signum();
        false
    }
}

fn rotate_toward(transform: &mut TransformState, axis: Axis, target: f32, speed: f32) -> bool {
    approach(&mut transform.rotation[axis.index()], target, speed)
}

fn scale_up(transform: &mut TransformState, params: &DriverParams) -> bool {
    transform.translation = Vector3::zeros();
    transform.velocity = Vector2::zeros();
    let target = params.max_scale(&transform.rotation);
    approach(
        &mut transform.scale,
        target,
        params.config.scale_step * params.speed,
    )
}

fn scale_down(transform: &mut TransformState, params: &DriverParams) -> bool {
    transform.translation *= params.config.recenter_decay;
    approach(
        &mut transform.scale,
        1.0,
        params.config.scale_step * params.speed,
    )
}

fn bounce(transform: &mut TransformState, frame: u32, params: &DriverParams) -> bool {
    if frame == 0 {
        transform.velocity = params.config.bounce_velocity;
    }

    if frame + 1 >= params.config.bounce_ticks {
        transform.translation = Vector3::zeros();
        transform.velocity = Vector2::zeros();
        return true;
    }

    let bounds = params
        .viewport
        .translation_bounds(params.footprint(&transform.rotation), transform.scale);
    let t = &mut transform.translation;
    let v = &mut transform.velocity;

    t.x += v.x * params.speed;
    t.y += v.y * params.speed;
    reflect(&mut t.x, &mut v.x, bounds.x);
    reflect(&mut t.y, &mut v.y, bounds.y);

    false
}

/// Pin `position` to `±limit` and flip `velocity` if it still points outward.
/// Returns true when the velocity was flipped.
fn reflect(position: &mut f32, velocity: &mut f32, limit: f32) -> bool {
    if *position >= limit {
        *position = limit;
        if *velocity > 0.0 {
            *velocity = -*velocity;
            return true;
        }
    } else if *position <= -limit {
        *position = -limit;
        if *velocity < 0.0 {
            *velocity = -*velocity;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::word_width;

    fn params<'a>(config: &'a AnimationConfig, viewport: &'a Viewport, speed: f32) -> DriverParams<'a> {
        DriverParams {
            config,
            viewport,
            word: WordExtent::new(0.2, 0.3),
            speed,
            axis: Axis::Y,
        }
    }

    fn run_until_stage(
        transform: &mut TransformState,
        sequence: &mut SequenceState,
        params: &DriverParams,
        stage: usize,
        limit: usize,
    ) -> usize {
        for n in 0..limit {
            if sequence.stage == stage {
                return n;
            }
            tick(transform, sequence, params);
        }
        panic!("stage {} not reached within {} ticks", stage, limit);
    }

    #[test]
    fn test_forward_rotation_stages() {
        let config = AnimationConfig::default();
        let viewport = Viewport::default();
        let p = params(&config, &viewport, 1.0);
        let mut transform = TransformState::identity();
        let mut sequence = SequenceState::new(Path::Forward);

        let ticks = run_until_stage(&mut transform, &mut sequence, &p, 2, 1000);
        assert_eq!(ticks, 180);
        assert_eq!(transform.rotation.y, 180.0);

        run_until_stage(&mut transform, &mut sequence, &p, 3, 1000);
        assert_eq!(transform.rotation.y, 0.0);

        run_until_stage(&mut transform, &mut sequence, &p, 4, 1000);
        assert_eq!(transform.rotation.y, -180.0);

        run_until_stage(&mut transform, &mut sequence, &p, 5, 1000);
        assert_eq!(transform.rotation.y, 0.0);
        assert_eq!(transform.rotation.x, 0.0);
        assert_eq!(transform.rotation.z, 0.0);
    }

    #[test]
    fn test_rotation_follows_axis() {
        let config = AnimationConfig::default();
        let viewport = Viewport::default();
        let mut p = params(&config, &viewport, 2.0);
        p.axis = Axis::X;
        let mut transform = TransformState::identity();
        let mut sequence = SequenceState::new(Path::Forward);

        tick(&mut transform, &mut sequence, &p);
        assert_eq!(transform.rotation, Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_scale_up_reaches_fit_without_exceeding() {
        let config = AnimationConfig::default();
        let viewport = Viewport::default();
        let p = params(&config, &viewport, 1.0);
        let max_scale = p.max_scale(&Vector3::zeros());
        assert!((max_scale - 2.0).abs() < 1e-6);

        let mut transform = TransformState::identity();
        transform.translation = Vector3::new(0.5, 0.5, 0.0);
        let mut sequence = SequenceState::new(Path::Forward);
        sequence.stage = 5;

        let bound = ((max_scale - 1.0) / config.scale_step).ceil() as usize + 1;
        for _ in 0..bound {
            if sequence.stage != 5 {
                break;
            }
            tick(&mut transform, &mut sequence, &p);
            assert!(transform.scale <= max_scale + 1e-6);
            assert_eq!(transform.translation, Vector3::zeros());
        }
        assert_eq!(sequence.stage, 6);
        assert!((transform.scale - max_scale).abs() < 1e-6);
    }

    #[test]
    fn test_scale_down_decays_translation() {
        let config = AnimationConfig::default();
        let viewport = Viewport::default();
        let p = params(&config, &viewport, 1.0);

        let mut transform = TransformState::identity();
        transform.scale = 1.5;
        transform.translation = Vector3::new(0.4, -0.2, 0.0);
        let mut sequence = SequenceState::new(Path::Forward);
        sequence.stage = 6;

        tick(&mut transform, &mut sequence, &p);
        assert!((transform.translation.x - 0.36).abs() < 1e-6);
        assert!((transform.translation.y + 0.18).abs() < 1e-6);
        assert!((transform.scale - 1.495).abs() < 1e-6);

        run_until_stage(&mut transform, &mut sequence, &p, 7, 1000);
        assert_eq!(transform.scale, 1.0);
    }

    #[test]
    fn test_bounce_stays_in_bounds_and_flips_once_per_contact() {
        let config = AnimationConfig::default();
        let viewport = Viewport::default();
        let p = params(&config, &viewport, 5.0);
        let bounds = viewport.translation_bounds(p.footprint(&Vector3::zeros()), 1.0);

        let mut transform = TransformState::identity();
        let mut sequence = SequenceState::new(Path::Forward);
        sequence.stage = 7;

        let mut contacts = [0; 2];
        let mut flips = [0; 2];
        let mut last_velocity = Vector2::<f32>::zeros();
        for _ in 0..config.bounce_ticks - 1 {
            tick(&mut transform, &mut sequence, &p);
            assert_eq!(sequence.stage, 7);
            let t = transform.translation;
            let v = transform.velocity;
            assert!(t.x.abs() <= bounds.x + 1e-6);
            assert!(t.y.abs() <= bounds.y + 1e-6);

            for i in 0..2 {
                // Contacts pin the position exactly onto the bound
                if t[i].abs() == bounds[i] {
                    contacts[i] += 1;
                }
                if last_velocity[i] != 0.0 && v[i].signum() != last_velocity[i].signum() {
                    flips[i] += 1;
                }
            }
            last_velocity = v;
        }
        assert!(contacts[0] > 0 && contacts[1] > 0);
        assert_eq!(contacts, flips);
    }

    #[test]
    fn test_bounce_budget_loops_to_first_stage() {
        let config = AnimationConfig::default();
        let viewport = Viewport::default();
        let p = params(&config, &viewport, 1.0);

        let mut transform = TransformState::identity();
        let mut sequence = SequenceState::new(Path::Forward);
        sequence.stage = 7;

        for _ in 0..config.bounce_ticks {
            tick(&mut transform, &mut sequence, &p);
        }
        assert_eq!(sequence.stage, 1);
        assert_eq!(sequence.frames_in_stage, 0);
        assert_eq!(transform.translation, Vector3::zeros());
        assert_eq!(transform.velocity, Vector2::zeros());
    }

    #[test]
    fn test_reverse_path_order() {
        let stages: Vec<Stage> = (1..=7).filter_map(|i| Path::Reverse.stage(i)).collect();
        assert_eq!(
            stages,
            vec![
                Stage::Bounce,
                Stage::ScaleDown,
                Stage::ScaleUp,
                Stage::Rotate { target: -0.0 },
                Stage::Rotate { target: 180.0 },
                Stage::Rotate { target: 0.0 },
                Stage::Rotate { target: -180.0 },
            ]
        );
        assert_eq!(Path::Reverse.stage(8), None);
        assert_eq!(Path::Forward.stage(0), None);
    }

    #[test]
    fn test_reverse_path_runs_mirrored_rotation() {
        let config = AnimationConfig::default();
        let viewport = Viewport::default();
        let p = params(&config, &viewport, 1.0);
        let mut transform = TransformState::identity();
        let mut sequence = SequenceState::new(Path::Reverse);
        sequence.stage = 5;

        // Stage 5 of the reverse path mirrors forward stage 3
        run_until_stage(&mut transform, &mut sequence, &p, 6, 1000);
        assert_eq!(transform.rotation.y, 180.0);
        run_until_stage(&mut transform, &mut sequence, &p, 7, 1000);
        run_until_stage(&mut transform, &mut sequence, &p, 1, 1000);
        assert_eq!(transform.rotation.y, -180.0);
    }

    #[test]
    fn test_manual_path_does_not_advance() {
        let config = AnimationConfig::default();
        let viewport = Viewport::default();
        let p = params(&config, &viewport, 1.0);
        let mut transform = TransformState::identity();
        let mut sequence = SequenceState::new(Path::Manual);

        for _ in 0..100 {
            tick(&mut transform, &mut sequence, &p);
        }
        assert_eq!(transform, TransformState::identity());
        assert_eq!(sequence, SequenceState::new(Path::Manual));
    }

    #[test]
    fn test_nudges_are_clamped() {
        let config = AnimationConfig::default();
        let viewport = Viewport::default();
        let p = params(&config, &viewport, 1.0);
        let mut transform = TransformState::identity();

        apply_nudge(&mut transform, Nudge::Translate { dx: 100.0, dy: -100.0 }, &p);
        let bounds = viewport.translation_bounds(p.footprint(&Vector3::zeros()), 1.0);
        assert!((transform.translation.x - bounds.x).abs() < 1e-6);
        assert!((transform.translation.y + bounds.y).abs() < 1e-6);

        apply_nudge(&mut transform, Nudge::Scale(-5.0), &p);
        assert_eq!(transform.scale, config.min_scale);

        apply_nudge(&mut transform, Nudge::Scale(50.0), &p);
        assert!((transform.scale - p.max_scale(&transform.rotation)).abs() < 1e-6);
        // At the largest fitting scale the word cannot move horizontally
        assert!(transform.translation.x.abs() < 1e-5);

        apply_nudge(&mut transform, Nudge::Rotate { axis: Axis::Z, degrees: 15.0 }, &p);
        assert_eq!(transform.rotation.z, 15.0);
        // The tilted word is wider, so the scale backs off to fit
        assert!(transform.scale < 2.0);
        assert!((transform.scale - p.max_scale(&transform.rotation)).abs() < 1e-6);
    }

    #[test]
    fn test_word_fits_default_viewport() {
        let viewport = Viewport::default();
        let word = WordExtent::new(0.2, 0.3);
        assert!((word.width - word_width(0.2)).abs() < 1e-6);
        assert!(viewport.max_scale_to_fit(word.footprint(&Vector3::zeros())) > 1.0);
    }

    #[test]
    fn test_rotation_at_full_scale_shrinks_to_fit() {
        let config = AnimationConfig::default();
        let viewport = Viewport::default();
        let mut p = params(&config, &viewport, 5.0);
        p.axis = Axis::Z;
        let mut transform = TransformState::identity();
        transform.scale = p.max_scale(&Vector3::zeros());

        // Reverse stage 5 turns to +180° right after scaling up
        let mut sequence = SequenceState::new(Path::Reverse);
        sequence.stage = 5;
        while sequence.stage == 5 {
            tick(&mut transform, &mut sequence, &p);
            let half = p.footprint(&transform.rotation) * transform.scale;
            assert!(half.x <= viewport.half_width + 1e-5);
            assert!(half.y <= viewport.half_height + 1e-5);
        }
        // Upright at 90° the word is 4 tall in a viewport 6 tall
        assert!(transform.scale <= 1.5 + 1e-5);
    }

    #[test]
    fn test_parse_path_and_axis() {
        assert_eq!("2".parse::<Path>(), Ok(Path::Reverse));
        assert_eq!("manual".parse::<Path>(), Ok(Path::Manual));
        assert!("9".parse::<Path>().is_err());
        assert_eq!("Z".parse::<Axis>(), Ok(Axis::Z));
        assert_eq!(Path::from_index(Path::Reverse.index()), Some(Path::Reverse));
    }
}
