/// Per-frame scene state: style, transform, animation sequence and cached mesh
use nalgebra::{Matrix4, Vector2, Vector3};

use crate::animation::{self, Axis, DriverParams, Path, SequenceState};
use crate::config::SceneConfig;
use crate::geometry::{self, Mesh, WordExtent};
use crate::input::InputEvent;
use crate::projection::{Camera, Viewport};
use crate::style::{ColorMode, Rgba, StyleParams};
use crate::transform::{Transform, TransformState};

/// Everything the render boundary needs to draw one frame
#[derive(Debug)]
pub struct Frame<'a> {
    pub mesh: &'a Mesh,
    /// True when `mesh` was rebuilt for this frame and must be re-uploaded
    pub rebuilt: bool,
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub clear_color: Rgba,
}

impl Frame<'_> {
    pub fn mvp(&self) -> Matrix4<f32> {
        Transform::mvp_matrix(&self.model, &self.view, &self.projection)
    }
}

pub struct Scene {
    config: SceneConfig,
    style: StyleParams,
    transform: TransformState,
    sequence: SequenceState,
    axis: Axis,
    speed: f32,
    animating: bool,
    mesh: Mesh,
    mesh_dirty: bool,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        let style = StyleParams {
            extrusion_depth: config.depth.default,
            letter_spacing: config.spacing.default,
            ..StyleParams::default()
        };
        let speed = config.speed.default;

        Self {
            mesh: geometry::build(&style),
            mesh_dirty: false,
            config,
            style,
            transform: TransformState::identity(),
            sequence: SequenceState::default(),
            axis: Axis::default(),
            speed,
            animating: false,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn style(&self) -> &StyleParams {
        &self.style
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    pub fn sequence(&self) -> &SequenceState {
        &self.sequence
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Mesh as of the last `frame()`; pending style edits show up on the next one
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.config.viewport, self.config.projection)
    }

    /// Word box at the current spacing and depth
    pub fn word(&self) -> WordExtent {
        WordExtent::for_style(&self.style)
    }

    /// Furthest the word's center may currently sit from the origin
    pub fn translation_bounds(&self) -> Vector2<f32> {
        let footprint = self.word().footprint(&self.transform.rotation);
        self.config
            .viewport
            .translation_bounds(footprint, self.transform.scale)
    }

    /// Replace the viewport, e.g. after the canvas or terminal was resized
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
        self.clamp_transform();
    }

    /// Run one frame: tick, clamp, rebuild if needed, compose matrices
    pub fn frame(&mut self) -> Frame<'_> {
        if self.animating {
            let params = driver_params(&self.config, &self.style, self.speed, self.axis);
            animation::tick(&mut self.transform, &mut self.sequence, &params);
        }
        self.clamp_transform();

        let rebuilt = self.mesh_dirty;
        if rebuilt {
            self.mesh = geometry::build(&self.style);
            self.mesh_dirty = false;
        }

        let camera = self.camera();
        Frame {
            mesh: &self.mesh,
            rebuilt,
            model: Transform::model_matrix(&self.transform),
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            clear_color: self.style.background,
        }
    }

    /// Apply one control event
    pub fn handle_input(&mut self, event: InputEvent) {
        if self.animating && event.is_locked_while_animating() {
            log::debug!("ignoring {:?} while animating", event);
            return;
        }
        if !event.has_finite_values() {
            log::warn!("ignoring {:?}: value is not a finite number", event);
            return;
        }

        match event {
            InputEvent::SetDepth(depth) => {
                self.style.extrusion_depth = self.config.depth.clamp(depth);
                self.mesh_dirty = true;
                self.clamp_transform();
            }
            InputEvent::SetSpacing(spacing) => {
                self.style.letter_spacing = self.config.spacing.clamp(spacing);
                self.mesh_dirty = true;
                self.clamp_transform();
            }
            InputEvent::SetSpeed(speed) => self.speed = self.config.speed.clamp(speed),
            InputEvent::SetLetterColor(letter, color) => {
                self.style.set_color(letter, color);
                self.mesh_dirty = true;
            }
            InputEvent::SetBackground(color) => self.style.background = color,
            InputEvent::SetColorMode(mode) => {
                log::info!("color mode: {} -> {}", self.style.color_mode, mode);
                self.style.set_color_mode(mode);
                self.mesh_dirty = true;
            }
            InputEvent::SetSingleColor(color) => {
                self.style.set_single_color(color);
                if self.style.color_mode == ColorMode::Single {
                    self.mesh_dirty = true;
                }
            }
            InputEvent::SelectPath(path) => self.select_path(path),
            InputEvent::SelectAxis(axis) => {
                self.axis = axis;
                self.transform.rotation = Vector3::zeros();
            }
            InputEvent::ToggleAnimation => {
                self.animating = !self.animating;
                log::info!(
                    "animation {} on {} path",
                    if self.animating { "started" } else { "stopped" },
                    self.sequence.path
                );
            }
            InputEvent::Reset => self.reset(),
            InputEvent::Nudge(nudge) => {
                if self.sequence.path != Path::Manual {
                    log::warn!("{:?} ignored: only the manual path accepts nudges", nudge);
                    return;
                }
                let params = driver_params(&self.config, &self.style, self.speed, self.axis);
                animation::apply_nudge(&mut self.transform, nudge, &params);
            }
        }
    }

    /// Switch path, returning transform and stage counter to their defaults
    pub fn select_path(&mut self, path: Path) {
        log::info!("animation path: {} -> {}", self.sequence.path, path);
        self.sequence = SequenceState::new(path);
        self.transform.reset();
    }

    /// Restore style, transform, sequence and speed defaults and stop animating
    pub fn reset(&mut self) {
        self.style = StyleParams {
            extrusion_depth: self.config.depth.default,
            letter_spacing: self.config.spacing.default,
            ..StyleParams::default()
        };
        self.transform.reset();
        self.sequence = SequenceState::default();
        self.axis = Axis::default();
        self.speed = self.config.speed.default;
        self.animating = false;
        self.mesh_dirty = true;
        log::info!("scene reset to defaults");
    }

    fn clamp_transform(&mut self) {
        let params = driver_params(&self.config, &self.style, self.speed, self.axis);
        animation::clamp(&mut self.transform, &params);
    }
}

fn driver_params<'a>(
    config: &'a SceneConfig,
    style: &StyleParams,
    speed: f32,
    axis: Axis,
) -> DriverParams<'a> {
    DriverParams {
        config: &config.animation,
        viewport: &config.viewport,
        word: WordExtent::for_style(style),
        speed,
        axis,
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}
