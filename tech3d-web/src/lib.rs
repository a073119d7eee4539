/// TECH3D Web - WASM bindings for driving the scene from a browser page
///
/// The page owns shader setup and buffer upload. This module owns the scene
/// state: it advances the animation once per `frame()`, clears the WebGL2
/// canvas with the background color and hands back flat vertex buffers and
/// column-major matrices ready for `bufferData` / `uniformMatrix4fv`.
use std::fmt::Display;

use tech3d_core::{
    Axis, ColorMode, InputEvent, Letter, Nudge, Path, Rgba, Scene, SceneConfig, Transform,
    Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

#[wasm_bindgen]
pub struct WebRenderer {
    scene: Scene,
    context: Option<WebGl2RenderingContext>,
    model: Vec<f32>,
    view: Vec<f32>,
    projection: Vec<f32>,
    geometry_version: u32,
}

fn js_error(message: impl Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

impl WebRenderer {
    fn with_config(config: SceneConfig) -> Self {
        let mut renderer = Self {
            scene: Scene::new(config),
            context: None,
            model: Vec::new(),
            view: Vec::new(),
            projection: Vec::new(),
            geometry_version: 0,
        };
        renderer.cache_matrices();
        renderer
    }

    /// Matrices for the current state without advancing the animation
    fn cache_matrices(&mut self) {
        let camera = self.scene.camera();
        self.model = Transform::model_matrix(self.scene.transform())
            .as_slice()
            .to_vec();
        self.view = camera.view_matrix().as_slice().to_vec();
        self.projection = camera.projection_matrix().as_slice().to_vec();
    }

    /// Advance the scene one display refresh and clear the canvas
    fn render_frame(&mut self) {
        let frame = self.scene.frame();
        if frame.rebuilt {
            self.geometry_version = self.geometry_version.wrapping_add(1);
        }
        self.model = frame.model.as_slice().to_vec();
        self.view = frame.view.as_slice().to_vec();
        self.projection = frame.projection.as_slice().to_vec();
        let clear = frame.clear_color;

        if let Some(gl) = &self.context {
            gl.clear_color(clear.r(), clear.g(), clear.b(), clear.a());
            gl.clear(
                WebGl2RenderingContext::COLOR_BUFFER_BIT | WebGl2RenderingContext::DEPTH_BUFFER_BIT,
            );
        }
    }

    fn parse_color(hex: &str) -> Option<Rgba> {
        match Rgba::from_hex(hex) {
            Ok(color) => Some(color),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new(aspect: f32) -> WebRenderer {
        Self::with_config(SceneConfig::for_aspect(aspect))
    }

    /// Acquire the WebGL2 context of a canvas and size the viewport to it.
    ///
    /// A missing context is fatal; the error is logged once and returned.
    pub fn init(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| js_error("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| js_error(format!("missing #{}", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error(format!("#{} is not a canvas", canvas_id)))?;

        let gl = match canvas.get_context("webgl2") {
            Ok(Some(context)) => context
                .dyn_into::<WebGl2RenderingContext>()
                .map_err(|_| js_error("webgl2 context has an unexpected type"))?,
            _ => {
                log::error!("WebGL2 isn't available");
                return Err(js_error("WebGL2 isn't available"));
            }
        };

        let (width, height) = (canvas.width(), canvas.height());
        gl.viewport(0, 0, width as i32, height as i32);
        gl.enable(WebGl2RenderingContext::DEPTH_TEST);
        self.scene
            .set_viewport(Viewport::for_aspect(width as f32 / height.max(1) as f32));
        self.context = Some(gl);

        log::info!("WebGL2 context ready on #{} ({}x{})", canvas_id, width, height);
        self.cache_matrices();
        Ok(())
    }

    /// Run one display refresh
    pub fn frame(&mut self) {
        self.render_frame();
    }

    /// Bumped whenever the vertex buffers change and must be re-uploaded
    #[wasm_bindgen(getter, js_name = "geometryVersion")]
    pub fn geometry_version(&self) -> u32 {
        self.geometry_version
    }

    /// Homogeneous positions, 4 floats per vertex
    pub fn positions(&self) -> Vec<f32> {
        self.scene.mesh().positions()
    }

    /// RGBA colors, 4 floats per vertex
    pub fn colors(&self) -> Vec<f32> {
        self.scene.mesh().colors()
    }

    #[wasm_bindgen(js_name = "vertexCount")]
    pub fn vertex_count(&self) -> u32 {
        self.scene.mesh().vertex_count() as u32
    }

    #[wasm_bindgen(js_name = "modelMatrix")]
    pub fn model_matrix(&self) -> Vec<f32> {
        self.model.clone()
    }

    #[wasm_bindgen(js_name = "viewMatrix")]
    pub fn view_matrix(&self) -> Vec<f32> {
        self.view.clone()
    }

    #[wasm_bindgen(js_name = "projectionMatrix")]
    pub fn projection_matrix(&self) -> Vec<f32> {
        self.projection.clone()
    }

    #[wasm_bindgen(js_name = "setDepth")]
    pub fn set_depth(&mut self, depth: f32) {
        self.scene.handle_input(InputEvent::SetDepth(depth));
    }

    #[wasm_bindgen(js_name = "setSpacing")]
    pub fn set_spacing(&mut self, spacing: f32) {
        self.scene.handle_input(InputEvent::SetSpacing(spacing));
    }

    #[wasm_bindgen(js_name = "setSpeed")]
    pub fn set_speed(&mut self, speed: f32) {
        self.scene.handle_input(InputEvent::SetSpeed(speed));
    }

    /// Set one letter's color from a `#rrggbb` picker value
    #[wasm_bindgen(js_name = "setLetterColor")]
    pub fn set_letter_color(&mut self, letter: &str, hex: &str) -> Result<(), JsValue> {
        let letter: Letter = letter.parse().map_err(js_error)?;
        if let Some(color) = Self::parse_color(hex) {
            self.scene.handle_input(InputEvent::SetLetterColor(letter, color));
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = "setBackground")]
    pub fn set_background(&mut self, hex: &str) {
        if let Some(color) = Self::parse_color(hex) {
            self.scene.handle_input(InputEvent::SetBackground(color));
        }
    }

    #[wasm_bindgen(js_name = "setSingleColor")]
    pub fn set_single_color(&mut self, hex: &str) {
        if let Some(color) = Self::parse_color(hex) {
            self.scene.handle_input(InputEvent::SetSingleColor(color));
        }
    }

    /// `per-letter`, `single` or `rainbow`
    #[wasm_bindgen(js_name = "setColorMode")]
    pub fn set_color_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode: ColorMode = mode.parse().map_err(js_error)?;
        self.scene.handle_input(InputEvent::SetColorMode(mode));
        Ok(())
    }

    /// Current color of one letter as `#rrggbb`, for syncing pickers
    #[wasm_bindgen(js_name = "letterColor")]
    pub fn letter_color(&self, letter: &str) -> Result<String, JsValue> {
        let letter: Letter = letter.parse().map_err(js_error)?;
        Ok(self.scene.style().color(letter).to_hex())
    }

    /// Path selector value: 1 forward, 2 reverse, 3 manual
    #[wasm_bindgen(js_name = "selectPath")]
    pub fn select_path(&mut self, index: u32) -> Result<(), JsValue> {
        let path = Path::from_index(index)
            .ok_or_else(|| js_error(format!("unknown animation path {}", index)))?;
        self.scene.handle_input(InputEvent::SelectPath(path));
        Ok(())
    }

    #[wasm_bindgen(js_name = "selectAxis")]
    pub fn select_axis(&mut self, axis: &str) -> Result<(), JsValue> {
        let axis: Axis = axis.parse().map_err(js_error)?;
        self.scene.handle_input(InputEvent::SelectAxis(axis));
        Ok(())
    }

    /// Start or stop the animation; returns whether it is now running
    #[wasm_bindgen(js_name = "toggleAnimation")]
    pub fn toggle_animation(&mut self) -> bool {
        self.scene.handle_input(InputEvent::ToggleAnimation);
        self.scene.is_animating()
    }

    pub fn reset(&mut self) {
        self.scene.handle_input(InputEvent::Reset);
    }

    /// Manual path: rotate about `axis` by `degrees`
    #[wasm_bindgen(js_name = "nudgeRotation")]
    pub fn nudge_rotation(&mut self, axis: &str, degrees: f32) -> Result<(), JsValue> {
        let axis: Axis = axis.parse().map_err(js_error)?;
        self.scene
            .handle_input(InputEvent::Nudge(Nudge::Rotate { axis, degrees }));
        Ok(())
    }

    #[wasm_bindgen(js_name = "nudgeTranslation")]
    pub fn nudge_translation(&mut self, dx: f32, dy: f32) {
        self.scene
            .handle_input(InputEvent::Nudge(Nudge::Translate { dx, dy }));
    }

    /// Manual path: absolute offset from the translation sliders
    #[wasm_bindgen(js_name = "setTranslation")]
    pub fn set_translation(&mut self, x: f32, y: f32) {
        self.scene
            .handle_input(InputEvent::Nudge(Nudge::SetTranslation { x, y }));
    }

    #[wasm_bindgen(js_name = "nudgeScale")]
    pub fn nudge_scale(&mut self, delta: f32) {
        self.scene.handle_input(InputEvent::Nudge(Nudge::Scale(delta)));
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    Ok(())
}
