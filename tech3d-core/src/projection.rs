/// Viewport bounds, camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Orthographic,
    Perspective,
}

/// Half extents of the visible box around the origin.
///
/// This one value drives both the projection and the clamp/bounce bounds of
/// the animation, so the word never leaves what the camera sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub half_width: f32,
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
}

impl Viewport {
    pub const HALF_HEIGHT: f32 = 3.0;

    /// Box of half-height 3 widened by the canvas aspect ratio
    pub fn for_aspect(aspect: f32) -> Self {
        Self {
            half_width: Self::HALF_HEIGHT * aspect,
            half_height: Self::HALF_HEIGHT,
            near: -10.0,
            far: 10.0,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.half_width / self.half_height
    }

    /// Largest uniform scale at which a footprint (half extents, see
    /// [`crate::geometry::WordExtent::footprint`]) still fits inside the box
    pub fn max_scale_to_fit(&self, footprint: Vector2<f32>) -> f32 {
        let fit_x = self.half_width / footprint.x;
        let fit_y = self.half_height / footprint.y;
        fit_x.min(fit_y)
    }

    /// Furthest the word's center may travel from the origin on X and Y at `scale`
    pub fn translation_bounds(&self, footprint: Vector2<f32>, scale: f32) -> Vector2<f32> {
        Vector2::new(
            (self.half_width - scale * footprint.x).max(0.0),
            (self.half_height - scale * footprint.y).max(0.0),
        )
    }

    /// Clamp a translation so the scaled footprint stays inside the box
    pub fn clamp_translation(
        &self,
        translation: &mut Vector3<f32>,
        footprint: Vector2<f32>,
        scale: f32,
    ) {
        let bounds = self.translation_bounds(footprint, scale);
        translation.x = translation.x.clamp(-bounds.x, bounds.x);
        translation.y = translation.y.clamp(-bounds.y, bounds.y);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::for_aspect(4.0 / 3.0)
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub viewport: Viewport,
    pub fovy: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(viewport: Viewport, mode: ProjectionMode) -> Self {
        Self {
            viewport,
            fovy: std::f32::consts::PI / 4.0, // 45 degrees
            mode,
        }
    }

    /// Distance at which the perspective frustum spans the viewport at `z = 0`
    pub fn eye_distance(&self) -> f32 {
        self.viewport.half_height / (self.fovy / 2.0).tan()
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Orthographic => Matrix4::identity(),
            ProjectionMode::Perspective => Matrix4::look_at_rh(
                &Point3::new(0.0, 0.0, self.eye_distance()),
                &Point3::origin(),
                &Vector3::y(),
            ),
        }
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let vp = &self.viewport;
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(vp.aspect(), self.fovy, 0.1, 100.0)
            }
            ProjectionMode::Orthographic => Matrix4::new_orthographic(
                -vp.half_width,
                vp.half_width,
                -vp.half_height,
                vp.half_height,
                vp.near,
                vp.far,
            ),
        }
    }

    /// Combined view-projection for a given model matrix
    pub fn mvp(&self, model: &Matrix4<f32>) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix() * model
    }

    /// Project a 3D point to 2D screen space with a precomputed MVP.
    ///
    /// Returns `(x, y, depth)` with depth in NDC (smaller is nearer), or `None`
    /// when the point falls outside the clip volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        mvp: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let ndc = mvp.transform_point(point);

        if !ndc.coords.iter().all(|c| c.is_finite()) {
            return None;
        }

        // Clip test
        if ndc.x < -1.0 || ndc.x > 1.0 || ndc.y < -1.0 || ndc.y > 1.0 || ndc.z < -1.0 || ndc.z > 1.0
        {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Viewport::default(), ProjectionMode::Orthographic)
    }
}
