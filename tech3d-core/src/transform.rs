/// Model transform state and matrix composition
use nalgebra::{Matrix4, Vector2, Vector3};

/// Rotation (degrees), uniform scale, translation and bounce velocity of the word
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub rotation: Vector3<f32>,
    pub scale: f32,
    pub translation: Vector3<f32>,
    pub velocity: Vector2<f32>,
}

impl TransformState {
    pub fn identity() -> Self {
        Self {
            rotation: Vector3::zeros(),
            scale: 1.0,
            translation: Vector3::zeros(),
            velocity: Vector2::zeros(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::identity();
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation matrix for angles in degrees, applied as `Rx * Ry * Rz`
    pub fn rotation_matrix(degrees: &Vector3<f32>) -> Matrix4<f32> {
        let radians = degrees.map(f32::to_radians);
        let rx = Matrix4::new_rotation(Vector3::new(radians.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, radians.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, radians.z));

        rx * ry * rz
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(s: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(s)
    }

    /// `translate · scale · rotateX · rotateY · rotateZ`
    pub fn model_matrix(state: &TransformState) -> Matrix4<f32> {
        let t = state.translation;
        Self::translation_matrix(t.x, t.y, t.z)
            * Self::scale_matrix(state.scale)
            * Self::rotation_matrix(&state.rotation)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_reset() {
        let mut state = TransformState::identity();
        state.rotation = Vector3::new(10.0, 20.0, 30.0);
        state.scale = 1.7;
        state.velocity = Vector2::new(0.1, 0.1);

        state.reset();
        assert_eq!(state, TransformState::identity());
    }

    #[test]
    fn test_identity_model() {
        let model = Transform::model_matrix(&TransformState::identity());
        assert!((model - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_uses_degrees() {
        let m = Transform::rotation_matrix(&Vector3::new(0.0, 90.0, 0.0));
        // +90° about Y carries +X onto -Z
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_model_composition_order() {
        let state = TransformState {
            rotation: Vector3::new(0.0, 0.0, 90.0),
            scale: 2.0,
            translation: Vector3::new(1.0, 0.0, 0.0),
            velocity: Vector2::zeros(),
        };
        let model = Transform::model_matrix(&state);
        // rotate (1,0,0) -> (0,1,0), scale -> (0,2,0), translate -> (1,2,0)
        let p = model.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(1.0, 2.0, 0.0)).norm() < 1e-5);
    }
}
