/// TECH3D Core Library - Shared geometry, animation and scene logic
///
/// This library builds the extruded "TECH" word, drives its scripted
/// animation and composes the matrices handed to a renderer. It has no
/// knowledge of any windowing or GPU API.

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod projection;
pub mod scene;
pub mod style;
pub mod transform;

// Re-export commonly used types
pub use animation::{Axis, Nudge, Path, SequenceState, Stage};
pub use config::{SceneConfig, SliderRange};
pub use error::ParseError;
pub use geometry::{Mesh, Triangle, Vertex, WordExtent};
pub use input::InputEvent;
pub use projection::{Camera, ProjectionMode, Viewport};
pub use scene::{Frame, Scene};
pub use style::{ColorMode, Letter, Rgba, StyleParams};
pub use transform::{Transform, TransformState};
