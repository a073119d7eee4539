/// Geometry for the extruded "TECH" word
use nalgebra::{Point3, Vector2, Vector3};

use crate::style::{Letter, Rgba, StyleParams};
use crate::transform::Transform;

/// Stroke thickness shared by every glyph
pub const THICKNESS: f32 = 0.2;
/// Glyph height; the word is vertically centered on it
pub const LETTER_HEIGHT: f32 = 1.0;
/// Width of E, C and H
pub const LETTER_WIDTH: f32 = 0.8;
/// T is wider than the others
pub const T_WIDTH: f32 = 1.0;

/// Vertices emitted per cuboid: 6 faces, 2 triangles each
pub const VERTICES_PER_CUBOID: usize = 36;

/// Strokes in glyph-local coordinates: `[x, y, width, height]`
const T_STROKES: [[f32; 4]; 2] = [
    [0.0, LETTER_HEIGHT - THICKNESS, T_WIDTH, THICKNESS],
    [0.375, 0.0, THICKNESS, LETTER_HEIGHT - THICKNESS],
];
const E_STROKES: [[f32; 4]; 4] = [
    [0.0, 0.0, THICKNESS, LETTER_HEIGHT],
    [0.0, 0.8, LETTER_WIDTH, THICKNESS],
    [0.0, 0.4, LETTER_WIDTH * 0.7, THICKNESS],
    [0.0, 0.0, LETTER_WIDTH, THICKNESS],
];
const C_STROKES: [[f32; 4]; 3] = [
    [0.0, 0.0, THICKNESS, LETTER_HEIGHT],
    [0.0, 0.8, LETTER_WIDTH, THICKNESS],
    [0.0, 0.0, LETTER_WIDTH, THICKNESS],
];
const H_STROKES: [[f32; 4]; 3] = [
    [0.0, 0.0, THICKNESS, LETTER_HEIGHT],
    [LETTER_WIDTH - THICKNESS, 0.0, THICKNESS, LETTER_HEIGHT],
    [0.0, 0.4, LETTER_WIDTH, THICKNESS],
];

/// Corner indices per face, two triangles each.
/// Order: front, right, left, top, back, bottom.
const FACES: [[usize; 6]; 6] = [
    [1, 0, 3, 1, 3, 2],
    [2, 3, 7, 2, 7, 6],
    [3, 0, 4, 3, 4, 7],
    [6, 5, 1, 6, 1, 2],
    [5, 6, 7, 5, 7, 4],
    [0, 1, 5, 0, 5, 4],
];

impl Letter {
    pub fn width(self) -> f32 {
        match self {
            Letter::T => T_WIDTH,
            _ => LETTER_WIDTH,
        }
    }

    pub fn strokes(self) -> &'static [[f32; 4]] {
        match self {
            Letter::T => &T_STROKES,
            Letter::E => &E_STROKES,
            Letter::C => &C_STROKES,
            Letter::H => &H_STROKES,
        }
    }
}

/// Size of the un-scaled word's bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordExtent {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl WordExtent {
    pub fn new(spacing: f32, depth: f32) -> Self {
        Self {
            width: word_width(spacing),
            height: LETTER_HEIGHT,
            depth,
        }
    }

    pub fn for_style(style: &StyleParams) -> Self {
        Self::new(style.letter_spacing, style.extrusion_depth)
    }

    /// Half extents on X and Y of the box after `rotation` (degrees) about the
    /// origin, measured from the origin on both sides.
    pub fn footprint(&self, rotation: &Vector3<f32>) -> Vector2<f32> {
        let r = Transform::rotation_matrix(rotation);
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let mut half: Vector2<f32> = Vector2::zeros();
        for x in [-hw, hw] {
            for y in [-hh, hh] {
                for z in [0.0, self.depth] {
                    let p = r.transform_point(&Point3::new(x, y, z));
                    half.x = half.x.max(p.x.abs());
                    half.y = half.y.max(p.y.abs());
                }
            }
        }
        half
    }
}

/// Total word width: the four glyph widths plus three gaps
pub fn word_width(spacing: f32) -> f32 {
    Letter::ALL.iter().map(|l| l.width()).sum::<f32>() + 3.0 * spacing
}

/// A vertex with position and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub color: Rgba,
}

impl Vertex {
    pub fn new(position: Point3<f32>, color: Rgba) -> Self {
        Self { position, color }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }
}

/// An axis-aligned box forming one stroke of a glyph
#[derive(Debug, Clone, Copy)]
pub struct Cuboid {
    pub origin: Point3<f32>,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub base_color: Rgba,
}

impl Cuboid {
    fn corners(&self) -> [Point3<f32>; 8] {
        let (x, y, z) = (self.origin.x, self.origin.y, self.origin.z);
        let (w, h, d) = (self.width, self.height, self.depth);
        [
            Point3::new(x, y, z),
            Point3::new(x + w, y, z),
            Point3::new(x + w, y + h, z),
            Point3::new(x, y + h, z),
            Point3::new(x, y, z + d),
            Point3::new(x + w, y, z + d),
            Point3::new(x + w, y + h, z + d),
            Point3::new(x, y + h, z + d),
        ]
    }

    /// Emit the 12 triangles of this box into `mesh`
    pub fn append_to(&self, mesh: &mut Mesh) {
        let corners = self.corners();
        let colors = face_colors(self.base_color);

        for (face, color) in FACES.iter().zip(colors) {
            for tri in face.chunks_exact(3) {
                mesh.add_triangle(Triangle::new(
                    Vertex::new(corners[tri[0]], color),
                    Vertex::new(corners[tri[1]], color),
                    Vertex::new(corners[tri[2]], color),
                ));
            }
        }
    }
}

/// Expand a base color into six distinguishable face colors
pub fn face_colors(base: Rgba) -> [Rgba; 6] {
    let (r, g, b) = (base.r(), base.g(), base.b());
    [
        Rgba::new(r * 0.7, g * 0.7, (b * 1.4 + 0.3).min(1.0), 1.0),
        Rgba::new((r * 1.2 + 0.2).min(1.0), g * 0.9, (b * 0.8).min(1.0), 1.0),
        Rgba::new(r * 0.8, (g * 1.3).min(1.0), (b * 0.9 + 0.1).min(1.0), 1.0),
        Rgba::new((r * 0.9 + 0.3).min(1.0), (g * 1.1 + 0.2).min(1.0), b * 0.85, 1.0),
        Rgba::new(r, g, b, 1.0),
        Rgba::new(r * 0.6, (g * 0.8 + 0.2).min(1.0), b * 0.6, 1.0),
    ]
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    /// Homogeneous positions, four floats per vertex, ready for upload
    pub fn positions(&self) -> Vec<f32> {
        self.vertices()
            .flat_map(|v| [v.position.x, v.position.y, v.position.z, 1.0])
            .collect()
    }

    /// RGBA colors, four floats per vertex
    pub fn colors(&self) -> Vec<f32> {
        self.vertices().flat_map(|v| v.color.0).collect()
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut vertices = self.vertices();
        let first = vertices.next()?.position;
        Some(vertices.fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        }))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the word's triangle list for the given style.
///
/// Glyphs are laid out left to right from a cursor that starts at half the
/// word width left of the origin, so the word is centered on X and Y. The
/// extrusion runs from `z = 0` to `z = extrusion_depth`.
pub fn build(style: &StyleParams) -> Mesh {
    let stroke_count: usize = Letter::ALL.iter().map(|l| l.strokes().len()).sum();
    let mut mesh = Mesh::with_capacity(stroke_count * VERTICES_PER_CUBOID / 3);

    let mut x = -word_width(style.letter_spacing) / 2.0;
    let y = -LETTER_HEIGHT / 2.0;

    for letter in Letter::ALL {
        let color = style.color(letter);
        for &[dx, dy, width, height] in letter.strokes() {
            Cuboid {
                origin: Point3::new(x + dx, y + dy, 0.0),
                width,
                height,
                depth: style.extrusion_depth,
                base_color: color,
            }
            .append_to(&mut mesh);
        }
        x += letter.width() + style.letter_spacing;
    }

    log::debug!(
        "built word mesh: {} triangles (spacing {:.2}, depth {:.2})",
        mesh.triangles.len(),
        style.letter_spacing,
        style.extrusion_depth
    );

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_width() {
        for spacing in [0.0, 0.2, 1.0] {
            let expected = 1.0 + 3.0 * spacing + 3.0 * 0.8;
            assert!((word_width(spacing) - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let style = StyleParams::default();
        assert_eq!(build(&style), build(&style));
        assert_eq!(build(&style).positions(), build(&style).positions());
    }

    #[test]
    fn test_vertex_count_per_cuboid() {
        let mut style = StyleParams::default();
        for (spacing, depth) in [(0.0, 0.1), (0.2, 0.3), (1.0, 1.0)] {
            style.letter_spacing = spacing;
            style.extrusion_depth = depth;
            let mesh = build(&style);
            // T: 2, E: 4, C: 3, H: 3
            assert_eq!(mesh.vertex_count(), 12 * VERTICES_PER_CUBOID);
            assert_eq!(mesh.positions().len(), mesh.vertex_count() * 4);
            assert_eq!(mesh.colors().len(), mesh.vertex_count() * 4);
        }
    }

    #[test]
    fn test_word_is_centered() {
        let style = StyleParams {
            letter_spacing: 0.2,
            extrusion_depth: 0.3,
            ..StyleParams::default()
        };
        let mesh = build(&style);
        assert!(!mesh.is_empty());

        let (min, max) = mesh.bounds().unwrap();
        assert!((min.x + max.x).abs() < 1e-5);
        assert!((min.y + max.y).abs() < 1e-5);
        assert!((max.x - min.x - word_width(0.2)).abs() < 1e-5);
        assert!(min.z.abs() < 1e-6);
        assert!((max.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_letter_colors_follow_style() {
        let mut style = StyleParams::default();
        let h_color = Rgba::new(0.1, 0.2, 0.3, 1.0);
        style.set_color(Letter::H, h_color);
        let mesh = build(&style);

        // H strokes are emitted last; their back faces carry the base color
        let last_cuboid = &mesh.triangles[mesh.triangles.len() - 12..];
        assert!(last_cuboid
            .iter()
            .any(|t| t.vertices.iter().all(|v| v.color == h_color)));
    }

    #[test]
    fn test_face_colors_are_distinct() {
        let bases = [
            Rgba::new(0.0, 0.0, 0.0, 1.0),
            Rgba::new(1.0, 1.0, 1.0, 1.0),
            Rgba::from_rgb8(193, 58, 242),
            Rgba::new(1.0, 0.5, 0.0, 1.0),
        ];
        for base in bases {
            let faces = face_colors(base);
            for i in 0..faces.len() {
                for j in i + 1..faces.len() {
                    assert_ne!(faces[i], faces[j], "base {:?} faces {} and {}", base, i, j);
                }
            }
        }
    }

    #[test]
    fn test_footprint_follows_rotation() {
        let word = WordExtent::new(0.2, 0.3);
        let flat = word.footprint(&Vector3::zeros());
        assert!((flat.x - 2.0).abs() < 1e-6);
        assert!((flat.y - 0.5).abs() < 1e-6);

        // Standing on end: the long side now runs along Y
        let upright = word.footprint(&Vector3::new(0.0, 0.0, 90.0));
        assert!((upright.x - 0.5).abs() < 1e-5);
        assert!((upright.y - 2.0).abs() < 1e-5);

        // Turned edge-on about Y, the extrusion depth sets the X extent
        let edge_on = word.footprint(&Vector3::new(0.0, 90.0, 0.0));
        assert!((edge_on.x - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_footprint_bounds_every_rotated_vertex() {
        let style = StyleParams::default();
        let mesh = build(&style);
        let word = WordExtent::for_style(&style);
        for rotation in [
            Vector3::new(30.0, 0.0, 0.0),
            Vector3::new(0.0, -75.0, 0.0),
            Vector3::new(0.0, 0.0, 135.0),
            Vector3::new(20.0, 40.0, 60.0),
        ] {
            let half = word.footprint(&rotation);
            let r = Transform::rotation_matrix(&rotation);
            for v in mesh.vertices() {
                let p = r.transform_point(&v.position);
                assert!(p.x.abs() <= half.x + 1e-5, "{:?} at {:?}", p, rotation);
                assert!(p.y.abs() <= half.y + 1e-5, "{:?} at {:?}", p, rotation);
            }
        }
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
    }
}
