/// Truecolor ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector2};
use std::io::Write;
use tech3d_core::{Camera, Mesh, Rgba, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Rgba,
}

/// ASCII renderer that converts the word mesh to colored terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Option<Cell>>,
    clear_color: Rgba,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![None; size],
            clear_color: Rgba::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Rgba) {
        self.clear_color = color;
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(None);
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, mvp: &Matrix4<f32>, camera: &Camera) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, mvp, camera);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, mvp: &Matrix4<f32>, camera: &Camera) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                mvp,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Faces are flat colored, so the first vertex speaks for the triangle
        let color = triangle.vertices[0].color;
        let brightness = color.luminance().clamp(0.0, 1.0);
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let glyph = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

        self.rasterize_triangle(&screen_coords, Cell { glyph, color });
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let corners = coords.map(|(x, y, _)| Vector2::new(x, y));
        let depths = coords.map(|(_, _, z)| z);

        // Screen-clipped bounding box
        let lo = corners[0].inf(&corners[1]).inf(&corners[2]);
        let hi = corners[0].sup(&corners[1]).sup(&corners[2]);
        let (min_x, max_x) = (lo.x.floor().max(0.0) as usize, hi.x.ceil() as i64);
        let (min_y, max_y) = (lo.y.floor().max(0.0) as usize, hi.y.ceil() as i64);
        let max_x = max_x.min(self.width as i64 - 1);
        let max_y = max_y.min(self.height as i64 - 1);
        if max_x < 0 || max_y < 0 {
            return;
        }

        for y in min_y..=max_y as usize {
            for x in min_x..=max_x as usize {
                let center = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(weights) = coverage(&corners, center) else {
                    continue;
                };

                let depth = weights[0] * depths[0] + weights[1] * depths[1] + weights[2] * depths[2];
                let idx = y * self.width + x;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = Some(cell);
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_terminal_color(self.clear_color)))?;
        for y in 0..self.height {
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(cell) => {
                        writer.queue(SetForegroundColor(to_terminal_color(cell.color)))?;
                        writer.queue(Print(cell.glyph))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn covered_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

fn to_terminal_color(color: Rgba) -> Color {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.r()),
        g: channel(color.g()),
        b: channel(color.b()),
    }
}

/// Twice the signed area of `(a, b, p)`; positive when `p` is left of `a -> b`
fn edge(a: Vector2<f32>, b: Vector2<f32>, p: Vector2<f32>) -> f32 {
    (b - a).perp(&(p - a))
}

/// Interpolation weights of `p` inside the triangle, or `None` when `p` lies
/// outside it or the triangle has no area. Either winding is accepted.
fn coverage(corners: &[Vector2<f32>; 3], p: Vector2<f32>) -> Option<[f32; 3]> {
    let [a, b, c] = *corners;
    let area = edge(a, b, c);
    if area.abs() < 1e-6 {
        return None;
    }

    let weights = [edge(b, c, p) / area, edge(c, a, p) / area, edge(a, b, p) / area];
    weights.iter().all(|w| *w >= 0.0).then_some(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tech3d_core::Scene;

    #[test]
    fn test_word_covers_center_of_screen() {
        let mut scene = Scene::default();
        let camera = scene.camera();
        let frame = scene.frame();

        let mut renderer = AsciiRenderer::new(80, 30);
        renderer.clear(frame.clear_color);
        renderer.render_mesh(frame.mesh, &frame.mvp(), &camera);

        assert!(renderer.covered_cells() > 0);
        // Empty space around the word stays clear
        assert!(renderer.cells[0].is_none());
    }

    #[test]
    fn test_clear_resets_buffers() {
        let mut scene = Scene::default();
        let camera = scene.camera();
        let frame = scene.frame();

        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render_mesh(frame.mesh, &frame.mvp(), &camera);
        renderer.clear(frame.clear_color);
        assert_eq!(renderer.covered_cells(), 0);
        assert!(renderer.depth_buffer.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_draw_writes_every_row() {
        let renderer = AsciiRenderer::new(4, 3);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 2);
    }

    #[test]
    fn test_coverage_weights() {
        let ccw = [Vector2::new(0.0, 0.0), Vector2::new(4.0, 0.0), Vector2::new(0.0, 4.0)];
        let weights = coverage(&ccw, Vector2::new(1.0, 1.0)).unwrap();
        assert!((weights.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!((weights[0] - 0.5).abs() < 1e-6);

        let cw = [ccw[0], ccw[2], ccw[1]];
        assert!(coverage(&cw, Vector2::new(1.0, 1.0)).is_some());
        assert!(coverage(&ccw, Vector2::new(3.0, 3.0)).is_none());

        let flat = [Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0), Vector2::new(2.0, 2.0)];
        assert!(coverage(&flat, Vector2::new(0.5, 0.5)).is_none());
    }
}
