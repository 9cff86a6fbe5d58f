//! Per-frame wireframe projection and drawing
//!
//! A frame projects every vertex once, then walks the edge list with a stride
//! chosen so at most `max_draw_edges` lines are drawn. Rendering cost is
//! bounded by the mesh capacity limits and the draw budget, not by how dense
//! the mesh is.

use crate::config::RenderSettings;
use crate::projection::{Projector, ScreenPoint};
use crate::registry::Snapshot;

pub const NO_MODEL_MESSAGE: &str = "No OBJ loaded";
pub const NO_VISIBLE_EDGES_MESSAGE: &str = "Model has no visible edges";

/// Display palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Background,
    /// Edges
    Accent,
    /// Overlay text and model name
    Text,
    /// Placeholder and diagnostics
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSize {
    Small,
    Large,
}

/// Raster surface the pipeline draws on. Coordinates are in pixels with the
/// origin at the top-left; lines may extend past the edges and must be
/// clipped by the implementation.
pub trait Canvas {
    /// Width and height in pixels
    fn size(&self) -> (i32, i32);

    fn clear(&mut self);

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);

    /// Draw text with its top-left corner at `(x, y)`
    fn draw_text(&mut self, x: i32, y: i32, text: &str, size: FontSize, color: Color);
}

/// What a frame did, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub stride: usize,
    pub visible_vertices: usize,
    pub culled_vertices: usize,
}

/// Edge sampling stride keeping the number of drawn edges within budget
pub fn draw_stride(edge_count: usize, max_draw_edges: usize) -> usize {
    let max_draw_edges = max_draw_edges.max(1);
    if edge_count > max_draw_edges {
        edge_count.div_ceil(max_draw_edges)
    } else {
        1
    }
}

/// Wireframe renderer holding the per-vertex scratch buffer
#[derive(Debug, Clone)]
pub struct Pipeline {
    projector: Projector,
    max_draw_edges: usize,
    yield_every: usize,
    projected: Vec<ScreenPoint>,
}

impl Pipeline {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            projector: Projector::new(settings),
            max_draw_edges: settings.max_draw_edges,
            yield_every: settings.yield_every.max(1),
            projected: Vec::new(),
        }
    }

    /// Render one frame of `snapshot`.
    ///
    /// `yield_now` is called every `yield_every` drawn lines so a long pass
    /// can hand control back to the surrounding loop.
    pub fn render_frame(
        &mut self,
        snapshot: Snapshot<'_>,
        canvas: &mut dyn Canvas,
        yield_now: &mut dyn FnMut(),
    ) -> FrameStats {
        let (w, h) = canvas.size();
        canvas.clear();

        let Some(mesh) = snapshot.mesh else {
            canvas.draw_text(10, 20, NO_MODEL_MESSAGE, FontSize::Large, Color::Status);
            return FrameStats::default();
        };
        let display = snapshot.display;

        let rotation = display.orientation.rotation();
        self.projected.clear();
        self.projected.extend(
            mesh.vertices()
                .iter()
                .map(|v| self.projector.project(v, display.scale, &rotation, w, h)),
        );

        let mut stats = FrameStats {
            stride: draw_stride(mesh.edges().len(), self.max_draw_edges),
            ..FrameStats::default()
        };
        for p in &self.projected {
            match p {
                ScreenPoint::Culled => stats.culled_vertices += 1,
                p if p.is_visible() => stats.visible_vertices += 1,
                _ => {}
            }
        }

        for edge in mesh.edges().iter().step_by(stats.stride) {
            let p0 = self.projected[edge.a as usize];
            let p1 = self.projected[edge.b as usize];
            if !p0.is_visible() && !p1.is_visible() {
                continue;
            }
            // A culled endpoint has no position to draw to
            let (Some((x0, y0)), Some((x1, y1))) = (p0.position(), p1.position()) else {
                continue;
            };
            canvas.draw_line(x0, y0, x1, y1, Color::Accent);
            stats.drawn += 1;
            if stats.drawn % self.yield_every == 0 {
                yield_now();
            }
        }

        let text = if display.text.is_empty() {
            " "
        } else {
            display.text.as_str()
        };
        canvas.draw_text(6, 6, text, FontSize::Large, Color::Text);
        canvas.draw_text(6, h - 10, mesh.name(), FontSize::Small, Color::Text);

        if stats.drawn == 0 {
            canvas.draw_text(
                6,
                h - 22,
                NO_VISIBLE_EDGES_MESSAGE,
                FontSize::Small,
                Color::Status,
            );
        }

        log::trace!("frame: {stats:?}");
        stats
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&RenderSettings::default())
    }
}
