//! ASCII raster canvas for terminal rendering

use crossterm::{
    cursor,
    style::{Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wf3d_core::{Canvas, Color, FontSize};

/// Virtual pixels per terminal cell. Cells are about twice as tall as they
/// are wide, so this keeps the projection's aspect ratio roughly square.
pub const CELL_WIDTH: i32 = 4;
pub const CELL_HEIGHT: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    color: Color,
    bold: bool,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Background,
    bold: false,
};

/// Character-cell canvas that the wireframe pipeline draws into
pub struct AsciiRenderer {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![BLANK; cols * rows],
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![BLANK; cols * rows];
    }

    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col].ch)
    }

    /// Characters of one row, including trailing blanks
    pub fn row_text(&self, row: usize) -> Option<String> {
        let cells = self.cells.get(row * self.cols..(row + 1) * self.cols)?;
        Some(cells.iter().map(|c| c.ch).collect())
    }

    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return;
        }
        self.cells[row as usize * self.cols + col as usize] = cell;
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Color, bool)> = None;
        for row in 0..self.rows {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for cell in &self.cells[row * self.cols..(row + 1) * self.cols] {
                if current != Some((cell.color, cell.bold)) {
                    writer.queue(SetAttribute(Attribute::Reset))?;
                    writer.queue(SetForegroundColor(term_color(cell.color)))?;
                    if cell.bold {
                        writer.queue(SetAttribute(Attribute::Bold))?;
                    }
                    current = Some((cell.color, cell.bold));
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(SetAttribute(Attribute::Reset))?;
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Canvas for AsciiRenderer {
    fn size(&self) -> (i32, i32) {
        (
            self.cols as i32 * CELL_WIDTH,
            self.rows as i32 * CELL_HEIGHT,
        )
    }

    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = clip_line(
            x0 as f32,
            y0 as f32,
            x1 as f32,
            y1 as f32,
            (w - 1) as f32,
            (h - 1) as f32,
        ) else {
            return;
        };

        let (c0, r0) = (x0 as i32 / CELL_WIDTH, y0 as i32 / CELL_HEIGHT);
        let (c1, r1) = (x1 as i32 / CELL_WIDTH, y1 as i32 / CELL_HEIGHT);
        let cell = Cell {
            ch: line_glyph(c1 - c0, r1 - r0),
            color,
            bold: false,
        };

        // Bresenham over cells
        let dx = (c1 - c0).abs();
        let dy = -(r1 - r0).abs();
        let sx = if c0 < c1 { 1 } else { -1 };
        let sy = if r0 < r1 { 1 } else { -1 };
        let (mut col, mut row) = (c0, r0);
        let mut err = dx + dy;
        loop {
            self.put(col, row, cell);
            if col == c1 && row == r1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                col += sx;
            }
            if e2 <= dx {
                err += dx;
                row += sy;
            }
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, size: FontSize, color: Color) {
        let col = x.div_euclid(CELL_WIDTH);
        let row = y.div_euclid(CELL_HEIGHT);
        for (i, ch) in text.chars().enumerate() {
            self.put(
                col + i as i32,
                row,
                Cell {
                    ch,
                    color,
                    bold: size == FontSize::Large,
                },
            );
        }
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Background => TermColor::Reset,
        Color::Accent => TermColor::Cyan,
        Color::Text => TermColor::White,
        Color::Status => TermColor::Yellow,
    }
}

/// Pick a character matching the direction of a line (y grows downward)
fn line_glyph(dx: i32, dy: i32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay * 2 < ax {
        '-'
    } else if ax * 2 < ay {
        '|'
    } else if (dx > 0) == (dy > 0) {
        '\\'
    } else {
        '/'
    }
}

/// Liang-Barsky clip of a segment against `[0, max_x] x [0, max_y]`
fn clip_line(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    max_x: f32,
    max_y: f32,
) -> Option<(f32, f32, f32, f32)> {
    let (dx, dy) = (x1 - x0, y1 - y0);
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [(-dx, x0), (dx, max_x - x0), (-dy, y0), (dy, max_y - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((x0 + t0 * dx, y0 + t0 * dy, x0 + t1 * dx, y0 + t1 * dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf3d_core::geometry::CUBE_OBJ;
    use wf3d_core::{MemoryStore, ModelName, Pipeline, Registry};

    #[test]
    fn test_virtual_size() {
        let renderer = AsciiRenderer::new(80, 24);
        assert_eq!(renderer.size(), (320, 192));
    }

    #[test]
    fn test_horizontal_line() {
        let mut renderer = AsciiRenderer::new(20, 4);
        renderer.draw_line(0, 0, 39, 0, Color::Accent);
        assert_eq!(renderer.row_text(0).unwrap(), "----------          ");
        assert_eq!(renderer.row_text(1).unwrap().trim(), "");
    }

    #[test]
    fn test_vertical_and_diagonal_glyphs() {
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.draw_line(0, 0, 0, 79, Color::Accent);
        assert!((0..10).all(|row| renderer.char_at(0, row) == Some('|')));

        renderer.clear();
        renderer.draw_line(0, 0, 16, 32, Color::Accent);
        assert_eq!(renderer.char_at(0, 0), Some('\\'));
        assert_eq!(renderer.char_at(4, 4), Some('\\'));

        renderer.clear();
        renderer.draw_line(0, 32, 16, 0, Color::Accent);
        assert_eq!(renderer.char_at(0, 4), Some('/'));
    }

    #[test]
    fn test_lines_are_clipped() {
        let mut renderer = AsciiRenderer::new(20, 4);
        renderer.draw_line(-100, 4, 20, 4, Color::Accent);
        assert_eq!(renderer.row_text(0).unwrap(), "------              ");

        renderer.clear();
        renderer.draw_line(-100, -50, -10, -90, Color::Accent);
        renderer.draw_line(1000, 0, 100_000, 30, Color::Accent);
        assert!((0..4).all(|row| renderer.row_text(row).unwrap().trim().is_empty()));
    }

    #[test]
    fn test_row_text_out_of_range() {
        let renderer = AsciiRenderer::new(5, 2);
        assert_eq!(renderer.row_text(1).as_deref(), Some("     "));
        assert_eq!(renderer.row_text(2), None);
        assert_eq!(AsciiRenderer::new(0, 0).row_text(0).as_deref(), Some(""));
    }

    #[test]
    fn test_text_placement() {
        let mut renderer = AsciiRenderer::new(20, 4);
        renderer.draw_text(6, 6, "hello", FontSize::Large, Color::Text);
        renderer.draw_text(70, 24, "clipped", FontSize::Small, Color::Status);
        assert_eq!(renderer.row_text(0).unwrap(), " hello              ");
        assert_eq!(renderer.row_text(3).unwrap(), "                 cli");
    }

    #[test]
    fn test_pipeline_frame_into_cells() {
        let mut store = MemoryStore::new();
        store.insert(ModelName::parse("cube.obj").unwrap(), CUBE_OBJ);
        let mut registry = Registry::default();
        registry.select(&store, "cube.obj").unwrap();

        let mut renderer = AsciiRenderer::new(80, 24);
        let stats = Pipeline::default().render_frame(registry.snapshot(), &mut renderer, &mut || {});
        assert_eq!(stats.drawn, 12);
        assert!(renderer.row_text(22).unwrap().contains("cube.obj"));
        assert!(renderer.row_text(0).unwrap().contains("wf3d"));
        assert!(renderer.row_text(12).unwrap().contains(['-', '|', '/', '\\']));

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("cube.obj"));
    }
}
