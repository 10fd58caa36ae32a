//! Board drawing against an abstract surface.
//!
//! The renderer only knows three primitives (line, arc, clear-region), so
//! any backend that can stroke a path can host the board. [`DisplayList`]
//! is the recording backend used by the terminal front end and the tests.

use std::f64::consts::TAU;
use ttt_core::{Board, CELL_COUNT, Cell, Mark, Side};
use tracing::instrument;

/// A point in surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: f64,
    /// Vertical offset from the top edge.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `2 * half` centred on `center`.
    pub fn around(center: Point, half: f64) -> Self {
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    /// True if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// Stroke colours used on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// `#3498db`, the X mark and the player's grid.
    Blue,
    /// `#e74c3c`, the O mark and the AI's grid.
    Red,
    /// Winning line highlight.
    Gold,
}

impl Color {
    /// RGB components.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Blue => (0x34, 0x98, 0xdb),
            Color::Red => (0xe7, 0x4c, 0x3c),
            Color::Gold => (0xff, 0xd7, 0x00),
        }
    }

    /// Colour of a mark.
    pub fn for_mark(mark: Mark) -> Self {
        match mark {
            Mark::X => Color::Blue,
            Mark::O => Color::Red,
        }
    }

    /// Grid colour while `side` is to move.
    pub fn for_turn(side: Side) -> Self {
        match side {
            Side::Player => Color::Blue,
            Side::Ai => Color::Red,
        }
    }
}

/// Line colour and width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Colour.
    pub color: Color,
    /// Width in surface units.
    pub width: f64,
}

impl Stroke {
    /// Creates a stroke.
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Drawing primitives the renderer needs.
pub trait Surface {
    /// Erases a region.
    fn clear(&mut self, region: Rect);

    /// Strokes a straight line.
    fn line(&mut self, from: Point, to: Point, stroke: Stroke);

    /// Strokes a circular arc, angles in radians.
    fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        stroke: Stroke,
    );
}

/// A recorded drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Region erase.
    Clear(Rect),
    /// Straight line.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke style.
        stroke: Stroke,
    },
    /// Circular arc.
    Arc {
        /// Centre of the circle.
        center: Point,
        /// Radius.
        radius: f64,
        /// Start angle, radians.
        start_angle: f64,
        /// End angle, radians.
        end_angle: f64,
        /// Stroke style.
        stroke: Stroke,
    },
}

impl DrawCommand {
    /// Bounding box of what the command paints.
    pub fn bounds(&self) -> Rect {
        match self {
            DrawCommand::Clear(rect) => *rect,
            DrawCommand::Line { from, to, .. } => Rect::new(
                from.x.min(to.x),
                from.y.min(to.y),
                (from.x - to.x).abs(),
                (from.y - to.y).abs(),
            ),
            DrawCommand::Arc { center, radius, .. } => Rect::around(*center, *radius),
        }
    }
}

/// Surface that records commands instead of painting them.
///
/// A clear drops every earlier stroke lying fully inside the cleared
/// region, so the list always describes what is visible.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible commands in paint order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Lines in paint order.
    pub fn lines(&self) -> impl Iterator<Item = (&Point, &Point, &Stroke)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { from, to, stroke } => Some((from, to, stroke)),
            _ => None,
        })
    }

    /// Arcs in paint order.
    pub fn arcs(&self) -> impl Iterator<Item = (&Point, f64, &Stroke)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Arc {
                center,
                radius,
                stroke,
                ..
            } => Some((center, *radius, stroke)),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn clear(&mut self, region: Rect) {
        self.commands.retain(|c| !region.contains(&c.bounds()));
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        stroke: Stroke,
    ) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            stroke,
        });
    }
}

/// Layout of the 3x3 grid on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    cell_size: f64,
}

impl BoardGeometry {
    /// Geometry with square cells of `cell_size` units.
    pub fn new(cell_size: f64) -> Self {
        Self { cell_size }
    }

    /// Side of one cell.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Side of the whole surface.
    pub fn extent(&self) -> f64 {
        self.cell_size * 3.0
    }

    /// Whole surface as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.extent(), self.extent())
    }

    /// Centre of cell `index`.
    pub fn cell_center(&self, index: usize) -> Point {
        let half = self.cell_size / 2.0;
        Point::new(
            (index % 3) as f64 * self.cell_size + half,
            (index / 3) as f64 * self.cell_size + half,
        )
    }

    /// Cell under `point`, if the point is on the board.
    pub fn cell_at(&self, point: Point) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 || point.x >= self.extent() || point.y >= self.extent() {
            return None;
        }
        let col = (point.x / self.cell_size) as usize;
        let row = (point.y / self.cell_size) as usize;
        Some(row * 3 + col)
    }

    /// Half-size of a drawn mark.
    pub fn mark_half(&self) -> f64 {
        self.cell_size * 3.0 / 10.0
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// A marker partially drawn by an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialMark {
    /// Cell index.
    pub index: usize,
    /// Mark being drawn.
    pub mark: Mark,
    /// Fraction drawn, `0.0..=1.0`.
    pub progress: f32,
}

/// Draws grid, marks and highlights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    geometry: BoardGeometry,
}

const GRID_WIDTH: f64 = 2.0;
const MARK_WIDTH: f64 = 4.0;
const HIGHLIGHT_WIDTH: f64 = 6.0;

impl Renderer {
    /// Creates a renderer over `geometry`.
    pub fn new(geometry: BoardGeometry) -> Self {
        Self { geometry }
    }

    /// The grid layout.
    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Clears the surface and draws the grid in the colour of the side to move.
    pub fn draw_grid(&self, surface: &mut dyn Surface, turn: Side) {
        let size = self.geometry.cell_size();
        let extent = self.geometry.extent();
        let stroke = Stroke::new(Color::for_turn(turn), GRID_WIDTH);

        surface.clear(self.geometry.bounds());
        for k in [1.0, 2.0] {
            surface.line(Point::new(size * k, 0.0), Point::new(size * k, extent), stroke);
            surface.line(Point::new(0.0, size * k), Point::new(extent, size * k), stroke);
        }
    }

    /// Draws every committed mark.
    pub fn draw_marks(&self, surface: &mut dyn Surface, board: &Board) {
        for index in 0..CELL_COUNT {
            if let Some(Cell::Occupied(mark)) = board.get(index) {
                self.draw_mark(surface, index, mark, 1.0);
            }
        }
    }

    /// Draws `mark` at `index`, `progress` of the way from nothing to complete.
    ///
    /// X grows as two strokes from the top corners; O as a circle whose
    /// radius grows.
    pub fn draw_mark(&self, surface: &mut dyn Surface, index: usize, mark: Mark, progress: f32) {
        let p = f64::from(progress.clamp(0.0, 1.0));
        let c = self.geometry.cell_center(index);
        let h = self.geometry.mark_half();
        let stroke = Stroke::new(Color::for_mark(mark), MARK_WIDTH);

        match mark {
            Mark::X => {
                let reach = 2.0 * h * p;
                surface.line(
                    Point::new(c.x - h, c.y - h),
                    Point::new(c.x - h + reach, c.y - h + reach),
                    stroke,
                );
                surface.line(
                    Point::new(c.x + h, c.y - h),
                    Point::new(c.x + h - reach, c.y - h + reach),
                    stroke,
                );
            }
            Mark::O => surface.arc(c, h * p, 0.0, TAU, stroke),
        }
    }

    /// Gold line from the first to the last cell of a winning pattern.
    pub fn draw_highlight(&self, surface: &mut dyn Surface, pattern: [usize; 3]) {
        surface.line(
            self.geometry.cell_center(pattern[0]),
            self.geometry.cell_center(pattern[2]),
            Stroke::new(Color::Gold, HIGHLIGHT_WIDTH),
        );
    }

    /// Full redraw of one frame.
    #[instrument(level = "trace", skip(self, surface, board))]
    pub fn draw_frame(
        &self,
        surface: &mut dyn Surface,
        board: &Board,
        turn: Side,
        animating: Option<PartialMark>,
        highlight: Option<[usize; 3]>,
    ) {
        self.draw_grid(surface, turn);
        self.draw_marks(surface, board);
        if let Some(partial) = animating {
            let c = self.geometry.cell_center(partial.index);
            surface.clear(Rect::around(c, self.geometry.mark_half() + 5.0));
            self.draw_mark(surface, partial.index, partial.mark, partial.progress);
        }
        if let Some(pattern) = highlight {
            self.draw_highlight(surface, pattern);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at_maps_pixels_to_index() {
        let geometry = BoardGeometry::default();
        assert_eq!(geometry.cell_at(Point::new(10.0, 10.0)), Some(0));
        assert_eq!(geometry.cell_at(Point::new(150.0, 150.0)), Some(4));
        assert_eq!(geometry.cell_at(Point::new(299.0, 120.0)), Some(5));
        assert_eq!(geometry.cell_at(Point::new(300.0, 10.0)), None);
        assert_eq!(geometry.cell_at(Point::new(-1.0, 10.0)), None);
    }

    #[test]
    fn test_cell_center() {
        let geometry = BoardGeometry::default();
        assert_eq!(geometry.cell_center(0), Point::new(50.0, 50.0));
        assert_eq!(geometry.cell_center(5), Point::new(250.0, 150.0));
    }

    #[test]
    fn test_grid_color_follows_turn() {
        let renderer = Renderer::default();
        let mut list = DisplayList::new();
        renderer.draw_grid(&mut list, Side::Ai);
        assert_eq!(list.lines().count(), 4);
        assert!(list.lines().all(|(_, _, s)| s.color == Color::Red && s.width == GRID_WIDTH));
    }

    #[test]
    fn test_grid_clear_erases_previous_frame() {
        let renderer = Renderer::default();
        let mut list = DisplayList::new();
        renderer.draw_grid(&mut list, Side::Player);
        renderer.draw_grid(&mut list, Side::Player);
        assert_eq!(list.commands().len(), 4);
    }

    #[test]
    fn test_half_drawn_x() {
        let renderer = Renderer::default();
        let mut list = DisplayList::new();
        renderer.draw_mark(&mut list, 4, Mark::X, 0.5);
        let lines: Vec<_> = list.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(*lines[0].0, Point::new(120.0, 120.0));
        assert_eq!(*lines[0].1, Point::new(150.0, 150.0));
        assert_eq!(lines[0].2.color, Color::Blue);
    }

    #[test]
    fn test_o_radius_grows_with_progress() {
        let renderer = Renderer::default();
        let mut list = DisplayList::new();
        renderer.draw_mark(&mut list, 0, Mark::O, 0.25);
        renderer.draw_mark(&mut list, 8, Mark::O, 1.0);
        let radii: Vec<f64> = list.arcs().map(|(_, r, _)| r).collect();
        assert_eq!(radii, vec![7.5, 30.0]);
    }

    #[test]
    fn test_frame_with_highlight() {
        let mut board = Board::new();
        for i in [0, 1, 2] {
            board.place_mark(i, Mark::X).unwrap();
        }
        let renderer = Renderer::default();
        let mut list = DisplayList::new();
        renderer.draw_frame(&mut list, &board, Side::Player, None, Some([0, 1, 2]));
        let gold: Vec<_> = list.lines().filter(|(_, _, s)| s.color == Color::Gold).collect();
        assert_eq!(gold.len(), 1);
        assert_eq!(*gold[0].0, Point::new(50.0, 50.0));
        assert_eq!(*gold[0].1, Point::new(250.0, 50.0));
    }
}
