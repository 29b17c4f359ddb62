//! Character-cell canvas for the drawing studio

/// Canvas size in cells
pub const CANVAS_WIDTH: u16 = 48;
pub const CANVAS_HEIGHT: u16 = 14;

/// Number of paint colours
pub const PALETTE_SIZE: usize = 6;

/// A grid of painted cells with a brush cursor.
///
/// Moving the brush while the pen is down paints every cell it passes
/// over; each painted move counts as one stroke.
#[derive(Debug, Clone)]
pub struct Canvas {
    cells: Vec<Option<usize>>,
    cursor: (u16, u16),
    pen_down: bool,
    colour: usize,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            cells: vec![None; CANVAS_WIDTH as usize * CANVAS_HEIGHT as usize],
            cursor: (CANVAS_WIDTH / 2, CANVAS_HEIGHT / 2),
            pen_down: false,
            colour: 0,
        }
    }

    /// Colour index painted at a cell, if any
    pub fn cell(&self, x: u16, y: u16) -> Option<usize> {
        if x >= CANVAS_WIDTH || y >= CANVAS_HEIGHT {
            return None;
        }
        self.cells[Self::offset(x, y)]
    }

    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    pub fn pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn colour(&self) -> usize {
        self.colour
    }

    /// Switch colours; out-of-range indexes are ignored
    pub fn set_colour(&mut self, colour: usize) {
        if colour < PALETTE_SIZE {
            self.colour = colour;
        }
    }

    /// Move the brush one cell. Returns true when the move painted.
    pub fn move_brush(&mut self, dx: i16, dy: i16) -> bool {
        let (x, y) = self.cursor;
        let nx = x.saturating_add_signed(dx).min(CANVAS_WIDTH - 1);
        let ny = y.saturating_add_signed(dy).min(CANVAS_HEIGHT - 1);
        if (nx, ny) == self.cursor {
            return false;
        }
        self.cursor = (nx, ny);
        self.paint()
    }

    /// Lift or lower the pen. Lowering it paints under the cursor.
    pub fn toggle_pen(&mut self) -> bool {
        self.pen_down = !self.pen_down;
        self.paint()
    }

    /// Wipe every painted cell
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Number of painted cells
    pub fn painted(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    fn paint(&mut self) -> bool {
        if !self.pen_down {
            return false;
        }
        let (x, y) = self.cursor;
        self.cells[Self::offset(x, y)] = Some(self.colour);
        true
    }

    fn offset(x: u16, y: u16) -> usize {
        y as usize * CANVAS_WIDTH as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_up_moves_without_painting() {
        let mut canvas = Canvas::new();
        assert!(!canvas.move_brush(1, 0));
        assert_eq!(canvas.painted(), 0);
    }

    #[test]
    fn test_pen_down_paints_each_move() {
        let mut canvas = Canvas::new();
        canvas.set_colour(2);
        assert!(canvas.toggle_pen());
        assert!(canvas.move_brush(1, 0));
        assert!(canvas.move_brush(0, 1));

        let (x, y) = canvas.cursor();
        assert_eq!(canvas.cell(x, y), Some(2));
        assert_eq!(canvas.painted(), 3);

        canvas.clear();
        assert_eq!(canvas.painted(), 0);
    }

    #[test]
    fn test_brush_stays_on_canvas() {
        let mut canvas = Canvas::new();
        canvas.toggle_pen();
        for _ in 0..CANVAS_WIDTH {
            canvas.move_brush(-1, 0);
        }
        assert_eq!(canvas.cursor().0, 0);
        // Pushing against the edge is not a stroke
        assert!(!canvas.move_brush(-1, 0));
        assert_eq!(canvas.cell(CANVAS_WIDTH, 0), None);
    }

    #[test]
    fn test_unknown_colour_is_ignored() {
        let mut canvas = Canvas::new();
        canvas.set_colour(PALETTE_SIZE);
        assert_eq!(canvas.colour(), 0);
    }
}
