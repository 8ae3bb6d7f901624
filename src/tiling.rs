//! The partition algorithm: cut-line sets plus canvas bounds in, an ordered
//! rectangular tiling out. Pure functions, derived on demand and never cached.

use imageproc::rect::Rect;

/// One cell of the tiling: pixel bounds `(x1, y1)..(x2, y2)` (end-exclusive)
/// plus the row/column band indices it occupies, for deterministic filenames.
///
/// # Example
/// ```
/// use gridsplit::tile;
///
/// let cells = tile(&[40], &[60], 100, 100);
/// assert_eq!(cells.len(), 4);
/// assert_eq!((cells[0].width(), cells[0].height()), (60, 40));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellBounds {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub row: u32,
    pub col: u32,
}

impl CellBounds {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

impl From<&CellBounds> for Rect {
    fn from(cell: &CellBounds) -> Self {
        Rect::at(cell.x1 as i32, cell.y1 as i32).of_size(cell.width(), cell.height())
    }
}

/// Derives the rectangular tiling for the given line sets and canvas bounds.
///
/// Boundaries per axis are `{0} ∪ distinct(coords) ∪ {bound}` sorted
/// ascending; every adjacent pair forms a band, and cells iterate row-major
/// (horizontal bands top to bottom, vertical bands left to right). Coincident
/// coordinates collapse into one boundary, so no zero-area cell is ever
/// produced; with no lines at all the result is the single full-canvas cell.
///
/// The cells are non-overlapping and their areas sum to exactly
/// `width * height`.
///
/// # Example
/// ```
/// use gridsplit::tile;
///
/// let cells = tile(&[], &[], 100, 80);
/// assert_eq!(cells.len(), 1);
/// assert_eq!((cells[0].x2, cells[0].y2), (100, 80));
/// ```
pub fn tile(h_lines: &[u32], v_lines: &[u32], width: u32, height: u32) -> Vec<CellBounds> {
    let ys = axis_boundaries(h_lines, height);
    let xs = axis_boundaries(v_lines, width);

    let mut cells = Vec::with_capacity((ys.len() - 1) * (xs.len() - 1));
    for (row, band_y) in ys.windows(2).enumerate() {
        for (col, band_x) in xs.windows(2).enumerate() {
            cells.push(CellBounds {
                x1: band_x[0],
                y1: band_y[0],
                x2: band_x[1],
                y2: band_y[1],
                row: row as u32,
                col: col as u32,
            });
        }
    }
    cells
}

/// Sorted, deduplicated band boundaries for one axis, always including the
/// canvas edges. Coordinates outside `0..bound` are ignored.
fn axis_boundaries(lines: &[u32], bound: u32) -> Vec<u32> {
    let mut boundaries: Vec<u32> = lines.iter().copied().filter(|&c| c < bound).collect();
    boundaries.push(0);
    boundaries.push(bound);
    boundaries.sort_unstable();
    boundaries.dedup();
    boundaries
}
