//! The grid model: two insertion-ordered sequences of cut-lines, a selection,
//! and the snap configuration. Mutation logic only — rendering lives in
//! [`crate::preview`] and the derived tiling in [`crate::tiling`].

use crate::tiling::{tile, CellBounds};
use crate::{SmallVecLine, DEFAULT_HOVER_TOLERANCE};
use tracing::debug;

/// Orientation of a cut-line.
///
/// A horizontal line sits at a `y` coordinate and spans the full canvas width;
/// a vertical line sits at an `x` coordinate and spans the full height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// The set of cut-lines over one canvas, with selection and snap state.
///
/// Lines are addressed by `(Axis, index)` where the index is the insertion
/// position in that axis' sequence. Removing a line shifts later indices, so
/// every structural mutation clears or re-points the selection before it
/// returns.
///
/// # Example
/// ```
/// use gridsplit::{Axis, GridModel};
///
/// let mut grid = GridModel::new(300, 200, 1);
/// let index = grid.add_or_select(Axis::Horizontal, 40);
/// assert_eq!(grid.lines(Axis::Horizontal), &[40]);
/// assert_eq!(grid.selection(), Some((Axis::Horizontal, index)));
/// ```
#[derive(Debug, Clone)]
pub struct GridModel {
    width: u32,
    height: u32,
    hlines: SmallVecLine<u32>,
    vlines: SmallVecLine<u32>,
    selection: Option<(Axis, usize)>,
    snap_unit: u32,
}

impl GridModel {
    /// Creates an empty model for a canvas of `width`×`height` pixels.
    ///
    /// `snap_unit` is clamped to a minimum of 1. Dimensions must be non-zero;
    /// [`crate::Canvas`] validates this before a model is ever built from one.
    pub fn new(width: u32, height: u32, snap_unit: u32) -> Self {
        Self {
            width,
            height,
            hlines: SmallVecLine::new(),
            vlines: SmallVecLine::new(),
            selection: None,
            snap_unit: snap_unit.max(1),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The exclusive upper bound for coordinates on `axis`: canvas height for
    /// horizontal lines, width for vertical ones.
    pub fn boundary(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.height,
            Axis::Vertical => self.width,
        }
    }

    /// The line coordinates of `axis` in insertion order.
    pub fn lines(&self, axis: Axis) -> &[u32] {
        match axis {
            Axis::Horizontal => &self.hlines,
            Axis::Vertical => &self.vlines,
        }
    }

    fn lines_mut(&mut self, axis: Axis) -> &mut SmallVecLine<u32> {
        match axis {
            Axis::Horizontal => &mut self.hlines,
            Axis::Vertical => &mut self.vlines,
        }
    }

    /// The selected line as an `(axis, index)` pair, if any.
    pub fn selection(&self) -> Option<(Axis, usize)> {
        self.selection
    }

    pub fn snap_unit(&self) -> u32 {
        self.snap_unit
    }

    /// Clamps `unit` to a minimum of 1 and makes it the new snap unit.
    pub fn set_snap_unit(&mut self, unit: u32) {
        self.snap_unit = unit.max(1);
    }

    /// Rounds `v` to the nearest multiple of the snap unit.
    ///
    /// Rounding, not truncation: the result is never further than half a unit
    /// from `v`, and snapping an already-snapped value is a no-op.
    ///
    /// # Example
    /// ```
    /// use gridsplit::GridModel;
    ///
    /// let grid = GridModel::new(100, 100, 10);
    /// assert_eq!(grid.snap(14), 10);
    /// assert_eq!(grid.snap(15), 20);
    /// assert_eq!(grid.snap(grid.snap(17)), grid.snap(17));
    /// ```
    pub fn snap(&self, v: u32) -> u32 {
        (v + self.snap_unit / 2) / self.snap_unit * self.snap_unit
    }

    /// Snaps `raw` and either selects an existing line of `axis` within the
    /// hover tolerance of the snapped coordinate, or appends a new line there.
    ///
    /// Returns the index of the selected line. At most one line is added per
    /// call, so placing twice at the same coordinate never creates a duplicate.
    pub fn add_or_select(&mut self, axis: Axis, raw: u32) -> usize {
        let coord = self.snap(raw).min(self.boundary(axis) - 1);
        if let Some(index) = self
            .lines(axis)
            .iter()
            .position(|&c| c.abs_diff(coord) <= DEFAULT_HOVER_TOLERANCE)
        {
            debug!(?axis, index, coord, "selected existing line");
            self.selection = Some((axis, index));
            return index;
        }
        let lines = self.lines_mut(axis);
        lines.push(coord);
        let index = lines.len() - 1;
        debug!(?axis, index, coord, "added line");
        self.selection = Some((axis, index));
        index
    }

    /// Shifts the selected line by `delta` snap units, clamped to the canvas.
    ///
    /// The controller passes ±1 per key press. No-op without a selection.
    pub fn move_selected(&mut self, delta: i32) {
        let Some((axis, index)) = self.selection else {
            return;
        };
        let limit = i64::from(self.boundary(axis)) - 1;
        let step = i64::from(self.snap_unit) * i64::from(delta);
        let lines = self.lines_mut(axis);
        let moved = (i64::from(lines[index]) + step).clamp(0, limit);
        lines[index] = moved as u32;
    }

    /// Removes the selected line and clears the selection.
    ///
    /// Returns whether a line was removed; no-op without a selection.
    pub fn delete_selected(&mut self) -> bool {
        let Some((axis, index)) = self.selection.take() else {
            return false;
        };
        let lines = self.lines_mut(axis);
        if index >= lines.len() {
            return false;
        }
        lines.remove(index);
        debug!(?axis, index, "removed line");
        true
    }

    /// Removes the most recently selected line — one step, no redo.
    ///
    /// Same effect as [`GridModel::delete_selected`]; kept as a distinct
    /// command so the controller can bind it separately.
    pub fn undo(&mut self) -> bool {
        self.delete_selected()
    }

    /// Replaces both line sets with an evenly spaced `rows`×`cols` grid and
    /// clears the selection. Silent no-op when either count is zero.
    ///
    /// # Example
    /// ```
    /// use gridsplit::{Axis, GridModel};
    ///
    /// let mut grid = GridModel::new(300, 200, 1);
    /// grid.auto_grid(3, 2);
    /// assert_eq!(grid.lines(Axis::Horizontal), &[67, 133]);
    /// assert_eq!(grid.lines(Axis::Vertical), &[150]);
    /// ```
    pub fn auto_grid(&mut self, rows: u32, cols: u32) {
        if rows < 1 || cols < 1 {
            return;
        }
        debug!(rows, cols, "replacing line sets with even grid");
        self.hlines = even_splits(self.height, rows);
        self.vlines = even_splits(self.width, cols);
        self.selection = None;
    }

    /// The tiling derived from the current line state. Recomputed on every
    /// call, never cached across mutations.
    pub fn tiling(&self) -> Vec<CellBounds> {
        tile(&self.hlines, &self.vlines, self.width, self.height)
    }
}

/// `n - 1` interior coordinates dividing `dim` into `n` even bands, using
/// nearest-integer division and clamped inside the canvas.
fn even_splits(dim: u32, n: u32) -> SmallVecLine<u32> {
    (1..n)
        .map(|i| {
            let coord = (u64::from(dim) * u64::from(i) + u64::from(n) / 2) / u64::from(n);
            (coord as u32).min(dim - 1)
        })
        .collect()
}
