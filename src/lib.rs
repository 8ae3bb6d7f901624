//! This crate splits a raster image into rectangular regions along operator-placed
//! cut-lines. It uses the `image` and `imageproc` crates for pixel manipulation and
//! drawing, and `insta`/`proptest` for its test battery.
//!
//! The pieces, leaves first:
//! - [`grid`]: the grid model — two ordered sequences of horizontal/vertical
//!   cut-lines, selection state, and snap configuration. Pure data, no rendering.
//! - [`tiling`]: the partition algorithm turning line sets plus canvas bounds into
//!   a row-major rectangular tiling.
//! - [`canvas`]: the immutable source raster, normalized to 3 or 4 channels.
//! - [`preview`]: the display frame compositor (overlay lines, cursor guides,
//!   alpha over a checkerboard backdrop).
//! - [`session`]: the interaction controller mapping pointer/key events to model
//!   mutations and re-renders.
//! - [`export`]: walks the tiling and writes each cell to disk.
//! - [`platform`]: the external collaborators (prompts, display surface) behind
//!   traits, with plain terminal implementations.
//!
//! # Example
//! ```
//! use gridsplit::{tile, Axis, GridModel};
//!
//! let mut grid = GridModel::new(100, 100, 1);
//! grid.add_or_select(Axis::Horizontal, 40);
//! grid.add_or_select(Axis::Vertical, 60);
//!
//! let cells = tile(
//!     grid.lines(Axis::Horizontal),
//!     grid.lines(Axis::Vertical),
//!     100,
//!     100,
//! );
//! assert_eq!(cells.len(), 4);
//! ```

pub mod canvas;
pub mod export;
pub mod grid;
pub mod platform;
pub mod preview;
pub mod session;
pub mod tiling;

use smallvec::SmallVec;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_SMALLVEC_SIZE: usize = 32;

/// Pixel distance within which placing a line on top of an existing one selects
/// it instead of adding a duplicate.
pub const DEFAULT_HOVER_TOLERANCE: u32 = 5;
/// Grid granularity for line placement and nudges, in pixels.
pub const DEFAULT_SNAP_UNIT: u32 = 1;
/// Amount the snap unit changes per increase/decrease command.
pub const SNAP_STEP: u32 = 1;
/// Display area the preview is fitted into.
pub const DISPLAY_MAX_WIDTH: u32 = 1280;
pub const DISPLAY_MAX_HEIGHT: u32 = 720;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to save region {path}: {source}")]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("invalid canvas dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("display surface error: {0}")]
    Surface(String),
}

/// A type alias for SmallVec with a stack-allocated buffer sized for typical
/// line counts.
pub type SmallVecLine<T> = SmallVec<[T; DEFAULT_SMALLVEC_SIZE]>;

pub use canvas::{Canvas, SaveFormat};
pub use export::{export_cells, ExportOptions, ExportReport, Naming};
pub use grid::{Axis, GridModel};
pub use platform::{parse_command, ConsoleSurface, Prompter, StdioPrompter, Surface};
pub use preview::{composite_checkerboard, render, PreviewConfig, Viewport};
pub use session::{Event, Flow, Key, PointerButton, Session, SessionOutcome};
pub use tiling::{tile, CellBounds};
