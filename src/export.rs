//! The export stage: walks the derived tiling and writes each cell to its own
//! file. Labels are collected before any file is written; each write is
//! independent, so one failed cell never aborts the rest.

use crate::canvas::{Canvas, SaveFormat};
use crate::grid::GridModel;
use crate::platform::Prompter;
use crate::tiling::CellBounds;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// How exported files are named.
///
/// `Indexed` derives names from the cell's row/column bands; `Labeled` asks
/// the prompter once per cell (before any file is written), falling back to
/// `unknown_{i}` when the prompt is cancelled or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    Indexed,
    Labeled,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: SaveFormat,
    /// JPEG quality (1-100); ignored for PNG.
    pub quality: Option<u8>,
    pub naming: Naming,
    /// Encode cells through rayon; writes are independent either way.
    pub parallel: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            format: SaveFormat::Png,
            quality: None,
            naming: Naming::Indexed,
            parallel: true,
        }
    }
}

/// Outcome counts for one export pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub written: usize,
    pub failed: usize,
}

/// Writes every cell of the current tiling under `out_dir`.
///
/// The tiling is computed from the final line state; crops come from the
/// untouched canvas. A cell whose write fails is logged and counted in
/// `failed`, and the loop continues.
pub fn export_cells<P: Prompter>(
    canvas: &Canvas,
    grid: &GridModel,
    out_dir: &Path,
    stem: &str,
    options: &ExportOptions,
    prompter: &mut P,
) -> ExportReport {
    let cells = grid.tiling();
    info!(cells = cells.len(), out_dir = %out_dir.display(), "exporting regions");

    let named: Vec<(CellBounds, PathBuf)> = cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = match options.naming {
                Naming::Indexed => format!("{stem}_r{}_c{}", cell.row, cell.col),
                Naming::Labeled => prompter
                    .ask_string(&format!(
                        "Label for region {i} ({},{})-({},{})",
                        cell.x1, cell.y1, cell.x2, cell.y2
                    ))
                    .filter(|label| !label.trim().is_empty())
                    .unwrap_or_else(|| format!("unknown_{i}")),
            };
            let path = out_dir.join(format!("{name}.{}", options.format.extension()));
            (cell, path)
        })
        .collect();

    let write_cell = |(cell, path): &(CellBounds, PathBuf)| -> bool {
        let region = canvas.crop(cell);
        match options.format.save(&region, path, options.quality) {
            Ok(()) => {
                info!(path = %path.display(), "wrote region");
                true
            }
            Err(err) => {
                error!(%err, "failed to write region");
                false
            }
        }
    };

    let outcomes: Vec<bool> = if options.parallel {
        named.par_iter().map(write_cell).collect()
    } else {
        named.iter().map(write_cell).collect()
    };

    let written = outcomes.iter().filter(|ok| **ok).count();
    ExportReport {
        written,
        failed: outcomes.len() - written,
    }
}
