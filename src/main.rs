use anyhow::{bail, Context, Result};
use clap::Parser;
use gridsplit::{
    export_cells, Canvas, ConsoleSurface, ExportOptions, Naming, Prompter, SaveFormat, Session,
    SessionOutcome, StdioPrompter, DEFAULT_SNAP_UNIT,
};
use std::path::PathBuf;
use tracing::{error, info};

/// Split images into rectangular regions along movable cut-lines.
///
/// Without `--rows`/`--cols` the session is interactive: the preview frame is
/// written to `--preview` after every change, and one-line commands on stdin
/// stand in for pointer and key events (`h <y>` places a horizontal cut,
/// `v <x>` a vertical one, `s` splits, `q` skips).
#[derive(Parser, Debug)]
#[command(name = "gridsplit", version)]
struct Cli {
    /// Images to split; prompted for when omitted.
    images: Vec<PathBuf>,

    /// Output folder for the exported regions; prompted for when omitted.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Encoding for exported regions.
    #[arg(long, value_enum, default_value_t = SaveFormat::Png)]
    format: SaveFormat,

    /// JPEG quality (1-100).
    #[arg(long)]
    quality: Option<u8>,

    /// Snap grid granularity for line placement and nudges, in pixels.
    #[arg(long, default_value_t = DEFAULT_SNAP_UNIT)]
    snap: u32,

    /// White border added around the image before splitting.
    #[arg(long, default_value_t = 5)]
    padding: u32,

    /// Prompt for a label per region instead of row/column names.
    #[arg(long)]
    labels: bool,

    /// Start with cursor guide lines enabled.
    #[arg(long)]
    guides: bool,

    /// Split into this many rows without an interactive session (with --cols).
    #[arg(long)]
    rows: Option<u32>,

    /// Split into this many columns without an interactive session (with --rows).
    #[arg(long)]
    cols: Option<u32>,

    /// Where the interactive preview frame is written.
    #[arg(long, default_value = "gridsplit-preview.png")]
    preview: PathBuf,

    /// Encode regions one at a time instead of in parallel.
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();
    let mut prompter = StdioPrompter;

    let images = if cli.images.is_empty() {
        prompter.pick_images().unwrap_or_default()
    } else {
        cli.images.clone()
    };
    if images.is_empty() {
        bail!("no images selected");
    }
    let out_dir = match cli.out.clone().or_else(|| prompter.pick_folder()) {
        Some(dir) => dir,
        None => bail!("no output folder selected"),
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let options = ExportOptions {
        format: cli.format,
        quality: cli.quality,
        naming: if cli.labels {
            Naming::Labeled
        } else {
            Naming::Indexed
        },
        parallel: !cli.sequential,
    };

    let single = images.len() == 1;
    for path in &images {
        let canvas = match Canvas::open(path) {
            Ok(canvas) => canvas,
            Err(err) => {
                if single {
                    return Err(err).with_context(|| format!("failed to load {}", path.display()));
                }
                error!(path = %path.display(), %err, "failed to load, skipping");
                continue;
            }
        };
        let canvas = canvas.pad(cli.padding);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("region")
            .to_string();

        let mut session = Session::new(canvas, cli.snap);
        session.set_guides(cli.guides);

        let outcome = if let (Some(rows), Some(cols)) = (cli.rows, cli.cols) {
            session.grid_mut().auto_grid(rows, cols);
            SessionOutcome::Export
        } else {
            eprintln!("Image: {}", path.display());
            eprintln!("h <y> / v <x> add lines, arrows move, z undo, s split, q skip.");
            let mut surface = ConsoleSurface::new(&cli.preview);
            session.run(&mut surface, &mut prompter)?
        };

        match outcome {
            SessionOutcome::Quit => info!(image = %path.display(), "skipped, nothing exported"),
            SessionOutcome::Export => {
                let report = export_cells(
                    session.canvas(),
                    session.grid(),
                    &out_dir,
                    &stem,
                    &options,
                    &mut prompter,
                );
                if report.failed > 0 {
                    println!(
                        "{}: wrote {} region(s), {} failed",
                        path.display(),
                        report.written,
                        report.failed
                    );
                } else {
                    println!("{}: wrote {} region(s)", path.display(), report.written);
                }
            }
        }
    }

    Ok(())
}
