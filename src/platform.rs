//! The external collaborators behind traits: prompting for paths and values,
//! and presenting frames while delivering normalized events. The core depends
//! only on this vocabulary; the implementations here are plain terminal ones.

use crate::preview::Viewport;
use crate::session::{Event, Key, PointerButton};
use crate::{SplitError, DISPLAY_MAX_HEIGHT, DISPLAY_MAX_WIDTH};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

/// Asks the operator for paths and values. `None` always means "cancelled"
/// and is treated as a no-op or abort by the caller, never as an error.
pub trait Prompter {
    fn pick_images(&mut self) -> Option<Vec<PathBuf>>;
    fn pick_folder(&mut self) -> Option<PathBuf>;
    fn ask_string(&mut self, prompt: &str) -> Option<String>;
    fn ask_u32(&mut self, prompt: &str) -> Option<u32>;
}

/// Presents display frames and delivers the normalized event stream. A closed
/// event source must surface as [`Key::Quit`], not as an error.
pub trait Surface {
    fn present(&mut self, frame: &RgbaImage) -> Result<(), SplitError>;
    fn next_event(&mut self) -> Result<Event, SplitError>;
}

/// Line-oriented prompts on stdin/stderr. An empty line or EOF is a cancel.
#[derive(Debug, Default)]
pub struct StdioPrompter;

impl StdioPrompter {
    fn read_line(&self, prompt: &str) -> Option<String> {
        eprint!("{prompt}: ");
        io::stderr().flush().ok()?;
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

impl Prompter for StdioPrompter {
    fn pick_images(&mut self) -> Option<Vec<PathBuf>> {
        let line = self.read_line("Images (space separated)")?;
        let paths: Vec<PathBuf> = line.split_whitespace().map(PathBuf::from).collect();
        if paths.is_empty() {
            None
        } else {
            Some(paths)
        }
    }

    fn pick_folder(&mut self) -> Option<PathBuf> {
        self.read_line("Output folder").map(PathBuf::from)
    }

    fn ask_string(&mut self, prompt: &str) -> Option<String> {
        self.read_line(prompt)
    }

    fn ask_u32(&mut self, prompt: &str) -> Option<u32> {
        self.read_line(prompt)?.parse().ok()
    }
}

/// A display surface for plain terminals: each frame is written as a PNG
/// (scaled to fit the display area, like a fixed 1280×720 window), and events
/// arrive as one-line commands on stdin.
pub struct ConsoleSurface {
    preview_path: PathBuf,
}

impl ConsoleSurface {
    pub fn new(preview_path: impl Into<PathBuf>) -> Self {
        ConsoleSurface {
            preview_path: preview_path.into(),
        }
    }
}

impl Surface for ConsoleSurface {
    fn present(&mut self, frame: &RgbaImage) -> Result<(), SplitError> {
        let (width, height) = frame.dimensions();
        let viewport = Viewport::fit(width, height, DISPLAY_MAX_WIDTH, DISPLAY_MAX_HEIGHT);
        let (display_width, display_height) = viewport.display_size();
        debug!(display_width, display_height, "presenting frame");
        let shown = if (display_width, display_height) == (width, height) {
            frame.clone()
        } else {
            imageops::resize(frame, display_width, display_height, FilterType::Triangle)
        };
        shown
            .save(&self.preview_path)
            .map_err(|e| SplitError::Surface(e.to_string()))?;
        eprintln!("preview -> {}", self.preview_path.display());
        Ok(())
    }

    fn next_event(&mut self) -> Result<Event, SplitError> {
        let stdin = io::stdin();
        let mut lines = stdin.lock();
        loop {
            eprint!("> ");
            io::stderr()
                .flush()
                .map_err(|e| SplitError::Surface(e.to_string()))?;
            let mut line = String::new();
            let read = lines
                .read_line(&mut line)
                .map_err(|e| SplitError::Surface(e.to_string()))?;
            if read == 0 {
                return Ok(Event::KeyDown(Key::Quit));
            }
            if let Some(event) = parse_command(line.trim()) {
                return Ok(event);
            }
            eprintln!(
                "commands: h <y> | v <x> | m <x> <y> | up/down/left/right | z undo | d delete | \
                 +/- snap | g guides | a auto-grid | s split | q quit"
            );
        }
    }
}

/// Parses one console command into an event: `z` undo, `s` split, `q` quit,
/// `h <y>`/`v <x>` place lines.
///
/// # Example
/// ```
/// use gridsplit::{parse_command, Event, Key};
///
/// assert_eq!(parse_command("z"), Some(Event::KeyDown(Key::Undo)));
/// assert_eq!(parse_command("nonsense"), None);
/// ```
pub fn parse_command(line: &str) -> Option<Event> {
    let mut parts = line.split_whitespace();
    let event = match parts.next()? {
        "h" => Event::PointerDown {
            button: PointerButton::Primary,
            x: 0,
            y: parts.next()?.parse().ok()?,
        },
        "v" => Event::PointerDown {
            button: PointerButton::Secondary,
            x: parts.next()?.parse().ok()?,
            y: 0,
        },
        "m" => Event::PointerMove {
            x: parts.next()?.parse().ok()?,
            y: parts.next()?.parse().ok()?,
        },
        "up" => Event::KeyDown(Key::Up),
        "down" => Event::KeyDown(Key::Down),
        "left" => Event::KeyDown(Key::Left),
        "right" => Event::KeyDown(Key::Right),
        "z" => Event::KeyDown(Key::Undo),
        "d" => Event::KeyDown(Key::Delete),
        "+" => Event::KeyDown(Key::SnapUp),
        "-" => Event::KeyDown(Key::SnapDown),
        "g" => Event::KeyDown(Key::ToggleGuides),
        "a" => Event::KeyDown(Key::AutoGrid),
        "s" => Event::KeyDown(Key::Export),
        "q" => Event::KeyDown(Key::Quit),
        _ => return None,
    };
    Some(event)
}
