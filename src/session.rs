//! The interaction controller: a normalized event vocabulary, the command
//! dispatch over the grid model, and the blocking event loop. Strictly
//! single-threaded — each command runs to completion (mutation plus re-render)
//! before the next event is read.

use crate::canvas::Canvas;
use crate::grid::{Axis, GridModel};
use crate::platform::{Prompter, Surface};
use crate::preview::{render, PreviewConfig};
use crate::{SplitError, SNAP_STEP};
use image::RgbaImage;
use tracing::{debug, trace};

/// Pointer buttons the core distinguishes. Primary places horizontal lines,
/// secondary vertical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// The normalized key vocabulary delivered by a [`Surface`]. Mapping real
/// keycodes onto these is the display collaborator's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Undo,
    Delete,
    SnapUp,
    SnapDown,
    ToggleGuides,
    AutoGrid,
    Quit,
    Export,
}

/// One input event, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PointerMove { x: u32, y: u32 },
    PointerDown { button: PointerButton, x: u32, y: u32 },
    KeyDown(Key),
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Idle,
    Redraw,
    Quit,
    Export,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Quit,
    Export,
}

/// One interactive session over one canvas: the grid model, the last known
/// cursor position, and the guide flag, owned together with a defined
/// construction/teardown boundary.
pub struct Session {
    canvas: Canvas,
    grid: GridModel,
    cursor: Option<(u32, u32)>,
    guides: bool,
    preview: PreviewConfig,
}

impl Session {
    pub fn new(canvas: Canvas, snap_unit: u32) -> Self {
        let grid = GridModel::new(canvas.width(), canvas.height(), snap_unit);
        Session {
            canvas,
            grid,
            cursor: None,
            guides: false,
            preview: PreviewConfig::default(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridModel {
        &mut self.grid
    }

    pub fn guides(&self) -> bool {
        self.guides
    }

    pub fn set_guides(&mut self, on: bool) {
        self.guides = on;
    }

    /// Renders the current display frame.
    pub fn frame(&self) -> RgbaImage {
        render(&self.canvas, &self.grid, self.cursor, self.guides, &self.preview)
    }

    /// Applies one event to the model and reports what the loop should do
    /// next. Every mutation that changes anything visible yields
    /// [`Flow::Redraw`].
    pub fn handle<P: Prompter>(&mut self, event: Event, prompter: &mut P) -> Flow {
        trace!(?event, "handling event");
        match event {
            Event::PointerDown {
                button: PointerButton::Primary,
                y,
                ..
            } => {
                self.grid.add_or_select(Axis::Horizontal, y);
                Flow::Redraw
            }
            Event::PointerDown {
                button: PointerButton::Secondary,
                x,
                ..
            } => {
                self.grid.add_or_select(Axis::Vertical, x);
                Flow::Redraw
            }
            Event::PointerMove { x, y } => {
                self.cursor = Some((x, y));
                if self.guides {
                    Flow::Redraw
                } else {
                    Flow::Idle
                }
            }
            Event::KeyDown(key) => self.handle_key(key, prompter),
        }
    }

    fn handle_key<P: Prompter>(&mut self, key: Key, prompter: &mut P) -> Flow {
        match key {
            Key::Up => self.nudge(Axis::Horizontal, -1),
            Key::Down => self.nudge(Axis::Horizontal, 1),
            Key::Left => self.nudge(Axis::Vertical, -1),
            Key::Right => self.nudge(Axis::Vertical, 1),
            Key::Undo => {
                if self.grid.undo() {
                    Flow::Redraw
                } else {
                    Flow::Idle
                }
            }
            Key::Delete => {
                if self.grid.delete_selected() {
                    Flow::Redraw
                } else {
                    Flow::Idle
                }
            }
            Key::SnapUp => {
                let unit = self.grid.snap_unit();
                self.grid.set_snap_unit(unit.saturating_add(SNAP_STEP));
                debug!(unit = self.grid.snap_unit(), "snap unit increased");
                Flow::Redraw
            }
            Key::SnapDown => {
                let unit = self.grid.snap_unit();
                self.grid.set_snap_unit(unit.saturating_sub(SNAP_STEP));
                debug!(unit = self.grid.snap_unit(), "snap unit decreased");
                Flow::Redraw
            }
            Key::ToggleGuides => {
                self.guides = !self.guides;
                Flow::Redraw
            }
            Key::AutoGrid => match (prompter.ask_u32("Rows"), prompter.ask_u32("Columns")) {
                (Some(rows), Some(cols)) if rows >= 1 && cols >= 1 => {
                    self.grid.auto_grid(rows, cols);
                    Flow::Redraw
                }
                _ => Flow::Idle,
            },
            Key::Quit => Flow::Quit,
            Key::Export => Flow::Export,
        }
    }

    /// Directional keys apply only when they match the selected line's axis.
    fn nudge(&mut self, axis: Axis, delta: i32) -> Flow {
        match self.grid.selection() {
            Some((selected, _)) if selected == axis => {
                self.grid.move_selected(delta);
                Flow::Redraw
            }
            _ => Flow::Idle,
        }
    }

    /// The blocking event loop: present a frame, wait for the next event,
    /// apply it, re-render on every visible change, until quit or export.
    pub fn run<S: Surface, P: Prompter>(
        &mut self,
        surface: &mut S,
        prompter: &mut P,
    ) -> Result<SessionOutcome, SplitError> {
        surface.present(&self.frame())?;
        loop {
            let event = surface.next_event()?;
            match self.handle(event, prompter) {
                Flow::Idle => {}
                Flow::Redraw => surface.present(&self.frame())?,
                Flow::Quit => return Ok(SessionOutcome::Quit),
                Flow::Export => return Ok(SessionOutcome::Export),
            }
        }
    }
}
