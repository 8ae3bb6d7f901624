//! The preview renderer: composes the canvas, overlay cut-lines, optional
//! cursor guides, and alpha-over-checkerboard blending into a display frame.
//! Output is display-only — region crops always come from the untouched
//! [`crate::Canvas`].

use crate::canvas::Canvas;
use crate::grid::{Axis, GridModel};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use tracing::trace;

/// Colors and compositing knobs for the preview frame.
///
/// # Example
/// ```
/// use gridsplit::PreviewConfig;
///
/// let config = PreviewConfig::default();
/// assert_eq!(config.checker_block, 8);
/// assert!(config.composite_alpha);
/// ```
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Color of the selected line, whatever its axis.
    pub selected_color: Rgba<u8>,
    /// Color of unselected horizontal lines.
    pub horizontal_color: Rgba<u8>,
    /// Color of unselected vertical lines.
    pub vertical_color: Rgba<u8>,
    /// Color of the cursor guide pair.
    pub guide_color: Rgba<u8>,
    /// Side length of one checkerboard square, in pixels.
    pub checker_block: u32,
    /// The two alternating checkerboard tones.
    pub checker_light: u8,
    pub checker_dark: u8,
    /// Blend alpha canvases over the checkerboard; when off, the RGB planes
    /// pass through unmodified.
    pub composite_alpha: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        PreviewConfig {
            selected_color: Rgba([0, 255, 0, 255]),
            horizontal_color: Rgba([255, 0, 0, 255]),
            vertical_color: Rgba([0, 0, 255, 255]),
            guide_color: Rgba([160, 160, 160, 255]),
            checker_block: 8,
            checker_light: 200,
            checker_dark: 120,
            composite_alpha: true,
        }
    }
}

/// Renders one display frame.
///
/// The canvas is copied fresh on every call; nothing here mutates it. Cut-lines
/// are drawn 1 px wide across the full span, the selected line in
/// `selected_color`, then the cursor guides on top when enabled and the cursor
/// is inside the canvas.
pub fn render(
    canvas: &Canvas,
    grid: &GridModel,
    cursor: Option<(u32, u32)>,
    guides: bool,
    config: &PreviewConfig,
) -> RgbaImage {
    trace!(guides, ?cursor, "rendering preview frame");
    let mut frame = if canvas.has_alpha() && config.composite_alpha {
        composite_checkerboard(&canvas.to_rgba(), config)
    } else {
        canvas.to_rgba()
    };
    let (width, height) = canvas.dimensions();

    for (index, &y) in grid.lines(Axis::Horizontal).iter().enumerate() {
        let color = if grid.selection() == Some((Axis::Horizontal, index)) {
            config.selected_color
        } else {
            config.horizontal_color
        };
        draw_line_segment_mut(&mut frame, (0.0, y as f32), (width as f32, y as f32), color);
    }
    for (index, &x) in grid.lines(Axis::Vertical).iter().enumerate() {
        let color = if grid.selection() == Some((Axis::Vertical, index)) {
            config.selected_color
        } else {
            config.vertical_color
        };
        draw_line_segment_mut(&mut frame, (x as f32, 0.0), (x as f32, height as f32), color);
    }

    if guides {
        if let Some((cx, cy)) = cursor {
            if cx < width && cy < height {
                draw_line_segment_mut(
                    &mut frame,
                    (0.0, cy as f32),
                    (width as f32, cy as f32),
                    config.guide_color,
                );
                draw_line_segment_mut(
                    &mut frame,
                    (cx as f32, 0.0),
                    (cx as f32, height as f32),
                    config.guide_color,
                );
            }
        }
    }

    frame
}

/// Blends `image` over a synthetic checkerboard with per-pixel linear
/// weighting: `out = rgb·a + background·(1 − a)`. The result is fully opaque.
pub fn composite_checkerboard(image: &RgbaImage, config: &PreviewConfig) -> RgbaImage {
    let block = config.checker_block.max(1);
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let background = if ((x / block) + (y / block)) % 2 == 0 {
            config.checker_light
        } else {
            config.checker_dark
        };
        Rgba([
            blend(r, background, a),
            blend(g, background, a),
            blend(b, background, a),
            255,
        ])
    })
}

fn blend(foreground: u8, background: u8, alpha: u8) -> u8 {
    let alpha = u32::from(alpha);
    ((u32::from(foreground) * alpha + u32::from(background) * (255 - alpha) + 127) / 255) as u8
}

/// Scale-to-fit mapping between canvas pixels and a fixed display area,
/// preserving aspect ratio.
///
/// # Example
/// ```
/// use gridsplit::Viewport;
///
/// let viewport = Viewport::fit(2560, 1440, 1280, 720);
/// assert_eq!(viewport.display_size(), (1280, 720));
/// assert_eq!(viewport.to_canvas(640, 360), (1280, 720));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    canvas_width: u32,
    canvas_height: u32,
    pub scale: f32,
}

impl Viewport {
    pub fn fit(canvas_width: u32, canvas_height: u32, max_width: u32, max_height: u32) -> Self {
        let scale = f32::min(
            max_width as f32 / canvas_width as f32,
            max_height as f32 / canvas_height as f32,
        );
        Viewport {
            canvas_width,
            canvas_height,
            scale,
        }
    }

    /// The scaled size the canvas occupies on the display.
    pub fn display_size(&self) -> (u32, u32) {
        (
            (self.canvas_width as f32 * self.scale) as u32,
            (self.canvas_height as f32 * self.scale) as u32,
        )
    }

    /// Maps a display position back to canvas pixels.
    pub fn to_canvas(&self, x: u32, y: u32) -> (u32, u32) {
        (
            (x as f32 / self.scale) as u32,
            (y as f32 / self.scale) as u32,
        )
    }
}
