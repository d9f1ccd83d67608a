//! In-memory drawing surface at capture resolution.
//!
//! Accumulates pointer gestures into connected round-cap, round-join line
//! segments on an explicitly background-filled raster. The explicit fill
//! matters: downsampling averages pixel values, so the background must be a
//! concrete color rather than a transparent buffer.

use image::{Rgb, RgbImage};

use crate::canvas::event::{PointerEvent, PointerPhase};

/// Capture resolution in pixels (square).
pub const CAPTURE_SIZE: u32 = 280;

/// Default stroke width in pixels at capture resolution.
pub const STROKE_WIDTH: f32 = 15.0;

/// Drawing style for a stroke surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceConfig {
    /// Side length of the square raster.
    pub size: u32,
    /// Stroke width in pixels.
    pub stroke_width: f32,
    /// Ink color.
    pub ink: Rgb<u8>,
    /// Background fill color.
    pub background: Rgb<u8>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            size: CAPTURE_SIZE,
            stroke_width: STROKE_WIDTH,
            ink: Rgb([0, 0, 0]),
            background: Rgb([255, 255, 255]),
        }
    }
}

/// The stroke currently in progress.
#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    /// Pointer id that started the stroke; other pointers are ignored.
    pointer: u32,
    /// Last known position, used as the segment start for the next move.
    last: (f32, f32),
}

/// Raster plus gesture accumulator for one drawing.
#[derive(Debug, Clone)]
pub struct StrokeSurface {
    raster: RgbImage,
    config: SurfaceConfig,
    active: Option<ActiveStroke>,
    has_ink: bool,
}

impl StrokeSurface {
    /// Creates a surface with the default 280x280 style.
    pub fn new() -> Self {
        Self::with_config(SurfaceConfig::default())
    }

    /// Creates a surface with a custom style.
    pub fn with_config(config: SurfaceConfig) -> Self {
        Self {
            raster: RgbImage::from_pixel(config.size, config.size, config.background),
            config,
            active: None,
            has_ink: false,
        }
    }

    /// Feeds one pointer event into the surface.
    ///
    /// A down event only anchors the stroke; ink appears on the first move,
    /// so a tap (down followed by up) leaves the canvas empty. While a stroke
    /// is active, events from other pointer ids are ignored, which keeps
    /// multi-touch input pinned to the first finger.
    pub fn handle_event(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Down => {
                if self.active.is_none() {
                    self.active = Some(ActiveStroke {
                        pointer: event.pointer,
                        last: (event.x, event.y),
                    });
                }
            }
            PointerPhase::Move => {
                let Some(stroke) = self.active else {
                    return;
                };
                if stroke.pointer != event.pointer {
                    return;
                }
                self.draw_segment(stroke.last, (event.x, event.y));
                self.has_ink = true;
                self.active = Some(ActiveStroke {
                    pointer: stroke.pointer,
                    last: (event.x, event.y),
                });
            }
            // Leaving the surface ends the stroke the same way lifting does:
            // rendered ink stays.
            PointerPhase::Up | PointerPhase::Out => {
                if let Some(stroke) = self.active {
                    if stroke.pointer == event.pointer {
                        self.active = None;
                    }
                }
            }
        }
    }

    /// True once at least one ink-producing stroke has been rendered.
    ///
    /// Precondition for submission; see [`crate::session::Session`].
    pub fn has_ink(&self) -> bool {
        self.has_ink
    }

    /// Resets the raster to a full background fill and clears `has_ink`.
    pub fn clear(&mut self) {
        self.raster =
            RgbImage::from_pixel(self.config.size, self.config.size, self.config.background);
        self.active = None;
        self.has_ink = false;
    }

    /// The current capture-resolution raster.
    pub fn raster(&self) -> &RgbImage {
        &self.raster
    }

    /// Draws a line segment by stamping overlapping discs along it.
    ///
    /// Disc stamping gives round caps and round joins without a separate
    /// join pass: consecutive segments share an endpoint disc.
    fn draw_segment(&mut self, from: (f32, f32), to: (f32, f32)) {
        let radius = self.config.stroke_width / 2.0;
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let length = (dx * dx + dy * dy).sqrt();

        // One stamp per pixel of travel keeps the stroke solid.
        let steps = length.ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp_disc(from.0 + dx * t, from.1 + dy * t, radius);
        }
    }

    /// Fills a disc of ink centered at (cx, cy), clipped to the raster.
    fn stamp_disc(&mut self, cx: f32, cy: f32, radius: f32) {
        let size = self.config.size as i32;
        let x_min = ((cx - radius).floor() as i32).max(0);
        let x_max = ((cx + radius).ceil() as i32).min(size - 1);
        let y_min = ((cy - radius).floor() as i32).max(0);
        let y_max = ((cy + radius).ceil() as i32).min(size - 1);

        let r_sq = radius * radius;
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                // Distance from pixel center to the disc center
                let px = x as f32 + 0.5 - cx;
                let py = y as f32 + 0.5 - cy;
                if px * px + py * py <= r_sq {
                    self.raster.put_pixel(x as u32, y as u32, self.config.ink);
                }
            }
        }
    }
}

impl Default for StrokeSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inked_pixels(surface: &StrokeSurface) -> usize {
        surface
            .raster()
            .pixels()
            .filter(|p| **p != Rgb([255, 255, 255]))
            .count()
    }

    #[test]
    fn test_new_surface_is_background_filled() {
        let surface = StrokeSurface::new();
        assert_eq!(surface.raster().dimensions(), (CAPTURE_SIZE, CAPTURE_SIZE));
        assert_eq!(inked_pixels(&surface), 0);
        assert!(!surface.has_ink());
    }

    #[test]
    fn test_stroke_renders_ink() {
        let mut surface = StrokeSurface::new();
        surface.handle_event(PointerEvent::new(PointerPhase::Down, 50.0, 50.0));
        surface.handle_event(PointerEvent::new(PointerPhase::Move, 200.0, 200.0));
        surface.handle_event(PointerEvent::new(PointerPhase::Up, 200.0, 200.0));

        assert!(surface.has_ink());
        assert!(inked_pixels(&surface) > 0);
    }

    #[test]
    fn test_tap_does_not_mark_ink() {
        let mut surface = StrokeSurface::new();
        surface.handle_event(PointerEvent::new(PointerPhase::Down, 100.0, 100.0));
        surface.handle_event(PointerEvent::new(PointerPhase::Up, 100.0, 100.0));

        assert!(!surface.has_ink());
        assert_eq!(inked_pixels(&surface), 0);
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut surface = StrokeSurface::new();
        surface.handle_event(PointerEvent::new(PointerPhase::Move, 100.0, 100.0));

        assert!(!surface.has_ink());
        assert_eq!(inked_pixels(&surface), 0);
    }

    #[test]
    fn test_second_touch_point_is_ignored() {
        let mut surface = StrokeSurface::new();
        surface.handle_event(PointerEvent {
            phase: PointerPhase::Down,
            x: 50.0,
            y: 50.0,
            pointer: 1,
        });
        // A second finger lands and moves; it must not draw.
        surface.handle_event(PointerEvent {
            phase: PointerPhase::Move,
            x: 250.0,
            y: 250.0,
            pointer: 2,
        });
        assert!(!surface.has_ink());

        // The first finger still draws.
        surface.handle_event(PointerEvent {
            phase: PointerPhase::Move,
            x: 100.0,
            y: 100.0,
            pointer: 1,
        });
        assert!(surface.has_ink());
    }

    #[test]
    fn test_pointer_out_ends_stroke_but_keeps_ink() {
        let mut surface = StrokeSurface::new();
        surface.handle_event(PointerEvent::new(PointerPhase::Down, 50.0, 50.0));
        surface.handle_event(PointerEvent::new(PointerPhase::Move, 150.0, 150.0));
        surface.handle_event(PointerEvent::new(PointerPhase::Out, 290.0, 290.0));

        let inked = inked_pixels(&surface);
        assert!(surface.has_ink());
        assert!(inked > 0);

        // Moves after the stroke ended draw nothing.
        surface.handle_event(PointerEvent::new(PointerPhase::Move, 10.0, 10.0));
        assert_eq!(inked_pixels(&surface), inked);
    }

    #[test]
    fn test_clear_resets_raster_and_flag() {
        let mut surface = StrokeSurface::new();
        surface.handle_event(PointerEvent::new(PointerPhase::Down, 50.0, 50.0));
        surface.handle_event(PointerEvent::new(PointerPhase::Move, 200.0, 200.0));
        assert!(surface.has_ink());

        surface.clear();
        assert!(!surface.has_ink());
        assert_eq!(inked_pixels(&surface), 0);
    }

    #[test]
    fn test_stroke_clipped_at_edges() {
        let mut surface = StrokeSurface::new();
        // Drawing past the raster edge must not panic.
        surface.handle_event(PointerEvent::new(PointerPhase::Down, -20.0, 140.0));
        surface.handle_event(PointerEvent::new(PointerPhase::Move, 300.0, 140.0));

        assert!(surface.has_ink());
    }
}
