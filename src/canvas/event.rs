//! Pointer input events for the drawing surface.
//!
//! Mouse and touch input are unified into one event stream with coordinates
//! already mapped to capture resolution. Touch sources assign each finger a
//! pointer id; mouse input uses id 0.

use serde::{Deserialize, Serialize};

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Pointer pressed (mouse down / finger down).
    Down,
    /// Pointer moved while pressed.
    Move,
    /// Pointer released.
    Up,
    /// Pointer left the surface mid-stroke.
    Out,
}

/// A single pointer event in capture-resolution coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in capture-resolution pixels.
    pub x: f32,
    /// Y position in capture-resolution pixels.
    pub y: f32,
    /// Identifier distinguishing simultaneous touch points (0 for mouse).
    #[serde(default)]
    pub pointer: u32,
}

impl PointerEvent {
    /// Creates an event for the primary pointer.
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            pointer: 0,
        }
    }
}
