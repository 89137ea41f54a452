//! Player input events
//!
//! Host callbacks push edge-triggered events here; the tick drains the queue
//! once before the physics step so the simulation stays the single writer.

/// Gameplay inputs the simulation understands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Step up to the cue ball (idle -> aiming)
    BeginAim,
    /// Set the aim angle around the vertical axis
    Aim { angle: f32 },
    /// Shoot button: first press starts the power gauge, second press fires
    Shoot,
    /// Pointer over the table while the cue ball is in hand
    MoveCueBall { x: f32, z: f32 },
    /// Drop the cue ball where it is (repositioning -> idle)
    ConfirmPlacement,
    /// Start a new rack
    Reset,
}

/// A queue of input events.
#[derive(Debug, Clone)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
