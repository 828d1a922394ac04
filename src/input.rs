use glam::Vec2;
use winit::event::{ElementState, Touch, TouchPhase};

use crate::gesture::TouchPoint;

/// Touch id used when the left mouse button stands in for a finger.
pub const MOUSE_TOUCH_ID: u64 = u64::MAX;

/// What the controls should hear about after a raw touch event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchChange {
    /// The set of fingers changed and is not empty.
    Begin,
    Move,
    /// The last finger lifted.
    End,
    Ignored,
}

/// Active touches in the order they went down, keyed by platform touch id.
pub struct TouchTracker {
    touches: Vec<(u64, Vec2)>,
    pub mouse_position: Vec2,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self {
            touches: Vec::new(),
            mouse_position: Vec2::ZERO,
        }
    }

    pub fn handle_touch(&mut self, touch: &Touch) -> TouchChange {
        let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        match touch.phase {
            TouchPhase::Started => self.press(touch.id, position),
            TouchPhase::Moved => self.moved(touch.id, position),
            TouchPhase::Ended | TouchPhase::Cancelled => self.release(touch.id),
        }
    }

    pub fn handle_mouse_button(&mut self, state: ElementState) -> TouchChange {
        match state {
            ElementState::Pressed => self.press(MOUSE_TOUCH_ID, self.mouse_position),
            ElementState::Released => self.release(MOUSE_TOUCH_ID),
        }
    }

    pub fn handle_mouse_move(&mut self, position: Vec2) -> TouchChange {
        self.mouse_position = position;
        self.moved(MOUSE_TOUCH_ID, position)
    }

    pub fn press(&mut self, id: u64, position: Vec2) -> TouchChange {
        match self.touches.iter_mut().find(|(tid, _)| *tid == id) {
            Some((_, p)) => {
                *p = position;
                TouchChange::Move
            }
            None => {
                self.touches.push((id, position));
                TouchChange::Begin
            }
        }
    }

    pub fn moved(&mut self, id: u64, position: Vec2) -> TouchChange {
        match self.touches.iter_mut().find(|(tid, _)| *tid == id) {
            Some((_, p)) if *p != position => {
                *p = position;
                TouchChange::Move
            }
            _ => TouchChange::Ignored,
        }
    }

    pub fn release(&mut self, id: u64) -> TouchChange {
        let before = self.touches.len();
        self.touches.retain(|(tid, _)| *tid != id);
        if self.touches.len() == before {
            TouchChange::Ignored
        } else if self.touches.is_empty() {
            TouchChange::End
        } else {
            TouchChange::Begin
        }
    }

    /// The active touches stamped with `timestamp` (milliseconds).
    pub fn points(&self, timestamp: f64) -> Vec<TouchPoint> {
        self.touches
            .iter()
            .map(|(_, p)| TouchPoint::new(p.x, p.y, timestamp))
            .collect()
    }
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new()
    }
}
