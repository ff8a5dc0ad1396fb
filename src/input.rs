use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Collects the raw input the viewer reacts to between two frames.
///
/// Keys are reported once per physical press (auto-repeat is ignored). The cursor
/// only accumulates drag distance while the left button is held, and every wheel
/// event counts as one notch regardless of its magnitude.
#[derive(Debug, Default)]
pub struct Input {
    pressed: Vec<KeyCode>,
    held: HashSet<KeyCode>,
    dragging: bool,
    cursor: Option<Vec2>,
    drag_delta: Vec2,
    wheel_notches: i32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.drag_delta = Vec2::ZERO;
        self.wheel_notches = 0;
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.key(key, event.state);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor_left(),
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.wheel(y);
            }
            _ => {}
        }
    }

    fn key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.held.insert(key) {
                    self.pressed.push(key);
                }
            }
            ElementState::Released => {
                self.held.remove(&key);
            }
        }
    }

    fn cursor_moved(&mut self, position: Vec2) {
        if self.dragging
            && let Some(last) = self.cursor
        {
            self.drag_delta += position - last;
        }
        self.cursor = Some(position);
    }

    /// Leaving the window ends any drag; the button release may never arrive.
    fn cursor_left(&mut self) {
        self.cursor = None;
        self.dragging = false;
    }

    /// Positive `y` scrolls away from the user.
    fn wheel(&mut self, y: f32) {
        if y > 0.0 {
            self.wheel_notches += 1;
        } else if y < 0.0 {
            self.wheel_notches -= 1;
        }
    }

    /// Keys pressed this frame, in press order.
    pub fn pressed_keys(&self) -> &[KeyCode] {
        &self.pressed
    }

    /// Cursor movement in pixels while the left button was held this frame.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    /// Wheel notches this frame; positive means scrolled away from the user.
    pub fn wheel_notches(&self) -> i32 {
        self.wheel_notches
    }
}
