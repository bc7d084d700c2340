use glam::Vec2;
use rustc_hash::FxHashSet;

/// Pointer buttons the orbit controls react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Rotate.
    Primary,
    /// Pan.
    Secondary,
    Middle,
}

impl PointerButton {
    /// Maps a DOM `MouseEvent.button` code.
    pub fn from_dom_button(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Pointer state accumulated between two frames of one viewport.
#[derive(Default, Debug, Clone)]
pub struct Input {
    /// Cursor position inside the surface.
    pub cursor_position: Vec2,
    /// Cursor movement since the last frame.
    pub cursor_delta: Vec2,
    /// Wheel movement since the last frame, in lines.
    pub scroll_delta: Vec2,
    /// Surface size in pixels.
    pub screen_size: Vec2,
    pub buttons: FxHashSet<PointerButton>,
    has_cursor: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame deltas.
    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn handle_cursor_move(&mut self, x: f32, y: f32) {
        let new_pos = Vec2::new(x, y);
        // First sample only establishes the position.
        if self.has_cursor {
            self.cursor_delta += new_pos - self.cursor_position;
        }
        self.cursor_position = new_pos;
        self.has_cursor = true;
    }

    pub fn handle_cursor_left(&mut self) {
        self.has_cursor = false;
        self.buttons.clear();
    }

    pub fn handle_button(&mut self, button: PointerButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    /// Accumulates wheel movement. Pixel deltas are scaled down to lines.
    pub fn handle_wheel(&mut self, dx: f32, dy: f32, in_pixels: bool) {
        let delta = Vec2::new(dx, dy);
        self.scroll_delta += if in_pixels { delta * 0.1 } else { delta };
    }

    /// DOM `pointerdown`/`pointerup`. Unknown button codes are ignored.
    pub fn handle_dom_button(&mut self, code: i16, pressed: bool) {
        if let Some(button) = PointerButton::from_dom_button(code) {
            self.handle_button(button, pressed);
        }
    }

    /// DOM `wheel`. `deltaY > 0` scrolls down, which zooms out, while
    /// `scroll_delta.y > 0` zooms in, hence the flipped sign. `delta_mode` 0
    /// is `DOM_DELTA_PIXEL`.
    pub fn handle_dom_wheel(&mut self, delta_x: f64, delta_y: f64, delta_mode: u32) {
        self.handle_wheel(-delta_x as f32, -delta_y as f32, delta_mode == 0);
    }

    pub fn is_button_pressed(&self, button: PointerButton) -> bool {
        self.buttons.contains(&button)
    }
}
