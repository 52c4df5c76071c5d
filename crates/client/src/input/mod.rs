// Keyboard and touch input handling
use std::collections::HashSet;

/// Minimum time between two touch-button jumps (ms).
const TOUCH_JUMP_COOLDOWN_MS: f64 = 150.0;

/// On-screen touch controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
}

impl TouchButton {
    /// Key the button stands in for.
    pub fn key(self) -> &'static str {
        match self {
            TouchButton::Left => "ArrowLeft",
            TouchButton::Right => "ArrowRight",
            TouchButton::Jump => " ",
        }
    }
}

#[derive(Debug, Default)]
pub struct Input {
    pressed: HashSet<String>,
    last_touch_jump: Option<f64>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_left_key(key: &str) -> bool {
        matches!(key, "ArrowLeft" | "a" | "A")
    }

    pub fn is_right_key(key: &str) -> bool {
        matches!(key, "ArrowRight" | "d" | "D")
    }

    pub fn is_jump_key(key: &str) -> bool {
        matches!(key, " " | "ArrowUp" | "w" | "W")
    }

    /// Record a key press. Returns true only on the press edge, so held keys
    /// (auto-repeat) do not re-trigger.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.pressed.insert(key.to_string())
    }

    pub fn key_up(&mut self, key: &str) {
        self.pressed.remove(key);
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    pub fn left_held(&self) -> bool {
        self.pressed.iter().any(|k| Self::is_left_key(k))
    }

    pub fn right_held(&self) -> bool {
        self.pressed.iter().any(|k| Self::is_right_key(k))
    }

    /// Horizontal direction: -1, 0 or 1. Left wins when both are held.
    pub fn direction(&self) -> f32 {
        if self.left_held() {
            -1.0
        } else if self.right_held() {
            1.0
        } else {
            0.0
        }
    }

    /// Touch press. Direction buttons hold their key; the jump button returns
    /// true when a jump should fire, at most once per cooldown window.
    pub fn touch_start(&mut self, button: TouchButton, now: f64) -> bool {
        if button != TouchButton::Jump {
            self.key_down(button.key());
            return false;
        }
        if let Some(last) = self.last_touch_jump {
            if now - last < TOUCH_JUMP_COOLDOWN_MS {
                return false;
            }
        }
        self.last_touch_jump = Some(now);
        true
    }

    /// Touch release (or cancel).
    pub fn touch_end(&mut self, button: TouchButton) {
        if button != TouchButton::Jump {
            self.key_up(button.key());
        }
    }

    /// Release every key; used when focus or the channel is lost.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}
