//! Held-key input state
//!
//! Key handlers set flags between ticks; the physics step reads a consistent
//! snapshot once per tick. Movement keys are level-triggered (held), the
//! pause key is edge-triggered so holding it doesn't retoggle every tick.

/// Keys the simulation understands. Anything else is ignored at the
/// `apply_key` boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Player 1 up ("w")
    Up1,
    /// Player 1 down ("s")
    Down1,
    /// Player 2 up (ArrowUp)
    Up2,
    /// Player 2 down (ArrowDown)
    Down2,
    /// Pause toggle (Escape or "p")
    Pause,
}

impl Key {
    /// Map a raw browser key name. Unknown keys return `None`.
    pub fn parse(raw: &str) -> Option<Key> {
        match raw {
            "w" | "W" => Some(Key::Up1),
            "s" | "S" => Some(Key::Down1),
            "ArrowUp" => Some(Key::Up2),
            "ArrowDown" => Some(Key::Down2),
            "Escape" | "p" | "P" => Some(Key::Pause),
            _ => None,
        }
    }
}

/// Snapshot of held movement keys plus the debounced pause edge.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub up1: bool,
    pub down1: bool,
    pub up2: bool,
    pub down2: bool,
    /// Pause key currently held (for edge detection)
    pause_held: bool,
    /// Set on pause key-down, cleared when consumed
    pause_edge: bool,
}

impl InputState {
    /// Record a key transition.
    pub fn set_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Up1 => self.up1 = pressed,
            Key::Down1 => self.down1 = pressed,
            Key::Up2 => self.up2 = pressed,
            Key::Down2 => self.down2 = pressed,
            Key::Pause => {
                if pressed && !self.pause_held {
                    self.pause_edge = true;
                }
                self.pause_held = pressed;
            }
        }
    }

    /// Returns true exactly once per pause key-down.
    pub fn take_pause_edge(&mut self) -> bool {
        std::mem::take(&mut self.pause_edge)
    }

    /// Drop all held state (on match reset, so stale keys don't move paddles).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys_are_level_triggered() {
        let mut input = InputState::default();
        input.set_key(Key::Up1, true);
        input.set_key(Key::Down2, true);
        assert!(input.up1);
        assert!(input.down2);
        input.set_key(Key::Up1, false);
        assert!(!input.up1);
        assert!(input.down2);
    }

    #[test]
    fn test_pause_edge_fires_once_per_press() {
        let mut input = InputState::default();
        input.set_key(Key::Pause, true);
        assert!(input.take_pause_edge());
        // Held across several ticks: no retrigger
        input.set_key(Key::Pause, true);
        assert!(!input.take_pause_edge());
        assert!(!input.take_pause_edge());
        // Release and press again: new edge
        input.set_key(Key::Pause, false);
        input.set_key(Key::Pause, true);
        assert!(input.take_pause_edge());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        assert_eq!(Key::parse("x"), None);
        assert_eq!(Key::parse("Enter"), None);
        assert_eq!(Key::parse("ArrowUp"), Some(Key::Up2));
    }
}
