//! Keyboard keys
//!
//! Keys are identified by physical position, so movement bindings work the
//! same on every keyboard layout.

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Special keys
    Escape,
    Tab,
    Space,
    Enter,

    // Arrow keys
    Left,
    Right,
    Up,
    Down,

    // Modifier keys
    Shift,
    Control,
    Alt,
}

impl Key {
    /// Convert from a winit physical key.
    pub fn from_winit(key: &winit::keyboard::PhysicalKey) -> Option<Self> {
        use winit::keyboard::{KeyCode, PhysicalKey};

        let PhysicalKey::Code(code) = key else {
            return None;
        };

        match code {
            KeyCode::KeyA => Some(Key::A),
            KeyCode::KeyB => Some(Key::B),
            KeyCode::KeyC => Some(Key::C),
            KeyCode::KeyD => Some(Key::D),
            KeyCode::KeyE => Some(Key::E),
            KeyCode::KeyF => Some(Key::F),
            KeyCode::KeyG => Some(Key::G),
            KeyCode::KeyH => Some(Key::H),
            KeyCode::KeyI => Some(Key::I),
            KeyCode::KeyJ => Some(Key::J),
            KeyCode::KeyK => Some(Key::K),
            KeyCode::KeyL => Some(Key::L),
            KeyCode::KeyM => Some(Key::M),
            KeyCode::KeyN => Some(Key::N),
            KeyCode::KeyO => Some(Key::O),
            KeyCode::KeyP => Some(Key::P),
            KeyCode::KeyQ => Some(Key::Q),
            KeyCode::KeyR => Some(Key::R),
            KeyCode::KeyS => Some(Key::S),
            KeyCode::KeyT => Some(Key::T),
            KeyCode::KeyU => Some(Key::U),
            KeyCode::KeyV => Some(Key::V),
            KeyCode::KeyW => Some(Key::W),
            KeyCode::KeyX => Some(Key::X),
            KeyCode::KeyY => Some(Key::Y),
            KeyCode::KeyZ => Some(Key::Z),
            KeyCode::Escape => Some(Key::Escape),
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::Space => Some(Key::Space),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::ArrowLeft => Some(Key::Left),
            KeyCode::ArrowRight => Some(Key::Right),
            KeyCode::ArrowUp => Some(Key::Up),
            KeyCode::ArrowDown => Some(Key::Down),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Key::Shift),
            KeyCode::ControlLeft | KeyCode::ControlRight => Some(Key::Control),
            KeyCode::AltLeft | KeyCode::AltRight => Some(Key::Alt),
            _ => None,
        }
    }

    /// Slot of this key in the input key table.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{KeyCode, NativeKeyCode, PhysicalKey};

    #[test]
    fn test_from_winit_maps_physical_codes() {
        assert_eq!(
            Key::from_winit(&PhysicalKey::Code(KeyCode::KeyW)),
            Some(Key::W)
        );
        assert_eq!(
            Key::from_winit(&PhysicalKey::Code(KeyCode::ShiftRight)),
            Some(Key::Shift)
        );
        assert_eq!(Key::from_winit(&PhysicalKey::Code(KeyCode::F13)), None);
        assert_eq!(
            Key::from_winit(&PhysicalKey::Unidentified(NativeKeyCode::Unidentified)),
            None
        );
    }
}
