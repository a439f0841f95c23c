//! Key-to-circle bindings and dispatch
//!
//! Key codes are Win32 virtual-key codes. The top-row digits share their
//! codes with ASCII ('1' is 0x31), so the default binding reads naturally
//! as "press 1 for the first circle".

use crate::domain::entity::Circle;

const VK_1: u32 = 0x31;
const VK_NUMPAD1: u32 = 0x61;

/// Single key bound to a circle index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: u32,
    pub index: usize,
}

/// Maps raw key codes to circle indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: Vec<KeyBinding>,
}

impl KeyBindings {
    /// Digits 1..=9 are the only numeric keys available
    pub const MAX_NUMERIC_KEYS: usize = 9;

    /// Binds keys 1..N (top row and numpad) to indices 0..N-1
    ///
    /// Counts above [`Self::MAX_NUMERIC_KEYS`] are clamped.
    pub fn numeric(count: usize) -> Self {
        let count = count.min(Self::MAX_NUMERIC_KEYS);
        let mut bindings = Vec::with_capacity(count * 2);
        for index in 0..count {
            let offset = index as u32;
            bindings.push(KeyBinding {
                key: VK_1 + offset,
                index,
            });
            bindings.push(KeyBinding {
                key: VK_NUMPAD1 + offset,
                index,
            });
        }
        Self { bindings }
    }

    /// Custom binding table
    pub fn new(bindings: Vec<KeyBinding>) -> Self {
        Self { bindings }
    }

    /// Circle index for a key, if the key is bound
    pub fn index_for_key(&self, key: u32) -> Option<usize> {
        self.bindings
            .iter()
            .find(|binding| binding.key == key)
            .map(|binding| binding.index)
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }
}

/// Result of a key that toggled a circle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    pub index: usize,
    pub running: bool,
}

/// Turns key presses into run-flag toggles
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    bindings: KeyBindings,
}

impl InputDispatcher {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Toggles the circle bound to `key`
    ///
    /// Unbound keys and indices past the end of `circles` are ignored.
    pub fn dispatch<'a, I>(&self, key: u32, circles: I) -> Option<KeyOutcome>
    where
        I: IntoIterator<Item = &'a Circle>,
    {
        let index = self.bindings.index_for_key(key)?;
        let circle = circles.into_iter().nth(index)?;
        let running = circle.toggle_running();
        log::debug!("Key {key:#04x} toggled circle {index} (running: {running})");
        Some(KeyOutcome { index, running })
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }
}
