//! Held-key tracking for keyboard chords.

use smol_str::SmolStr;

pub const TAB: &str = "Tab";
pub const SHIFT: &str = "Shift";

/// Insertion-ordered set of currently held key names (`KeyboardEvent.key`).
///
/// Focus can leave the editor between a keydown and its keyup, so the owner
/// must call `clear` on blur or keys stay "held" forever.
#[derive(Debug, Clone, Default)]
pub struct PressedKeys {
    keys: Vec<SmolStr>,
}

impl PressedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key as held. Auto-repeat keydowns are no-ops.
    pub fn press(&mut self, key: &str) {
        if !self.is_held(key) {
            self.keys.push(SmolStr::new(key));
        }
    }

    pub fn release(&mut self, key: &str) {
        self.keys.retain(|k| k != key);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Tab is down and Shift is not.
    pub fn is_plain_tab(&self) -> bool {
        self.is_held(TAB) && !self.is_held(SHIFT)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Held keys in the order they went down.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_order() {
        let mut keys = PressedKeys::new();
        keys.press("Shift");
        keys.press("a");
        keys.press("Shift");
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["Shift", "a"]);

        keys.release("Shift");
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["a"]);

        // Releasing something never pressed is fine.
        keys.release("Meta");
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_plain_tab_detection() {
        let mut keys = PressedKeys::new();
        keys.press(TAB);
        assert!(keys.is_plain_tab());

        keys.press(SHIFT);
        assert!(!keys.is_plain_tab());

        keys.release(SHIFT);
        assert!(keys.is_plain_tab());
    }

    #[test]
    fn test_clear_forgets_stuck_keys() {
        let mut keys = PressedKeys::new();
        keys.press(SHIFT);
        keys.press(TAB);
        keys.clear();
        assert!(keys.is_empty());

        keys.press(TAB);
        assert!(keys.is_plain_tab());
    }
}
