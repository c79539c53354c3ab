//! Boolean flag primitive.

/// A boolean that can be flipped or set absolutely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleState {
    value: bool,
}

impl ToggleState {
    pub fn new(initial: bool) -> Self {
        Self { value: initial }
    }

    pub fn value(&self) -> bool {
        self.value
    }

    /// Flip the flag, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.value = !self.value;
        self.value
    }

    pub fn set_true(&mut self) {
        self.value = true;
    }

    pub fn set_false(&mut self) {
        self.value = false;
    }

    pub fn set(&mut self, value: bool) {
        self.value = value;
    }
}

impl From<bool> for ToggleState {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips() {
        let mut flag = ToggleState::default();
        assert!(!flag.value());
        assert!(flag.toggle());
        assert!(!flag.toggle());
    }

    #[test]
    fn test_absolute_setters_are_idempotent() {
        let mut flag = ToggleState::new(false);
        flag.set_true();
        flag.set_true();
        assert!(flag.value());
        flag.set_false();
        flag.set_false();
        assert!(!flag.value());
    }
}
