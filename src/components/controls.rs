//! Control components: Switch.

use serde::{Deserialize, Serialize};

/// A switch component.
///
/// An open switch interrupts its loop entirely: the solver skips any loop
/// containing one, rather than modeling a large open resistance. A closed
/// switch conducts with no resistance of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchProps {
    pub closed: bool,
}

impl SwitchProps {
    /// Toggle the switch state.
    pub fn toggle(&mut self) {
        self.closed = !self.closed;
    }
}

impl Default for SwitchProps {
    fn default() -> Self {
        Self { closed: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_state() {
        let mut sw = SwitchProps::default();
        assert!(sw.closed);
        sw.toggle();
        assert!(!sw.closed);
        sw.toggle();
        assert!(sw.closed);
    }
}
