//! Voltage sources.

use serde::{Deserialize, Serialize};

/// A battery: the only voltage source in the sandbox.
///
/// Batteries are ideal, with no internal resistance. Whatever EMF is set here
/// drives every series loop the battery participates in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryProps {
    /// EMF in volts.
    pub voltage: f64,
}

impl BatteryProps {
    /// Default battery voltage in volts.
    pub const DEFAULT_VOLTAGE: f64 = 9.0;
}

impl Default for BatteryProps {
    fn default() -> Self {
        Self {
            voltage: Self::DEFAULT_VOLTAGE,
        }
    }
}
