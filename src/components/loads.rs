//! Resistive loads: Resistor and Lamp.

use serde::{Deserialize, Serialize};

/// A fixed resistor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistorProps {
    /// Resistance in ohms.
    pub resistance: f64,
}

impl ResistorProps {
    /// Default resistance in ohms.
    pub const DEFAULT_RESISTANCE: f64 = 100.0;
}

impl Default for ResistorProps {
    fn default() -> Self {
        Self {
            resistance: Self::DEFAULT_RESISTANCE,
        }
    }
}

/// An incandescent lamp.
///
/// Electrically a fixed resistance; visually a brightness in [0, 100]
/// derived from the voltage across it. Driving more than `max_current`
/// through the filament burns it out: brightness drops to zero and stays
/// there until `burned_out` is reset from outside. A burned-out lamp keeps
/// its filament resistance and still conducts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LampProps {
    /// Filament resistance in ohms.
    pub resistance: f64,
    /// Minimum voltage before the lamp visibly lights, in volts.
    pub min_voltage: f64,
    /// Rated maximum current in amperes; exceeding it burns the lamp out.
    pub max_current: f64,
    /// Last computed brightness percentage, 0-100.
    pub brightness: f64,
    /// Burnout latch. Once set, only an external property reset clears it.
    pub burned_out: bool,
}

impl Default for LampProps {
    fn default() -> Self {
        Self {
            resistance: 50.0,
            min_voltage: 1.5,
            max_current: 0.2,
            brightness: 0.0,
            burned_out: false,
        }
    }
}

/// The visual outcome of one solve for a lamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LampGlow {
    pub brightness: f64,
    pub burned_out: bool,
}

impl LampProps {
    /// Evaluate the lamp's visual state for the given solved voltage and
    /// current.
    ///
    /// Brightness ramps linearly from the lighting threshold up to full at
    /// four times `min_voltage`:
    ///
    /// ```text
    /// brightness = round(20 + min(v / (4 * min_voltage), 1) * 80)
    /// ```
    ///
    /// A non-positive `min_voltage` is treated as an already-met threshold
    /// so out-of-range properties cannot produce NaN brightness.
    pub fn glow(&self, voltage: f64, current: f64) -> LampGlow {
        if self.burned_out {
            return LampGlow {
                brightness: 0.0,
                burned_out: true,
            };
        }
        if current > self.max_current {
            return LampGlow {
                brightness: 0.0,
                burned_out: true,
            };
        }
        if voltage < self.min_voltage {
            return LampGlow {
                brightness: 0.0,
                burned_out: false,
            };
        }
        let ratio = if self.min_voltage > 0.0 {
            voltage / (4.0 * self.min_voltage)
        } else {
            1.0
        };
        LampGlow {
            brightness: (20.0 + ratio.min(1.0) * 80.0).round().clamp(0.0, 100.0),
            burned_out: false,
        }
    }

    /// Store a computed glow back into the properties.
    pub fn set_glow(&mut self, glow: LampGlow) {
        self.brightness = glow.brightness;
        self.burned_out = glow.burned_out;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn dark_below_threshold() {
        let lamp = LampProps::default();
        let glow = lamp.glow(1.0, 0.02);
        assert_eq!(glow.brightness, 0.0);
        assert!(!glow.burned_out);
    }

    #[test]
    fn ramps_between_threshold_and_four_times() {
        let lamp = LampProps::default();
        // 3V across a 1.5V-threshold lamp: ratio 0.5 -> 20 + 40 = 60.
        let glow = lamp.glow(3.0, 0.06);
        assert_relative_eq!(glow.brightness, 60.0);
        assert!(!glow.burned_out);
    }

    #[test]
    fn saturates_at_full_brightness() {
        let lamp = LampProps::default();
        // Anything at or past 4 * min_voltage pegs at 100.
        assert_eq!(lamp.glow(6.0, 0.12).brightness, 100.0);
        assert_eq!(lamp.glow(40.0, 0.1).brightness, 100.0);
    }

    #[test]
    fn overcurrent_burns_out_and_latches() {
        let mut lamp = LampProps::default();
        let glow = lamp.glow(12.0, 0.24);
        assert!(glow.burned_out);
        assert_eq!(glow.brightness, 0.0);
        lamp.set_glow(glow);

        // Once burned out, a safe solve no longer lights the lamp.
        let after = lamp.glow(3.0, 0.06);
        assert!(after.burned_out);
        assert_eq!(after.brightness, 0.0);

        // External reset brings it back.
        lamp.burned_out = false;
        assert!(lamp.glow(3.0, 0.06).brightness > 0.0);
    }

    #[test]
    fn zero_threshold_lamp_never_divides_by_zero() {
        let lamp = LampProps {
            min_voltage: 0.0,
            ..LampProps::default()
        };
        let glow = lamp.glow(0.5, 0.01);
        assert_eq!(glow.brightness, 100.0);
    }
}
