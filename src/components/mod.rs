//! Component models for the circuit sandbox.
//!
//! This module provides models for all supported circuit components:
//! - Sources: Battery
//! - Loads: Resistor, Lamp
//! - Controls: Switch
//!
//! Every component is a two-terminal device. Electrical behavior lives in
//! the per-kind property structs; the [`Component`] record adds identity,
//! placement, and terminals on top.

mod controls;
mod loads;
mod sources;

pub use controls::SwitchProps;
pub use loads::{LampGlow, LampProps, ResistorProps};
pub use sources::BatteryProps;

use serde::{Deserialize, Serialize};

use crate::circuit::{ComponentId, Point, Rotation, Terminal, TerminalId};

/// Horizontal distance from a component's center to each of its terminals
/// (rendering only).
pub const TERMINAL_SPAN: f64 = 30.0;

/// The closed set of component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Battery,
    Resistor,
    Lamp,
    Switch,
}

impl ComponentKind {
    /// Human-readable label for display rows.
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Battery => "Battery",
            ComponentKind::Resistor => "Resistor",
            ComponentKind::Lamp => "Lamp",
            ComponentKind::Switch => "Switch",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Type-specific properties. The variant is the component's type; there is
/// no separate kind field to fall out of sync with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentProps {
    Battery(BatteryProps),
    Resistor(ResistorProps),
    Lamp(LampProps),
    Switch(SwitchProps),
}

impl ComponentProps {
    /// Default properties for a kind.
    pub fn default_for(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Battery => ComponentProps::Battery(BatteryProps::default()),
            ComponentKind::Resistor => ComponentProps::Resistor(ResistorProps::default()),
            ComponentKind::Lamp => ComponentProps::Lamp(LampProps::default()),
            ComponentKind::Switch => ComponentProps::Switch(SwitchProps::default()),
        }
    }

    /// The kind this property set belongs to.
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentProps::Battery(_) => ComponentKind::Battery,
            ComponentProps::Resistor(_) => ComponentKind::Resistor,
            ComponentProps::Lamp(_) => ComponentKind::Lamp,
            ComponentProps::Switch(_) => ComponentKind::Switch,
        }
    }

    /// Resistance contributed to a series loop. Batteries and switches
    /// contribute none; a burned-out lamp still presents its filament
    /// resistance.
    pub fn resistance(&self) -> Option<f64> {
        match self {
            ComponentProps::Resistor(r) => Some(r.resistance),
            ComponentProps::Lamp(l) => Some(l.resistance),
            ComponentProps::Battery(_) | ComponentProps::Switch(_) => None,
        }
    }

    /// Source voltage, for batteries.
    pub fn source_voltage(&self) -> Option<f64> {
        match self {
            ComponentProps::Battery(b) => Some(b.voltage),
            _ => None,
        }
    }

    /// Whether this component counts as a resistive element (resistor or
    /// lamp) for short-circuit classification.
    pub fn is_resistive(&self) -> bool {
        matches!(self, ComponentProps::Resistor(_) | ComponentProps::Lamp(_))
    }

    /// Whether this is a switch in the open position.
    pub fn is_open_switch(&self) -> bool {
        matches!(self, ComponentProps::Switch(s) if !s.closed)
    }

    pub fn as_lamp(&self) -> Option<&LampProps> {
        match self {
            ComponentProps::Lamp(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_lamp_mut(&mut self) -> Option<&mut LampProps> {
        match self {
            ComponentProps::Lamp(l) => Some(l),
            _ => None,
        }
    }

    /// Shallow-merge a partial update. Fields that do not apply to this
    /// kind are ignored; no range validation happens here.
    pub fn apply(&mut self, patch: &PropertyPatch) {
        match self {
            ComponentProps::Battery(b) => {
                if let Some(v) = patch.voltage {
                    b.voltage = v;
                }
            }
            ComponentProps::Resistor(r) => {
                if let Some(ohms) = patch.resistance {
                    r.resistance = ohms;
                }
            }
            ComponentProps::Lamp(l) => {
                if let Some(ohms) = patch.resistance {
                    l.resistance = ohms;
                }
                if let Some(v) = patch.min_voltage {
                    l.min_voltage = v;
                }
                if let Some(a) = patch.max_current {
                    l.max_current = a;
                }
                if let Some(b) = patch.brightness {
                    l.brightness = b;
                }
                if let Some(burned) = patch.burned_out {
                    l.burned_out = burned;
                }
            }
            ComponentProps::Switch(s) => {
                if let Some(closed) = patch.closed {
                    s.closed = closed;
                }
            }
        }
    }
}

/// A partial property update, as produced by a properties panel. Every
/// field is optional; only the ones present are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyPatch {
    pub voltage: Option<f64>,
    pub resistance: Option<f64>,
    pub min_voltage: Option<f64>,
    pub max_current: Option<f64>,
    pub brightness: Option<f64>,
    pub burned_out: Option<bool>,
    pub closed: Option<bool>,
}

impl PropertyPatch {
    pub fn voltage(v: f64) -> Self {
        Self {
            voltage: Some(v),
            ..Self::default()
        }
    }

    pub fn resistance(ohms: f64) -> Self {
        Self {
            resistance: Some(ohms),
            ..Self::default()
        }
    }

    pub fn closed(closed: bool) -> Self {
        Self {
            closed: Some(closed),
            ..Self::default()
        }
    }

    /// Reset a lamp's burnout latch.
    pub fn reset_burnout() -> Self {
        Self {
            burned_out: Some(false),
            ..Self::default()
        }
    }
}

/// One placed circuit element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    /// Canvas position of the component center (rendering only).
    pub position: Point,
    #[serde(default)]
    pub rotation: Rotation,
    pub props: ComponentProps,
    /// Exactly two terminals, in template order.
    pub terminals: [Terminal; 2],
}

impl Component {
    /// Create a component of the given kind with default properties and
    /// the standard two-terminal template.
    pub fn new(id: ComponentId, kind: ComponentKind, position: Point, rotation: Rotation) -> Self {
        Self {
            id,
            position,
            rotation,
            props: ComponentProps::default_for(kind),
            terminals: [
                Terminal {
                    id: TerminalId(0),
                    offset: Point::new(-TERMINAL_SPAN, 0.0),
                },
                Terminal {
                    id: TerminalId(1),
                    offset: Point::new(TERMINAL_SPAN, 0.0),
                },
            ],
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.props.kind()
    }

    pub fn terminal(&self, id: TerminalId) -> Option<&Terminal> {
        self.terminals.iter().find(|t| t.id == id)
    }

    /// Absolute position of a terminal: component center plus offset.
    pub fn terminal_position(&self, id: TerminalId) -> Option<Point> {
        self.terminal(id).map(|t| self.position.offset_by(t.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_kind() {
        for kind in [
            ComponentKind::Battery,
            ComponentKind::Resistor,
            ComponentKind::Lamp,
            ComponentKind::Switch,
        ] {
            assert_eq!(ComponentProps::default_for(kind).kind(), kind);
        }
    }

    #[test]
    fn patch_ignores_inapplicable_fields() {
        let mut props = ComponentProps::default_for(ComponentKind::Battery);
        props.apply(&PropertyPatch {
            resistance: Some(470.0),
            closed: Some(false),
            voltage: Some(12.0),
            ..PropertyPatch::default()
        });
        assert_eq!(props.source_voltage(), Some(12.0));
        assert_eq!(props.resistance(), None);
    }

    #[test]
    fn terminal_positions_follow_component() {
        let c = Component::new(
            ComponentId(1),
            ComponentKind::Resistor,
            Point::new(100.0, 40.0),
            Rotation::R0,
        );
        let left = c.terminal_position(TerminalId(0)).unwrap();
        assert_eq!(left, Point::new(100.0 - TERMINAL_SPAN, 40.0));
        assert!(c.terminal_position(TerminalId(5)).is_none());
    }
}
