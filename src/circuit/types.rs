//! Core types for circuit representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a component, stable for the component's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// A unique identifier for a connection (wire) between two terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// A terminal index, unique within its owning component (not globally).
/// Every supported component is a two-terminal device, so this is 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TerminalId(pub usize);

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// A 2D point. The engine treats geometry as opaque data: it is preserved,
/// relocated on move, and handed to the external renderer untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by an offset.
    pub fn offset_by(self, offset: Point) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
        }
    }
}

/// Angular orientation of a component, in 90-degree steps.
///
/// Rotation has no electrical effect; it exists only so the renderer can
/// draw the component the way the user left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// The next 90-degree step, wrapping past 270 back to 0.
    pub fn rotated(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    /// Orientation in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> u16 {
        rotation.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> std::result::Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::R0),
            90 => Ok(Rotation::R90),
            180 => Ok(Rotation::R180),
            270 => Ok(Rotation::R270),
            other => Err(format!("rotation must be 0/90/180/270, got {other}")),
        }
    }
}

/// One of a component's two connection points.
///
/// Terminals do not store a back-reference to the connection attached to
/// them: connections own the relationship, and the editor maintains a
/// derived `(component, terminal) -> connection` index instead. This keeps
/// both sides consistent by construction under arbitrary edit sequences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    pub id: TerminalId,
    /// Offset relative to the component center (rendering only).
    pub offset: Point,
}

/// One end of a connection: a terminal on a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub component: ComponentId,
    pub terminal: TerminalId,
}

impl Endpoint {
    pub fn new(component: ComponentId, terminal: TerminalId) -> Self {
        Self {
            component,
            terminal,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.terminal)
    }
}

/// An undirected wire joining two terminals on two distinct components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: Endpoint,
    pub to: Endpoint,
    /// Polyline for rendering only; recomputed whenever an endpoint
    /// component moves. No electrical computation reads it.
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Connection {
    /// Whether either end lands on the given component.
    pub fn touches(&self, component: ComponentId) -> bool {
        self.from.component == component || self.to.component == component
    }

    /// Whether this connection joins the same unordered endpoint pair.
    pub fn joins(&self, a: Endpoint, b: Endpoint) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// The component at the far side of the wire, seen from `component`.
    /// Returns `None` if the wire does not touch `component`.
    pub fn peer_of(&self, component: ComponentId) -> Option<ComponentId> {
        if self.from.component == component {
            Some(self.to.component)
        } else if self.to.component == component {
            Some(self.from.component)
        } else {
            None
        }
    }
}

/// Transient selection state: a component xor a connection, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Component(ComponentId),
    Connection(ConnectionId),
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps_after_four_steps() {
        let mut r = Rotation::R0;
        for _ in 0..4 {
            r = r.rotated();
        }
        assert_eq!(r, Rotation::R0);
        assert_eq!(Rotation::R270.rotated().degrees(), 0);
    }

    #[test]
    fn rotation_rejects_off_grid_degrees() {
        assert!(Rotation::try_from(45u16).is_err());
        assert_eq!(Rotation::try_from(180u16).unwrap(), Rotation::R180);
    }

    #[test]
    fn connection_joins_either_direction() {
        let a = Endpoint::new(ComponentId(1), TerminalId(0));
        let b = Endpoint::new(ComponentId(2), TerminalId(1));
        let wire = Connection {
            id: ConnectionId(7),
            from: a,
            to: b,
            points: vec![],
        };
        assert!(wire.joins(a, b));
        assert!(wire.joins(b, a));
        assert_eq!(wire.peer_of(ComponentId(1)), Some(ComponentId(2)));
        assert_eq!(wire.peer_of(ComponentId(9)), None);
    }
}
