//! Series DC solver.
//!
//! This module provides the numerical engine for the sandbox.
//!
//! ## Series loop solving
//!
//! Each discovered loop is treated as an independent series circuit and
//! solved with Ohm's law:
//!
//! 1. Skip the loop if it contains an open switch (no current).
//! 2. Sum battery voltages into `V_total` and resistor/lamp resistances
//!    into `R_total` (floored at [`MIN_LOOP_RESISTANCE`] when exactly
//!    zero, modeling a near-short instead of dividing by zero).
//! 3. `I = V_total / R_total`; the same current flows through every
//!    element in the loop.
//! 4. Per element: `V = I * R` for resistive kinds, the source voltage
//!    for batteries, zero for switches.
//!
//! Parallel loops are never combined into a mesh system: the first loop
//! that yields a result wins, and that behavior is part of the observable
//! contract.

mod dc;
mod summary;

pub use dc::{apply_lamp_glow, solve, CurrentFlow, DcSolution};
pub use summary::{summarize, AnalysisSummary, SummaryRow};

/// Substitute resistance for a loop whose resistive sum is exactly zero,
/// in ohms.
pub const MIN_LOOP_RESISTANCE: f64 = 0.01;
