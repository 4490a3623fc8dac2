use bitflags::bitflags;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// How a tracked actor participates in the simulation.
///
/// A tracked body holds an engine body handle iff its mode is not `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum BodyMode {
    /// The actor is attached but not simulated; no engine body exists
    #[default]
    None,

    /// Fully simulated: gravity, forces and collisions move the actor
    Dynamic,

    /// Immovable, but dynamic bodies collide with it
    Static,
}

bitflags! {
    /// Flags controlling the behavior of tracked bodies
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BodyFlags: u32 {
        /// Continuous collision detection for fast-moving bodies
        const BULLET = 0x01;

        /// The actor may be grabbed and dragged with a pointer device
        const MANIPULATABLE = 0x02;
    }
}
