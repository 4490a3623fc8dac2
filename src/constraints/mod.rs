//! Joint bookkeeping.
//!
//! A [`Joint`] wraps one engine constraint and records its two endpoints.
//! Endpoints keep only id back-references; ownership stays with the world,
//! which guarantees each engine handle is destroyed exactly once even when
//! teardown cascades from either side.

use crate::core::ActorId;
use crate::engine::JointHandle;

/// The kind of constraint a joint represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    /// Keeps two anchors a fixed distance apart
    Distance,

    /// Pins two bodies together at a shared pivot
    Revolute,

    /// Restricts relative motion to one translation axis
    Prismatic,

    /// Links two bodies over an idealized pulley
    Pulley,

    /// Drags one body toward a moving pointer target
    Mouse,
}

/// One endpoint of a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointEndpoint {
    /// The world's fixed ground body (mouse joints anchor here)
    Ground,

    /// A tracked actor's body
    Actor(ActorId),
}

/// A live constraint between two endpoints
pub struct Joint {
    pub(crate) kind: JointKind,
    pub(crate) endpoint_a: JointEndpoint,
    pub(crate) endpoint_b: JointEndpoint,
    pub(crate) handle: JointHandle,
}

impl Joint {
    pub(crate) fn new(kind: JointKind, endpoint_a: JointEndpoint, endpoint_b: JointEndpoint, handle: JointHandle) -> Self {
        Self {
            kind,
            endpoint_a,
            endpoint_b,
            handle,
        }
    }

    /// Returns the kind of constraint this joint represents
    pub fn kind(&self) -> JointKind {
        self.kind
    }

    /// Returns both endpoints of the joint
    pub fn endpoints(&self) -> [JointEndpoint; 2] {
        [self.endpoint_a, self.endpoint_b]
    }
}
