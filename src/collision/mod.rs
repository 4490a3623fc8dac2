//! Per-step collision capture and buffering.
//!
//! [`ContactCollector`] is handed to the engine for the duration of each
//! step; it resolves engine bodies back to actors through the world's
//! reverse lookup and buffers one event per manifold point. The world drains
//! the buffer exactly once per iteration, after pull-sync, and drops events
//! whose actor has since been detached.

use crate::core::ActorId;
use crate::engine::{BodyHandle, ContactPoint, ContactSink};
use crate::math::Vec2;
use crate::units::UnitConverter;
use std::collections::{HashMap, VecDeque};

/// One contact point between two tracked actors during one step.
///
/// Transient: created inside the engine's presolve pass, dispatched at the
/// end of the same iteration, never kept across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The first participating actor
    pub actor_a: ActorId,

    /// The second participating actor
    pub actor_b: ActorId,

    /// Contact position, converted to screen units
    pub point: Vec2,

    /// Contact normal from the world manifold
    pub normal: Vec2,

    /// Accumulated normal impulse at the contact point
    pub normal_impulse: f32,

    /// Accumulated tangent impulse at the contact point
    pub tangent_impulse: f32,

    /// Stable identifier of the contact point within its contact
    pub contact_id: u32,
}

/// The engine-facing contact listener for one step call.
///
/// Borrows the world's reverse lookup and event buffer; contacts involving
/// an untracked body (the ground body, foreign bodies) are skipped.
pub(crate) struct ContactCollector<'a> {
    pub(crate) lookup: &'a HashMap<BodyHandle, ActorId>,
    pub(crate) converter: &'a UnitConverter,
    pub(crate) buffer: &'a mut VecDeque<CollisionEvent>,
}

impl ContactSink for ContactCollector<'_> {
    fn pre_solve(&mut self, body_a: BodyHandle, body_b: BodyHandle, normal: Vec2, points: &[ContactPoint]) {
        let (Some(&actor_a), Some(&actor_b)) = (self.lookup.get(&body_a), self.lookup.get(&body_b)) else {
            return;
        };

        for point in points {
            // Prepended; ordering within a step is solver-dependent and
            // not part of the contract.
            self.buffer.push_front(CollisionEvent {
                actor_a,
                actor_b,
                point: self.converter.to_screen_vec(point.position),
                normal,
                normal_impulse: point.normal_impulse,
                tangent_impulse: point.tangent_impulse,
                contact_id: point.id,
            });
        }
    }
}
