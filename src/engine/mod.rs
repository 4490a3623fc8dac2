//! The physics-engine side of the bridge.
//!
//! Broad-phase, narrow-phase and the constraint solver are external: the
//! bridge drives an engine implementation through [`PhysicsEngine`] and
//! receives contact manifolds back through [`ContactSink`] during `step`.

use crate::bodies::Material;
use crate::math::Vec2;
use crate::shapes::CollisionShape;

/// A unique identifier for a body inside the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// A unique identifier for a fixture (shape + material) inside the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixtureHandle(pub u32);

/// A unique identifier for a joint inside the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(pub u32);

/// How a body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Fully simulated: affected by gravity, forces and collisions
    Dynamic,

    /// Never moves, but dynamic bodies collide with it
    Static,
}

/// One contact point reported by the engine during its solve pass.
/// Positions are in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// World-space position of the contact
    pub position: Vec2,

    /// Accumulated normal impulse at this point
    pub normal_impulse: f32,

    /// Accumulated tangent impulse at this point
    pub tangent_impulse: f32,

    /// Stable identifier for this contact point within the contact
    pub id: u32,
}

/// Receives contact manifolds while the engine steps.
///
/// Registered for the whole step call; the engine invokes it from its
/// presolve pass for every contact with at least one manifold point.
pub trait ContactSink {
    /// Reports one contact between two bodies with its world-manifold normal
    /// and manifold points
    fn pre_solve(&mut self, body_a: BodyHandle, body_b: BodyHandle, normal: Vec2, points: &[ContactPoint]);
}

/// Engine-specific description of a joint to create.
///
/// All anchors and targets are in world units; conversion from screen units
/// happens before a definition is built.
#[derive(Debug, Clone, PartialEq)]
pub enum JointDef {
    /// Keeps two anchor points a fixed distance apart
    Distance {
        body_a: BodyHandle,
        body_b: BodyHandle,
        /// World-space anchor on the first body
        anchor_a: Vec2,
        /// World-space anchor on the second body
        anchor_b: Vec2,
        /// Rest length between the anchors
        length: f32,
        /// Whether the connected bodies still collide with each other
        collide_connected: bool,
    },

    /// Pins two bodies together at a point they rotate around
    Revolute {
        body_a: BodyHandle,
        body_b: BodyHandle,
        /// Shared world-space anchor
        anchor: Vec2,
        collide_connected: bool,
    },

    /// Constrains relative motion to translation along one axis
    Prismatic {
        body_a: BodyHandle,
        body_b: BodyHandle,
        /// Shared world-space anchor
        anchor: Vec2,
        /// Translation axis (direction only, not scaled)
        axis: Vec2,
        collide_connected: bool,
    },

    /// Two bodies hanging from ground anchors over an idealized pulley
    Pulley {
        body_a: BodyHandle,
        body_b: BodyHandle,
        /// Fixed world-space anchor the first segment hangs from
        ground_anchor_a: Vec2,
        /// Fixed world-space anchor the second segment hangs from
        ground_anchor_b: Vec2,
        /// World-space anchor on the first body
        anchor_a: Vec2,
        /// World-space anchor on the second body
        anchor_b: Vec2,
        /// Initial length of the first segment
        length_a: f32,
        /// Initial length of the second segment
        length_b: f32,
        /// Ratio between the two segment lengths
        ratio: f32,
        collide_connected: bool,
    },

    /// Soft constraint dragging a body toward a moving target point
    Mouse {
        /// The fixed ground body the constraint reacts against
        ground: BodyHandle,
        /// The dragged body
        body: BodyHandle,
        /// Initial world-space target
        target: Vec2,
        /// Maximum force the constraint may apply
        max_force: f32,
    },
}

/// Everything the bridge needs from a rigid-body engine.
///
/// Implementations own broad-phase, narrow-phase and the solver; the bridge
/// only creates and destroys resources, force-sets transforms, and steps.
pub trait PhysicsEngine {
    /// Sets the gravity vector, in world units per second squared
    fn set_gravity(&mut self, gravity: Vec2);

    /// Returns the current gravity vector
    fn gravity(&self) -> Vec2;

    /// Creates a body at the given world position and angle (radians)
    fn create_body(&mut self, kind: BodyKind, position: Vec2, angle: f32) -> BodyHandle;

    /// Destroys a body along with any fixtures still attached to it
    fn destroy_body(&mut self, body: BodyHandle);

    /// Changes how an existing body participates in the simulation
    fn set_body_kind(&mut self, body: BodyHandle, kind: BodyKind);

    /// Force-sets a body's transform, overriding solver motion
    fn set_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32);

    /// Returns a body's world position and angle (radians)
    fn transform(&self, body: BodyHandle) -> (Vec2, f32);

    /// Sets a body's linear velocity, in world units per second
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Returns a body's linear velocity
    fn linear_velocity(&self, body: BodyHandle) -> Vec2;

    /// Sets a body's angular velocity, in radians per second
    fn set_angular_velocity(&mut self, body: BodyHandle, omega: f32);

    /// Returns a body's angular velocity
    fn angular_velocity(&self, body: BodyHandle) -> f32;

    /// Marks a body for continuous collision detection
    fn set_bullet(&mut self, body: BodyHandle, bullet: bool);

    /// Returns a body's mass, derived from its fixtures
    fn mass(&self, body: BodyHandle) -> f32;

    /// Applies a force at a world-space point
    fn apply_force(&mut self, body: BodyHandle, force: Vec2, point: Vec2);

    /// Applies an impulse at a world-space point
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2, point: Vec2);

    /// Applies a torque about the body's center of mass
    fn apply_torque(&mut self, body: BodyHandle, torque: f32);

    /// Attaches a shape with material properties to a body
    fn create_fixture(&mut self, body: BodyHandle, shape: &CollisionShape, material: Material) -> FixtureHandle;

    /// Detaches and destroys a fixture
    fn destroy_fixture(&mut self, body: BodyHandle, fixture: FixtureHandle);

    /// Creates a joint from its definition
    fn create_joint(&mut self, def: &JointDef) -> JointHandle;

    /// Destroys a joint
    fn destroy_joint(&mut self, joint: JointHandle);

    /// Moves a mouse joint's drag target, in world units
    fn set_mouse_target(&mut self, joint: JointHandle, target: Vec2);

    /// Advances the simulation by `dt` seconds, reporting contacts to `contacts`
    fn step(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32, contacts: &mut dyn ContactSink);
}
