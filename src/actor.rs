use crate::math::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

/// The scene-graph side of the bridge.
///
/// The host scene graph implements this for whatever its visual elements are;
/// the bridge only ever reads geometry before stepping and writes the
/// simulated pose back afterwards. Positions are the actor's top-left corner
/// in screen units, rotation is in degrees.
pub trait Actor {
    /// Top-left position of the actor, in screen units
    fn position(&self) -> Vec2;

    /// Moves the actor to a new top-left position, in screen units
    fn set_position(&mut self, position: Vec2);

    /// Rotation of the actor, in degrees
    fn rotation(&self) -> f32;

    /// Rotates the actor, in degrees
    fn set_rotation(&mut self, degrees: f32);

    /// Current size of the actor as (width, height), in screen units
    fn size(&self) -> (f32, f32);
}

/// Shared reference to a host actor.
///
/// The bridge is single-threaded and cooperative, so `Rc<RefCell<_>>` models
/// the shared mutable access honestly: the world borrows an actor only for
/// the duration of one sync read or write.
pub type ActorRef = Rc<RefCell<dyn Actor>>;
