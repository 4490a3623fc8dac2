use crate::actor::ActorRef;
use crate::bodies::{BodyFlags, BodyMode, Material, TrackedBody};
use crate::collision::{CollisionEvent, ContactCollector};
use crate::constraints::{Joint, JointEndpoint, JointKind};
use crate::core::{ActorId, DeviceId, JointId, JointStorage, StepConfig, Storage, TrackedStorage};
use crate::engine::{self, BodyKind, JointDef, PhysicsEngine};
use crate::error::PhysicsError;
use crate::math::Vec2;
use crate::units::UnitConverter;
use crate::Result;
use std::collections::{HashMap, VecDeque};

/// Callback invoked once per collision event involving the registered actor
pub type CollisionHandler = Box<dyn FnMut(&CollisionEvent)>;

/// The world that binds scene-graph actors to an engine simulation.
///
/// Owns the engine, every body/fixture/joint created through it, and the
/// fixed-step accumulation policy. Per animation frame the host calls
/// [`iterate`](DynamicsWorld::iterate): actor geometry is pushed into the
/// engine, the simulation advances in fixed sub-steps, simulated poses are
/// pulled back onto the actors, and buffered collision events are dispatched.
pub struct DynamicsWorld<E: PhysicsEngine> {
    engine: E,

    /// Permanently static anchor body for mouse joints and fixed anchors
    ground: engine::BodyHandle,

    converter: UnitConverter,
    config: StepConfig,

    /// All tracked bodies, one per attached actor
    bodies: TrackedStorage<TrackedBody>,

    /// Reverse lookup from engine bodies to their owning actors, maintained
    /// alongside body creation and destruction
    body_lookup: HashMap<engine::BodyHandle, ActorId>,

    /// All joints in the world
    joints: JointStorage<Joint>,

    /// Active pointer drags, one mouse joint per device
    drags: HashMap<DeviceId, JointId>,

    /// Registered per-actor collision callbacks
    handlers: HashMap<ActorId, CollisionHandler>,

    /// Contact events captured during the current iteration's steps
    collision_buffer: VecDeque<CollisionEvent>,

    /// Leftover simulation time carried between iterations, in milliseconds
    time_budget_ms: f32,

    running: bool,

    /// The first iteration after `start` syncs geometry without stepping,
    /// so bodies are primed before any simulation time passes
    first_iteration: bool,
}

impl<E: PhysicsEngine> DynamicsWorld<E> {
    /// Creates a world around the given engine with default settings
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, StepConfig::default())
    }

    /// Creates a world around the given engine with the given configuration
    pub fn with_config(mut engine: E, config: StepConfig) -> Self {
        let ground = engine.create_body(BodyKind::Static, Vec2::zeros(), 0.0);
        Self {
            engine,
            ground,
            converter: UnitConverter::default(),
            config,
            bodies: TrackedStorage::new(),
            body_lookup: HashMap::new(),
            joints: JointStorage::new(),
            drags: HashMap::new(),
            handlers: HashMap::new(),
            collision_buffer: VecDeque::new(),
            time_budget_ms: 0.0,
            running: false,
            first_iteration: false,
        }
    }

    /// Returns a reference to the underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Returns a mutable reference to the underlying engine
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Returns the fixed ground body used to anchor mouse joints
    pub fn ground_body(&self) -> engine::BodyHandle {
        self.ground
    }

    /// Returns a reference to the stepping configuration
    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    /// Returns a mutable reference to the stepping configuration
    pub fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }

    /// Sets the gravity vector, in world units per second squared
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.engine.set_gravity(gravity);
    }

    /// Returns the gravity vector
    pub fn gravity(&self) -> Vec2 {
        self.engine.gravity()
    }

    /// Returns the screen-to-world scale factor
    pub fn scale_factor(&self) -> f32 {
        self.converter.scale_factor()
    }

    /// Changes the screen-to-world scale factor. Affects future conversions
    /// only; existing bodies and shapes are not rescaled.
    pub fn set_scale_factor(&mut self, scale: f32) {
        self.converter.set_scale_factor(scale);
    }

    /// Returns the unit converter used by this world
    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    /// Sets the fixed simulation step, in milliseconds
    pub fn set_time_step(&mut self, milliseconds: f32) {
        self.config.fixed_step_ms = milliseconds;
    }

    /// Returns the fixed simulation step, in milliseconds
    pub fn time_step(&self) -> f32 {
        self.config.fixed_step_ms
    }

    /// Sets the solver iteration counts per step
    pub fn set_iterations(&mut self, velocity: u32, position: u32) {
        self.config.velocity_iterations = velocity;
        self.config.position_iterations = position;
    }

    /// Returns the solver iteration counts as (velocity, position)
    pub fn iterations(&self) -> (u32, u32) {
        (self.config.velocity_iterations, self.config.position_iterations)
    }

    /// Returns the number of tracked actors
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the number of live joints
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    // --- lifecycle --------------------------------------------------------

    /// Starts simulating. The next `iterate` call primes body transforms and
    /// shapes without advancing the simulation clock, preventing a
    /// first-frame snap.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.time_budget_ms = 0.0;
        self.first_iteration = true;
    }

    /// Stops simulating. All bodies and joints are preserved for later
    /// resumption.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Returns whether the world is currently simulating
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tracks an actor. Its mode starts as `None`; no engine body exists
    /// until [`set_mode`](DynamicsWorld::set_mode) makes it dynamic or
    /// static.
    pub fn attach(&mut self, actor: ActorRef) -> ActorId {
        self.bodies.add(TrackedBody::new(actor))
    }

    /// Stops tracking an actor, destroying its joints, fixture and body.
    /// Detaching an actor that is not attached is a no-op.
    pub fn detach(&mut self, id: ActorId) {
        if self.bodies.get(id).is_none() {
            return;
        }
        self.release_body(id);
        self.handlers.remove(&id);
        self.bodies.remove(id);
    }

    /// Changes how an actor participates in the simulation.
    ///
    /// `None` destroys the body, its fixture and every joint attached to it;
    /// entering `Dynamic` or `Static` from `None` creates a body at the
    /// actor's current pose (the fixture follows lazily on the next sync).
    pub fn set_mode(&mut self, id: ActorId, mode: BodyMode) -> Result<()> {
        let current = self.bodies.get_tracked(id)?.mode;
        if current == mode {
            return Ok(());
        }

        match mode {
            BodyMode::None => self.release_body(id),
            BodyMode::Dynamic | BodyMode::Static => {
                let kind = match mode {
                    BodyMode::Dynamic => BodyKind::Dynamic,
                    _ => BodyKind::Static,
                };
                let tracked = self.bodies.get_tracked_mut(id)?;
                if let Some(body) = tracked.body {
                    self.engine.set_body_kind(body, kind);
                    tracked.mode = mode;
                } else {
                    let (position, rotation) = {
                        let actor = tracked.actor.borrow();
                        (actor.position(), actor.rotation())
                    };
                    let world_position = self.converter.to_world_vec(position);
                    let angle = rotation.to_radians();
                    let body = self.engine.create_body(kind, world_position, angle);
                    if tracked.flags.contains(BodyFlags::BULLET) {
                        self.engine.set_bullet(body, true);
                    }
                    tracked.body = Some(body);
                    tracked.mode = mode;
                    tracked.last_position = world_position;
                    tracked.last_angle = angle;
                    self.body_lookup.insert(body, id);
                }
            }
        }
        Ok(())
    }

    /// Returns an actor's simulation mode
    pub fn mode(&self, id: ActorId) -> Result<BodyMode> {
        Ok(self.bodies.get_tracked(id)?.mode)
    }

    /// Returns the engine body handle backing an actor, for hosts that
    /// integrate with the engine directly
    pub fn engine_body(&self, id: ActorId) -> Result<engine::BodyHandle> {
        self.require_body(id)
    }

    /// Destroys an actor's joints and body, leaving it tracked in mode `None`
    fn release_body(&mut self, id: ActorId) {
        let joint_ids = match self.bodies.get_mut(id) {
            Some(tracked) => std::mem::take(&mut tracked.joints),
            None => return,
        };
        for joint_id in joint_ids {
            self.destroy_joint(joint_id);
        }

        if let Some(tracked) = self.bodies.get_mut(id) {
            if let Some(body) = tracked.body {
                self.body_lookup.remove(&body);
                // Fixtures die with the body
                self.engine.destroy_body(body);
            }
            tracked.release();
            tracked.mode = BodyMode::None;
        }
    }

    fn require_body(&self, id: ActorId) -> Result<engine::BodyHandle> {
        self.bodies
            .get_tracked(id)?
            .body
            .ok_or(PhysicsError::MissingBody(id))
    }

    // --- per-actor properties ---------------------------------------------

    /// Sets an actor's shape density; the fixture is rebuilt on the next sync
    pub fn set_density(&mut self, id: ActorId, density: f32) -> Result<()> {
        let tracked = self.bodies.get_tracked_mut(id)?;
        tracked.material.density = density;
        tracked.shape_dirty = true;
        Ok(())
    }

    /// Returns an actor's shape density
    pub fn density(&self, id: ActorId) -> Result<f32> {
        Ok(self.bodies.get_tracked(id)?.material.density)
    }

    /// Sets an actor's friction coefficient; rebuilds the fixture lazily
    pub fn set_friction(&mut self, id: ActorId, friction: f32) -> Result<()> {
        let tracked = self.bodies.get_tracked_mut(id)?;
        tracked.material.friction = friction;
        tracked.shape_dirty = true;
        Ok(())
    }

    /// Returns an actor's friction coefficient
    pub fn friction(&self, id: ActorId) -> Result<f32> {
        Ok(self.bodies.get_tracked(id)?.material.friction)
    }

    /// Sets an actor's restitution; rebuilds the fixture lazily
    pub fn set_restitution(&mut self, id: ActorId, restitution: f32) -> Result<()> {
        let tracked = self.bodies.get_tracked_mut(id)?;
        tracked.material.restitution = restitution;
        tracked.shape_dirty = true;
        Ok(())
    }

    /// Returns an actor's restitution
    pub fn restitution(&self, id: ActorId) -> Result<f32> {
        Ok(self.bodies.get_tracked(id)?.material.restitution)
    }

    /// Replaces an actor's whole material; rebuilds the fixture lazily
    pub fn set_material(&mut self, id: ActorId, material: Material) -> Result<()> {
        let tracked = self.bodies.get_tracked_mut(id)?;
        tracked.material = material;
        tracked.shape_dirty = true;
        Ok(())
    }

    /// Returns an actor's material
    pub fn material(&self, id: ActorId) -> Result<Material> {
        Ok(self.bodies.get_tracked(id)?.material)
    }

    /// Switches an actor between a circular shape and its box/outline shape
    pub fn set_is_circle(&mut self, id: ActorId, circle: bool) -> Result<()> {
        let tracked = self.bodies.get_tracked_mut(id)?;
        if tracked.is_circle != circle {
            tracked.is_circle = circle;
            tracked.shape_dirty = true;
        }
        Ok(())
    }

    /// Returns whether an actor uses a circular shape
    pub fn is_circle(&self, id: ActorId) -> Result<bool> {
        Ok(self.bodies.get_tracked(id)?.is_circle)
    }

    /// Sets an actor's collision outline as normalized vertices in [0,1]²,
    /// fractions of the actor's size. An outline with fewer than 3 vertices
    /// is silently treated as no outline, falling back to the box shape.
    /// Convexity is the caller's responsibility.
    pub fn set_outline(&mut self, id: ActorId, outline: Option<Vec<Vec2>>) -> Result<()> {
        let tracked = self.bodies.get_tracked_mut(id)?;
        tracked.outline = outline.filter(|o| o.len() >= 3);
        tracked.shape_dirty = true;
        Ok(())
    }

    /// Returns an actor's collision outline, if one is set
    pub fn outline(&self, id: ActorId) -> Result<Option<Vec<Vec2>>> {
        Ok(self.bodies.get_tracked(id)?.outline.clone())
    }

    /// Sets an actor's linear velocity, in screen units per second
    pub fn set_linear_velocity(&mut self, id: ActorId, velocity: Vec2) -> Result<()> {
        let body = self.require_body(id)?;
        self.engine
            .set_linear_velocity(body, self.converter.to_world_vec(velocity));
        Ok(())
    }

    /// Returns an actor's linear velocity, in screen units per second
    pub fn linear_velocity(&self, id: ActorId) -> Result<Vec2> {
        let body = self.require_body(id)?;
        Ok(self.converter.to_screen_vec(self.engine.linear_velocity(body)))
    }

    /// Sets an actor's angular velocity, in degrees per second
    pub fn set_angular_velocity(&mut self, id: ActorId, degrees_per_second: f32) -> Result<()> {
        let body = self.require_body(id)?;
        self.engine
            .set_angular_velocity(body, degrees_per_second.to_radians());
        Ok(())
    }

    /// Returns an actor's angular velocity, in degrees per second
    pub fn angular_velocity(&self, id: ActorId) -> Result<f32> {
        let body = self.require_body(id)?;
        Ok(self.engine.angular_velocity(body).to_degrees())
    }

    /// Marks an actor's body for continuous collision detection. Remembered
    /// across mode changes and applied when a body is (re)created.
    pub fn set_bullet(&mut self, id: ActorId, bullet: bool) -> Result<()> {
        let tracked = self.bodies.get_tracked_mut(id)?;
        tracked.flags.set(BodyFlags::BULLET, bullet);
        if let Some(body) = tracked.body {
            self.engine.set_bullet(body, bullet);
        }
        Ok(())
    }

    /// Returns whether an actor's body uses continuous collision detection
    pub fn is_bullet(&self, id: ActorId) -> Result<bool> {
        Ok(self.bodies.get_tracked(id)?.flags.contains(BodyFlags::BULLET))
    }

    /// Allows or forbids pointer drags on an actor
    pub fn set_manipulatable(&mut self, id: ActorId, manipulatable: bool) -> Result<()> {
        let tracked = self.bodies.get_tracked_mut(id)?;
        tracked.flags.set(BodyFlags::MANIPULATABLE, manipulatable);
        Ok(())
    }

    /// Returns whether an actor accepts pointer drags
    pub fn is_manipulatable(&self, id: ActorId) -> Result<bool> {
        Ok(self
            .bodies
            .get_tracked(id)?
            .flags
            .contains(BodyFlags::MANIPULATABLE))
    }

    /// Applies a force at a point, both given in screen units
    pub fn apply_force(&mut self, id: ActorId, force: Vec2, point: Vec2) -> Result<()> {
        let body = self.require_body(id)?;
        self.engine.apply_force(
            body,
            self.converter.to_world_vec(force),
            self.converter.to_world_vec(point),
        );
        Ok(())
    }

    /// Applies an impulse at a point, both given in screen units
    pub fn apply_impulse(&mut self, id: ActorId, impulse: Vec2, point: Vec2) -> Result<()> {
        let body = self.require_body(id)?;
        self.engine.apply_impulse(
            body,
            self.converter.to_world_vec(impulse),
            self.converter.to_world_vec(point),
        );
        Ok(())
    }

    /// Applies a torque about an actor's center of mass, in engine units
    pub fn apply_torque(&mut self, id: ActorId, torque: f32) -> Result<()> {
        let body = self.require_body(id)?;
        self.engine.apply_torque(body, torque);
        Ok(())
    }

    // --- joints -----------------------------------------------------------

    /// Creates a distance joint holding two anchors (screen units) a fixed
    /// distance apart. Connected bodies stop colliding with each other.
    pub fn add_distance_joint(
        &mut self,
        actor_a: ActorId,
        actor_b: ActorId,
        anchor_a: Vec2,
        anchor_b: Vec2,
    ) -> Result<JointId> {
        let body_a = self.require_body(actor_a)?;
        let body_b = self.require_body(actor_b)?;
        let world_a = self.converter.to_world_vec(anchor_a);
        let world_b = self.converter.to_world_vec(anchor_b);
        let def = JointDef::Distance {
            body_a,
            body_b,
            anchor_a: world_a,
            anchor_b: world_b,
            length: (world_b - world_a).norm(),
            collide_connected: false,
        };
        Ok(self.register_joint(
            JointKind::Distance,
            JointEndpoint::Actor(actor_a),
            JointEndpoint::Actor(actor_b),
            &def,
        ))
    }

    /// Creates a revolute joint pinning two actors together at a shared
    /// anchor given in screen units
    pub fn add_revolute_joint(
        &mut self,
        actor_a: ActorId,
        actor_b: ActorId,
        anchor: Vec2,
    ) -> Result<JointId> {
        let body_a = self.require_body(actor_a)?;
        let body_b = self.require_body(actor_b)?;
        let def = JointDef::Revolute {
            body_a,
            body_b,
            anchor: self.converter.to_world_vec(anchor),
            collide_connected: false,
        };
        Ok(self.register_joint(
            JointKind::Revolute,
            JointEndpoint::Actor(actor_a),
            JointEndpoint::Actor(actor_b),
            &def,
        ))
    }

    /// Creates a prismatic joint restricting relative motion to translation
    /// along `axis`. The anchor is in screen units; the axis is a direction
    /// and is normalized, not scaled.
    pub fn add_prismatic_joint(
        &mut self,
        actor_a: ActorId,
        actor_b: ActorId,
        anchor: Vec2,
        axis: Vec2,
    ) -> Result<JointId> {
        let body_a = self.require_body(actor_a)?;
        let body_b = self.require_body(actor_b)?;
        let def = JointDef::Prismatic {
            body_a,
            body_b,
            anchor: self.converter.to_world_vec(anchor),
            axis: axis.normalize(),
            collide_connected: false,
        };
        Ok(self.register_joint(
            JointKind::Prismatic,
            JointEndpoint::Actor(actor_a),
            JointEndpoint::Actor(actor_b),
            &def,
        ))
    }

    /// Creates a pulley joint hanging two actors from fixed ground anchors.
    /// All anchors are in screen units; segment lengths are derived from the
    /// converted anchors.
    #[allow(clippy::too_many_arguments)]
    pub fn add_pulley_joint(
        &mut self,
        actor_a: ActorId,
        actor_b: ActorId,
        ground_anchor_a: Vec2,
        ground_anchor_b: Vec2,
        anchor_a: Vec2,
        anchor_b: Vec2,
        ratio: f32,
    ) -> Result<JointId> {
        let body_a = self.require_body(actor_a)?;
        let body_b = self.require_body(actor_b)?;
        let world_ground_a = self.converter.to_world_vec(ground_anchor_a);
        let world_ground_b = self.converter.to_world_vec(ground_anchor_b);
        let world_a = self.converter.to_world_vec(anchor_a);
        let world_b = self.converter.to_world_vec(anchor_b);
        let def = JointDef::Pulley {
            body_a,
            body_b,
            ground_anchor_a: world_ground_a,
            ground_anchor_b: world_ground_b,
            anchor_a: world_a,
            anchor_b: world_b,
            length_a: (world_a - world_ground_a).norm(),
            length_b: (world_b - world_ground_b).norm(),
            ratio,
            collide_connected: false,
        };
        Ok(self.register_joint(
            JointKind::Pulley,
            JointEndpoint::Actor(actor_a),
            JointEndpoint::Actor(actor_b),
            &def,
        ))
    }

    /// Destroys a joint, unregistering it from both endpoints. Destroying an
    /// already-destroyed joint is a no-op, so overlapping cascade paths never
    /// double-free the engine handle.
    pub fn destroy_joint(&mut self, id: JointId) {
        let Some(joint) = self.joints.remove(id) else {
            return;
        };
        for endpoint in joint.endpoints() {
            if let JointEndpoint::Actor(actor) = endpoint {
                if let Some(tracked) = self.bodies.get_mut(actor) {
                    tracked.joints.retain(|j| *j != id);
                }
            }
        }
        self.drags.retain(|_, j| *j != id);
        self.engine.destroy_joint(joint.handle);
    }

    /// Returns a joint by id, if it still exists
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id)
    }

    /// Returns the ids of all joints with an endpoint on the given actor
    pub fn joints_of(&self, id: ActorId) -> Result<Vec<JointId>> {
        Ok(self.bodies.get_tracked(id)?.joints.clone())
    }

    fn register_joint(
        &mut self,
        kind: JointKind,
        endpoint_a: JointEndpoint,
        endpoint_b: JointEndpoint,
        def: &JointDef,
    ) -> JointId {
        let handle = self.engine.create_joint(def);
        let id = self.joints.add(Joint::new(kind, endpoint_a, endpoint_b, handle));
        for endpoint in [endpoint_a, endpoint_b] {
            if let JointEndpoint::Actor(actor) = endpoint {
                if let Some(tracked) = self.bodies.get_mut(actor) {
                    tracked.joints.push(id);
                }
            }
        }
        id
    }

    // --- pointer drags ----------------------------------------------------

    /// Starts dragging an actor with a pointer device, creating a mouse
    /// joint against the ground body. The maximum drag force scales with the
    /// body's mass, so heavier actors resist dragging proportionally. Any
    /// drag already active on the same device is released first.
    pub fn begin_drag(&mut self, id: ActorId, device: DeviceId, point: Vec2) -> Result<JointId> {
        let tracked = self.bodies.get_tracked(id)?;
        if !tracked.flags.contains(BodyFlags::MANIPULATABLE) {
            return Err(PhysicsError::NotManipulatable(id));
        }
        let body = tracked.body.ok_or(PhysicsError::MissingBody(id))?;

        self.end_drag(device);

        let def = JointDef::Mouse {
            ground: self.ground,
            body,
            target: self.converter.to_world_vec(point),
            max_force: self.engine.mass(body) * self.config.drag_force_scale,
        };
        let joint = self.register_joint(
            JointKind::Mouse,
            JointEndpoint::Ground,
            JointEndpoint::Actor(id),
            &def,
        );
        self.drags.insert(device, joint);
        Ok(joint)
    }

    /// Moves a device's drag target to a new screen-space point. Unknown
    /// devices are ignored.
    pub fn update_drag(&mut self, device: DeviceId, point: Vec2) {
        let Some(&joint_id) = self.drags.get(&device) else {
            return;
        };
        let Some(joint) = self.joints.get(joint_id) else {
            return;
        };
        self.engine
            .set_mouse_target(joint.handle, self.converter.to_world_vec(point));
    }

    /// Releases a device's drag, destroying its mouse joint. A device with
    /// no active drag is a no-op.
    pub fn end_drag(&mut self, device: DeviceId) {
        if let Some(joint) = self.drags.remove(&device) {
            self.destroy_joint(joint);
        }
    }

    // --- collision handlers -----------------------------------------------

    /// Registers a collision callback for an actor, replacing any previous
    /// one. The callback runs at the end of each iteration, once per
    /// buffered contact point involving the actor.
    pub fn set_collision_handler<F>(&mut self, id: ActorId, handler: F) -> Result<()>
    where
        F: FnMut(&CollisionEvent) + 'static,
    {
        self.bodies.get_tracked(id)?;
        self.handlers.insert(id, Box::new(handler));
        Ok(())
    }

    /// Removes an actor's collision callback, if any
    pub fn clear_collision_handler(&mut self, id: ActorId) {
        self.handlers.remove(&id);
    }

    // --- stepping ---------------------------------------------------------

    /// Runs one frame of the simulation with `elapsed_ms` of wall time.
    ///
    /// Pushes actor geometry into the engine, advances the simulation in
    /// fixed sub-steps against the accumulated time budget (clamped to
    /// `max_catchup_steps` steps), pulls simulated poses back onto the
    /// actors, then dispatches and clears buffered collision events. Does
    /// nothing while stopped.
    pub fn iterate(&mut self, elapsed_ms: f32) {
        if !self.running {
            return;
        }

        let ids = self.bodies.handles();
        for id in &ids {
            if let Some(tracked) = self.bodies.get_mut(*id) {
                tracked.sync_body(&mut self.engine, &self.converter, &self.config);
            }
        }

        if self.first_iteration {
            self.first_iteration = false;
            return;
        }
        if elapsed_ms <= 0.0 {
            return;
        }

        let max_budget = self.config.max_catchup_steps as f32 * self.config.fixed_step_ms;
        self.time_budget_ms = (self.time_budget_ms + elapsed_ms).min(max_budget);

        while self.time_budget_ms > self.config.fixed_step_ms {
            let mut collector = ContactCollector {
                lookup: &self.body_lookup,
                converter: &self.converter,
                buffer: &mut self.collision_buffer,
            };
            self.engine.step(
                self.config.fixed_step_ms / 1000.0,
                self.config.velocity_iterations,
                self.config.position_iterations,
                &mut collector,
            );
            self.time_budget_ms -= self.config.fixed_step_ms;
        }

        for id in &ids {
            if let Some(tracked) = self.bodies.get_mut(*id) {
                tracked.sync_actor(&self.engine, &self.converter);
            }
        }

        self.dispatch_collisions();
    }

    /// Drains the collision buffer, invoking registered handlers. Events
    /// whose actor was detached since capture are dropped silently.
    fn dispatch_collisions(&mut self) {
        if self.collision_buffer.is_empty() {
            return;
        }
        let events: Vec<CollisionEvent> = self.collision_buffer.drain(..).collect();
        for event in &events {
            for id in [event.actor_a, event.actor_b] {
                if self.bodies.get(id).is_none() {
                    continue;
                }
                if let Some(handler) = self.handlers.get_mut(&id) {
                    handler(event);
                }
            }
        }
    }
}

impl<E: PhysicsEngine> Drop for DynamicsWorld<E> {
    fn drop(&mut self) {
        for id in self.joints.handles() {
            if let Some(joint) = self.joints.remove(id) {
                self.engine.destroy_joint(joint.handle);
            }
        }
        for id in self.bodies.handles() {
            if let Some(tracked) = self.bodies.get_mut(id) {
                if let Some(body) = tracked.body.take() {
                    self.engine.destroy_body(body);
                }
            }
        }
        self.engine.destroy_body(self.ground);
    }
}
