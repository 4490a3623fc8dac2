use crate::actor::ActorRef;
use crate::bodies::{BodyFlags, BodyMode, Material};
use crate::core::{JointId, StepConfig};
use crate::engine::{BodyHandle, FixtureHandle, PhysicsEngine};
use crate::math::Vec2;
use crate::shapes;
use crate::units::UnitConverter;

/// The physics-side state for exactly one visual actor.
///
/// Owns the engine body and fixture handles; the fixture is created lazily on
/// the first sync and destroyed+recreated whenever a shape-affecting property
/// changes. Joints hold back-references here (and this body holds their ids)
/// so destruction can cascade without either side owning the other.
pub struct TrackedBody {
    pub(crate) actor: ActorRef,
    pub(crate) mode: BodyMode,
    pub(crate) body: Option<BodyHandle>,
    pub(crate) fixture: Option<FixtureHandle>,
    pub(crate) material: Material,
    pub(crate) is_circle: bool,
    pub(crate) outline: Option<Vec<Vec2>>,
    pub(crate) flags: BodyFlags,

    /// Set by property setters; forces a fixture rebuild on the next sync
    pub(crate) shape_dirty: bool,

    /// World-space offset from the actor's top-left corner to the body
    /// origin. Non-zero only for circles, whose engine shape is centered.
    pub(crate) center_offset: Vec2,

    /// Pose the body was last synced to, in world units / radians.
    /// Compared with a tolerance so sub-pixel actor jitter never fights
    /// the solver.
    pub(crate) last_position: Vec2,
    pub(crate) last_angle: f32,

    /// Screen size the current fixture was built for
    pub(crate) last_size: (f32, f32),

    /// Joints with an endpoint on this body, for cascading teardown
    pub(crate) joints: Vec<JointId>,
}

impl TrackedBody {
    pub(crate) fn new(actor: ActorRef) -> Self {
        Self {
            actor,
            mode: BodyMode::None,
            body: None,
            fixture: None,
            material: Material::default(),
            is_circle: false,
            outline: None,
            flags: BodyFlags::empty(),
            shape_dirty: false,
            center_offset: Vec2::zeros(),
            last_position: Vec2::zeros(),
            last_angle: 0.0,
            last_size: (0.0, 0.0),
            joints: Vec::new(),
        }
    }

    /// Returns how this body participates in the simulation
    pub fn mode(&self) -> BodyMode {
        self.mode
    }

    /// Returns the engine body handle, if a body exists
    pub fn body_handle(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Pushes the actor's geometry into the engine body, pre-step.
    ///
    /// Rebuilds the fixture if it is missing, stale, or the actor was
    /// resized. Force-sets the body transform only when the fixture was just
    /// rebuilt or the actor's pose drifted beyond the configured tolerances;
    /// within tolerance the solver's own integration is left alone.
    pub(crate) fn sync_body<E: PhysicsEngine>(
        &mut self,
        engine: &mut E,
        converter: &UnitConverter,
        config: &StepConfig,
    ) {
        if self.mode == BodyMode::None {
            return;
        }
        let Some(body) = self.body else { return };

        let (position, rotation, size) = {
            let actor = self.actor.borrow();
            (actor.position(), actor.rotation(), actor.size())
        };

        let mut rebuilt = false;
        if self.fixture.is_none() || self.shape_dirty || size != self.last_size {
            self.ensure_shape(engine, body, converter, size);
            rebuilt = true;
        }

        let target = converter.to_world_vec(position) + self.center_offset;
        let angle = rotation.to_radians();
        let moved = (target - self.last_position).norm() > config.position_tolerance
            || (angle - self.last_angle).abs() > config.angle_tolerance_deg.to_radians();

        if rebuilt || moved {
            // Forced teleport: the actor was moved externally, so the body
            // snaps to match instead of being steered by forces.
            engine.set_transform(body, target, angle);
            self.last_position = target;
            self.last_angle = angle;
        }
        self.last_size = size;
    }

    /// Pulls the simulated pose back onto the actor, post-step.
    ///
    /// Also refreshes the cached pose, so the next `sync_body` only sees a
    /// delta if the application moved the actor in between.
    pub(crate) fn sync_actor<E: PhysicsEngine>(&mut self, engine: &E, converter: &UnitConverter) {
        if self.mode == BodyMode::None {
            return;
        }
        let Some(body) = self.body else { return };

        let (position, angle) = engine.transform(body);
        let screen = converter.to_screen_vec(position - self.center_offset);
        {
            let mut actor = self.actor.borrow_mut();
            actor.set_position(screen);
            actor.set_rotation(angle.to_degrees());
        }
        self.last_position = position;
        self.last_angle = angle;
    }

    /// Destroys and recreates the fixture from the actor's current geometry
    fn ensure_shape<E: PhysicsEngine>(
        &mut self,
        engine: &mut E,
        body: BodyHandle,
        converter: &UnitConverter,
        size: (f32, f32),
    ) {
        if let Some(fixture) = self.fixture.take() {
            engine.destroy_fixture(body, fixture);
        }

        let (width, height) = size;
        let shape = shapes::derive_shape(self.is_circle, self.outline.as_deref(), width, height, converter);
        self.center_offset = if self.is_circle {
            let radius = converter.to_world(width.min(height) / 2.0);
            Vec2::new(radius, radius)
        } else {
            Vec2::zeros()
        };

        self.fixture = Some(engine.create_fixture(body, &shape, self.material));
        self.shape_dirty = false;
    }

    /// Clears the engine handles after the body has been destroyed
    pub(crate) fn release(&mut self) {
        self.body = None;
        self.fixture = None;
        self.center_offset = Vec2::zeros();
    }
}
