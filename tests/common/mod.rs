#![allow(dead_code)]

use phys_bridge::engine::{
    BodyHandle, BodyKind, ContactPoint, ContactSink, FixtureHandle, JointDef, JointHandle,
    PhysicsEngine,
};
use phys_bridge::math::{vec2, Vec2};
use phys_bridge::Actor;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A body as the fake engine sees it
pub struct TestBody {
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub bullet: bool,
    pub fixtures: Vec<FixtureHandle>,
}

/// A contact the fake engine reports on every step
pub struct ScriptedContact {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub normal: Vec2,
    pub points: Vec<ContactPoint>,
}

/// Fake engine that records every call the bridge makes.
///
/// Dynamic bodies integrate their velocities on `step` so pull-sync has
/// something to observe; there is no collision detection, only the contacts
/// scripted into `contacts_per_step`.
pub struct TestEngine {
    next_id: u32,
    pub gravity: Vec2,
    pub bodies: HashMap<BodyHandle, TestBody>,
    pub joints: HashMap<JointHandle, JointDef>,
    pub destroyed_joints: Vec<JointHandle>,
    pub mouse_targets: HashMap<JointHandle, Vec2>,
    pub contacts_per_step: Vec<ScriptedContact>,
    pub step_calls: usize,
    pub set_transform_calls: usize,
    pub fixtures_created: usize,
    pub fixtures_destroyed: usize,
    /// Mass reported for every body
    pub body_mass: f32,
}

impl TestEngine {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            gravity: vec2(0.0, 10.0),
            bodies: HashMap::new(),
            joints: HashMap::new(),
            destroyed_joints: Vec::new(),
            mouse_targets: HashMap::new(),
            contacts_per_step: Vec::new(),
            step_calls: 0,
            set_transform_calls: 0,
            fixtures_created: 0,
            fixtures_destroyed: 0,
            body_mass: 2.0,
        }
    }

    fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn body(&self, handle: BodyHandle) -> &TestBody {
        self.bodies.get(&handle).expect("unknown body handle")
    }

    fn body_mut(&mut self, handle: BodyHandle) -> &mut TestBody {
        self.bodies.get_mut(&handle).expect("unknown body handle")
    }
}

impl PhysicsEngine for TestEngine {
    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn create_body(&mut self, kind: BodyKind, position: Vec2, angle: f32) -> BodyHandle {
        let handle = BodyHandle(self.next());
        self.bodies.insert(
            handle,
            TestBody {
                kind,
                position,
                angle,
                linear_velocity: Vec2::zeros(),
                angular_velocity: 0.0,
                bullet: false,
                fixtures: Vec::new(),
            },
        );
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
    }

    fn set_body_kind(&mut self, body: BodyHandle, kind: BodyKind) {
        self.body_mut(body).kind = kind;
    }

    fn set_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32) {
        self.set_transform_calls += 1;
        let body = self.body_mut(body);
        body.position = position;
        body.angle = angle;
    }

    fn transform(&self, body: BodyHandle) -> (Vec2, f32) {
        let body = self.body(body);
        (body.position, body.angle)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        self.body_mut(body).linear_velocity = velocity;
    }

    fn linear_velocity(&self, body: BodyHandle) -> Vec2 {
        self.body(body).linear_velocity
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, omega: f32) {
        self.body_mut(body).angular_velocity = omega;
    }

    fn angular_velocity(&self, body: BodyHandle) -> f32 {
        self.body(body).angular_velocity
    }

    fn set_bullet(&mut self, body: BodyHandle, bullet: bool) {
        self.body_mut(body).bullet = bullet;
    }

    fn mass(&self, _body: BodyHandle) -> f32 {
        self.body_mass
    }

    fn apply_force(&mut self, _body: BodyHandle, _force: Vec2, _point: Vec2) {}

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2, _point: Vec2) {
        let mass = self.body_mass;
        self.body_mut(body).linear_velocity += impulse / mass;
    }

    fn apply_torque(&mut self, _body: BodyHandle, _torque: f32) {}

    fn create_fixture(
        &mut self,
        body: BodyHandle,
        _shape: &phys_bridge::shapes::CollisionShape,
        _material: phys_bridge::Material,
    ) -> FixtureHandle {
        self.fixtures_created += 1;
        let handle = FixtureHandle(self.next());
        self.body_mut(body).fixtures.push(handle);
        handle
    }

    fn destroy_fixture(&mut self, body: BodyHandle, fixture: FixtureHandle) {
        self.fixtures_destroyed += 1;
        if let Some(body) = self.bodies.get_mut(&body) {
            body.fixtures.retain(|f| *f != fixture);
        }
    }

    fn create_joint(&mut self, def: &JointDef) -> JointHandle {
        let handle = JointHandle(self.next());
        self.joints.insert(handle, def.clone());
        handle
    }

    fn destroy_joint(&mut self, joint: JointHandle) {
        self.destroyed_joints.push(joint);
        self.joints.remove(&joint);
    }

    fn set_mouse_target(&mut self, joint: JointHandle, target: Vec2) {
        self.mouse_targets.insert(joint, target);
    }

    fn step(
        &mut self,
        dt: f32,
        _velocity_iterations: u32,
        _position_iterations: u32,
        contacts: &mut dyn ContactSink,
    ) {
        self.step_calls += 1;
        for body in self.bodies.values_mut() {
            if body.kind == BodyKind::Dynamic {
                body.position += body.linear_velocity * dt;
                body.angle += body.angular_velocity * dt;
            }
        }
        for contact in &self.contacts_per_step {
            contacts.pre_solve(contact.body_a, contact.body_b, contact.normal, &contact.points);
        }
    }
}

/// Fake scene-graph actor with a top-left position in screen units
pub struct TestActor {
    pub position: Vec2,
    pub rotation: f32,
    pub size: (f32, f32),
}

impl Actor for TestActor {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }

    fn size(&self) -> (f32, f32) {
        self.size
    }
}

/// Creates a shared test actor at the given position and size
pub fn actor(x: f32, y: f32, width: f32, height: f32) -> Rc<RefCell<TestActor>> {
    Rc::new(RefCell::new(TestActor {
        position: vec2(x, y),
        rotation: 0.0,
        size: (width, height),
    }))
}

/// Builds a single scripted contact point at a world-space position
pub fn contact_point(x: f32, y: f32, id: u32) -> ContactPoint {
    ContactPoint {
        position: vec2(x, y),
        normal_impulse: 1.0,
        tangent_impulse: 0.25,
        id,
    }
}
