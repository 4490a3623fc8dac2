mod common;

use approx::assert_relative_eq;
use common::{actor, TestEngine};
use phys_bridge::engine::JointDef;
use phys_bridge::error::PhysicsError;
use phys_bridge::math::vec2;
use phys_bridge::{BodyMode, DeviceId, DynamicsWorld, JointKind};

fn world_with_two_bodies() -> (DynamicsWorld<TestEngine>, phys_bridge::ActorId, phys_bridge::ActorId) {
    let mut world = DynamicsWorld::new(TestEngine::new());
    let id_a = world.attach(actor(0.0, 0.0, 50.0, 50.0));
    let id_b = world.attach(actor(200.0, 0.0, 50.0, 50.0));
    world.set_mode(id_a, BodyMode::Dynamic).unwrap();
    world.set_mode(id_b, BodyMode::Dynamic).unwrap();
    (world, id_a, id_b)
}

#[test]
fn distance_joints_convert_anchors_and_derive_the_length() {
    let (mut world, id_a, id_b) = world_with_two_bodies();

    let joint = world
        .add_distance_joint(id_a, id_b, vec2(25.0, 25.0), vec2(225.0, 25.0))
        .unwrap();
    assert_eq!(world.joint(joint).unwrap().kind(), JointKind::Distance);

    let handle = world.engine().joints.keys().next().copied().unwrap();
    match &world.engine().joints[&handle] {
        JointDef::Distance {
            anchor_a,
            anchor_b,
            length,
            collide_connected,
            ..
        } => {
            // 50 screen units per world unit
            assert_relative_eq!(anchor_a.x, 0.5);
            assert_relative_eq!(anchor_b.x, 4.5);
            assert_relative_eq!(*length, 4.0);
            // Connected bodies stop colliding by default
            assert!(!collide_connected);
        }
        other => panic!("expected a distance joint, got {:?}", other),
    }
}

#[test]
fn joints_require_attached_actors_with_bodies() {
    let mut world = DynamicsWorld::new(TestEngine::new());
    let id_a = world.attach(actor(0.0, 0.0, 10.0, 10.0));
    let id_b = world.attach(actor(50.0, 0.0, 10.0, 10.0));
    world.set_mode(id_a, BodyMode::Dynamic).unwrap();

    // id_b is still mode None
    assert!(matches!(
        world.add_revolute_joint(id_a, id_b, vec2(25.0, 0.0)),
        Err(PhysicsError::MissingBody(_))
    ));

    world.detach(id_b);
    assert!(matches!(
        world.add_revolute_joint(id_a, id_b, vec2(25.0, 0.0)),
        Err(PhysicsError::NotAttached(_))
    ));
}

#[test]
fn destroying_an_endpoint_cascades_to_its_joints() {
    let (mut world, id_a, id_b) = world_with_two_bodies();

    let joint = world
        .add_revolute_joint(id_a, id_b, vec2(100.0, 0.0))
        .unwrap();
    assert_eq!(world.joints_of(id_a).unwrap(), vec![joint]);
    assert_eq!(world.joints_of(id_b).unwrap(), vec![joint]);

    world.set_mode(id_a, BodyMode::None).unwrap();

    // Gone from the surviving endpoint's list as well
    assert!(world.joints_of(id_b).unwrap().is_empty());
    assert_eq!(world.joint_count(), 0);
    assert_eq!(world.engine().destroyed_joints.len(), 1);

    // A later explicit destroy with the stale handle is a no-op
    world.destroy_joint(joint);
    assert_eq!(world.engine().destroyed_joints.len(), 1);
}

#[test]
fn destroy_joint_is_idempotent() {
    let (mut world, id_a, id_b) = world_with_two_bodies();
    let joint = world
        .add_distance_joint(id_a, id_b, vec2(0.0, 0.0), vec2(200.0, 0.0))
        .unwrap();

    world.destroy_joint(joint);
    world.destroy_joint(joint);

    assert_eq!(world.engine().destroyed_joints.len(), 1);
    assert!(world.joints_of(id_a).unwrap().is_empty());
    assert!(world.joints_of(id_b).unwrap().is_empty());
}

#[test]
fn pulley_joints_derive_segment_lengths_from_anchors() {
    let (mut world, id_a, id_b) = world_with_two_bodies();

    world
        .add_pulley_joint(
            id_a,
            id_b,
            vec2(0.0, 0.0),
            vec2(200.0, 0.0),
            vec2(0.0, 100.0),
            vec2(200.0, 150.0),
            1.0,
        )
        .unwrap();

    let handle = world.engine().joints.keys().next().copied().unwrap();
    match &world.engine().joints[&handle] {
        JointDef::Pulley {
            length_a, length_b, ..
        } => {
            assert_relative_eq!(*length_a, 2.0);
            assert_relative_eq!(*length_b, 3.0);
        }
        other => panic!("expected a pulley joint, got {:?}", other),
    }
}

#[test]
fn prismatic_joints_normalize_their_axis() {
    let (mut world, id_a, id_b) = world_with_two_bodies();

    world
        .add_prismatic_joint(id_a, id_b, vec2(0.0, 0.0), vec2(0.0, 10.0))
        .unwrap();

    let handle = world.engine().joints.keys().next().copied().unwrap();
    match &world.engine().joints[&handle] {
        JointDef::Prismatic { axis, .. } => {
            assert_relative_eq!(axis.norm(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(axis.y, 1.0, epsilon = 1e-5);
        }
        other => panic!("expected a prismatic joint, got {:?}", other),
    }
}

#[test]
fn drags_need_the_manipulatable_flag() {
    let (mut world, id_a, _) = world_with_two_bodies();
    let device = DeviceId(0);

    assert!(matches!(
        world.begin_drag(id_a, device, vec2(25.0, 25.0)),
        Err(PhysicsError::NotManipulatable(_))
    ));

    world.set_manipulatable(id_a, true).unwrap();
    assert!(world.begin_drag(id_a, device, vec2(25.0, 25.0)).is_ok());
}

#[test]
fn drag_force_scales_with_the_body_mass() {
    let (mut world, id_a, _) = world_with_two_bodies();
    world.set_manipulatable(id_a, true).unwrap();

    world.begin_drag(id_a, DeviceId(0), vec2(25.0, 25.0)).unwrap();

    let handle = world.engine().joints.keys().next().copied().unwrap();
    match &world.engine().joints[&handle] {
        JointDef::Mouse {
            target, max_force, ..
        } => {
            // Fake engine reports mass 2.0; default drag scale is 500
            assert_relative_eq!(*max_force, 1000.0);
            assert_relative_eq!(target.x, 0.5);
        }
        other => panic!("expected a mouse joint, got {:?}", other),
    }
}

#[test]
fn drag_targets_follow_the_pointer() {
    let (mut world, id_a, _) = world_with_two_bodies();
    world.set_manipulatable(id_a, true).unwrap();
    let device = DeviceId(3);

    let joint = world.begin_drag(id_a, device, vec2(0.0, 0.0)).unwrap();
    world.update_drag(device, vec2(100.0, 50.0));

    assert!(world.joint(joint).is_some());
    let target = world
        .engine()
        .mouse_targets
        .values()
        .next()
        .copied()
        .unwrap();
    assert_relative_eq!(target.x, 2.0);
    assert_relative_eq!(target.y, 1.0);

    world.end_drag(device);
    assert_eq!(world.joint_count(), 0);
    // Releasing again is a no-op
    world.end_drag(device);
    assert_eq!(world.engine().destroyed_joints.len(), 1);
}

#[test]
fn a_new_grab_on_the_same_device_replaces_the_old_one() {
    let (mut world, id_a, id_b) = world_with_two_bodies();
    world.set_manipulatable(id_a, true).unwrap();
    world.set_manipulatable(id_b, true).unwrap();
    let device = DeviceId(1);

    let first = world.begin_drag(id_a, device, vec2(0.0, 0.0)).unwrap();
    let second = world.begin_drag(id_b, device, vec2(0.0, 0.0)).unwrap();

    assert_ne!(first, second);
    assert_eq!(world.joint_count(), 1);
    assert!(world.joint(first).is_none());
    assert!(world.joint(second).is_some());
}

#[test]
fn separate_devices_drag_independently() {
    let (mut world, id_a, id_b) = world_with_two_bodies();
    world.set_manipulatable(id_a, true).unwrap();
    world.set_manipulatable(id_b, true).unwrap();

    let drag_a = world.begin_drag(id_a, DeviceId(0), vec2(0.0, 0.0)).unwrap();
    let drag_b = world.begin_drag(id_b, DeviceId(1), vec2(0.0, 0.0)).unwrap();
    assert_eq!(world.joint_count(), 2);

    world.end_drag(DeviceId(0));
    assert!(world.joint(drag_a).is_none());
    assert!(world.joint(drag_b).is_some());
}

#[test]
fn detaching_a_dragged_actor_tears_the_drag_down() {
    let (mut world, id_a, _) = world_with_two_bodies();
    world.set_manipulatable(id_a, true).unwrap();
    let device = DeviceId(0);

    world.begin_drag(id_a, device, vec2(0.0, 0.0)).unwrap();
    world.detach(id_a);

    assert_eq!(world.joint_count(), 0);
    assert_eq!(world.engine().destroyed_joints.len(), 1);
    // The device slot was cleared with the joint
    world.update_drag(device, vec2(10.0, 10.0));
    assert!(world.engine().mouse_targets.is_empty());
}
