pub mod config;
pub mod storage;
pub mod world;

pub use self::config::StepConfig;
pub use self::storage::{JointStorage, Storage, TrackedStorage};
pub use self::world::DynamicsWorld;

/// A unique identifier for an actor tracked by a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub(crate) u32);

/// A unique identifier for a joint owned by a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointId(pub(crate) u32);

/// A pointer/touch device identifier, supplied by the host.
///
/// Drag state is keyed per device rather than kept as a single current
/// grab, so multi-touch hosts can run independent drags concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub u32);
