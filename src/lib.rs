pub mod math;
pub mod units;
pub mod actor;
pub mod engine;
pub mod shapes;
pub mod bodies;
pub mod core;
pub mod collision;
pub mod constraints;

/// Re-export common types for easier usage
pub use crate::actor::{Actor, ActorRef};
pub use crate::bodies::{BodyFlags, BodyMode, Material};
pub use crate::collision::CollisionEvent;
pub use crate::constraints::{Joint, JointEndpoint, JointKind};
pub use crate::core::{ActorId, DeviceId, DynamicsWorld, JointId, StepConfig};
pub use crate::engine::PhysicsEngine;
pub use crate::math::Vec2;
pub use crate::units::UnitConverter;

/// Error types for the bridge
pub mod error {
    use crate::core::ActorId;
    use thiserror::Error;

    #[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PhysicsError {
        #[error("actor {0:?} is not attached to this world")]
        NotAttached(ActorId),

        #[error("actor {0:?} has no physics body because its mode is None")]
        MissingBody(ActorId),

        #[error("actor {0:?} is not flagged as manipulatable")]
        NotManipulatable(ActorId),
    }
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
