mod material;
mod mode;
mod tracked;

pub use self::material::Material;
pub use self::mode::{BodyFlags, BodyMode};
pub use self::tracked::TrackedBody;
