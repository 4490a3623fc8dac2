#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Configuration parameters for world stepping and synchronization
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct StepConfig {
    /// The fixed simulated time advanced per engine step, in milliseconds
    pub fixed_step_ms: f32,

    /// Engine velocity-solver iterations per step. Higher counts cost more
    /// CPU but resolve stacked contacts more stably.
    pub velocity_iterations: u32,

    /// Engine position-solver iterations per step
    pub position_iterations: u32,

    /// Cap on accumulated catch-up, in multiples of the fixed step. Keeps a
    /// long stall (debugger pause, dropped frames) from bursting into a
    /// frame-long stepping marathon.
    pub max_catchup_steps: u32,

    /// Actor movement below this distance (world units) is left to the
    /// solver instead of force-setting the body transform
    pub position_tolerance: f32,

    /// Actor rotation below this angle (degrees) is left to the solver
    pub angle_tolerance_deg: f32,

    /// Drag max-force is the dragged body's mass times this factor, so
    /// heavier bodies need proportionally more force to move
    pub drag_force_scale: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            fixed_step_ms: 1000.0 / 60.0,
            velocity_iterations: 10,
            position_iterations: 10,
            max_catchup_steps: 4,
            // Empirically chosen sync thresholds; small enough to track
            // deliberate moves, large enough to ignore sub-pixel jitter.
            position_tolerance: 0.1,
            angle_tolerance_deg: 2.0,
            drag_force_scale: 500.0,
        }
    }
}
