//! Pointer Acceleration Engine - Device Pipeline and Session Core
//!
//! This crate watches pointer devices, turns their relative events into
//! normalized speed samples, and orchestrates applying and restoring
//! acceleration settings under a timed safety net.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod prelude;
pub mod registry;
pub mod safety;
pub mod scale;
pub mod session;
pub mod speed;

// Explicit exports from the pipeline modules
pub use registry::{DeviceRegistry, PointerDevice, SpeedCallback, SpeedSample};
pub use scale::SpeedScale;
pub use speed::{FALLBACK_DT_MS, SpeedTracker};

// Session and safety-net surface
pub use error::{EngineError, EngineResult};
pub use safety::{
    GRACE_SECONDS, NetCommand, NetOutcome, NetState, RestoreSettings, SafetyNet, TickAction,
    supervise,
};
pub use session::AccelSession;

// Movement selection is shared with the settings layer
pub use openaccel_settings::MovementType;
