//! Commonly used engine types.
//!
//! Import the prelude to bring the registry, session, and safety-net
//! surface into scope in one line:
//!
//! ```
//! use pointer_accel_engine::prelude::*;
//!
//! let net = SafetyNet::new();
//! assert_eq!(net.state(), NetState::Idle);
//! ```

pub use crate::error::{EngineError, EngineResult};
pub use crate::registry::{DeviceRegistry, PointerDevice, SpeedCallback, SpeedSample};
pub use crate::safety::{
    GRACE_SECONDS, NetCommand, NetOutcome, NetState, RestoreSettings, SafetyNet, TickAction,
    supervise,
};
pub use crate::scale::SpeedScale;
pub use crate::session::AccelSession;
pub use crate::speed::{FALLBACK_DT_MS, SpeedTracker};

pub use openaccel_settings::MovementType;
