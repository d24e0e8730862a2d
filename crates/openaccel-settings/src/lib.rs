//! Acceleration Settings Backends for OpenAccel
//!
//! This crate reads and writes per-device pointer acceleration settings
//! through a backend seam, with a concrete implementation for the
//! X11/XInput2 property store that libinput exposes.
//!
//! # Overview
//!
//! The settings system supports:
//! - **Profiles**: The `[adaptive, flat, custom]` flag triple selecting a
//!   device's acceleration profile
//! - **Custom functions**: One sampled step function per movement type
//!   (motion and scroll), at most 64 points each
//! - **Node addressing**: Devices are identified by kernel device node,
//!   resolved to backend device ids on every call
//!
//! # Precision
//!
//! The X11 store carries 32-bit floats. Values written through any backend
//! are narrowed to f32 on the wire, so reading back returns `f64` values
//! that are exactly representable in f32.
//!
//! # Example
//!
//! ```no_run
//! use openaccel_settings::{SettingsBackend, X11SettingsBackend};
//!
//! let backend = X11SettingsBackend::connect()?;
//! let settings = backend.get_settings("/dev/input/event7")?;
//! println!("custom profile active: {}", settings.profile.custom);
//! # Ok::<(), openaccel_settings::SettingsError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backend;
pub mod error;
#[cfg(any(test, feature = "harness"))]
pub mod memory;
pub mod prelude;
pub mod types;
pub mod x11;

pub use backend::SettingsBackend;
pub use error::{SettingsError, SettingsResult};
#[cfg(any(test, feature = "harness"))]
pub use memory::MemoryBackend;
pub use types::{AccelSettings, AccelerationProfile, MovementType, ProfileKind};
pub use x11::X11SettingsBackend;
