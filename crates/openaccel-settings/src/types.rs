//! Settings data model shared by all backends.
//!
//! These types mirror what a libinput-managed property store exposes per
//! device: which acceleration profile is enabled, and one custom
//! acceleration function per movement type.

use openaccel_curves::AccelFunction;
use serde::{Deserialize, Serialize};

/// The kind of device movement an acceleration function applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    /// Relative pointer motion (x/y deltas).
    Motion,
    /// Wheel scrolling (vertical or horizontal detents).
    Scroll,
}

impl MovementType {
    /// Every movement type, in stable order.
    pub const ALL: [MovementType; 2] = [MovementType::Motion, MovementType::Scroll];

    /// Number of movement types.
    pub const COUNT: usize = 2;

    /// The label used inside backend property names.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MovementType::Motion => "Motion",
            MovementType::Scroll => "Scroll",
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which acceleration profile a device runs.
///
/// The wire form is three flag bytes in the fixed order
/// `[adaptive, flat, custom]`; exactly one is normally set, but the store
/// itself does not enforce that, so all three are carried as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccelerationProfile {
    /// Speed-dependent acceleration (the libinput default).
    pub adaptive: bool,
    /// Constant factor, no acceleration.
    pub flat: bool,
    /// User-supplied acceleration function.
    pub custom: bool,
}

impl AccelerationProfile {
    /// The profile that activates user-supplied functions.
    #[must_use]
    pub const fn custom() -> Self {
        Self {
            adaptive: false,
            flat: false,
            custom: true,
        }
    }

    /// Decode from the three wire flag bytes (any nonzero byte is set).
    #[must_use]
    pub fn from_flags(flags: [u8; 3]) -> Self {
        let [adaptive, flat, custom] = flags;
        Self {
            adaptive: adaptive != 0,
            flat: flat != 0,
            custom: custom != 0,
        }
    }

    /// Encode into the three wire flag bytes.
    #[must_use]
    pub fn to_flags(self) -> [u8; 3] {
        [
            u8::from(self.adaptive),
            u8::from(self.flat),
            u8::from(self.custom),
        ]
    }

    /// The single profile kind these flags select.
    ///
    /// The store does not forbid several flags at once; when that happens
    /// the most specific kind wins (custom over flat over adaptive).
    #[must_use]
    pub fn kind(self) -> ProfileKind {
        if self.custom {
            ProfileKind::Custom
        } else if self.flat {
            ProfileKind::Flat
        } else if self.adaptive {
            ProfileKind::Adaptive
        } else {
            ProfileKind::Unset
        }
    }

    /// Whether the custom profile is enabled.
    #[must_use]
    pub fn is_custom(self) -> bool {
        self.custom
    }

    /// Whether the flags describe a well-formed selector (at most one set).
    #[must_use]
    pub fn is_valid(self) -> bool {
        u8::from(self.adaptive) + u8::from(self.flat) + u8::from(self.custom) <= 1
    }
}

/// The profile kind an [`AccelerationProfile`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileKind {
    /// No profile flag set; the device is in an unknown state.
    Unset,
    /// Speed-dependent acceleration.
    Adaptive,
    /// Constant factor.
    Flat,
    /// User-supplied acceleration function.
    Custom,
}

/// Everything a backend stores about one device's acceleration.
///
/// A freshly queried device that has never had custom functions installed
/// reports empty functions; the profile flags are always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelSettings {
    /// The enabled acceleration profile.
    pub profile: AccelerationProfile,
    /// Custom function for pointer motion.
    pub motion: AccelFunction,
    /// Custom function for scrolling.
    pub scroll: AccelFunction,
}

impl AccelSettings {
    /// The function for one movement type.
    #[must_use]
    pub fn function(&self, movement: MovementType) -> &AccelFunction {
        match movement {
            MovementType::Motion => &self.motion,
            MovementType::Scroll => &self.scroll,
        }
    }

    /// Replace the function for one movement type.
    pub fn set_function(&mut self, movement: MovementType, function: AccelFunction) {
        match movement {
            MovementType::Motion => self.motion = function,
            MovementType::Scroll => self.scroll = function,
        }
    }

    /// Install a custom function and switch the profile to custom.
    pub fn install_custom(&mut self, movement: MovementType, function: AccelFunction) {
        self.set_function(movement, function);
        self.profile = AccelerationProfile::custom();
    }
}
