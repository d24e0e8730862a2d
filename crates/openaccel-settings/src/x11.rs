//! X11/XInput2 settings store.
//!
//! libinput exposes per-device acceleration settings as XInput device
//! properties. This backend speaks the wire contract directly:
//!
//! - `libinput Accel Profile Enabled` - INTEGER, three 8-bit flags in the
//!   order `[adaptive, flat, custom]`
//! - `libinput Accel Custom Motion Points` / `... Scroll Points` - FLOAT,
//!   up to 64 32-bit items
//! - `libinput Accel Custom Motion Step` / `... Scroll Step` - FLOAT,
//!   exactly one 32-bit item
//!
//! Devices are addressed by kernel node. The server's own `Device Node`
//! property maps X device ids back to nodes; ids are resolved on every
//! call and never cached, since the server renumbers them on hotplug.

use std::collections::HashMap;

use openaccel_curves::{AccelFunction, MAX_POINTS};
use parking_lot::RwLock;
use tracing::{debug, info};
use x11rb::protocol::xinput::{
    ConnectionExt as _, Device, XIChangePropertyAux, XIGetPropertyReply,
};
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt as _, PropMode};
use x11rb::rust_connection::RustConnection;

use crate::backend::SettingsBackend;
use crate::error::{SettingsError, SettingsResult};
use crate::types::{AccelSettings, AccelerationProfile, MovementType};

/// Property holding the three profile flag bytes.
const PROFILE_PROPERTY: &str = "libinput Accel Profile Enabled";

/// Property mapping an X device back to its kernel node.
const DEVICE_NODE_PROPERTY: &str = "Device Node";

/// Type atom of libinput's float properties.
const FLOAT_TYPE: &str = "FLOAT";

/// Read length in 32-bit units; large enough for any accel property.
const PROPERTY_READ_LEN: u32 = 128;

/// Name of the custom points property for one movement type.
fn points_property(movement: MovementType) -> String {
    format!("libinput Accel Custom {movement} Points")
}

/// Name of the custom step property for one movement type.
fn step_property(movement: MovementType) -> String {
    format!("libinput Accel Custom {movement} Step")
}

/// Narrow values to the store's f32 wire precision, bit-packed per item.
fn values_to_words(values: &[f64]) -> Vec<u32> {
    values.iter().map(|&v| (v as f32).to_bits()).collect()
}

/// Widen 32-bit float items back to f64.
fn words_to_values(words: &[u32]) -> Vec<f64> {
    words.iter().map(|&w| f64::from(f32::from_bits(w))).collect()
}

/// Settings backend backed by a live X server connection.
pub struct X11SettingsBackend {
    conn: RustConnection,
    atoms: RwLock<HashMap<String, Atom>>,
}

impl std::fmt::Debug for X11SettingsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X11SettingsBackend")
            .field("cached_atoms", &self.atoms.read().len())
            .finish_non_exhaustive()
    }
}

impl X11SettingsBackend {
    /// Connect to the display named by `$DISPLAY`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Connect`] if no X server is reachable.
    pub fn connect() -> SettingsResult<Self> {
        let (conn, screen) = x11rb::connect(None)?;
        debug!(screen, "connected to X server");
        Ok(Self {
            conn,
            atoms: RwLock::new(HashMap::new()),
        })
    }

    /// Look up an atom, treating an uninterned name as a missing property.
    ///
    /// Atoms are immutable for the lifetime of the server, so positive
    /// results are cached.
    fn atom(&self, name: &str) -> SettingsResult<Atom> {
        if let Some(&atom) = self.atoms.read().get(name) {
            return Ok(atom);
        }

        let reply = self.conn.intern_atom(true, name.as_bytes())?.reply()?;
        if reply.atom == x11rb::NONE {
            return Err(SettingsError::missing_property(name));
        }

        self.atoms.write().insert(name.to_owned(), reply.atom);
        Ok(reply.atom)
    }

    /// Fetch a device property without deleting it.
    fn property(&self, deviceid: u16, property: Atom) -> SettingsResult<XIGetPropertyReply> {
        let reply = self
            .conn
            .xinput_xi_get_property(
                deviceid,
                false,
                property,
                u32::from(AtomEnum::ANY),
                0,
                PROPERTY_READ_LEN,
            )?
            .reply()?;
        Ok(reply)
    }

    /// Find the X device whose `Device Node` property matches `node`.
    ///
    /// Devices that expose no node (virtual core devices) or that fail to
    /// answer (racing an unplug) are skipped rather than failing the scan.
    fn resolve_device(&self, node: &str) -> SettingsResult<u16> {
        let node_atom = self.atom(DEVICE_NODE_PROPERTY)?;
        let devices = self.conn.xinput_xi_query_device(Device::ALL)?.reply()?;

        for info in &devices.infos {
            let reply = match self.property(info.deviceid, node_atom) {
                Ok(reply) => reply,
                Err(_) => continue,
            };
            if reply.type_ != u32::from(AtomEnum::STRING) {
                continue;
            }
            let Some(bytes) = reply.items.as_data8() else {
                continue;
            };
            let device_node = String::from_utf8_lossy(bytes);
            if device_node.trim_end_matches('\0') == node {
                debug!(
                    node,
                    deviceid = info.deviceid,
                    name = %String::from_utf8_lossy(&info.name),
                    "resolved device node"
                );
                return Ok(info.deviceid);
            }
        }

        Err(SettingsError::resolution(node))
    }

    /// Read the profile flag bytes.
    fn read_profile(&self, deviceid: u16) -> SettingsResult<AccelerationProfile> {
        let atom = self.atom(PROFILE_PROPERTY)?;
        let reply = self.property(deviceid, atom)?;

        if reply.type_ == x11rb::NONE {
            return Err(SettingsError::missing_property(PROFILE_PROPERTY));
        }
        if reply.type_ != u32::from(AtomEnum::INTEGER) {
            return Err(SettingsError::type_mismatch(PROFILE_PROPERTY));
        }
        let Some(bytes) = reply.items.as_data8() else {
            return Err(SettingsError::type_mismatch(PROFILE_PROPERTY));
        };
        let Ok(flags) = <[u8; 3]>::try_from(bytes.as_slice()) else {
            return Err(SettingsError::type_mismatch(PROFILE_PROPERTY));
        };

        Ok(AccelerationProfile::from_flags(flags))
    }

    /// Read one float property into f64 values.
    fn read_floats(&self, deviceid: u16, name: &str) -> SettingsResult<Vec<f64>> {
        let atom = self.atom(name)?;
        let float_type = self.atom(FLOAT_TYPE)?;
        let reply = self.property(deviceid, atom)?;

        if reply.type_ == x11rb::NONE {
            return Err(SettingsError::missing_property(name));
        }
        if reply.type_ != float_type {
            return Err(SettingsError::type_mismatch(name));
        }
        let Some(words) = reply.items.as_data32() else {
            return Err(SettingsError::type_mismatch(name));
        };

        Ok(words_to_values(words))
    }

    /// Read the custom function of one movement type.
    fn read_function(&self, deviceid: u16, movement: MovementType) -> SettingsResult<AccelFunction> {
        let points_name = points_property(movement);
        let step_name = step_property(movement);

        let points = self.read_floats(deviceid, &points_name)?;
        let steps = self.read_floats(deviceid, &step_name)?;

        let step = match steps.as_slice() {
            [step] => *step,
            _ => return Err(SettingsError::type_mismatch(step_name)),
        };

        let count = points.len();
        match AccelFunction::from_parts(step, points) {
            Ok(function) => Ok(function),
            Err(_) => Err(SettingsError::shape_mismatch(count, MAX_POINTS)),
        }
    }

    /// Write the profile flag bytes.
    fn write_profile(&self, deviceid: u16, profile: AccelerationProfile) -> SettingsResult<()> {
        let atom = self.atom(PROFILE_PROPERTY)?;
        let flags = profile.to_flags();

        self.conn
            .xinput_xi_change_property(
                deviceid,
                PropMode::REPLACE,
                atom,
                u32::from(AtomEnum::INTEGER),
                3,
                &XIChangePropertyAux::Data8(flags.to_vec()),
            )?
            .check()?;

        debug!(deviceid, ?flags, "wrote acceleration profile");
        Ok(())
    }

    /// Write one movement type's custom function.
    fn write_function(
        &self,
        deviceid: u16,
        movement: MovementType,
        function: &AccelFunction,
    ) -> SettingsResult<()> {
        if function.points().len() > MAX_POINTS {
            return Err(SettingsError::shape_mismatch(
                function.points().len(),
                MAX_POINTS,
            ));
        }
        let words = values_to_words(function.points());
        let Ok(count) = u32::try_from(words.len()) else {
            return Err(SettingsError::shape_mismatch(words.len(), MAX_POINTS));
        };

        let float_type = self.atom(FLOAT_TYPE)?;
        let points_atom = self.atom(&points_property(movement))?;
        let step_atom = self.atom(&step_property(movement))?;

        self.conn
            .xinput_xi_change_property(
                deviceid,
                PropMode::REPLACE,
                points_atom,
                float_type,
                count,
                &XIChangePropertyAux::Data32(words),
            )?
            .check()?;

        self.conn
            .xinput_xi_change_property(
                deviceid,
                PropMode::REPLACE,
                step_atom,
                float_type,
                1,
                &XIChangePropertyAux::Data32(vec![(function.step() as f32).to_bits()]),
            )?
            .check()?;

        debug!(
            deviceid,
            movement = %movement,
            points = count,
            step = function.step(),
            "wrote custom acceleration function"
        );
        Ok(())
    }
}

impl SettingsBackend for X11SettingsBackend {
    fn get_settings(&self, node: &str) -> SettingsResult<AccelSettings> {
        let deviceid = self.resolve_device(node)?;
        let profile = self.read_profile(deviceid)?;
        let motion = self.read_function(deviceid, MovementType::Motion)?;
        let scroll = self.read_function(deviceid, MovementType::Scroll)?;

        debug!(node, deviceid, ?profile, "read acceleration settings");
        Ok(AccelSettings {
            profile,
            motion,
            scroll,
        })
    }

    fn set_settings(&self, node: &str, settings: &AccelSettings) -> SettingsResult<()> {
        let deviceid = self.resolve_device(node)?;

        // Fixed write order: profile flags, then per-type functions. An
        // abort leaves earlier writes in place; there is no rollback.
        self.write_profile(deviceid, settings.profile)?;

        for movement in MovementType::ALL {
            let function = settings.function(movement);
            if function.is_empty() {
                debug!(deviceid, movement = %movement, "no custom function to write");
                continue;
            }
            self.write_function(deviceid, movement, function)?;
        }

        info!(node, deviceid, "applied acceleration settings");
        Ok(())
    }
}
