//! Pointer device registry and event pipeline.
//!
//! Enumerates evdev devices that look like pointers, attaches to one at a
//! time, and folds its relative events into per-frame speed samples. Events
//! between two `SYN_REPORT` markers form one frame; a frame yields at most
//! one motion sample and one scroll sample, timestamped by the kernel.
//!
//! Wheel deltas are taken from the classic `REL_WHEEL`/`REL_HWHEEL` axes
//! only; the hi-res variants describe the same physical motion and would
//! double-count it.

use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use evdev::{Device, InputEvent, InputEventKind, Key, RelativeAxisType};
use nix::fcntl::{FcntlArg, OFlag, fcntl};
use openaccel_settings::MovementType;
use serde::Serialize;
use tokio::io::Interest;
use tokio::io::unix::AsyncFd;
use tracing::{debug, info, trace, warn};

use crate::error::{EngineError, EngineResult};
use crate::speed::SpeedTracker;

/// One enumerated pointer device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointerDevice {
    /// Kernel device node, e.g. `/dev/input/event7`.
    pub node: PathBuf,
    /// Device name as reported by the kernel.
    pub name: String,
}

impl PointerDevice {
    /// Describe a device by node and name.
    pub fn new(node: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            name: name.into(),
        }
    }
}

/// A normalized speed sample produced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedSample {
    /// The movement type the sample belongs to.
    pub movement: MovementType,
    /// Speed in counts per millisecond.
    pub speed: f64,
}

/// Callback receiving speed samples for the selected movement type.
pub type SpeedCallback = Box<dyn FnMut(SpeedSample) + Send>;

/// Relative deltas accumulated since the last `SYN_REPORT`.
#[derive(Debug, Default, Clone, Copy)]
struct PendingFrame {
    dx: f64,
    dy: f64,
    scroll_h: f64,
    scroll_v: f64,
    timestamp_us: Option<u64>,
}

impl PendingFrame {
    fn record(&mut self, axis: RelativeAxisType, value: i32, timestamp_us: u64) {
        let value = f64::from(value);
        match axis {
            RelativeAxisType::REL_X => self.dx += value,
            RelativeAxisType::REL_Y => self.dy += value,
            RelativeAxisType::REL_WHEEL => self.scroll_v += value,
            RelativeAxisType::REL_HWHEEL => self.scroll_h += value,
            _ => return,
        }
        self.timestamp_us = Some(timestamp_us);
    }

    fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

struct Attachment {
    index: usize,
    /// `None` when attached offline through the test harness.
    handle: Option<Device>,
    frame: PendingFrame,
    tracker: SpeedTracker,
}

/// Registry over the machine's pointer devices.
///
/// At most one device is attached at a time; its event stream feeds the
/// speed callback. Timing state lives here and resets whenever the
/// attachment or the selected movement type changes.
pub struct DeviceRegistry {
    devices: Vec<PointerDevice>,
    attached: Option<Attachment>,
    movement: MovementType,
    on_speed: Option<SpeedCallback>,
}

impl std::fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("devices", &self.devices.len())
            .field("attached", &self.attached.as_ref().map(|a| a.index))
            .field("movement", &self.movement)
            .finish_non_exhaustive()
    }
}

/// A pointer for our purposes: relative x/y axes, or at least a left
/// button (trackpoints on some keyboards report buttons before axes).
fn is_pointer(device: &Device) -> bool {
    let has_motion = device.supported_relative_axes().is_some_and(|axes| {
        axes.contains(RelativeAxisType::REL_X) && axes.contains(RelativeAxisType::REL_Y)
    });
    let has_button = device
        .supported_keys()
        .is_some_and(|keys| keys.contains(Key::BTN_LEFT));
    has_motion || has_button
}

fn event_timestamp_us(event: &InputEvent) -> u64 {
    event
        .timestamp()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_micros() as u64)
}

fn set_nonblocking(fd: i32) -> EngineResult<()> {
    let flags = fcntl(fd, FcntlArg::F_GETFL).map_err(std::io::Error::from)?;
    let flags = OFlag::from_bits_truncate(flags) | OFlag::O_NONBLOCK;
    fcntl(fd, FcntlArg::F_SETFL(flags)).map_err(std::io::Error::from)?;
    Ok(())
}

fn open_pointer(node: &Path) -> EngineResult<Device> {
    let device = match Device::open(node) {
        Ok(device) => device,
        Err(source) => return Err(EngineError::attach(node.to_string_lossy(), source)),
    };
    set_nonblocking(device.as_raw_fd())?;
    Ok(device)
}

/// Turn one frame into samples, filtered to the selected movement type.
fn flush_frame(
    frame: PendingFrame,
    tracker: &mut SpeedTracker,
    selected: MovementType,
    on_speed: Option<&mut SpeedCallback>,
) -> usize {
    let Some(timestamp_us) = frame.timestamp_us else {
        return 0;
    };

    let mut sample = None;
    for (movement, delta) in [
        (MovementType::Motion, frame.dx.hypot(frame.dy)),
        (MovementType::Scroll, frame.scroll_h.hypot(frame.scroll_v)),
    ] {
        if delta <= 0.0 {
            continue;
        }
        // Both trackers stay warm even when only one type is selected.
        let Some(speed) = tracker.speed(movement, timestamp_us, delta) else {
            continue;
        };
        trace!(%movement, speed, "speed sample");
        if movement == selected {
            sample = Some(SpeedSample { movement, speed });
        }
    }

    let Some(sample) = sample else { return 0 };
    if let Some(callback) = on_speed {
        callback(sample);
    }
    1
}

impl DeviceRegistry {
    /// Scan evdev for pointer devices.
    ///
    /// Nodes the process cannot open are skipped silently; running without
    /// input-group permissions yields an empty registry, not an error.
    #[must_use]
    pub fn enumerate() -> Self {
        let mut devices = Vec::new();
        for (node, device) in evdev::enumerate() {
            if !is_pointer(&device) {
                continue;
            }
            let name = device.name().unwrap_or("unnamed device").to_owned();
            debug!(name, node = %node.display(), "found pointer device");
            devices.push(PointerDevice { node, name });
        }
        info!(count = devices.len(), "enumerated pointer devices");

        Self {
            devices,
            attached: None,
            movement: MovementType::Motion,
            on_speed: None,
        }
    }

    /// The enumerated devices, in scan order.
    #[must_use]
    pub fn devices(&self) -> &[PointerDevice] {
        &self.devices
    }

    /// Device names in scan order, ready for a selection list.
    #[must_use]
    pub fn device_names(&self) -> Vec<&str> {
        self.devices.iter().map(|d| d.name.as_str()).collect()
    }

    /// The currently attached device, if any.
    #[must_use]
    pub fn current(&self) -> Option<&PointerDevice> {
        let attached = self.attached.as_ref()?;
        self.devices.get(attached.index)
    }

    /// The movement type samples are emitted for.
    #[must_use]
    pub fn movement(&self) -> MovementType {
        self.movement
    }

    /// Attach to the device with the given name, detaching from any other.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DeviceNotFound`] for unknown names and
    /// [`EngineError::Attach`] when the node cannot be opened.
    pub fn set_current(&mut self, name: &str) -> EngineResult<()> {
        self.detach();

        let Some((index, node)) = self
            .devices
            .iter()
            .enumerate()
            .find(|(_, device)| device.name == name)
            .map(|(index, device)| (index, device.node.clone()))
        else {
            warn!(name, "pointer device not found");
            return Err(EngineError::device_not_found(name));
        };

        let handle = match open_pointer(&node) {
            Ok(handle) => handle,
            Err(error) => {
                warn!(name, node = %node.display(), %error, "failed to attach");
                return Err(error);
            }
        };
        self.attached = Some(Attachment {
            index,
            handle: Some(handle),
            frame: PendingFrame::default(),
            tracker: SpeedTracker::new(),
        });

        info!(name, node = %node.display(), "attached to pointer device");
        Ok(())
    }

    /// Drop the current attachment, closing the device.
    pub fn detach(&mut self) {
        if let Some(attached) = self.attached.take() {
            debug!(index = attached.index, "detached from pointer device");
        }
    }

    /// Select which movement type reaches the speed callback.
    ///
    /// Switching resets timing history, so the first frame after a switch
    /// uses the fallback interval instead of the stale gap.
    pub fn set_movement_type(&mut self, movement: MovementType) {
        if self.movement == movement {
            return;
        }
        self.movement = movement;
        if let Some(attached) = &mut self.attached {
            attached.tracker.reset();
        }
        debug!(%movement, "selected movement type");
    }

    /// Install the speed callback, replacing any previous one.
    pub fn on_speed(&mut self, callback: impl FnMut(SpeedSample) + Send + 'static) {
        self.on_speed = Some(Box::new(callback));
    }

    /// Drain all pending device events, emitting speed samples.
    ///
    /// Returns the number of samples produced for the selected movement
    /// type. With no attachment (or an offline one) this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if the event stream fails for any
    /// reason other than running dry.
    pub fn dispatch(&mut self) -> EngineResult<usize> {
        let Some(attached) = self.attached.as_mut() else {
            return Ok(0);
        };
        let Some(handle) = attached.handle.as_mut() else {
            return Ok(0);
        };

        let mut samples = 0;
        loop {
            match handle.fetch_events() {
                Ok(events) => {
                    for event in events {
                        match event.kind() {
                            InputEventKind::RelAxis(axis) => {
                                attached.frame.record(
                                    axis,
                                    event.value(),
                                    event_timestamp_us(&event),
                                );
                            }
                            InputEventKind::Synchronization(_) => {
                                samples += flush_frame(
                                    attached.frame.take(),
                                    &mut attached.tracker,
                                    self.movement,
                                    self.on_speed.as_mut(),
                                );
                            }
                            _ => {}
                        }
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(EngineError::Io(e)),
            }
        }

        Ok(samples)
    }

    /// Dispatch events whenever the attached device becomes readable.
    ///
    /// Runs until the stream fails; dropping the future detaches nothing
    /// and can be done at any await point.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoCurrentDevice`] without an online
    /// attachment, otherwise propagates stream errors.
    pub async fn drive(&mut self) -> EngineResult<()> {
        let fd = {
            let Some(attached) = self.attached.as_ref() else {
                return Err(EngineError::NoCurrentDevice);
            };
            let Some(handle) = attached.handle.as_ref() else {
                return Err(EngineError::NoCurrentDevice);
            };
            handle.as_raw_fd()
        };

        let async_fd = AsyncFd::with_interest(fd, Interest::READABLE)?;
        loop {
            let mut guard = async_fd.readable().await?;
            let samples = self.dispatch()?;
            trace!(samples, "drained device events");
            guard.clear_ready();
        }
    }
}

#[cfg(any(test, feature = "harness"))]
impl DeviceRegistry {
    /// Build a registry over a fixed inventory without touching evdev.
    #[must_use]
    pub fn with_inventory(devices: Vec<PointerDevice>) -> Self {
        Self {
            devices,
            attached: None,
            movement: MovementType::Motion,
            on_speed: None,
        }
    }

    /// Attach to a device by name without opening its node.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DeviceNotFound`] for unknown names.
    pub fn select_offline(&mut self, name: &str) -> EngineResult<()> {
        self.detach();
        let index = self
            .devices
            .iter()
            .position(|device| device.name == name)
            .ok_or_else(|| EngineError::device_not_found(name))?;
        self.attached = Some(Attachment {
            index,
            handle: None,
            frame: PendingFrame::default(),
            tracker: SpeedTracker::new(),
        });
        Ok(())
    }

    /// Feed one synthetic frame through the pipeline.
    ///
    /// Exercises the same accumulation and flush path as [`dispatch`],
    /// returning the number of samples produced.
    ///
    /// [`dispatch`]: DeviceRegistry::dispatch
    pub fn inject_frame(
        &mut self,
        dx: f64,
        dy: f64,
        scroll_h: f64,
        scroll_v: f64,
        timestamp_us: u64,
    ) -> usize {
        let Some(attached) = self.attached.as_mut() else {
            return 0;
        };
        let frame = PendingFrame {
            dx,
            dy,
            scroll_h,
            scroll_v,
            timestamp_us: Some(timestamp_us),
        };
        flush_frame(
            frame,
            &mut attached.tracker,
            self.movement,
            self.on_speed.as_mut(),
        )
    }
}
