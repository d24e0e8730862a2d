//! Timed safety net for freshly applied settings.
//!
//! A bad curve can make the pointer unusable, locking the user out of the
//! very dialog that could undo it. After every apply the net arms a grace
//! countdown; unless the user confirms within it, the original settings
//! are written back automatically.
//!
//! The countdown lives in a single state machine so the one-second tick
//! and the grace deadline cannot drift apart: expiry is the tick that
//! brings the counter to zero, and restore fires exactly once.

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, interval_at};
use tracing::{debug, info, warn};

use crate::error::EngineResult;

/// Seconds the user has to confirm before settings are rolled back.
pub const GRACE_SECONDS: u32 = 10;

/// Restore target driven by the safety net.
pub trait RestoreSettings {
    /// Write the saved original settings back.
    ///
    /// # Errors
    ///
    /// Propagates whatever the underlying settings write returns.
    fn restore_saved(&mut self) -> EngineResult<()>;
}

/// Where the net is in its arm / confirm / expire cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetState {
    /// No apply is being guarded.
    Idle,
    /// Counting down; restore fires when the counter reaches zero.
    Armed {
        /// Whole seconds remaining.
        seconds_left: u32,
    },
    /// The user confirmed in time; applied settings stay.
    Confirmed,
    /// The net restored (or was told to restore) the original settings.
    Restored,
}

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Nothing; the net is not armed.
    None,
    /// Show the new number of seconds remaining.
    UpdateCountdown(u32),
    /// The grace period expired; restore the original settings now.
    Restore,
}

/// Countdown state machine guarding one apply at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyNet {
    state: NetState,
}

impl SafetyNet {
    /// A net with nothing to guard yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: NetState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> NetState {
        self.state
    }

    /// Start (or restart) the grace countdown.
    ///
    /// Re-arming while armed resets the counter, so rapid successive
    /// applies share one deadline measured from the latest.
    pub fn arm(&mut self) {
        self.state = NetState::Armed {
            seconds_left: GRACE_SECONDS,
        };
        debug!(seconds = GRACE_SECONDS, "safety net armed");
    }

    /// Confirm the applied settings, disarming the countdown.
    ///
    /// Returns `false` when the net was not armed, in which case nothing
    /// changes; confirming an expired net cannot resurrect the apply.
    pub fn confirm(&mut self) -> bool {
        if matches!(self.state, NetState::Armed { .. }) {
            self.state = NetState::Confirmed;
            info!("applied settings confirmed");
            return true;
        }
        false
    }

    /// Advance the countdown by one second.
    ///
    /// Returns [`TickAction::Restore`] on the expiring tick and never
    /// again: the transition to [`NetState::Restored`] is one-way until
    /// the next [`arm`](SafetyNet::arm).
    pub fn tick(&mut self) -> TickAction {
        let NetState::Armed { seconds_left } = self.state else {
            return TickAction::None;
        };
        let seconds_left = seconds_left.saturating_sub(1);
        if seconds_left == 0 {
            self.state = NetState::Restored;
            info!("grace period expired");
            return TickAction::Restore;
        }
        self.state = NetState::Armed { seconds_left };
        TickAction::UpdateCountdown(seconds_left)
    }

    /// Abort the countdown because the caller is restoring on its own.
    ///
    /// Returns `true` when a countdown was actually cancelled.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.state, NetState::Armed { .. }) {
            self.state = NetState::Restored;
            return true;
        }
        false
    }
}

impl Default for SafetyNet {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands a UI can send to a running supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetCommand {
    /// Keep the applied settings and stop the countdown.
    Confirm,
    /// Restore the original settings immediately.
    RestoreNow,
}

/// How a supervised grace period ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetOutcome {
    /// The user confirmed; applied settings remain on the device.
    Confirmed,
    /// The original settings were written back.
    Restored,
}

/// Run one grace period to completion.
///
/// Arms the net, ticks it once per second, and resolves on the first of:
/// a [`NetCommand::Confirm`], a [`NetCommand::RestoreNow`], the command
/// channel closing (a vanished UI cannot confirm, so the settings are
/// restored), or the countdown expiring. `on_tick` receives each new
/// seconds-remaining value for display.
///
/// # Errors
///
/// Propagates restore failures from the target; the target keeps its
/// snapshot in that case, so the caller may retry.
pub async fn supervise<R: RestoreSettings>(
    net: &mut SafetyNet,
    target: &mut R,
    commands: &mut mpsc::Receiver<NetCommand>,
    mut on_tick: impl FnMut(u32),
) -> EngineResult<NetOutcome> {
    net.arm();
    let mut ticker = interval_at(Instant::now() + Duration::from_secs(1), Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = ticker.tick() => match net.tick() {
                TickAction::None => {}
                TickAction::UpdateCountdown(seconds) => on_tick(seconds),
                TickAction::Restore => {
                    if let Err(error) = target.restore_saved() {
                        warn!(%error, "restore failed after grace expiry");
                        return Err(error);
                    }
                    return Ok(NetOutcome::Restored);
                }
            },
            command = commands.recv() => match command {
                Some(NetCommand::Confirm) => {
                    if net.confirm() {
                        return Ok(NetOutcome::Confirmed);
                    }
                }
                Some(NetCommand::RestoreNow) | None => {
                    net.cancel();
                    if let Err(error) = target.restore_saved() {
                        warn!(%error, "restore on demand failed");
                        return Err(error);
                    }
                    return Ok(NetOutcome::Restored);
                }
            },
        }
    }
}
