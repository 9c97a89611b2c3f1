//! Player state, commands, and the driver signal set

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::Result;

/// Externally observable player state
///
/// Written only by the command loop; everyone else sees it through a watch
/// channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    /// No driver is live; playback starts from the cursor on the next play
    NoActiveTrack,
    /// A driver is live and its countdown is running
    Playing,
    /// A driver is live with its countdown halted
    Paused,
    /// The engine has shut down; all commands are refused
    Closed,
}

/// Playback command issued through the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Play,
    Pause,
    Next,
    Prev,
}

/// A command paired with its single-use reply channel
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub reply: oneshot::Sender<Result<()>>,
}

/// Driver-side ends of one signal set
///
/// Handed to [`PlaybackDriver::spawn`](crate::player::PlaybackDriver::spawn);
/// the driver must keep selecting over the three receivers for its whole
/// lifetime so signal delivery is never stalled.
pub struct DriverSignals {
    /// Start, or resume, the countdown
    pub play: mpsc::Receiver<()>,
    /// Halt the countdown, preserving remaining time
    pub pause: mpsc::Receiver<()>,
    /// Terminate immediately and silently (no end notification)
    pub close: mpsc::Receiver<()>,
    /// Sent once when the countdown expires; dropped on close
    pub end: oneshot::Sender<()>,
}

/// Loop-side ends of one signal set
pub(crate) struct SignalSet {
    pub play: mpsc::Sender<()>,
    pub pause: mpsc::Sender<()>,
    pub close: mpsc::Sender<()>,
    pub end: oneshot::Receiver<()>,
}

impl SignalSet {
    /// Wire a fresh signal set for one driver instance
    ///
    /// Signal channels have capacity 1: a send completes as soon as the
    /// driver is parked in its select, and at most one of each signal is
    /// ever outstanding.
    pub(crate) fn new() -> (SignalSet, DriverSignals) {
        let (play_tx, play_rx) = mpsc::channel(1);
        let (pause_tx, pause_rx) = mpsc::channel(1);
        let (close_tx, close_rx) = mpsc::channel(1);
        let (end_tx, end_rx) = oneshot::channel();

        (
            SignalSet {
                play: play_tx,
                pause: pause_tx,
                close: close_tx,
                end: end_rx,
            },
            DriverSignals {
                play: play_rx,
                pause: pause_rx,
                close: close_rx,
                end: end_tx,
            },
        )
    }
}

/// Loop-held handle to the live driver instance
///
/// Exactly one exists at a time. Dropping it abandons the end notification,
/// which is how a stale end from an already-torn-down driver is discarded.
pub(crate) struct DriverHandle {
    pub signals: SignalSet,
    pub task: JoinHandle<()>,
}
