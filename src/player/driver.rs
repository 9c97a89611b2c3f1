//! Playback drivers
//!
//! A driver simulates (or performs) the playback of exactly one track and
//! talks to the command loop through the four-signal protocol: it waits for
//! the first play signal, then counts down the track's duration, honoring
//! pause/play to halt and resume and close to terminate silently. Countdown
//! expiry sends the end notification. The included [`CountdownDriver`] is a
//! pure timer; a real audio backend replaces it behind [`PlaybackDriver`]
//! without touching the state machine.

use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info};

use crate::player::types::DriverSignals;
use crate::playlist::Track;

/// Capability interface for playback backends
pub trait PlaybackDriver: Send + Sync + 'static {
    /// Spawn one driver instance for `track`, wired to `signals`
    ///
    /// The returned task must terminate on a close signal without sending
    /// end, and after sending end on its own completion. The command loop
    /// joins the task before spawning a successor.
    fn spawn(&self, track: Track, signals: DriverSignals) -> JoinHandle<()>;
}

/// Simulated playback: a pausable countdown over the track duration
#[derive(Debug, Default)]
pub struct CountdownDriver;

impl PlaybackDriver for CountdownDriver {
    fn spawn(&self, track: Track, signals: DriverSignals) -> JoinHandle<()> {
        tokio::spawn(run_countdown(track, signals))
    }
}

async fn run_countdown(track: Track, signals: DriverSignals) {
    let DriverSignals {
        mut play,
        mut pause,
        mut close,
        end,
    } = signals;

    info!(
        "Track loaded: '{}', duration {} ms",
        track.name, track.duration_ms
    );

    // The countdown does not start until the first play signal.
    tokio::select! {
        _ = close.recv() => {
            debug!("Track '{}' closed before start", track.name);
            return;
        }
        _ = play.recv() => {
            debug!("Track '{}' started", track.name);
        }
    }

    let mut remaining = Duration::from_millis(track.duration_ms);
    let mut deadline = Instant::now() + remaining;

    loop {
        // Counting: the deadline is live.
        tokio::select! {
            _ = close.recv() => {
                debug!("Track '{}' closed", track.name);
                return;
            }
            _ = time::sleep_until(deadline) => {
                debug!("Track '{}' ended", track.name);
                let _ = end.send(());
                return;
            }
            _ = pause.recv() => {
                remaining = deadline.duration_since(Instant::now());
                debug!(
                    "Track '{}' paused, {} ms remaining",
                    track.name,
                    remaining.as_millis()
                );

                // Halted: no deadline until play resumes it.
                loop {
                    tokio::select! {
                        _ = close.recv() => {
                            debug!("Track '{}' closed", track.name);
                            return;
                        }
                        _ = play.recv() => {
                            deadline = Instant::now() + remaining;
                            debug!("Track '{}' resumed", track.name);
                            break;
                        }
                        _ = pause.recv() => {}
                    }
                }
            }
            // Play while already counting is a no-op.
            _ = play.recv() => {}
        }
    }
}
