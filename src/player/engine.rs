//! Player engine: facade and command loop
//!
//! The [`Player`] facade enqueues commands on a bounded queue; a single
//! command loop task owns the player state, executes one transition at a
//! time, and replies to each caller over a oneshot channel. The loop is the
//! only writer of the state, so transitions never race; everyone else
//! observes the state through a watch channel. The loop also consumes the
//! end-of-track notification from the live driver and synthesizes the
//! advance to the next track.

use std::future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::player::driver::{CountdownDriver, PlaybackDriver};
use crate::player::types::{Command, CommandEnvelope, DriverHandle, PlayerState, SignalSet};
use crate::playlist::Playlist;

/// Commands waiting for the loop beyond this count make enqueue itself wait
const COMMAND_QUEUE_CAPACITY: usize = 10;

/// Default bound on a facade call, enqueue and reply included
const DEFAULT_COMMAND_DEADLINE: Duration = Duration::from_secs(5);

/// Remote-controllable player over a playlist
///
/// Construction spawns the command loop; [`Player::close`] shuts it down and
/// finalizes the playlist. All methods are safe to call from any number of
/// tasks concurrently.
pub struct Player {
    playlist: Arc<dyn Playlist>,
    commands_tx: mpsc::Sender<CommandEnvelope>,
    state_rx: watch::Receiver<PlayerState>,
    shutdown_tx: watch::Sender<bool>,
    closed: AtomicBool,
    loop_task: Mutex<Option<JoinHandle<()>>>,
    command_deadline: Duration,
}

impl Player {
    /// Create a player with the simulated countdown driver
    pub fn new(playlist: Arc<dyn Playlist>) -> Self {
        Self::with_driver(playlist, Arc::new(CountdownDriver))
    }

    /// Create a player with a specific playback backend
    pub fn with_driver(playlist: Arc<dyn Playlist>, driver: Arc<dyn PlaybackDriver>) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let (state_tx, state_rx) = watch::channel(PlayerState::NoActiveTrack);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let command_loop = CommandLoop {
            playlist: Arc::clone(&playlist),
            driver,
            commands_rx,
            shutdown_rx,
            state_tx,
            active: None,
        };
        let loop_task = tokio::spawn(command_loop.run());

        Self {
            playlist,
            commands_tx,
            state_rx,
            shutdown_tx,
            closed: AtomicBool::new(false),
            loop_task: Mutex::new(Some(loop_task)),
            command_deadline: DEFAULT_COMMAND_DEADLINE,
        }
    }

    /// Override the per-command deadline (call before sharing the player)
    pub fn set_command_deadline(&mut self, deadline: Duration) {
        self.command_deadline = deadline;
    }

    /// Current player state
    pub fn state(&self) -> PlayerState {
        *self.state_rx.borrow()
    }

    /// The playlist collaborator, for direct catalog access
    ///
    /// CRUD operations go straight to the playlist; only cursor-moving
    /// playback transitions pass through the command loop.
    pub fn playlist(&self) -> &Arc<dyn Playlist> {
        &self.playlist
    }

    /// Start or resume playback
    pub async fn play(&self) -> Result<()> {
        self.submit(Command::Play).await
    }

    /// Halt playback, keeping the current track and its progress
    pub async fn pause(&self) -> Result<()> {
        self.submit(Command::Pause).await
    }

    /// Skip to the next track
    pub async fn next(&self) -> Result<()> {
        self.submit(Command::Next).await
    }

    /// Skip to the previous track
    pub async fn prev(&self) -> Result<()> {
        self.submit(Command::Prev).await
    }

    /// Shut the player down and finalize the playlist
    ///
    /// Idempotent. The live driver is torn down, queued commands are
    /// answered with [`Error::PlayerClosed`], and the playlist close (which
    /// persists the file-backed store) runs once the loop has terminated.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        info!("Player closing");

        let _ = self.shutdown_tx.send(true);
        let task = self.loop_task.lock().await.take();
        if let Some(task) = task {
            let _ = task.await;
        }
        self.playlist.close()
    }

    async fn submit(&self, command: Command) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = CommandEnvelope {
            command,
            reply: reply_tx,
        };

        let submit = async {
            // Both a refused enqueue and a dropped reply sender mean the
            // loop is gone.
            self.commands_tx
                .send(envelope)
                .await
                .map_err(|_| Error::PlayerClosed)?;
            reply_rx.await.map_err(|_| Error::PlayerClosed)?
        };

        match timeout(self.command_deadline, submit).await {
            Ok(result) => result,
            // Abandons only this caller's wait; the loop still completes the
            // transition and its reply send observes a dropped receiver.
            Err(_) => Err(Error::DeadlineExceeded),
        }
    }
}

/// Cursor direction for skip transitions
#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// The single task owning player state
struct CommandLoop {
    playlist: Arc<dyn Playlist>,
    driver: Arc<dyn PlaybackDriver>,
    commands_rx: mpsc::Receiver<CommandEnvelope>,
    shutdown_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<PlayerState>,
    /// Live driver instance; `Some` iff state is Playing or Paused
    active: Option<DriverHandle>,
}

impl CommandLoop {
    async fn run(mut self) {
        debug!("Command loop started");

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => break,
                Some(envelope) = self.commands_rx.recv() => {
                    let result = self.dispatch(envelope.command).await;
                    // A oneshot send never blocks; a caller that abandoned
                    // its wait just dropped the receiver.
                    let _ = envelope.reply.send(result);
                }
                end = Self::track_end(&mut self.active) => match end {
                    Ok(()) => self.handle_track_end().await,
                    Err(_) => self.handle_driver_loss().await,
                },
            }
        }

        self.shutdown().await;
    }

    /// Resolves when the live driver reports end of track
    ///
    /// Pends forever while no driver is live. An `Err` means the driver task
    /// went away without sending end and without being closed by us.
    async fn track_end(
        active: &mut Option<DriverHandle>,
    ) -> std::result::Result<(), oneshot::error::RecvError> {
        match active {
            Some(handle) => (&mut handle.signals.end).await,
            None => future::pending().await,
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        debug!("Command: {:?} in state {:?}", command, self.state());
        match command {
            Command::Play => self.play().await,
            Command::Pause => self.pause().await,
            Command::Next => self.skip(Direction::Forward).await,
            Command::Prev => self.skip(Direction::Backward).await,
        }
    }

    async fn play(&mut self) -> Result<()> {
        match self.state() {
            PlayerState::Playing => Ok(()),
            PlayerState::Paused => {
                self.signal_play().await;
                self.set_state(PlayerState::Playing);
                Ok(())
            }
            _ => {
                // A detached cursor starts from the front.
                if self.playlist.current().is_none() {
                    self.playlist.cursor_to_front();
                }
                self.start_current().await
            }
        }
    }

    async fn pause(&mut self) -> Result<()> {
        if self.state() != PlayerState::Playing {
            return Ok(());
        }
        if let Some(handle) = &self.active {
            let _ = handle.signals.pause.send(()).await;
        }
        self.set_state(PlayerState::Paused);
        Ok(())
    }

    async fn skip(&mut self, direction: Direction) -> Result<()> {
        // The old driver is fully torn down before the cursor moves, so two
        // drivers never share a moment.
        self.stop_active().await;
        self.set_state(PlayerState::NoActiveTrack);

        match direction {
            Direction::Forward => self.playlist.cursor_to_next(),
            Direction::Backward => self.playlist.cursor_to_prev(),
        };
        self.start_current().await
    }

    /// End-of-track: the driver finished on its own; advance like a Next
    /// with no caller waiting
    async fn handle_track_end(&mut self) {
        debug!("End of track");
        if let Some(handle) = self.active.take() {
            let _ = handle.task.await;
        }
        self.set_state(PlayerState::NoActiveTrack);

        if let Err(e) = self.skip(Direction::Forward).await {
            debug!("Playback stopped: {}", e);
        }
    }

    /// The driver task terminated without an end notification
    async fn handle_driver_loss(&mut self) {
        warn!("Playback driver terminated unexpectedly");
        if let Some(handle) = self.active.take() {
            let _ = handle.task.await;
        }
        self.set_state(PlayerState::NoActiveTrack);
    }

    /// Load the track at the cursor and bring up a driver for it
    async fn start_current(&mut self) -> Result<()> {
        let track = self.playlist.current().ok_or(Error::NoTrack)?;

        let (signals, driver_signals) = SignalSet::new();
        let task = self.driver.spawn(track, driver_signals);
        let handle = DriverHandle { signals, task };
        let _ = handle.signals.play.send(()).await;

        self.active = Some(handle);
        self.set_state(PlayerState::Playing);
        Ok(())
    }

    /// Send play to the live driver (resume from pause)
    async fn signal_play(&mut self) {
        if let Some(handle) = &self.active {
            let _ = handle.signals.play.send(()).await;
        }
    }

    /// Close and join the live driver, if any
    ///
    /// Dropping the handle also discards a stale end notification from a
    /// driver that expired while the close was in flight.
    async fn stop_active(&mut self) {
        if let Some(handle) = self.active.take() {
            let _ = handle.signals.close.send(()).await;
            let _ = handle.task.await;
        }
    }

    async fn shutdown(&mut self) {
        debug!("Command loop shutting down");

        // Refuse new commands, then answer the ones already queued.
        self.commands_rx.close();
        while let Ok(envelope) = self.commands_rx.try_recv() {
            let _ = envelope.reply.send(Err(Error::PlayerClosed));
        }

        self.stop_active().await;
        self.set_state(PlayerState::Closed);
        info!("Player closed");
    }

    fn state(&self) -> PlayerState {
        *self.state_tx.borrow()
    }

    fn set_state(&self, state: PlayerState) {
        self.state_tx.send_replace(state);
    }
}
