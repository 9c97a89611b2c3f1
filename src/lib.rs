//! phono - remote-controlled music player service
//!
//! A headless player over a mutable ordered track list. Playback is
//! simulated: a driver task counts down each track's duration and the
//! engine advances through the playlist exactly as a real backend would
//! drive it. Remote control and catalog management are exposed over a REST
//! API.

pub mod api;
pub mod config;
pub mod error;
pub mod player;
pub mod playlist;

pub use error::{Error, Result};
