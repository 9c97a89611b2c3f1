//! Player control engine
//!
//! **Module structure:**
//! - `engine.rs`: the `Player` facade and the command loop owning all state
//! - `driver.rs`: the `PlaybackDriver` capability trait and the simulated
//!   countdown backend
//! - `types.rs`: player state, command envelopes, and the signal set wiring

mod driver;
mod engine;
mod types;

pub use driver::{CountdownDriver, PlaybackDriver};
pub use engine::Player;
pub use types::{DriverSignals, PlayerState};
