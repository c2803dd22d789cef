//! Session orchestration: the flight state machine, the tracking-loop
//! driver, and the plumbing shared with observer threads.

pub mod flight;
pub mod messages;
pub mod shared_state;
pub mod state;

pub use flight::{FlightCommand, FlightSystem};
pub use messages::TrackingSnapshot;
pub use shared_state::SharedState;
pub use state::FlightState;
