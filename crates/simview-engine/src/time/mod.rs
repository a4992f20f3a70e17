//! Time subsystem.
//!
//! Provides the host-loop tick timer without coupling it to the window runtime.

mod tick_clock;

pub use tick_clock::TickClock;
