//! Host location-provider interfaces for punchclock
//!
//! This crate defines the boundary between the attendance core and whatever
//! can report the device position (a browser geolocation bridge, a GPS daemon,
//! a fixed coordinate from the command line). It contains no platform code.

mod capabilities;
mod fixed;
mod traits;

pub use capabilities::*;
pub use fixed::*;
pub use traits::*;
