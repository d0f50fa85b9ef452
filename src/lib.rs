pub mod as_str;
pub mod config;
pub mod constants;
pub mod driver;
pub mod geodesic;
pub mod listener;
pub mod phase;
pub mod store;
pub mod synth;
pub mod telemetry;

pub use constants::*;
