pub mod error;
pub mod state;

pub use error::{Result, TopbarError};
pub use state::{
    AudioLevel, BatteryStatus, ChargeState, MemoryUsage, Reading, StatusState,
};
