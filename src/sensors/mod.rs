//! Hardware collaborators consumed by the sampler.
//!
//! The sampler only sees the two traits below; real devices and test doubles
//! both plug in through them.

pub mod adxl345;
#[cfg(target_os = "linux")]
pub mod sysfs_input;

pub use adxl345::Adxl345;
#[cfg(target_os = "linux")]
pub use sysfs_input::SysfsObstacleSensor;

use crate::types::Reading;

/// Logical state of the obstacle line after active-level translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    Asserted,
    Deasserted,
}

impl PinState {
    /// Maps a raw electrical level to a logical state.
    pub fn from_level(is_high: bool, active_low: bool) -> Self {
        if is_high != active_low {
            PinState::Asserted
        } else {
            PinState::Deasserted
        }
    }

    pub fn is_asserted(&self) -> bool {
        matches!(self, PinState::Asserted)
    }
}

/// 硬件读取错误
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("GPIO error: {0}")]
    Gpio(String),
    #[error("I2C error: {0}")]
    I2c(String),
    #[error("unexpected device id 0x{found:02X} (expected 0x{expected:02X})")]
    DeviceId { expected: u8, found: u8 },
}

/// Two-state digital input (proximity/obstacle sensor).
pub trait ObstacleInput {
    fn read(&mut self) -> Result<PinState, SensorError>;
}

/// Three-axis accelerometer reporting m/s².
pub trait Accelerometer {
    fn acceleration(&mut self) -> Result<Reading, SensorError>;
}
