use embedded_hal::digital::InputPin;
use sysfs_gpio::Direction;
use linux_embedded_hal::SysfsPin;
use log::{info, warn};

use super::{ObstacleInput, PinState, SensorError};

/// Obstacle sensor wired to a sysfs-exported GPIO line.
///
/// The pin is exported and set to input on construction, and unexported again
/// when the value is dropped, so every exit path leaves the line released.
pub struct SysfsObstacleSensor {
    pin: SysfsPin,
    number: u64,
    active_low: bool,
}

impl SysfsObstacleSensor {
    pub fn open(number: u64, active_low: bool) -> Result<Self, SensorError> {
        let pin = SysfsPin::new(number);
        pin.export().map_err(|e| SensorError::Gpio(format!("export pin {number}: {e:?}")))?;
        pin.set_direction(Direction::In)
            .map_err(|e| SensorError::Gpio(format!("set pin {number} as input: {e:?}")))?;

        info!("GPIO {} configured as input (active {})", number, if active_low { "low" } else { "high" });
        Ok(Self { pin, number, active_low })
    }
}

impl ObstacleInput for SysfsObstacleSensor {
    fn read(&mut self) -> Result<PinState, SensorError> {
        let high = self
            .pin
            .is_high()
            .map_err(|e| SensorError::Gpio(format!("read pin {}: {e:?}", self.number)))?;
        Ok(PinState::from_level(high, self.active_low))
    }
}

impl Drop for SysfsObstacleSensor {
    fn drop(&mut self) {
        match self.pin.unexport() {
            Ok(()) => info!("GPIO {} released", self.number),
            Err(e) => warn!("Failed to release GPIO {}: {:?}", self.number, e),
        }
    }
}
