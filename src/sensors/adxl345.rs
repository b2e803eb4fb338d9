//! Minimal ADXL345 reader over any `embedded-hal` I²C bus.

use embedded_hal::i2c::I2c;
use log::info;

use super::{Accelerometer, SensorError};
use crate::types::Reading;

pub const DEFAULT_ADDRESS: u8 = 0x53;

const REG_DEVID: u8 = 0x00;
const REG_POWER_CTL: u8 = 0x2D;
const REG_INT_ENABLE: u8 = 0x2E;
const REG_DATAX0: u8 = 0x32;

const DEVICE_ID: u8 = 0xE5;
const POWER_CTL_MEASURE: u8 = 0x08;

const MG_PER_LSB: f64 = 0.004;
const STANDARD_GRAVITY: f64 = 9.80665;

pub struct Adxl345<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Adxl345<I2C> {
    /// Verifies the device id and switches the chip into measurement mode.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, SensorError> {
        let mut dev = Self { i2c, address };

        let id = dev.read_register(REG_DEVID)?;
        if id != DEVICE_ID {
            return Err(SensorError::DeviceId {
                expected: DEVICE_ID,
                found: id,
            });
        }

        dev.write_register(REG_INT_ENABLE, 0x00)?;
        dev.write_register(REG_POWER_CTL, POWER_CTL_MEASURE)?;
        info!("ADXL345 ready at 0x{:02X}", address);

        Ok(dev)
    }

    /// Raw 10-bit counts for x, y, z.
    pub fn raw(&mut self) -> Result<[i16; 3], SensorError> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[REG_DATAX0], &mut buf)
            .map_err(|e| SensorError::I2c(format!("{e:?}")))?;

        Ok([
            i16::from_le_bytes([buf[0], buf[1]]),
            i16::from_le_bytes([buf[2], buf[3]]),
            i16::from_le_bytes([buf[4], buf[5]]),
        ])
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|e| SensorError::I2c(format!("{e:?}")))?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|e| SensorError::I2c(format!("{e:?}")))
    }
}

impl<I2C: I2c> Accelerometer for Adxl345<I2C> {
    fn acceleration(&mut self) -> Result<Reading, SensorError> {
        let [x, y, z] = self.raw()?;
        let scale = |v: i16| v as f64 * MG_PER_LSB * STANDARD_GRAVITY;
        Ok(Reading::new(scale(x), scale(y), scale(z)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Register-file fake: writes of `[reg, value]` store, `[reg]` + read streams out.
    struct FakeBus {
        regs: [u8; 64],
        pointer: usize,
        fail: bool,
        seen_addresses: Vec<u8>,
    }

    impl FakeBus {
        fn new() -> Self {
            let mut regs = [0u8; 64];
            regs[REG_DEVID as usize] = DEVICE_ID;
            Self {
                regs,
                pointer: 0,
                fail: false,
                seen_addresses: Vec::new(),
            }
        }

        fn with_axes(mut self, x: i16, y: i16, z: i16) -> Self {
            let base = REG_DATAX0 as usize;
            for (i, v) in [x, y, z].iter().enumerate() {
                let [lo, hi] = v.to_le_bytes();
                self.regs[base + i * 2] = lo;
                self.regs[base + i * 2 + 1] = hi;
            }
            self
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Bus);
            }
            self.seen_addresses.push(address);
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.pointer = bytes[0] as usize;
                        if bytes.len() > 1 {
                            self.regs[self.pointer] = bytes[1];
                        }
                    }
                    Operation::Read(buf) => {
                        for b in buf.iter_mut() {
                            *b = self.regs[self.pointer];
                            self.pointer += 1;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn init_enables_measurement_mode() {
        let dev = Adxl345::new(FakeBus::new(), DEFAULT_ADDRESS).unwrap();
        let bus = &dev.i2c;
        assert_eq!(bus.regs[REG_POWER_CTL as usize], POWER_CTL_MEASURE);
        assert!(bus.seen_addresses.iter().all(|a| *a == DEFAULT_ADDRESS));
    }

    #[test]
    fn rejects_wrong_device_id() {
        let mut bus = FakeBus::new();
        bus.regs[REG_DEVID as usize] = 0x42;
        match Adxl345::new(bus, DEFAULT_ADDRESS) {
            Err(SensorError::DeviceId { found, .. }) => assert_eq!(found, 0x42),
            _ => panic!("expected device id error"),
        }
    }

    #[test]
    fn converts_counts_to_meters_per_second_squared() {
        let bus = FakeBus::new().with_axes(0, -250, 250);
        let mut dev = Adxl345::new(bus, DEFAULT_ADDRESS).unwrap();

        let reading = dev.acceleration().unwrap();
        assert_eq!(reading.x, 0.0);
        assert!((reading.y + 9.80665).abs() < 1e-9);
        assert!((reading.z - 9.80665).abs() < 1e-9);
    }

    #[test]
    fn bus_failure_surfaces_as_i2c_error() {
        let mut dev = Adxl345::new(FakeBus::new(), DEFAULT_ADDRESS).unwrap();
        dev.i2c.fail = true;
        assert!(matches!(dev.acceleration(), Err(SensorError::I2c(_))));
    }
}
