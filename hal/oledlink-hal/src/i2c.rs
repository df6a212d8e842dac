//! I2C bus abstractions
//!
//! Provides the interrupt-level primitives of a TWI master. Each call maps
//! to one register update on a typical 8-bit microcontroller: the hardware
//! raises an interrupt when the requested action has finished on the wire.

/// Two-wire bus master, driven one event at a time
///
/// Implementations must not block. Every method only arms the peripheral;
/// completion is reported by the next bus interrupt.
pub trait TwiController {
    /// Power up the peripheral, program the bit-rate divider and enable
    /// its interrupt
    fn enable(&mut self, divider: ClockDivider);

    /// Issue a START condition
    fn start(&mut self);

    /// Load one byte into the data register and release the bus clock
    ///
    /// Also clears a pending START request, so the first write after
    /// [`start`](Self::start) sends the address byte.
    fn write(&mut self, byte: u8);

    /// Issue a STOP condition
    fn stop(&mut self);
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// SCL frequency in Hz
    pub frequency: u32,
    /// Peripheral clock feeding the bit-rate generator, in Hz
    pub cpu_frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz) on a 16 MHz part
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        cpu_frequency: 16_000_000,
    };

    /// Fast mode (400 kHz) on a 16 MHz part
    pub const FAST: Self = Self {
        frequency: 400_000,
        cpu_frequency: 16_000_000,
    };

    /// Same clock source, different SCL frequency
    pub const fn with_frequency(self, frequency: u32) -> Self {
        Self { frequency, ..self }
    }

    /// Divider settings for this configuration
    pub fn divider(&self) -> ClockDivider {
        ClockDivider::compute(self.cpu_frequency, self.frequency)
    }
}

/// Bit-rate register and prescaler pair
///
/// SCL = cpu / (16 + 2 * bit_rate * 4^prescaler)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDivider {
    /// Bit-rate register value
    pub bit_rate: u8,
    /// Prescaler exponent (0..=3, factor 4^n)
    pub prescaler: u8,
}

impl ClockDivider {
    /// Largest prescaler exponent supported by the hardware
    pub const MAX_PRESCALER: u8 = 3;

    /// Find the divider closest to `scl_hz`
    ///
    /// Starts with no prescaling and divides by four per prescaler step
    /// until the bit rate fits in a byte. Frequencies too low to reach
    /// saturate at the slowest setting; frequencies too high give a bit
    /// rate of zero.
    pub fn compute(cpu_hz: u32, scl_hz: u32) -> Self {
        let mut bit_rate = (cpu_hz / scl_hz.saturating_mul(2).max(1)).saturating_sub(8);
        let mut prescaler = 0;

        while bit_rate > u32::from(u8::MAX) && prescaler < Self::MAX_PRESCALER {
            bit_rate /= 4;
            prescaler += 1;
        }

        Self {
            bit_rate: bit_rate.min(u32::from(u8::MAX)) as u8,
            prescaler,
        }
    }

    /// SCL frequency this divider produces from `cpu_hz`
    pub fn scl_frequency(&self, cpu_hz: u32) -> u32 {
        let scale = 1u32 << (2 * u32::from(self.prescaler));
        cpu_hz / (16 + 2 * u32::from(self.bit_rate) * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divider_without_prescaler() {
        let div = ClockDivider::compute(16_000_000, 200_000);
        assert_eq!(div, ClockDivider { bit_rate: 32, prescaler: 0 });
        assert_eq!(div.scl_frequency(16_000_000), 200_000);
    }

    #[test]
    fn test_divider_fast_mode() {
        let div = I2cConfig::FAST.divider();
        assert_eq!(div.bit_rate, 12);
        assert_eq!(div.prescaler, 0);
        assert_eq!(div.scl_frequency(16_000_000), 400_000);
    }

    #[test]
    fn test_divider_uses_prescaler() {
        // 800 - 8 = 792 does not fit, 792 / 4 = 198 does
        let div = ClockDivider::compute(16_000_000, 10_000);
        assert_eq!(div, ClockDivider { bit_rate: 198, prescaler: 1 });
    }

    #[test]
    fn test_divider_saturates() {
        let div = ClockDivider::compute(16_000_000, 100);
        assert_eq!(div.prescaler, ClockDivider::MAX_PRESCALER);
        assert_eq!(div.bit_rate, u8::MAX);
    }

    #[test]
    fn test_divider_too_fast() {
        let div = ClockDivider::compute(16_000_000, 4_000_000);
        assert_eq!(div, ClockDivider { bit_rate: 0, prescaler: 0 });

        // Zero frequency must not divide by zero
        let div = ClockDivider::compute(16_000_000, 0);
        assert_eq!(div.prescaler, ClockDivider::MAX_PRESCALER);
    }

    #[test]
    fn test_with_frequency_keeps_clock() {
        let config = I2cConfig::STANDARD.with_frequency(200_000);
        assert_eq!(config.cpu_frequency, 16_000_000);
        assert_eq!(config.divider().bit_rate, 32);
    }
}
