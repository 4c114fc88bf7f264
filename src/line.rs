use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::error::LineError;

/// Logic level on the data line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Which side currently owns the data line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The host is driving the line.
    Driven,
    /// The line is released and the host only samples it.
    Sampled,
}

/// Exclusive handle on the single-wire data line.
///
/// The pin is expected to be open-drain with a pull-up: writing high releases
/// the line, so switching to sampling needs no extra pin write. Waits are
/// blocking busy-waits at 1us granularity and assume the CPU is otherwise idle.
pub struct Line<PIN, D> {
    pin: PIN,
    delay: D,
    direction: Direction,
}

impl<PIN, D, E> Line<PIN, D>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayNs,
{
    /// Wraps the pin and delay provider. The line starts out released.
    pub fn new(pin: PIN, delay: D) -> Self {
        Line {
            pin,
            delay,
            direction: Direction::Sampled,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Holds the line low for `ms` milliseconds.
    pub fn drive_low_for(&mut self, ms: u32) -> Result<(), E> {
        self.direction = Direction::Driven;
        self.pin.set_low()?;
        self.delay.delay_ms(ms);
        Ok(())
    }

    /// Drives the line high for `us` microseconds.
    ///
    /// The caller must [`release`](Self::release) before expecting any
    /// response from the sensor.
    pub fn release_high_briefly(&mut self, us: u32) -> Result<(), E> {
        self.direction = Direction::Driven;
        self.pin.set_high()?;
        self.delay.delay_us(us);
        Ok(())
    }

    /// Hands the line over to the sensor.
    pub fn release(&mut self) {
        self.direction = Direction::Sampled;
    }

    /// Busy-waits until the line reads `level`.
    ///
    /// A line still driven by the host is released first.
    ///
    /// Fails with [`LineError::Timeout`] once more than `timeout_us` polls
    /// have missed.
    pub fn wait_for_level(&mut self, level: Level, timeout_us: u32) -> Result<(), LineError<E>> {
        self.elapsed_until(level, timeout_us).map(|_| ())
    }

    /// Counts the microseconds the line stays high.
    ///
    /// A line still high after `ceiling_us` is reported as a timeout rather
    /// than a long pulse.
    pub fn measure_high_duration(&mut self, ceiling_us: u32) -> Result<u32, LineError<E>> {
        self.elapsed_until(Level::Low, ceiling_us)
    }

    /// Consumes the handle and returns the pin and delay provider.
    pub fn free(self) -> (PIN, D) {
        (self.pin, self.delay)
    }

    fn elapsed_until(&mut self, level: Level, bound_us: u32) -> Result<u32, LineError<E>> {
        if self.direction == Direction::Driven {
            // Sampling a line we still drive low would only read ourselves.
            self.pin.set_high()?;
            self.release();
        }

        let mut elapsed = 0;
        while !self.is_at(level)? {
            if elapsed >= bound_us {
                return Err(LineError::Timeout);
            }
            self.delay.delay_us(1);
            elapsed += 1;
        }
        Ok(elapsed)
    }

    fn is_at(&mut self, level: Level) -> Result<bool, E> {
        match level {
            Level::High => self.pin.is_high(),
            Level::Low => self.pin.is_low(),
        }
    }
}
