use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::{
    error::DhtError,
    frame::{RawFrame, Reading},
    line::{Level, Line},
    timing::Timing,
};

/// Result of one complete sensor transaction.
pub type DecodeOutcome<E> = Result<Reading, DhtError<E>>;

/// Driver for the DHT11 temperature and humidity sensor.
///
/// Every call to [`read`](Self::read) is one blocking, self-contained
/// transaction of roughly 25ms. There are no retries inside the driver; call
/// again on the next tick. Reads should be at least 1s apart, the sensor
/// ignores start conditions that come sooner.
pub struct Dht11<PIN, D> {
    line: Line<PIN, D>,
    timing: Timing,
}

impl<PIN, DELAY, E> Dht11<PIN, DELAY>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new instance of the DHT11 driver.
    ///
    /// # Arguments
    ///
    /// * `pin` - The open-drain GPIO pin connected to the data line. Must support both input and output.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(pin: PIN, delay: DELAY) -> Self {
        Self::with_timing(pin, delay, Timing::DHT11)
    }

    /// Creates a driver with a custom timing profile, for sensor variants
    /// whose pulse widths differ from the DHT11's.
    pub fn with_timing(pin: PIN, delay: DELAY, timing: Timing) -> Self {
        Dht11 {
            line: Line::new(pin, delay),
            timing,
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Reads a temperature and humidity measurement from the sensor.
    ///
    /// This method performs the complete communication sequence:
    /// sending a start signal, waiting for the sensor's acknowledgement,
    /// reading 5 bytes, validating the checksum, and decoding the result.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the read is successful and the checksum is valid.
    /// * `Err(DhtError)` naming the phase that failed. No partial data is
    ///   ever returned.
    pub fn read(&mut self) -> DecodeOutcome<E> {
        let frame = self.read_raw()?;
        if frame.has_fractional_parts() {
            warn!(
                "fractional bytes {=u8}/{=u8} ignored",
                frame.0[1],
                frame.0[3]
            );
        }
        frame.reading().ok_or(DhtError::ChecksumMismatch)
    }

    /// Like [`read`](Self::read) but returns all five bytes.
    ///
    /// The frame is only returned once its checksum has been verified.
    pub fn read_raw(&mut self) -> Result<RawFrame, DhtError<E>> {
        self.start()?;

        let mut data = [0; 5];
        for b in data.iter_mut() {
            *b = self.read_byte()?;
        }

        let frame = RawFrame(data);
        if !frame.is_valid() {
            debug!(
                "checksum mismatch: expected {=u8}, received {=u8}",
                frame.expected_checksum(),
                frame.checksum()
            );
            return Err(DhtError::ChecksumMismatch);
        }
        Ok(frame)
    }

    /// Consumes the driver and returns the pin and delay provider.
    pub fn free(self) -> (PIN, DELAY) {
        self.line.free()
    }

    /// Sends the start condition and waits for the sensor's acknowledgement.
    ///
    /// The host holds the line low for at least 18ms, drives it high for
    /// 20-40us and lets go. The sensor answers with 80us low and 80us high;
    /// the falling edge after that is the first bit's low phase.
    fn start(&mut self) -> Result<(), DhtError<E>> {
        // MCU sends start request
        self.line.drive_low_for(self.timing.start_low_ms)?;
        self.line.release_high_briefly(self.timing.start_release_us)?;
        self.line.release();

        // Waiting for DHT11 response
        self.handshake_wait(Level::Low)?; // 80us
        self.handshake_wait(Level::High)?; // 80us
        self.handshake_wait(Level::Low)?;
        trace!("handshake acknowledged");
        Ok(())
    }

    /// Reads one byte (8 bits) from the sensor, most significant bit first.
    fn read_byte(&mut self) -> Result<u8, DhtError<E>> {
        let mut byte: u8 = 0;

        for i in 0..8 {
            let bit_mask = 1 << (7 - i);
            if self.read_bit()? {
                byte |= bit_mask;
            }
        }

        Ok(byte)
    }

    /// Reads a single bit from the sensor.
    ///
    /// The bit is determined by the duration of the high phase that follows
    /// the sensor's 50us low.
    fn read_bit(&mut self) -> Result<bool, DhtError<E>> {
        let timing = self.timing;

        self.bit_wait(Level::Low, timing.bit_low_timeout_us)?;
        self.bit_wait(Level::High, timing.bit_high_timeout_us)?;

        let high_us = self
            .line
            .measure_high_duration(timing.bit_high_ceiling_us)
            .map_err(|e| DhtError::from_line(e, DhtError::BitTimeout))?;

        Ok(timing.bit_from_high_us(high_us))
    }

    fn handshake_wait(&mut self, level: Level) -> Result<(), DhtError<E>> {
        self.line
            .wait_for_level(level, self.timing.ack_timeout_us)
            .map_err(|e| DhtError::from_line(e, DhtError::HandshakeTimeout))
    }

    fn bit_wait(&mut self, level: Level, timeout_us: u32) -> Result<(), DhtError<E>> {
        self.line
            .wait_for_level(level, timeout_us)
            .map_err(|e| DhtError::from_line(e, DhtError::BitTimeout))
    }
}
