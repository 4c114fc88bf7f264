/// The five bytes of one sensor transmission, in wire order.
///
/// `[humidity_int, humidity_frac, temp_int, temp_frac, checksum]`
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame(pub [u8; 5]);

impl RawFrame {
    /// Truncated sum of the four payload bytes.
    pub fn expected_checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Checksum byte as transmitted.
    pub fn checksum(&self) -> u8 {
        self.0[4]
    }

    pub fn is_valid(&self) -> bool {
        self.expected_checksum() == self.checksum()
    }

    /// True when either fractional byte is non-zero.
    ///
    /// The DHT11 always sends zero here. Other members of the family use
    /// these bytes for tenths or a sign bit, which [`Reading`] drops.
    pub fn has_fractional_parts(&self) -> bool {
        self.0[1] != 0 || self.0[3] != 0
    }

    /// Builds a reading from the integer bytes, or `None` if the checksum
    /// does not match.
    pub fn reading(&self) -> Option<Reading> {
        if !self.is_valid() {
            return None;
        }
        Some(Reading {
            temperature_celsius: i16::from(self.0[2]),
            humidity_percent: self.0[0],
        })
    }
}

/// Reading returned by the DHT11 sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    /// Temperature in whole degrees Celsius.
    pub temperature_celsius: i16,
    /// Relative humidity in whole percent.
    pub humidity_percent: u8,
}
