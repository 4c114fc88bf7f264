//! Timing parameters of the single-wire transaction.
//!
//! Every bound sits just above the sensor's nominal pulse width so that a
//! stuck or disconnected line is detected within about one bit period while
//! normal jitter still passes. All waits poll at 1us granularity, so a
//! bound of `n` microseconds is also a bound of `n` polls.

/// Timing profile for one sensor variant.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Host start pulse, line held low. The sensor needs at least 18ms.
    pub start_low_ms: u32,
    /// Host release pulse before the sensor answers (20-40us window).
    pub start_release_us: u32,
    /// Bound for each half of the 80us low / 80us high acknowledgement.
    pub ack_timeout_us: u32,
    /// Bound for the 50us low phase that opens every bit.
    pub bit_low_timeout_us: u32,
    /// Bound for the line to rise at the start of a bit's high phase.
    pub bit_high_timeout_us: u32,
    /// Ceiling on a bit's high phase. A "1" is nominally ~70us.
    pub bit_high_ceiling_us: u32,
    /// High phases strictly longer than this decode to 1, otherwise 0.
    ///
    /// Sits between the 26-28us "0" pulse and the ~70us "1" pulse.
    pub one_threshold_us: u32,
}

impl Timing {
    /// Timings for the DHT11.
    pub const DHT11: Timing = Timing {
        start_low_ms: 20,
        start_release_us: 40,
        ack_timeout_us: 100,
        bit_low_timeout_us: 70,
        bit_high_timeout_us: 70,
        bit_high_ceiling_us: 120,
        one_threshold_us: 40,
    };

    /// Decodes a measured high phase into a bit value.
    pub fn bit_from_high_us(&self, high_us: u32) -> bool {
        high_us > self.one_threshold_us
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::DHT11
    }
}
