use core::fmt;

/// Failure of a single Line Transport wait.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineError<E> {
    /// The line did not reach the expected level within the bound.
    Timeout,
    /// Error from the GPIO pin (input/output).
    Pin(E),
}

impl<E> From<E> for LineError<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}

/// Possible errors from the DHT11 driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// The sensor did not acknowledge the start condition.
    HandshakeTimeout,
    /// A bit boundary was not observed in time during the payload.
    BitTimeout,
    /// Checksum did not match the received data.
    ChecksumMismatch,
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl<E> DhtError<E> {
    /// Maps a line failure during the given phase onto the decoder taxonomy.
    pub(crate) fn from_line(err: LineError<E>, on_timeout: Self) -> Self {
        match err {
            LineError::Timeout => on_timeout,
            LineError::Pin(e) => Self::PinError(e),
        }
    }

    /// Short name of the failure kind, for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HandshakeTimeout => "handshake timeout",
            Self::BitTimeout => "bit timeout",
            Self::ChecksumMismatch => "checksum mismatch",
            Self::PinError(_) => "pin error",
        }
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinError(e) => write!(f, "pin error: {e:?}"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Errors raised by the comfort monitor loop itself.
///
/// Sensor failures never show up here; they are absorbed by the loop. Each
/// pin keeps its own error type, so input and output pins from different
/// HAL drivers can be mixed.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MonitorError<LedE, BuzzerE, ButtonE> {
    /// Error from the alarm LED pin.
    Led(LedE),
    /// Error from the buzzer pin.
    Buzzer(BuzzerE),
    /// Error from the acknowledge button pin.
    Button(ButtonE),
}

impl<LedE, BuzzerE, ButtonE> MonitorError<LedE, BuzzerE, ButtonE> {
    /// Name of the pin that failed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Led(_) => "led pin",
            Self::Buzzer(_) => "buzzer pin",
            Self::Button(_) => "button pin",
        }
    }
}
