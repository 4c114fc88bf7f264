//! Test-only simulation of a DHT11 on an open-drain line.
//!
//! The pin and the delay provider share one clock: delays advance it and
//! reads sample a scripted waveform that starts when the host releases the
//! line. Reads themselves take no time.

use std::{cell::RefCell, convert::Infallible, rc::Rc};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};

use crate::line::Level;

/// Shortest host start pulse the simulated sensor answers to.
const MIN_START_LOW_NS: u64 = 18_000_000;

/// Pulse train driven by the simulated sensor, as `(level, duration_us)`.
/// Past the end the pull-up holds the line high.
#[derive(Clone, Debug, Default)]
pub struct Waveform(Vec<(Level, u32)>);

impl Waveform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pulse(mut self, level: Level, us: u32) -> Self {
        self.0.push((level, us));
        self
    }

    /// Release delay followed by the 80us low / 80us high acknowledgement.
    pub fn handshake() -> Self {
        Self::new()
            .pulse(Level::High, 30)
            .pulse(Level::Low, 80)
            .pulse(Level::High, 80)
    }

    /// One bit: 50us low, then a high phase of the given width.
    pub fn bit(self, high_us: u32) -> Self {
        self.pulse(Level::Low, 50).pulse(Level::High, high_us)
    }

    /// Bytes MSB first, with `zero_us` / `one_us` high phases.
    pub fn bytes_with(mut self, bytes: &[u8], zero_us: u32, one_us: u32) -> Self {
        for byte in bytes {
            for i in 0..8 {
                let bit = (byte >> (7 - i)) & 1;
                self = self.bit(if bit == 1 { one_us } else { zero_us });
            }
        }
        self
    }

    pub fn bytes(self, bytes: &[u8]) -> Self {
        self.bytes_with(bytes, 27, 70)
    }

    /// Final 50us low before the sensor lets go of the line.
    pub fn end(self) -> Self {
        self.pulse(Level::Low, 50)
    }

    /// A complete, well-formed transmission of `bytes`.
    pub fn frame(bytes: [u8; 5]) -> Self {
        Self::handshake().bytes(&bytes).end()
    }

    fn level_at(&self, us: u64) -> Level {
        let mut start = 0u64;
        for &(level, len) in &self.0 {
            let stop = start + u64::from(len);
            if us < stop {
                return level;
            }
            start = stop;
        }
        Level::High
    }
}

#[derive(Debug)]
struct Bus {
    now_ns: u64,
    driven_low_since_ns: Option<u64>,
    released_at_ns: Option<u64>,
    waveform: Waveform,
}

impl Bus {
    fn level(&self) -> Level {
        if self.driven_low_since_ns.is_some() {
            return Level::Low;
        }
        match self.released_at_ns {
            Some(t0) => self.waveform.level_at((self.now_ns - t0) / 1_000),
            None => Level::High,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimPin(Rc<RefCell<Bus>>);

#[derive(Clone, Debug)]
pub struct SimDelay(Rc<RefCell<Bus>>);

impl SimDelay {
    /// Simulated time since the line was created.
    pub fn elapsed_us(&self) -> u64 {
        self.0.borrow().now_ns / 1_000
    }
}

/// Creates a pin and delay pair bound to the same simulated sensor.
pub fn simulated(waveform: Waveform) -> (SimPin, SimDelay) {
    let bus = Rc::new(RefCell::new(Bus {
        now_ns: 0,
        driven_low_since_ns: None,
        released_at_ns: None,
        waveform,
    }));
    (SimPin(bus.clone()), SimDelay(bus))
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow().level() == Level::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow().level() == Level::Low)
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        if bus.driven_low_since_ns.is_none() {
            let now = bus.now_ns;
            bus.driven_low_since_ns = Some(now);
        }
        bus.released_at_ns = None;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        if let Some(since) = bus.driven_low_since_ns.take() {
            // A start pulse shorter than the minimum is ignored by the sensor.
            let now = bus.now_ns;
            bus.released_at_ns = (now - since >= MIN_START_LOW_NS).then_some(now);
        }
        Ok(())
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now_ns += u64::from(ns);
    }
}
