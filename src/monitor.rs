//! Room comfort alarm built around the DHT11 driver.
//!
//! A fixed-period polling loop: every tick it may sample the sensor, looks
//! for a button press and drives an LED and a buzzer. No scheduler, no
//! interrupts.

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};

use crate::{
    dht11::{DecodeOutcome, Dht11},
    error::{DhtError, MonitorError},
    frame::Reading,
};

/// Source of readings for the monitor.
pub trait Sensor {
    /// Error type of the underlying pin.
    type Error;

    /// Performs one complete, blocking measurement.
    fn read(&mut self) -> Result<Reading, DhtError<Self::Error>>;
}

impl<PIN, DELAY, E> Sensor for Dht11<PIN, DELAY>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
{
    type Error = E;

    fn read(&mut self) -> DecodeOutcome<E> {
        Dht11::read(self)
    }
}

/// Comfort limits. Exceeding either one raises the alarm.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    /// Alarm when the temperature is strictly above this.
    pub temperature_high_celsius: i16,
    /// Alarm when the humidity is strictly below this.
    pub humidity_low_percent: u8,
}

impl Thresholds {
    pub const DEFAULT: Thresholds = Thresholds {
        temperature_high_celsius: 31,
        humidity_low_percent: 40,
    };

    pub fn is_uncomfortable(&self, reading: &Reading) -> bool {
        reading.temperature_celsius > self.temperature_high_celsius
            || reading.humidity_percent < self.humidity_low_percent
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Loop timing, in ticks.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    /// Length of one tick.
    pub tick_ms: u32,
    /// The sensor is read on every n-th tick, starting with the first.
    pub read_every_ticks: u32,
    /// The alarm LED changes state every n ticks.
    pub blink_every_ticks: u32,
}

impl Cadence {
    /// 100ms ticks, a reading every 2s, LED toggling every 200ms.
    pub const DEFAULT: Cadence = Cadence {
        tick_ms: 100,
        read_every_ticks: 20,
        blink_every_ticks: 2,
    };
}

impl Default for Cadence {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The comfort monitor.
///
/// The button is active low (pulled up, pressed reads low). A press only
/// counts on the released-to-pressed edge, so holding it down does not keep
/// silencing new alarms.
pub struct Monitor<S, LED, BUZZER, BUTTON> {
    sensor: S,
    led: LED,
    buzzer: BUZZER,
    button: BUTTON,
    thresholds: Thresholds,
    cadence: Cadence,
    last_reading: Option<Reading>,
    alarm_active: bool,
    button_was_pressed: bool,
    tick: u32,
}

/// Error returned by [`Monitor::tick`] for a given set of pins.
pub type TickError<LED, BUZZER, BUTTON> = MonitorError<
    <LED as ErrorType>::Error,
    <BUZZER as ErrorType>::Error,
    <BUTTON as ErrorType>::Error,
>;

impl<S, LED, BUZZER, BUTTON> Monitor<S, LED, BUZZER, BUTTON>
where
    S: Sensor,
    LED: OutputPin,
    BUZZER: OutputPin,
    BUTTON: InputPin,
{
    pub fn new(
        sensor: S,
        led: LED,
        buzzer: BUZZER,
        button: BUTTON,
        thresholds: Thresholds,
        cadence: Cadence,
    ) -> Self {
        Monitor {
            sensor,
            led,
            buzzer,
            button,
            thresholds,
            cadence,
            last_reading: None,
            alarm_active: false,
            button_was_pressed: false,
            tick: 0,
        }
    }

    /// Last reading that passed validation, if any.
    pub fn last_reading(&self) -> Option<Reading> {
        self.last_reading
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm_active
    }

    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    /// Runs one iteration of the loop without sleeping.
    ///
    /// Sensor failures are logged and otherwise ignored. Only errors from
    /// the LED, buzzer or button pins are returned.
    pub fn tick(&mut self) -> Result<(), TickError<LED, BUZZER, BUTTON>> {
        if self.tick % self.cadence.read_every_ticks.max(1) == 0 {
            self.sample();
        }
        self.poll_button()?;
        self.drive_outputs()?;
        self.tick = self.tick.wrapping_add(1);
        Ok(())
    }

    /// Runs the loop forever, sleeping `tick_ms` between iterations.
    pub fn run<D: DelayNs>(&mut self, delay: &mut D) -> ! {
        info!("comfort monitor started");
        loop {
            if let Err(e) = self.tick() {
                error!("{=str} failed, retrying next tick", e.as_str());
            }
            delay.delay_ms(self.cadence.tick_ms);
        }
    }

    /// Consumes the monitor and returns its parts.
    pub fn release(self) -> (S, LED, BUZZER, BUTTON) {
        (self.sensor, self.led, self.buzzer, self.button)
    }

    fn sample(&mut self) {
        match self.sensor.read() {
            Ok(reading) => {
                self.last_reading = Some(reading);
                info!(
                    "temperature {=i16} C, humidity {=u8} %",
                    reading.temperature_celsius,
                    reading.humidity_percent
                );
                if self.thresholds.is_uncomfortable(&reading) {
                    self.alarm_active = true;
                    warn!("comfort limit exceeded, alarm on");
                }
            }
            // Keep the last good reading and the alarm as they are.
            Err(e) => error!("sensor read failed: {=str}", e.as_str()),
        }
    }

    fn poll_button(&mut self) -> Result<(), TickError<LED, BUZZER, BUTTON>> {
        let pressed = self.button.is_low().map_err(MonitorError::Button)?;
        if pressed && !self.button_was_pressed {
            self.alarm_active = false;
            info!("button pressed, alarm cleared");
        }
        self.button_was_pressed = pressed;
        Ok(())
    }

    fn drive_outputs(&mut self) -> Result<(), TickError<LED, BUZZER, BUTTON>> {
        let (led_on, buzzer_on) = if self.alarm_active {
            let phase = self.tick / self.cadence.blink_every_ticks.max(1);
            (phase % 2 == 0, true)
        } else {
            (false, false)
        };
        self.led
            .set_state(led_on.into())
            .map_err(MonitorError::Led)?;
        self.buzzer
            .set_state(buzzer_on.into())
            .map_err(MonitorError::Buzzer)?;
        Ok(())
    }
}
