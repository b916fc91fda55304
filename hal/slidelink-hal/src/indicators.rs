//! LED output abstractions

/// Number of LEDs in the speed bar
pub const SPEED_LED_COUNT: usize = 5;

/// Logical LEDs on the transmitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    /// Speed bar LED, 0 (slowest) to 4 (fastest). Also used as slot
    /// indicators when a position is saved.
    Speed(u8),
    /// Link health LED (lit when the radio probe fails)
    Link,
    /// Red half of the encoder ring LED
    EncoderRed,
    /// Green half of the encoder ring LED
    EncoderGreen,
}

/// Requested LED state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    Off,
    On,
    Toggle,
    /// PWM duty, 0 = off, 255 = fully on
    Pwm(u8),
}

/// LED driver
pub trait Indicators {
    /// Drive one LED. Implementations ignore LEDs they do not have.
    fn set_led(&mut self, led: Led, state: LedState);
}
