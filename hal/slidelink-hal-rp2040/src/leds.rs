//! LED outputs
//!
//! Speed bar LEDs sit on PWM channels; the link and encoder ring LEDs are
//! plain GPIO outputs.

use embedded_hal::digital::StatefulOutputPin;
use embedded_hal::pwm::SetDutyCycle;
use slidelink_hal::{Indicators, Led, LedState, SPEED_LED_COUNT};

/// Transmitter LED bank
pub struct Rp2040Leds<P, O> {
    speed: [P; SPEED_LED_COUNT],
    duty: [u8; SPEED_LED_COUNT],
    link: O,
    encoder_red: O,
    encoder_green: O,
}

impl<P, O> Rp2040Leds<P, O>
where
    P: SetDutyCycle,
    O: StatefulOutputPin,
{
    pub fn new(speed: [P; SPEED_LED_COUNT], link: O, encoder_red: O, encoder_green: O) -> Self {
        Self {
            speed,
            duty: [0; SPEED_LED_COUNT],
            link,
            encoder_red,
            encoder_green,
        }
    }

    fn set_speed(&mut self, index: usize, state: LedState) {
        let Some(pwm) = self.speed.get_mut(index) else {
            return;
        };
        let duty = match state {
            LedState::Off => 0,
            LedState::On => u8::MAX,
            LedState::Pwm(duty) => duty,
            LedState::Toggle if self.duty[index] == 0 => u8::MAX,
            LedState::Toggle => 0,
        };
        if pwm.set_duty_cycle_fraction(duty as u16, u8::MAX as u16).is_ok() {
            self.duty[index] = duty;
        }
    }
}

fn drive<O: StatefulOutputPin>(pin: &mut O, state: LedState) {
    let _ = match state {
        LedState::Off | LedState::Pwm(0) => pin.set_low(),
        LedState::On | LedState::Pwm(_) => pin.set_high(),
        LedState::Toggle => pin.toggle(),
    };
}

impl<P, O> Indicators for Rp2040Leds<P, O>
where
    P: SetDutyCycle,
    O: StatefulOutputPin,
{
    fn set_led(&mut self, led: Led, state: LedState) {
        match led {
            Led::Speed(index) => self.set_speed(index as usize, state),
            Led::Link => drive(&mut self.link, state),
            Led::EncoderRed => drive(&mut self.encoder_red, state),
            Led::EncoderGreen => drive(&mut self.encoder_green, state),
        }
    }
}
