//! Hobby servo on a PWM channel
//!
//! Position 0.0..=1.0 maps linearly onto a pulse width between the
//! configured endpoints. The PWM period must match `period_us`.

use cadence_core::traits::{check_position, OutputError, ServoOutput};
use embedded_hal::pwm::SetDutyCycle;

/// Servo pulse configuration
#[derive(Debug, Clone)]
pub struct ServoConfig {
    /// Pulse width at position 0.0
    pub min_pulse_us: u16,
    /// Pulse width at position 1.0
    pub max_pulse_us: u16,
    /// PWM period (20 ms for standard servos)
    pub period_us: u16,
    /// Mirror the travel (position p drives 1.0 - p)
    pub reversed: bool,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 500,
            max_pulse_us: 2500,
            period_us: 20_000,
            reversed: false,
        }
    }
}

/// Positional servo
pub struct PwmServo<P> {
    pwm: P,
    config: ServoConfig,
    position: Option<f32>,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Create a driver; no pulse is output until the first position
    pub fn new(pwm: P, config: ServoConfig) -> Self {
        Self {
            pwm,
            config,
            position: None,
        }
    }

    /// Last commanded position
    pub fn position(&self) -> Option<f32> {
        self.position
    }

    /// Pulse width for a position
    pub fn pulse_us(&self, position: f32) -> u16 {
        let position = if self.config.reversed {
            1.0 - position
        } else {
            position
        };
        let min = self.config.min_pulse_us as f32;
        let span = self.config.max_pulse_us as f32 - min;
        (min + position.clamp(0.0, 1.0) * span + 0.5) as u16
    }

    /// Give the PWM channel back
    pub fn free(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> ServoOutput for PwmServo<P> {
    fn set_position(&mut self, position: f32) -> Result<(), OutputError> {
        let position = check_position(position)?;
        let pulse = self.pulse_us(position).min(self.config.period_us);
        self.pwm
            .set_duty_cycle_fraction(pulse, self.config.period_us)
            .map_err(|_| OutputError::Bus)?;
        self.position = Some(position);
        Ok(())
    }
}
