//! DC motor on a two-input H-bridge
//!
//! Each bridge input is a PWM channel. Forward drives IN1 with the duty
//! cycle and holds IN2 low; reverse swaps them. At zero power both inputs
//! are held high (brake) or low (coast).
//!
//! There is no encoder feedback on this driver. Velocity targets are
//! converted to power against the configured top speed, which is enough
//! for flywheels that only need to be roughly on speed.
//!
//! ```ignore
//! let mut motor = HBridgeMotor::new(in1, in2, HBridgeConfig::default());
//! motor.set_direction(Direction::Reverse)?;
//! motor.set_power(0.9)?;
//! ```

use cadence_core::traits::{
    check_power, Direction, MotorOutput, OutputError, RunMode, ZeroPowerBehavior,
};
use embedded_hal::pwm::SetDutyCycle;

/// Duty cycle resolution used for every write
const DUTY_DENOM: u16 = 1000;

/// H-bridge motor configuration
#[derive(Debug, Clone)]
pub struct HBridgeConfig {
    /// Minimum duty (per mille) applied for any non-zero power; below this
    /// the motor will not turn
    pub min_duty_permille: u16,
    /// Velocity reached at full power, in encoder ticks per second
    pub max_velocity: f32,
}

impl Default for HBridgeConfig {
    fn default() -> Self {
        Self {
            min_duty_permille: 0,
            max_velocity: 2800.0,
        }
    }
}

/// DC motor driven through two PWM inputs
pub struct HBridgeMotor<A, B> {
    in1: A,
    in2: B,
    config: HBridgeConfig,
    direction: Direction,
    zero_power: ZeroPowerBehavior,
    mode: RunMode,
    /// Last applied power after the direction sign
    output: f32,
}

impl<A: SetDutyCycle, B: SetDutyCycle> HBridgeMotor<A, B> {
    /// Create a driver; the bridge is not touched until the first command
    pub fn new(in1: A, in2: B, config: HBridgeConfig) -> Self {
        Self {
            in1,
            in2,
            config,
            direction: Direction::Forward,
            zero_power: ZeroPowerBehavior::Brake,
            mode: RunMode::OpenLoop,
            output: 0.0,
        }
    }

    /// Current run mode
    pub fn run_mode(&self) -> RunMode {
        self.mode
    }

    /// Last applied power, signed by direction
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Give the PWM channels back
    pub fn free(self) -> (A, B) {
        (self.in1, self.in2)
    }

    /// Scale a power magnitude into a duty cycle
    ///
    /// Maps (0, 1] onto [min_duty, 1000] so that any non-zero power
    /// overcomes the dead zone.
    fn scale_duty(&self, magnitude: f32) -> u16 {
        let min = self.config.min_duty_permille.min(DUTY_DENOM) as f32;
        let range = DUTY_DENOM as f32 - min;
        let scaled = min + magnitude.clamp(0.0, 1.0) * range;
        ((scaled + 0.5) as u16).min(DUTY_DENOM)
    }

    fn drive(&mut self, signed: f32) -> Result<(), OutputError> {
        let result = if signed == 0.0 {
            match self.zero_power {
                ZeroPowerBehavior::Brake => self
                    .in1
                    .set_duty_cycle_fully_on()
                    .map_err(|_| OutputError::Bus)
                    .and_then(|_| {
                        self.in2
                            .set_duty_cycle_fully_on()
                            .map_err(|_| OutputError::Bus)
                    }),
                ZeroPowerBehavior::Float => self
                    .in1
                    .set_duty_cycle_fully_off()
                    .map_err(|_| OutputError::Bus)
                    .and_then(|_| {
                        self.in2
                            .set_duty_cycle_fully_off()
                            .map_err(|_| OutputError::Bus)
                    }),
            }
        } else if signed > 0.0 {
            let duty = self.scale_duty(signed);
            self.in2
                .set_duty_cycle_fully_off()
                .map_err(|_| OutputError::Bus)
                .and_then(|_| {
                    self.in1
                        .set_duty_cycle_fraction(duty, DUTY_DENOM)
                        .map_err(|_| OutputError::Bus)
                })
        } else {
            let duty = self.scale_duty(-signed);
            self.in1
                .set_duty_cycle_fully_off()
                .map_err(|_| OutputError::Bus)
                .and_then(|_| {
                    self.in2
                        .set_duty_cycle_fraction(duty, DUTY_DENOM)
                        .map_err(|_| OutputError::Bus)
                })
        };

        self.output = signed;
        result
    }
}

impl<A: SetDutyCycle, B: SetDutyCycle> MotorOutput for HBridgeMotor<A, B> {
    fn set_direction(&mut self, dir: Direction) -> Result<(), OutputError> {
        self.direction = dir;
        Ok(())
    }

    fn set_zero_power_behavior(&mut self, behavior: ZeroPowerBehavior) -> Result<(), OutputError> {
        self.zero_power = behavior;
        if self.output == 0.0 {
            self.drive(0.0)?;
        }
        Ok(())
    }

    fn set_run_mode(&mut self, mode: RunMode) -> Result<(), OutputError> {
        self.mode = mode;
        Ok(())
    }

    fn set_power(&mut self, power: f32) -> Result<(), OutputError> {
        let power = check_power(power)?;
        self.drive(power * self.direction.sign())
    }

    fn set_velocity(&mut self, ticks_per_s: f32) -> Result<(), OutputError> {
        if !ticks_per_s.is_finite() || self.config.max_velocity <= 0.0 {
            return Err(OutputError::InvalidValue);
        }
        let power = (ticks_per_s / self.config.max_velocity).clamp(-1.0, 1.0);
        self.drive(power * self.direction.sign())
    }
}
