//! Named output map
//!
//! Boards register their motors and servos under the names the routine
//! configuration uses. The map is fixed-capacity so it can live in a
//! static or on the stack.

use cadence_core::config::{output_name, OutputName};
use cadence_core::traits::{HardwareMap, MotorOutput, OutputError, ServoOutput};
use heapless::Vec;

/// Motors and servos looked up by name
pub struct OutputMap<M, S, const NM: usize, const NS: usize> {
    motors: Vec<(OutputName, M), NM>,
    servos: Vec<(OutputName, S), NS>,
}

impl<M, S, const NM: usize, const NS: usize> Default for OutputMap<M, S, NM, NS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, S, const NM: usize, const NS: usize> OutputMap<M, S, NM, NS> {
    pub const fn new() -> Self {
        Self {
            motors: Vec::new(),
            servos: Vec::new(),
        }
    }

    /// Register a motor
    ///
    /// Fails with `InvalidValue` if the name is empty, too long, already
    /// taken, or the map is full.
    pub fn add_motor(&mut self, name: &str, motor: M) -> Result<(), OutputError> {
        let name = checked_name(name, self.motors.iter().map(|(n, _)| n))?;
        self.motors
            .push((name, motor))
            .map_err(|_| OutputError::InvalidValue)
    }

    /// Register a servo
    pub fn add_servo(&mut self, name: &str, servo: S) -> Result<(), OutputError> {
        let name = checked_name(name, self.servos.iter().map(|(n, _)| n))?;
        self.servos
            .push((name, servo))
            .map_err(|_| OutputError::InvalidValue)
    }

    /// Number of registered motors
    pub fn motor_count(&self) -> usize {
        self.motors.len()
    }

    /// Number of registered servos
    pub fn servo_count(&self) -> usize {
        self.servos.len()
    }
}

fn checked_name<'a>(
    name: &str,
    mut existing: impl Iterator<Item = &'a OutputName>,
) -> Result<OutputName, OutputError> {
    let name = output_name(name);
    if name.is_empty() || existing.any(|n| *n == name) {
        return Err(OutputError::InvalidValue);
    }
    Ok(name)
}

impl<M, S, const NM: usize, const NS: usize> HardwareMap for OutputMap<M, S, NM, NS>
where
    M: MotorOutput,
    S: ServoOutput,
{
    fn motor(&mut self, name: &str) -> Result<&mut dyn MotorOutput, OutputError> {
        self.motors
            .iter_mut()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, m)| m as &mut dyn MotorOutput)
            .ok_or(OutputError::NotFound)
    }

    fn servo(&mut self, name: &str) -> Result<&mut dyn ServoOutput, OutputError> {
        self.servos
            .iter_mut()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, s)| s as &mut dyn ServoOutput)
            .ok_or(OutputError::NotFound)
    }
}
