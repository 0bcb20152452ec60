//! Test doubles shared by unit tests

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::action::{Action, Context, Status};
use crate::traits::{
    Direction, HardwareMap, MotorOutput, OutputError, RunMode, ServoOutput, Telemetry, Value,
    ZeroPowerBehavior,
};

/// A recorded hardware write
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Direction(&'static str, Direction),
    ZeroPower(&'static str, ZeroPowerBehavior),
    RunMode(&'static str, RunMode),
    Power(&'static str, f32),
    Velocity(&'static str, f32),
    Position(&'static str, f32),
}

impl Command {
    /// Name of the output this command was written to
    pub fn output(&self) -> &'static str {
        match *self {
            Command::Direction(name, _)
            | Command::ZeroPower(name, _)
            | Command::RunMode(name, _)
            | Command::Power(name, _)
            | Command::Velocity(name, _)
            | Command::Position(name, _) => name,
        }
    }
}

type Log = Rc<RefCell<Vec<Command>>>;

struct FakeMotor {
    name: &'static str,
    log: Log,
    failing: bool,
}

impl FakeMotor {
    fn record(&mut self, command: Command) -> Result<(), OutputError> {
        if self.failing {
            return Err(OutputError::Bus);
        }
        self.log.borrow_mut().push(command);
        Ok(())
    }
}

impl MotorOutput for FakeMotor {
    fn set_direction(&mut self, dir: Direction) -> Result<(), OutputError> {
        self.record(Command::Direction(self.name, dir))
    }

    fn set_zero_power_behavior(&mut self, behavior: ZeroPowerBehavior) -> Result<(), OutputError> {
        self.record(Command::ZeroPower(self.name, behavior))
    }

    fn set_run_mode(&mut self, mode: RunMode) -> Result<(), OutputError> {
        self.record(Command::RunMode(self.name, mode))
    }

    fn set_power(&mut self, power: f32) -> Result<(), OutputError> {
        self.record(Command::Power(self.name, power))
    }

    fn set_velocity(&mut self, ticks_per_s: f32) -> Result<(), OutputError> {
        self.record(Command::Velocity(self.name, ticks_per_s))
    }
}

struct FakeServo {
    name: &'static str,
    log: Log,
    failing: bool,
}

impl ServoOutput for FakeServo {
    fn set_position(&mut self, position: f32) -> Result<(), OutputError> {
        if self.failing {
            return Err(OutputError::Bus);
        }
        self.log
            .borrow_mut()
            .push(Command::Position(self.name, position));
        Ok(())
    }
}

/// Hardware map that records every write in order
pub struct FakeHardware {
    log: Log,
    motors: Vec<FakeMotor>,
    servos: Vec<FakeServo>,
}

impl FakeHardware {
    /// Map with no outputs
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            motors: Vec::new(),
            servos: Vec::new(),
        }
    }

    /// Map with every output the default routine binds
    pub fn robot() -> Self {
        Self::new()
            .with_motor("leftShooter")
            .with_motor("rightShooter")
            .with_motor("intake")
            .with_servo("leftBringUp")
            .with_servo("rightBringUp")
    }

    pub fn with_motor(mut self, name: &'static str) -> Self {
        self.motors.push(FakeMotor {
            name,
            log: self.log.clone(),
            failing: false,
        });
        self
    }

    pub fn with_servo(mut self, name: &'static str) -> Self {
        self.servos.push(FakeServo {
            name,
            log: self.log.clone(),
            failing: false,
        });
        self
    }

    /// Make every write to `name` fail with a bus error
    pub fn fail(&mut self, name: &str) {
        for motor in self.motors.iter_mut().filter(|m| m.name == name) {
            motor.failing = true;
        }
        for servo in self.servos.iter_mut().filter(|s| s.name == name) {
            servo.failing = true;
        }
    }

    /// Everything written so far
    pub fn commands(&self) -> Vec<Command> {
        self.log.borrow().clone()
    }

    /// Forget recorded writes
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl HardwareMap for FakeHardware {
    fn motor(&mut self, name: &str) -> Result<&mut dyn MotorOutput, OutputError> {
        self.motors
            .iter_mut()
            .find(|m| m.name == name)
            .map(|m| m as &mut dyn MotorOutput)
            .ok_or(OutputError::NotFound)
    }

    fn servo(&mut self, name: &str) -> Result<&mut dyn ServoOutput, OutputError> {
        self.servos
            .iter_mut()
            .find(|s| s.name == name)
            .map(|s| s as &mut dyn ServoOutput)
            .ok_or(OutputError::NotFound)
    }
}

/// Telemetry sink that keeps everything
#[derive(Default)]
pub struct RecordingTelemetry {
    pub entries: Vec<(&'static str, Value)>,
}

impl RecordingTelemetry {
    /// Last value recorded under `key`
    pub fn last(&self, key: &str) -> Option<Value> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

impl Telemetry for RecordingTelemetry {
    fn put(&mut self, key: &'static str, value: Value) {
        self.entries.push((key, value));
    }
}

/// A poll or cancel observed by a [`Probe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeEvent {
    Poll { id: usize, now_ms: u32 },
    PollAfterDone { id: usize },
    Cancel { id: usize },
}

pub type ProbeLog = Rc<RefCell<Vec<ProbeEvent>>>;

pub fn probe_log() -> ProbeLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Action that finishes after a fixed number of polls and records them
pub struct Probe {
    id: usize,
    remaining: u32,
    done: bool,
    log: ProbeLog,
}

impl Probe {
    /// Finishes on its `polls`-th poll (a value of 0 behaves like 1)
    pub fn new(id: usize, polls: u32, log: &ProbeLog) -> Self {
        Self {
            id,
            remaining: polls.max(1),
            done: false,
            log: log.clone(),
        }
    }
}

impl Action for Probe {
    fn poll(&mut self, ctx: &mut Context<'_>) -> Result<Status, OutputError> {
        if self.done {
            self.log
                .borrow_mut()
                .push(ProbeEvent::PollAfterDone { id: self.id });
            return Ok(Status::Done);
        }
        self.log.borrow_mut().push(ProbeEvent::Poll {
            id: self.id,
            now_ms: ctx.now_ms,
        });
        self.remaining -= 1;
        self.done = self.remaining == 0;
        Ok(Status::from(!self.done))
    }

    fn cancel(&mut self, _ctx: &mut Context<'_>) -> Result<(), OutputError> {
        self.log
            .borrow_mut()
            .push(ProbeEvent::Cancel { id: self.id });
        self.done = true;
        Ok(())
    }

    fn label(&self) -> &'static str {
        "probe"
    }
}

/// Count polls recorded for probe `id`
pub fn polls_of(log: &ProbeLog, id: usize) -> usize {
    log.borrow()
        .iter()
        .filter(|e| matches!(e, ProbeEvent::Poll { id: i, .. } if *i == id))
        .count()
}

/// Drive an action at a fixed tick until it finishes
///
/// Returns the timestamp of the final poll. Panics after `max_ticks`.
pub fn run_to_done(
    action: &mut dyn Action,
    hardware: &mut FakeHardware,
    telemetry: &mut RecordingTelemetry,
    tick_ms: u32,
    max_ticks: u32,
) -> u32 {
    let mut now = 0;
    for _ in 0..max_ticks {
        let mut ctx = Context::new(now, &mut *hardware, &mut *telemetry);
        if action.poll(&mut ctx).unwrap().is_done() {
            return now;
        }
        now += tick_ms;
    }
    panic!("action did not finish within {} ticks", max_ticks);
}
