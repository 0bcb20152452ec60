//! Run actions side by side

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{Action, BoxedAction, Context, Status};
use crate::traits::OutputError;

struct Branch {
    action: BoxedAction,
    done: bool,
}

/// Runs children concurrently within each tick
///
/// Every unfinished child is polled once per tick in declaration order.
/// The composite finishes once all children have finished. Children that
/// finish early are not polled again.
pub struct Parallel {
    label: &'static str,
    branches: Vec<Branch>,
}

impl Parallel {
    /// Create an empty parallel group
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            branches: Vec::new(),
        }
    }

    /// Create a group from already boxed children
    pub fn from_actions(label: &'static str, children: Vec<BoxedAction>) -> Self {
        Self {
            label,
            branches: children
                .into_iter()
                .map(|action| Branch {
                    action,
                    done: false,
                })
                .collect(),
        }
    }

    /// Add a child (builder style)
    pub fn with<A: Action + 'static>(mut self, action: A) -> Self {
        self.push(action);
        self
    }

    /// Add a child
    pub fn push<A: Action + 'static>(&mut self, action: A) {
        self.push_boxed(Box::new(action));
    }

    /// Add an already boxed child
    pub fn push_boxed(&mut self, action: BoxedAction) {
        self.branches.push(Branch {
            action,
            done: false,
        });
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Check if the group has no children
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Number of children still running
    pub fn pending(&self) -> usize {
        self.branches.iter().filter(|b| !b.done).count()
    }
}

impl Action for Parallel {
    fn poll(&mut self, ctx: &mut Context<'_>) -> Result<Status, OutputError> {
        for branch in self.branches.iter_mut().filter(|b| !b.done) {
            if branch.action.poll(ctx)?.is_done() {
                debug!("{}: {} done", self.label, branch.action.label());
                branch.done = true;
            }
        }

        Ok(Status::from(self.pending() > 0))
    }

    fn cancel(&mut self, ctx: &mut Context<'_>) -> Result<(), OutputError> {
        let mut first_err = None;
        for branch in self.branches.iter_mut().filter(|b| !b.done) {
            branch.done = true;
            if let Err(e) = branch.action.cancel(ctx) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn label(&self) -> &'static str {
        self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Sequential, Sleep};
    use crate::testing::{
        polls_of, probe_log, run_to_done, FakeHardware, Probe, ProbeEvent, RecordingTelemetry,
    };

    fn tick(action: &mut dyn Action, now_ms: u32) -> Status {
        let mut hw = FakeHardware::new();
        let mut telemetry = RecordingTelemetry::default();
        let mut ctx = Context::new(now_ms, &mut hw, &mut telemetry);
        action.poll(&mut ctx).unwrap()
    }

    #[test]
    fn test_all_children_polled_each_tick() {
        let log = probe_log();
        let mut group = Parallel::new("group")
            .with(Probe::new(0, 3, &log))
            .with(Probe::new(1, 1, &log));

        assert_eq!(tick(&mut group, 0), Status::Running);
        assert_eq!(group.pending(), 1);
        assert_eq!(tick(&mut group, 10), Status::Running);
        assert_eq!(tick(&mut group, 20), Status::Done);

        assert_eq!(polls_of(&log, 0), 3);
        assert_eq!(polls_of(&log, 1), 1);
        assert!(!log
            .borrow()
            .iter()
            .any(|e| matches!(e, ProbeEvent::PollAfterDone { .. })));
    }

    #[test]
    fn test_declaration_order_within_tick() {
        let log = probe_log();
        let mut group = Parallel::new("group")
            .with(Probe::new(7, 1, &log))
            .with(Probe::new(3, 1, &log));

        tick(&mut group, 0);
        assert_eq!(
            *log.borrow(),
            vec![
                ProbeEvent::Poll { id: 7, now_ms: 0 },
                ProbeEvent::Poll { id: 3, now_ms: 0 },
            ]
        );
    }

    #[test]
    fn test_from_boxed_children() {
        let log = probe_log();
        let children: Vec<BoxedAction> = vec![
            Box::new(Probe::new(0, 2, &log)),
            Box::new(Probe::new(1, 1, &log)),
        ];
        let mut group = Parallel::from_actions("boxed", children);
        assert_eq!(group.len(), 2);
        assert_eq!(group.pending(), 2);

        assert_eq!(tick(&mut group, 0), Status::Running);
        assert_eq!(group.pending(), 1);
        assert_eq!(tick(&mut group, 10), Status::Done);
        assert_eq!(polls_of(&log, 0), 2);
        assert_eq!(polls_of(&log, 1), 1);
    }

    #[test]
    fn test_empty_is_done_immediately() {
        let mut group = Parallel::new("empty");
        assert_eq!(tick(&mut group, 0), Status::Done);
    }

    #[test]
    fn test_longest_child_sets_duration() {
        let mut group = Parallel::new("sleeps")
            .with(Sleep::millis(100))
            .with(Sequential::new("pair").then(Sleep::millis(50)).then(Sleep::millis(150)));

        let mut hw = FakeHardware::new();
        let mut telemetry = RecordingTelemetry::default();
        let finished_at = run_to_done(&mut group, &mut hw, &mut telemetry, 10, 100);
        assert!(finished_at >= 200);
        assert!(finished_at <= 220);
    }

    #[test]
    fn test_cancel_reaches_unfinished_children() {
        let log = probe_log();
        let mut group = Parallel::new("group")
            .with(Probe::new(0, 1, &log))
            .with(Probe::new(1, 5, &log))
            .with(Probe::new(2, 5, &log));

        tick(&mut group, 0);

        let mut hw = FakeHardware::new();
        let mut telemetry = RecordingTelemetry::default();
        let mut ctx = Context::new(10, &mut hw, &mut telemetry);
        group.cancel(&mut ctx).unwrap();

        assert_eq!(group.pending(), 0);
        assert_eq!(group.poll(&mut ctx).unwrap(), Status::Done);
        let cancels: Vec<_> = log
            .borrow()
            .iter()
            .filter(|e| matches!(e, ProbeEvent::Cancel { .. }))
            .copied()
            .collect();
        assert_eq!(
            cancels,
            vec![ProbeEvent::Cancel { id: 1 }, ProbeEvent::Cancel { id: 2 }]
        );
    }
}
