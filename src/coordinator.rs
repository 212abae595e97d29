//! The work-distribution monitor.
//!
//! All distribution state lives behind one mutex. Three condition variables
//! carry the three distinct waits of the protocol:
//!
//! - `request`: the distributor waits until a worker has registered a
//!   request and the previously published unit has been picked up.
//! - `assignment`: workers wait until a unit is published for them, or
//!   until no work remains.
//! - `completion`: the distributor waits at the end-of-phase barrier until
//!   every unit of the phase has been reported done.
//!
//! A phase hands out `len / width` units of equal width; completing a phase
//! doubles the width. `max_requests` is re-derived from `(len, width)` at
//! every rollover instead of being mutated incrementally, so the counters
//! cannot drift.
//!
//! Lock or wait failures only happen when a participating thread panicked
//! while holding the mutex; every operation maps that to
//! [`MonitorError::Poisoned`] so the surviving threads bail out instead of
//! deadlocking on a dead partner.

use std::ops::Range;
use std::sync::{Condvar, Mutex, MutexGuard};

use log::debug;
use thiserror::Error;

use crate::config::SortConfig;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    #[error("monitor poisoned: a participating thread panicked inside it")]
    Poisoned,
}

/// A disjoint sub-range of the sequence assigned for one merge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub start: usize,
    pub width: usize,
    /// True for minimum-width units, which need the full comparison
    /// network. Wider units only get the final merge pass.
    pub full_sort: bool,
}

impl Unit {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.width
    }
}

/// What `assign_next` tells the distributor to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    More,
    Done,
}

struct State {
    /// Width of every unit in the current phase.
    width: usize,
    /// Units in the current phase, `len / width`.
    max_requests: usize,
    /// Units assigned so far in the current phase.
    cur_requests: usize,
    /// Units reported done in the current phase.
    complete_requests: usize,
    /// Worker requests registered but not yet satisfied.
    pending_requests: usize,
    /// The single published-but-unclaimed unit, if any.
    slot: Option<Unit>,
    /// Cleared once the last phase has completed.
    work_needed: bool,
    /// Ranges assigned but not yet reported done. Drives the disjointness
    /// check on every assignment.
    live: Vec<Range<usize>>,
}

pub struct Coordinator {
    state: Mutex<State>,
    request: Condvar,
    assignment: Condvar,
    completion: Condvar,
    len: usize,
    min_width: usize,
}

impl Coordinator {
    /// Expects a configuration already validated against `len`.
    pub fn new(len: usize, config: &SortConfig) -> Self {
        Self {
            state: Mutex::new(State {
                width: config.min_width,
                max_requests: len / config.min_width,
                cur_requests: 0,
                complete_requests: 0,
                pending_requests: 0,
                slot: None,
                work_needed: true,
                live: Vec::new(),
            }),
            request: Condvar::new(),
            assignment: Condvar::new(),
            completion: Condvar::new(),
            len,
            min_width: config.min_width,
        }
    }

    /// Worker side: registers a request, then blocks until a unit is
    /// published or the protocol has finished. `None` is the termination
    /// sentinel.
    pub fn request_work(&self) -> Result<Option<Unit>, MonitorError> {
        let mut state = self.lock()?;

        state.pending_requests += 1;
        self.request.notify_one();

        loop {
            if let Some(unit) = state.slot.take() {
                // Slot consumed; the distributor may publish the next unit.
                self.request.notify_one();
                return Ok(Some(unit));
            }
            if !state.work_needed {
                state.pending_requests -= 1;
                return Ok(None);
            }
            state = self.wait(&self.assignment, state)?;
        }
    }

    /// Distributor side: publishes the next round-robin unit of the current
    /// phase to exactly one requesting worker. On handing out the last unit
    /// of a phase, blocks until the phase barrier clears, then doubles the
    /// width. Returns [`Assignment::Done`] once the width has outgrown the
    /// sequence, after releasing all still-blocked workers.
    pub fn assign_next(&self) -> Result<Assignment, MonitorError> {
        let mut state = self.lock()?;

        while state.pending_requests == 0 || state.slot.is_some() {
            state = self.wait(&self.request, state)?;
        }
        state.pending_requests -= 1;

        let unit = Unit {
            start: state.cur_requests * state.width,
            width: state.width,
            full_sort: state.width == self.min_width,
        };
        debug_assert!(
            state
                .live
                .iter()
                .all(|r| r.end <= unit.start || unit.start + unit.width <= r.start),
            "unit {:?} overlaps a live range",
            unit.range()
        );
        state.live.push(unit.range());
        state.slot = Some(unit);
        state.cur_requests += 1;
        self.assignment.notify_one();
        debug!(
            "assigned unit {}..{} ({}/{} of width {})",
            unit.start,
            unit.start + unit.width,
            state.cur_requests,
            state.max_requests,
            state.width
        );

        if state.cur_requests == state.max_requests {
            // Phase barrier: the next phase merges the output of this one,
            // so nothing may start until every unit has been reported done.
            while state.complete_requests != state.max_requests {
                state = self.wait(&self.completion, state)?;
            }

            state.width *= 2;
            if state.width > self.len {
                state.work_needed = false;
                self.assignment.notify_all();
                debug!("all phases complete");
                return Ok(Assignment::Done);
            }

            state.max_requests = self.len / state.width;
            state.cur_requests = 0;
            state.complete_requests = 0;
            debug!(
                "phase rollover: width {}, {} units",
                state.width, state.max_requests
            );
        }

        Ok(Assignment::More)
    }

    /// Worker side: reports the given unit sorted and wakes the distributor
    /// if it is parked at the phase barrier.
    pub fn report_done(&self, unit: Unit) -> Result<(), MonitorError> {
        let mut state = self.lock()?;

        let live_idx = state.live.iter().position(|r| *r == unit.range());
        debug_assert!(
            live_idx.is_some(),
            "completion reported for unit {:?} that is not live",
            unit.range()
        );
        if let Some(idx) = live_idx {
            state.live.swap_remove(idx);
        }

        state.complete_requests += 1;
        self.completion.notify_one();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, MonitorError> {
        self.state.lock().map_err(|_| MonitorError::Poisoned)
    }

    fn wait<'a>(
        &self,
        condvar: &Condvar,
        guard: MutexGuard<'a, State>,
    ) -> Result<MutexGuard<'a, State>, MonitorError> {
        condvar.wait(guard).map_err(|_| MonitorError::Poisoned)
    }
}
