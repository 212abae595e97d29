//! Worker pool and distributor orchestration.
//!
//! `parallel_sort` validates the configuration, then runs one distributor
//! thread and a fixed pool of workers inside a thread scope. Workers mutate
//! the sequence buffer without holding any lock; that is sound because the
//! coordinator never keeps two live units with overlapping ranges, and the
//! scope guarantees every thread is joined before the buffer is used again.

use std::thread;

use log::trace;
use thiserror::Error;

use crate::config::{ConfigError, SortConfig};
use crate::coordinator::{Assignment, Coordinator, MonitorError, Unit};
use crate::merge;
use crate::sequence::{self, Verification};

#[derive(Debug, Error)]
pub enum SortError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Monitor(#[from] MonitorError),
    #[error("a sorting thread panicked")]
    ThreadPanicked,
}

/// Raw view of the sequence buffer shared with the worker threads.
///
/// Safety: `unit_mut` hands out `&mut` spans into the same allocation from
/// several threads. The coordinator's disjoint-unit invariant guarantees no
/// two live spans overlap, and the thread scope keeps the backing buffer
/// alive and un-aliased for the whole run.
struct SharedSeq {
    ptr: *mut i32,
    len: usize,
}

unsafe impl Send for SharedSeq {}
unsafe impl Sync for SharedSeq {}

impl SharedSeq {
    fn new(seq: &mut [i32]) -> Self {
        Self {
            ptr: seq.as_mut_ptr(),
            len: seq.len(),
        }
    }

    /// Caller must hold the only live assignment covering this range.
    unsafe fn unit_mut(&self, unit: &Unit) -> &mut [i32] {
        debug_assert!(unit.start + unit.width <= self.len);
        std::slice::from_raw_parts_mut(self.ptr.add(unit.start), unit.width)
    }
}

/// Sorts `seq` in place with the distributor / worker-pool protocol.
///
/// Rejects invalid configurations before spawning any thread, leaving the
/// buffer untouched. Sequences of length 0 or 1 are already sorted but
/// still go through validation, so a non-power-of-two length of 0 errors.
pub fn parallel_sort(seq: &mut [i32], config: &SortConfig) -> Result<(), SortError> {
    config.validate(seq.len())?;
    if seq.len() == 1 {
        return Ok(());
    }

    let coordinator = Coordinator::new(seq.len(), config);
    let shared = SharedSeq::new(seq);

    thread::scope(|scope| {
        let coordinator = &coordinator;
        let shared = &shared;

        let distributor = scope.spawn(move || run_distributor(coordinator));
        let workers: Vec<_> = (0..config.workers)
            .map(|id| scope.spawn(move || run_worker(id, coordinator, shared)))
            .collect();

        join(distributor)?;
        for worker in workers {
            join(worker)?;
        }
        Ok(())
    })
}

/// `parallel_sort`, followed by the verification scan.
pub fn parallel_sort_verified(
    seq: &mut [i32],
    config: &SortConfig,
) -> Result<Verification, SortError> {
    parallel_sort(seq, config)?;
    Ok(sequence::verify(seq))
}

fn run_distributor(coordinator: &Coordinator) -> Result<(), MonitorError> {
    while coordinator.assign_next()? == Assignment::More {}
    Ok(())
}

fn run_worker(
    id: usize,
    coordinator: &Coordinator,
    shared: &SharedSeq,
) -> Result<(), MonitorError> {
    while let Some(unit) = coordinator.request_work()? {
        trace!("worker {id} sorting {}..{}", unit.start, unit.start + unit.width);

        // The merge step runs with no lock held; this span is the only live
        // assignment covering its range.
        let span = unsafe { shared.unit_mut(&unit) };
        if unit.full_sort {
            merge::sort_unit(span, unit.start);
        } else {
            merge::merge_unit(span, unit.start);
        }

        coordinator.report_done(unit)?;
    }
    trace!("worker {id} done");
    Ok(())
}

fn join(handle: thread::ScopedJoinHandle<'_, Result<(), MonitorError>>) -> Result<(), SortError> {
    match handle.join() {
        Ok(result) => result.map_err(SortError::from),
        Err(_) => Err(SortError::ThreadPanicked),
    }
}
