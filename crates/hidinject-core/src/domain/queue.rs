//! FIFO of pending keyboard reports.
//!
//! # Why a queue? (for beginners)
//!
//! The host, not the device, decides when a report may be sent: it polls the
//! interrupt-IN endpoint once per polling interval and accepts exactly one
//! report per poll.  Producers, on the other hand, can generate thousands of
//! reports at once (typing a whole file).  The queue absorbs those bursts:
//! pushes are unbounded and amortised O(1), pops happen strictly one at a
//! time from the poll callback.
//!
//! # The key-up invariant
//!
//! HID interrupt reports are level-triggered: a report says "this key is held
//! now", and the host keeps considering it held until a later report says
//! otherwise.  [`ReportQueue::push_keydown`] therefore always enqueues the
//! all-zero [`KEY_UP`] sentinel right after the key-down, so a key is never
//! observed as held for longer than one poll and typing the same character
//! twice produces two distinct presses.

use std::collections::VecDeque;

use crate::report::{HidKeyReport, KEY_UP};

/// Ordered queue of reports awaiting delivery.
#[derive(Debug, Default, Clone)]
pub struct ReportQueue {
    reports: VecDeque<HidKeyReport>,
}

impl ReportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue with room for `reports` entries before reallocating.
    pub fn with_capacity(reports: usize) -> Self {
        Self {
            reports: VecDeque::with_capacity(reports),
        }
    }

    /// Enqueues `report` followed by its key-up sentinel.
    ///
    /// Pushing the sentinel itself enqueues it once, as [`push_idle`] would:
    /// a key-up needs no key-up of its own.
    ///
    /// [`push_idle`]: ReportQueue::push_idle
    pub fn push_keydown(&mut self, report: HidKeyReport) {
        if report.is_key_up() {
            self.push_idle();
            return;
        }
        self.reports.push_back(report);
        self.reports.push_back(KEY_UP);
    }

    /// Enqueues a lone key-up sentinel, consuming one poll without a keystroke.
    pub fn push_idle(&mut self) {
        self.reports.push_back(KEY_UP);
    }

    /// Enqueues `polls` idle reports.
    pub fn push_idle_polls(&mut self, polls: usize) {
        self.reports.extend(std::iter::repeat(KEY_UP).take(polls));
    }

    /// Removes and returns the oldest report, or `None` when empty.
    pub fn drain_one(&mut self) -> Option<HidKeyReport> {
        self.reports.pop_front()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Drops every pending report.
    pub fn clear(&mut self) {
        self.reports.clear();
    }

    /// Iterates over pending reports, oldest first, without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &HidKeyReport> {
        self.reports.iter()
    }
}
