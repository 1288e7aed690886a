// src/console/mock.rs

//! Scripted in-memory link with a fake clock, shared by the session tests.

use crate::common::hal_traits::{VantageSerial, VantageTimer};
use core::ops::Add;
use core::time::Duration;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(Duration);

impl Add<Duration> for MockInstant {
    type Output = MockInstant;
    fn add(self, rhs: Duration) -> MockInstant {
        MockInstant(self.0 + rhs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockIoError;

#[derive(Debug, Default)]
struct MockState {
    rx: VecDeque<u8>,
    replies: VecDeque<Vec<u8>>,
    written: Vec<u8>,
    lines_written: usize,
    fail_reads_after: Option<usize>,
    clock: Duration,
    close_calls: u32,
}

/// Every clone observes and drives the same link.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockLink {
    state: Rc<RefCell<MockState>>,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes bytes readable right away.
    pub fn feed(&self, bytes: &[u8]) {
        self.state.borrow_mut().rx.extend(bytes.iter().copied());
    }

    /// Queues the reply released by the next command line written.
    /// An empty reply leaves the console silent for that line.
    pub fn reply(&self, bytes: &[u8]) -> &Self {
        self.state.borrow_mut().replies.push_back(bytes.to_vec());
        self
    }

    /// Every read fails from now on.
    pub fn fail_reads(&self) {
        self.fail_reads_after(0);
    }

    /// Reads fail once `lines` command lines have been written.
    pub fn fail_reads_after(&self, lines: usize) {
        self.state.borrow_mut().fail_reads_after = Some(lines);
    }

    pub fn written_lines(&self) -> Vec<String> {
        let state = self.state.borrow();
        state
            .written
            .split_inclusive(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    pub fn close_calls(&self) -> u32 {
        self.state.borrow().close_calls
    }

    pub fn elapsed(&self) -> Duration {
        self.state.borrow().clock
    }
}

impl VantageTimer for MockLink {
    type Instant = MockInstant;

    fn delay_us(&mut self, us: u32) {
        self.state.borrow_mut().clock += Duration::from_micros(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.state.borrow_mut().clock += Duration::from_millis(ms as u64);
    }

    fn now(&self) -> MockInstant {
        MockInstant(self.state.borrow().clock)
    }
}

impl VantageSerial for MockLink {
    type Error = MockIoError;

    fn read_byte(&mut self) -> nb::Result<u8, MockIoError> {
        let mut state = self.state.borrow_mut();
        if matches!(state.fail_reads_after, Some(n) if state.lines_written >= n) {
            return Err(nb::Error::Other(MockIoError));
        }
        state.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), MockIoError> {
        let mut state = self.state.borrow_mut();
        state.written.push(byte);
        if byte == b'\n' {
            state.lines_written += 1;
            if let Some(reply) = state.replies.pop_front() {
                state.rx.extend(reply);
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), MockIoError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), MockIoError> {
        self.state.borrow_mut().close_calls += 1;
        Ok(())
    }
}
