//! Scriptable [`Platform`] that records every call, for tests.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use touchkit_catalog::{Policy, SUCCESS};

use crate::AuthError;
use crate::platform::{Platform, Reply};

/// A call observed by [`MockPlatform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Create,
    Preflight,
    Evaluate,
    Invalidate,
    Answer,
    Release,
}

/// How the mock answers an evaluation.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    /// Answer success before `evaluate` returns.
    Succeed,
    /// Answer with this code before `evaluate` returns.
    Fail(i64),
    /// Answer with this code from another thread after a delay. Not recorded.
    Deferred(i64, Duration),
    /// Hold the reply until invalidated, then answer with this code.
    UntilInvalidated(i64),
    /// Drop the reply without answering.
    Abandon,
}

#[derive(Debug)]
pub struct MockContext;

#[derive(Debug)]
pub struct MockPlatform {
    outcome: Outcome,
    preflight: i64,
    fail_create: bool,
    pending: Mutex<Option<(Reply, i64)>>,
    events: Mutex<Vec<Event>>,
}

impl MockPlatform {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            preflight: SUCCESS,
            fail_create: false,
            pending: Mutex::new(None),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Make preflight report `code`.
    pub const fn preflight(mut self, code: i64) -> Self {
        self.preflight = code;
        self
    }

    pub const fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: Event) -> usize {
        self.events.lock().unwrap().iter().filter(|seen| **seen == event).count()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    fn answer(&self, reply: Reply, code: i64) {
        self.record(Event::Answer);
        reply.fail(code);
    }
}

impl Platform for MockPlatform {
    type Context = MockContext;

    fn create(&self) -> Result<MockContext, AuthError> {
        if self.fail_create {
            return Err(AuthError::Session("mock allocation failure".into()));
        }
        self.record(Event::Create);
        Ok(MockContext)
    }

    fn can_evaluate(&self, _context: &MockContext, _policy: Policy) -> i64 {
        self.record(Event::Preflight);
        self.preflight
    }

    fn evaluate(&self, _context: &MockContext, _policy: Policy, _reason: &str, reply: Reply) {
        self.record(Event::Evaluate);
        match self.outcome {
            Outcome::Succeed => self.answer(reply, SUCCESS),
            Outcome::Fail(code) => self.answer(reply, code),
            Outcome::Deferred(code, delay) => {
                thread::spawn(move || {
                    thread::sleep(delay);
                    reply.fail(code);
                });
            }
            Outcome::UntilInvalidated(code) => {
                *self.pending.lock().unwrap() = Some((reply, code));
            }
            Outcome::Abandon => drop(reply),
        }
    }

    fn invalidate(&self, _context: &MockContext) {
        self.record(Event::Invalidate);
        let pending = self.pending.lock().unwrap().take();
        if let Some((reply, code)) = pending {
            self.answer(reply, code);
        }
    }

    fn release(&self, _context: MockContext) {
        self.record(Event::Release);
    }
}
