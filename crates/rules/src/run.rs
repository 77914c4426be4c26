//! Completion tracking for asynchronous validation runs
//!
//! An [`AsyncRun`] counts slots, one per scheduled rule. Each slot is
//! resolved exactly once through its [`Completion`] handle; extra
//! resolutions are ignored. The terminal handler fires once, after the run
//! has been [armed](AsyncRun::arm) and every slot has resolved. Arming after
//! scheduling keeps a rule that resolves inline from firing the terminal
//! handler while later rules are still being scheduled.
//!
//! Failure handling is serialized: the failure handler runs under its own
//! lock, and a slot only counts as resolved once its failure has been
//! reported, so the terminal handler always observes every failure.

use crate::foundation::{RuleDirective, SizeKind};
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// What the failure handler learns about a failing slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// Attribute the rule ran against.
    pub attribute: String,
    /// The failing directive.
    pub directive: RuleDirective,
    /// Value classification, used to pick a message variant.
    pub kind: SizeKind,
    /// Message template supplied by the rule itself, if any.
    pub message: Option<String>,
}

type FailureHandler = Box<dyn FnMut(Failure) + Send>;
type TerminalHandler = Box<dyn FnOnce(bool) + Send>;

struct Slot {
    resolved: bool,
    failure: Option<Failure>,
}

struct RunState {
    slots: Vec<Slot>,
    resolved: usize,
    failed: usize,
    armed: bool,
    on_resolved: Option<TerminalHandler>,
}

struct Inner {
    state: Mutex<RunState>,
    on_failed: Mutex<FailureHandler>,
}

/// Coordinates a fixed set of rule evaluations into one verdict.
///
/// # Examples
///
/// ```
/// use nebula_rules::run::{AsyncRun, Failure};
/// use nebula_rules::foundation::{RuleDirective, SizeKind};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// let passed = Arc::new(AtomicBool::new(false));
/// let seen = Arc::clone(&passed);
/// let run = AsyncRun::new(|_failure| {}, move |ok| seen.store(ok, Ordering::SeqCst));
///
/// let slot = run.add(Failure {
///     attribute: "name".into(),
///     directive: RuleDirective::parse("unique"),
///     kind: SizeKind::String,
///     message: None,
/// });
/// run.arm();
/// assert!(!run.is_fired());
///
/// slot.pass();
/// assert!(run.is_fired());
/// assert!(passed.load(Ordering::SeqCst));
/// ```
#[derive(Clone)]
pub struct AsyncRun {
    inner: Arc<Inner>,
}

impl AsyncRun {
    /// Creates a run with a per-failure handler and a terminal handler.
    ///
    /// `on_failed` is called once per failing slot, as failures happen.
    /// `on_resolved` is called once with `true` if no slot failed.
    pub fn new<F, R>(on_failed: F, on_resolved: R) -> Self
    where
        F: FnMut(Failure) + Send + 'static,
        R: FnOnce(bool) + Send + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(RunState {
                    slots: Vec::new(),
                    resolved: 0,
                    failed: 0,
                    armed: false,
                    on_resolved: Some(Box::new(on_resolved)),
                }),
                on_failed: Mutex::new(Box::new(on_failed)),
            }),
        }
    }

    /// Registers one slot and returns the handle that resolves it.
    ///
    /// `failure` describes the slot for the failure handler. Slots added
    /// after the terminal handler fired are ignored.
    pub fn add(&self, failure: Failure) -> Completion {
        let mut state = self.inner.state.lock();
        if state.armed && state.on_resolved.is_none() {
            warn!(
                attribute = %failure.attribute,
                rule = failure.directive.name(),
                "slot added to a finished validation run; ignoring"
            );
        }
        let slot = state.slots.len();
        state.slots.push(Slot {
            resolved: false,
            failure: Some(failure),
        });
        Completion {
            inner: Arc::clone(&self.inner),
            slot,
        }
    }

    /// Marks scheduling complete and fires if every slot already resolved.
    pub fn arm(&self) {
        let mut state = self.inner.state.lock();
        state.armed = true;
        Inner::fire_if_done(state);
    }

    /// Number of registered slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.lock().slots.len()
    }

    /// Returns true if no slot was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots resolved so far.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.inner.state.lock().resolved
    }

    /// Returns true once the terminal handler has been invoked.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        let state = self.inner.state.lock();
        state.armed && state.on_resolved.is_none()
    }
}

impl fmt::Debug for AsyncRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("AsyncRun")
            .field("slots", &state.slots.len())
            .field("resolved", &state.resolved)
            .field("failed", &state.failed)
            .field("armed", &state.armed)
            .finish()
    }
}

impl Inner {
    fn resolve(&self, slot: usize, passed: bool, message: Option<String>) {
        let failure = {
            let mut state = self.state.lock();
            let Some(entry) = state.slots.get_mut(slot) else {
                return;
            };
            if entry.resolved {
                trace!(slot, "slot already resolved; ignoring repeated completion");
                return;
            }
            entry.resolved = true;
            let failure = entry.failure.take();
            if passed {
                None
            } else {
                state.failed += 1;
                failure.map(|mut failure| {
                    failure.message = message;
                    failure
                })
            }
        };

        if let Some(failure) = failure {
            let mut on_failed = self.on_failed.lock();
            (*on_failed)(failure);
        }

        let mut state = self.state.lock();
        state.resolved += 1;
        Self::fire_if_done(state);
    }

    fn fire_if_done(mut state: MutexGuard<'_, RunState>) {
        if !state.armed || state.resolved < state.slots.len() {
            return;
        }
        let Some(on_resolved) = state.on_resolved.take() else {
            return;
        };
        let passed = state.failed == 0;
        trace!(
            slots = state.slots.len(),
            failed = state.failed,
            "validation run resolved"
        );
        drop(state);
        on_resolved(passed);
    }
}

/// Handle that resolves one slot of an [`AsyncRun`].
///
/// Asynchronous rules receive one of these and call [`pass`](Self::pass) or
/// [`fail`](Self::fail) when their outcome is known, possibly from another
/// task or thread. Only the first call has any effect.
#[derive(Clone)]
pub struct Completion {
    inner: Arc<Inner>,
    slot: usize,
}

impl Completion {
    /// Resolves the slot as passed.
    pub fn pass(&self) {
        self.resolve(true);
    }

    /// Resolves the slot as failed, using the rule's registered message.
    pub fn fail(&self) {
        self.resolve(false);
    }

    /// Resolves the slot as failed with a message template of its own.
    ///
    /// The template goes through the usual placeholder substitution.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.inner.resolve(self.slot, false, Some(message.into()));
    }

    /// Resolves the slot with an explicit outcome.
    pub fn resolve(&self, passed: bool) {
        self.inner.resolve(self.slot, passed, None);
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").field("slot", &self.slot).finish()
    }
}
