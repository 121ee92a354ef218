//! Single-flight request tracking per operation class.
//!
//! Requests are never queued or blocked. Each one captures a generation when
//! it starts; when it finishes, only the request holding the latest
//! generation for its class is delivered as current. Older requests still
//! complete, but as [`Outcome::Superseded`].

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tracing::debug;

use crate::invoker::ToolKind;

/// Why a request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file is outside the project root, or there is no root.
    NoProjectContext,
    /// The editor has no document or the document has no path.
    NoDocument,
    /// Fix-on-save is off, or the save came from the fixer itself.
    NotListening,
}

/// Result of a request after the freshness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The latest request for its class; the value is authoritative.
    Current(T),
    /// A newer request started before this one finished.
    Superseded,
    /// Preconditions were not met; nothing ran.
    Skipped(SkipReason),
}

impl<T> Outcome<T> {
    pub fn is_current(&self) -> bool {
        matches!(self, Outcome::Current(_))
    }

    /// Returns the value if this outcome is current.
    pub fn current(self) -> Option<T> {
        match self {
            Outcome::Current(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Current(value) => Outcome::Current(f(value)),
            Outcome::Superseded => Outcome::Superseded,
            Outcome::Skipped(reason) => Outcome::Skipped(reason),
        }
    }
}

/// Observable state of one operation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Pending { in_flight: usize },
}

#[derive(Debug, Default)]
struct ClassState {
    generation: AtomicU64,
    in_flight: AtomicUsize,
}

/// Generation counters for lint and fix requests.
#[derive(Debug, Default)]
pub struct RequestSession {
    lint: ClassState,
    fix: ClassState,
}

impl RequestSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn class(&self, kind: ToolKind) -> &ClassState {
        match kind {
            ToolKind::Lint => &self.lint,
            ToolKind::Fix => &self.fix,
        }
    }

    /// Starts a request, making it the latest for its class.
    pub fn begin(&self, kind: ToolKind) -> Ticket<'_> {
        let class = self.class(kind);
        let generation = class.generation.fetch_add(1, Ordering::AcqRel) + 1;
        class.in_flight.fetch_add(1, Ordering::AcqRel);
        debug!("Started {} request #{}", kind, generation);

        Ticket {
            session: self,
            kind,
            generation,
        }
    }

    /// Latest generation handed out for a class (0 before any request).
    pub fn current_generation(&self, kind: ToolKind) -> u64 {
        self.class(kind).generation.load(Ordering::Acquire)
    }

    pub fn state(&self, kind: ToolKind) -> SessionState {
        match self.class(kind).in_flight.load(Ordering::Acquire) {
            0 => SessionState::Idle,
            in_flight => SessionState::Pending { in_flight },
        }
    }
}

/// A started request. Dropping it without completing still ends the request.
#[derive(Debug)]
pub struct Ticket<'a> {
    session: &'a RequestSession,
    kind: ToolKind,
    generation: u64,
}

impl Ticket<'_> {
    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no newer request of the same class has started.
    pub fn is_latest(&self) -> bool {
        self.session.current_generation(self.kind) == self.generation
    }

    /// Finishes the request, delivering `value` only if it is still the latest.
    pub fn complete<T>(self, value: T) -> Outcome<T> {
        if self.is_latest() {
            Outcome::Current(value)
        } else {
            debug!(
                "Discarding stale {} result #{} (latest #{})",
                self.kind,
                self.generation,
                self.session.current_generation(self.kind)
            );
            Outcome::Superseded
        }
    }

    /// Finishes the request without a result.
    pub fn skip<T>(self, reason: SkipReason) -> Outcome<T> {
        Outcome::Skipped(reason)
    }
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        self.session
            .class(self.kind)
            .in_flight
            .fetch_sub(1, Ordering::AcqRel);
    }
}
