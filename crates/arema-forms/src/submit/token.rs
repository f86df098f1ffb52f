#![forbid(unsafe_code)]

//! Submission tokens and the lifecycle trace.
//!
//! Every submission gets a fresh [`SubmitToken`]. A resolution is applied only
//! if its token is still the form's in-flight token; resetting or closing the
//! form clears that token, so late results are recorded and dropped.
//!
//! # Invariants
//!
//! - Tokens are strictly monotonic per form: `token_n < token_{n+1}`.
//! - Token 0 is reserved for "none".
//! - At most one token is in flight at any time.

use std::collections::VecDeque;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

// ---------------------------------------------------------------------------
// SubmitToken
// ---------------------------------------------------------------------------

/// Identifies one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SubmitToken(u64);

impl SubmitToken {
    /// The null token.
    pub const NONE: Self = Self(0);

    /// Create a token from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Raw token value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns `true` for [`SubmitToken::NONE`].
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// The token following this one.
    #[must_use]
    pub(crate) const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for SubmitToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Submit({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// SubmissionEvent
// ---------------------------------------------------------------------------

/// One step of a submission's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionEvent {
    /// The submit action was invoked.
    Started { token: SubmitToken },
    /// The submit action resolved.
    Resolved { token: SubmitToken, ok: bool },
    /// The resolution was applied to the form state.
    Applied { token: SubmitToken, ok: bool },
    /// The resolution arrived for a token that is no longer in flight.
    StaleDiscarded {
        token: SubmitToken,
        /// In-flight token when the result arrived (`NONE` if idle).
        current: SubmitToken,
    },
    /// The form was reset while the token was in flight.
    Abandoned { token: SubmitToken },
}

impl SubmissionEvent {
    /// Token the event refers to.
    #[must_use]
    pub fn token(&self) -> SubmitToken {
        match self {
            Self::Started { token }
            | Self::Resolved { token, .. }
            | Self::Applied { token, .. }
            | Self::StaleDiscarded { token, .. }
            | Self::Abandoned { token } => *token,
        }
    }

    /// Short event name for logs.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Resolved { .. } => "resolved",
            Self::Applied { .. } => "applied",
            Self::StaleDiscarded { .. } => "stale_discarded",
            Self::Abandoned { .. } => "abandoned",
        }
    }
}

// ---------------------------------------------------------------------------
// SubmissionTrace
// ---------------------------------------------------------------------------

/// Default number of events kept by a trace.
pub const DEFAULT_TRACE_CAPACITY: usize = 256;

/// Bounded log of submission events, oldest first.
///
/// When full, the oldest event is dropped. Checksums and invariant checks
/// cover the retained window only.
#[derive(Debug, Clone)]
pub struct SubmissionTrace {
    events: VecDeque<SubmissionEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for SubmissionTrace {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TRACE_CAPACITY)
    }
}

impl SubmissionTrace {
    /// An empty trace keeping at most `capacity` events. A capacity of zero
    /// records nothing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_TRACE_CAPACITY)),
            capacity,
            dropped: 0,
        }
    }

    /// Append an event, evicting the oldest when full.
    pub fn push(&mut self, event: SubmissionEvent) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &SubmissionEvent> {
        self.events.iter()
    }

    /// Number of retained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events evicted or not recorded.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Returns `true` if an event of `event_type` exists for `token`.
    #[must_use]
    pub fn contains_event_type(&self, token: SubmitToken, event_type: &str) -> bool {
        self.events
            .iter()
            .any(|e| e.token() == token && e.event_type() == event_type)
    }

    /// Events for one token, oldest first.
    #[must_use]
    pub fn events_for_token(&self, token: SubmitToken) -> Vec<SubmissionEvent> {
        self.events
            .iter()
            .filter(|e| e.token() == token)
            .copied()
            .collect()
    }

    /// Order-sensitive checksum for golden comparisons.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for event in &self.events {
            event.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Check the lifecycle invariants; returns one line per violation.
    #[must_use]
    pub fn verify_invariants(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut last_started = SubmitToken::NONE;
        let mut in_flight: Option<SubmitToken> = None;

        for event in &self.events {
            match *event {
                SubmissionEvent::Started { token } => {
                    if token <= last_started {
                        violations.push(format!(
                            "non-monotonic start token: {token} after {last_started}"
                        ));
                    }
                    if let Some(open) = in_flight {
                        violations.push(format!("{token} started while {open} in flight"));
                    }
                    last_started = token;
                    in_flight = Some(token);
                }
                SubmissionEvent::Applied { token, .. } => {
                    if in_flight != Some(token) {
                        violations.push(format!("{token} applied while not in flight"));
                    }
                    in_flight = None;
                }
                SubmissionEvent::Abandoned { token } => {
                    if in_flight == Some(token) {
                        in_flight = None;
                    }
                }
                SubmissionEvent::StaleDiscarded { token, current } => {
                    if token == current {
                        violations.push(format!("{token} discarded while still in flight"));
                    }
                }
                SubmissionEvent::Resolved { .. } => {}
            }
        }

        violations
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
