//! Reducer-like state transitions for the purchase session.

use tracing::debug;

use crate::{FarmGateway, PurchaseOutcome};

/// Transient per-session purchase state. Two states: Idle and Pending,
/// tracked by `in_flight`. Lives for the lifetime of one UI session and is
/// never persisted.
#[derive(Debug, Default)]
pub struct PurchaseSession {
    in_flight: bool,
    last_outcome: Option<PurchaseOutcome>,
    fulfilled_count: u32,
}

impl PurchaseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle -> Pending. Returns `false` without touching state when an
    /// attempt is already outstanding.
    pub fn begin_attempt(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Pending -> Idle. Unconditional: records the outcome and bumps the
    /// counter for fulfilled purchases with a non-empty message.
    pub fn settle(&mut self, outcome: PurchaseOutcome) {
        self.in_flight = false;
        if matches!(&outcome, PurchaseOutcome::Fulfilled { message, .. } if !message.is_empty()) {
            self.fulfilled_count += 1;
        }
        self.last_outcome = Some(outcome);
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn last_outcome(&self) -> Option<&PurchaseOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn fulfilled_count(&self) -> u32 {
        self.fulfilled_count
    }
}

/// Drives the purchase action against a farm gateway and owns the session
/// state. Failures never escape the gateway, so every invocation settles the
/// session and the user may immediately retry.
pub struct PurchaseController<G: FarmGateway> {
    gateway: G,
    session: PurchaseSession,
}

impl<G: FarmGateway> PurchaseController<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            session: PurchaseSession::new(),
        }
    }

    /// One full Idle -> Pending -> Idle cycle. A trigger that arrives while
    /// an attempt is pending is ignored; the presentation layer disables the
    /// button as well, this guard covers everything else.
    pub async fn purchase_corn(&mut self) {
        if !self.session.begin_attempt() {
            debug!("ignoring purchase trigger while an attempt is in flight");
            return;
        }
        let outcome = self.gateway.attempt_purchase().await;
        self.session.settle(outcome);
    }

    pub fn in_flight(&self) -> bool {
        self.session.in_flight()
    }

    pub fn last_outcome(&self) -> Option<&PurchaseOutcome> {
        self.session.last_outcome()
    }

    pub fn fulfilled_count(&self) -> u32 {
        self.session.fulfilled_count()
    }
}
