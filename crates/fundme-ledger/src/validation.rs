use fundme_types::Amount;
use serde::Serialize;

use crate::events::{EventRecord, LedgerEvent};
use crate::ledger::{FundingLedger, LedgerSnapshot};

/// Result of auditing a ledger against its balance invariants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub held: Amount,
    pub total_funded: Amount,
    pub funder_count: usize,
    pub event_count: u64,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific invariant violation detected during an audit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    /// Held balance differs from the sum of recorded contributions.
    BalanceMismatch,
    /// A funder entry is recorded with a zero amount.
    EmptyEntry,
    /// Deadline is not creation time plus lock duration.
    DeadlineDrift,
    /// Replaying the event log does not reproduce the held balance.
    EventLogMismatch,
}

/// Balance-invariant auditor.
pub struct ConservationAuditor;

impl ConservationAuditor {
    pub fn audit(ledger: &FundingLedger) -> ValidationReport {
        Self::audit_snapshot(&ledger.snapshot(), ledger.events())
    }

    /// Audit a snapshot against the event log it was produced with.
    pub fn audit_snapshot(snapshot: &LedgerSnapshot, events: &[EventRecord]) -> ValidationReport {
        let mut violations = Vec::new();
        let held = snapshot.held;
        let total_funded = snapshot
            .funders
            .values()
            .try_fold(Amount::ZERO, |sum, amount| sum.checked_add(*amount));

        match total_funded {
            Some(total) if total == held => {}
            Some(total) => violations.push(Violation {
                kind: ViolationKind::BalanceMismatch,
                description: format!("held {held} but contributions sum to {total}"),
            }),
            None => violations.push(Violation {
                kind: ViolationKind::BalanceMismatch,
                description: "contributions overflow".into(),
            }),
        }

        for (funder, amount) in &snapshot.funders {
            if amount.is_zero() {
                violations.push(Violation {
                    kind: ViolationKind::EmptyEntry,
                    description: format!("funder {funder} recorded with zero balance"),
                });
            }
        }

        let expected_deadline = snapshot.created_at.plus(snapshot.lock_duration);
        if snapshot.deadline != expected_deadline {
            violations.push(Violation {
                kind: ViolationKind::DeadlineDrift,
                description: format!(
                    "deadline {} differs from expected {expected_deadline}",
                    snapshot.deadline
                ),
            });
        }

        match replay_balance(events) {
            Some(replayed) if replayed == held => {}
            Some(replayed) => violations.push(Violation {
                kind: ViolationKind::EventLogMismatch,
                description: format!("event log replays to {replayed}, ledger holds {held}"),
            }),
            None => violations.push(Violation {
                kind: ViolationKind::EventLogMismatch,
                description: "event log replay underflowed or overflowed".into(),
            }),
        }

        ValidationReport {
            held,
            total_funded: total_funded.unwrap_or(snapshot.total_funded),
            funder_count: snapshot.funders.len(),
            event_count: events.len() as u64,
            violations,
        }
    }
}

fn replay_balance(events: &[EventRecord]) -> Option<Amount> {
    events
        .iter()
        .try_fold(Amount::ZERO, |balance, record| match &record.event {
            LedgerEvent::Funded { amount, .. } => balance.checked_add(*amount),
            LedgerEvent::FundWithdrawByOwner { amount } => balance.checked_sub(*amount),
            LedgerEvent::RefundByFunder { amount, .. } => balance.checked_sub(*amount),
        })
}
