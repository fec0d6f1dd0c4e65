use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::accrual::{
    elapsed_days, DailyCollectionEngine, DailyCollectionStatus, DailyInterestEngine,
    DailyInterestStatus, MonthlyInterestEngine, MonthlyInterestStatus,
};
use crate::config::{LoanConfig, LoanTerms};
use crate::decimal::Money;
use crate::errors::{Result, ServicingError};
use crate::events::{Event, EventStore};
use crate::ledger::{validate_interest_first, validate_split, EntryDraft, LedgerEntry, Projector};
use crate::state::LoanState;
use crate::types::{Actor, ActorRole, CustomerId, EntryId, LoanId, LoanStatus, LoanType};

/// type-specific accrual position of a loan as of a reference date
#[derive(Debug, Clone, PartialEq)]
pub enum AccrualStatus {
    DailyCollection(DailyCollectionStatus),
    MonthlyInterest(MonthlyInterestStatus),
    DailyInterest(DailyInterestStatus),
}

impl AccrualStatus {
    pub fn is_overdue(&self) -> bool {
        match self {
            AccrualStatus::DailyCollection(s) => s.is_overdue,
            AccrualStatus::MonthlyInterest(s) => s.is_overdue,
            AccrualStatus::DailyInterest(s) => s.is_overdue,
        }
    }

    pub fn days_overdue(&self) -> u32 {
        match self {
            AccrualStatus::DailyCollection(s) => s.days_overdue,
            AccrualStatus::MonthlyInterest(s) => s.days_overdue,
            AccrualStatus::DailyInterest(s) => s.days_overdue,
        }
    }

    pub fn days_since_start(&self) -> u32 {
        match self {
            AccrualStatus::DailyCollection(s) => s.days_since_start,
            AccrualStatus::MonthlyInterest(s) => s.days_since_start,
            AccrualStatus::DailyInterest(s) => s.days_since_start,
        }
    }

    /// interest currently expected; zero for daily-collection loans
    pub fn expected_interest(&self) -> Money {
        match self {
            AccrualStatus::DailyCollection(_) => Money::ZERO,
            AccrualStatus::MonthlyInterest(s) => s.expected_interest,
            AccrualStatus::DailyInterest(s) => s.total_pending_interest,
        }
    }
}

/// a loan with its ledger and derived state
///
/// the ledger is authoritative: every mutation appends, amends or
/// removes a row and then rebuilds the whole projection from the
/// surviving rows. stored state is never adjusted incrementally.
pub struct Loan {
    pub id: LoanId,
    pub config: LoanConfig,
    pub state: LoanState,
    pub entries: Vec<LedgerEntry>,
    pub events: EventStore,
}

impl Loan {
    /// open a new loan from a validated configuration
    pub fn open(config: LoanConfig, time_provider: &SafeTimeProvider) -> Result<Self> {
        config.validate()?;

        let loan_id = Uuid::new_v4();
        let now = time_provider.now();
        let state = LoanState::new(loan_id, config.principal_amount, now);

        let mut loan = Self {
            id: loan_id,
            config,
            state,
            entries: Vec::new(),
            events: EventStore::new(),
        };

        loan.events.emit(Event::LoanOpened {
            loan_id,
            loan_type: loan.config.loan_type(),
            principal: loan.config.principal_amount,
            start_date: loan.config.start_date,
            disbursement_method: loan.config.disbursement_method,
        });

        tracing::info!(
            loan_id = %loan_id,
            loan_type = loan.config.loan_type().label(),
            principal = %loan.config.principal_amount,
            "loan opened"
        );

        Ok(loan)
    }

    pub fn loan_type(&self) -> LoanType {
        self.config.loan_type()
    }

    pub fn customer_id(&self) -> CustomerId {
        self.config.customer_id
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    /// remaining balance folded from the ledger, the single source of truth
    pub fn current_balance(&self) -> Money {
        Projector::new(self.config.principal_amount, &self.entries).balance()
    }

    /// stored projection equals the ledger fold
    pub fn reconcile(&self) -> bool {
        self.state.remaining_amount == self.current_balance()
    }

    /// remaining balance below 20% of the principal, nearing payoff
    pub fn is_low_balance(&self) -> bool {
        let threshold = self.config.principal_amount.percentage(dec!(20));
        self.state.status != LoanStatus::Settled && self.state.remaining_amount < threshold
    }

    /// type-specific accrual position as of a reference date
    pub fn accrual_status(&self, as_of: NaiveDate) -> AccrualStatus {
        let projector = Projector::new(self.config.principal_amount, &self.entries);

        match &self.config.terms {
            LoanTerms::DailyCollection {
                daily_collection_amount,
                ..
            } => {
                let engine = DailyCollectionEngine::new(
                    self.config.principal_amount,
                    *daily_collection_amount,
                    self.config.start_date,
                );
                AccrualStatus::DailyCollection(
                    engine.status(projector.collected_through(as_of), as_of),
                )
            }
            LoanTerms::MonthlyInterest {
                monthly_interest_rate,
                interest_cycle_day,
            } => {
                let engine = MonthlyInterestEngine::new(*monthly_interest_rate, *interest_cycle_day);
                let cycle = engine.cycle_window(as_of);
                AccrualStatus::MonthlyInterest(engine.status(
                    projector.balance_before(cycle.start),
                    projector.interest_collected_in(&cycle),
                    self.config.start_date,
                    as_of,
                ))
            }
            LoanTerms::DailyInterest {
                daily_interest_rate,
                max_days,
                ..
            } => {
                let engine = DailyInterestEngine::new(*daily_interest_rate, *max_days);
                AccrualStatus::DailyInterest(engine.status(
                    projector.balance(),
                    self.state.pending_interest,
                    self.last_entry_date(),
                    self.config.start_date,
                    as_of,
                ))
            }
        }
    }

    /// interest expected as of the reference date; zero for daily collection
    pub fn expected_interest(&self, as_of: NaiveDate) -> Money {
        self.accrual_status(as_of).expected_interest()
    }

    /// carried shortfall plus accrual to date for compound loans
    pub fn total_pending_interest(&self, as_of: NaiveDate) -> Money {
        match self.accrual_status(as_of) {
            AccrualStatus::DailyCollection(_) => Money::ZERO,
            AccrualStatus::MonthlyInterest(s) => self.state.pending_interest + s.expected_interest,
            AccrualStatus::DailyInterest(s) => s.total_pending_interest,
        }
    }

    pub fn days_since_start(&self, as_of: NaiveDate) -> u32 {
        elapsed_days(self.config.start_date, as_of)
    }

    /// record a collection entry against the loan
    pub fn record_entry(
        &mut self,
        actor: &Actor,
        draft: EntryDraft,
        time_provider: &SafeTimeProvider,
    ) -> Result<EntryId> {
        let now = time_provider.now();
        self.validate_draft(&draft, now.date_naive())?;

        let entry = draft.into_entry(self.id, actor.name.clone(), now);
        let entry_id = entry.id;
        self.apply_recorded(entry, now);

        Ok(entry_id)
    }

    /// record with an optimistic concurrency check: fails when the loan
    /// changed since the caller last read it
    pub fn record_entry_versioned(
        &mut self,
        actor: &Actor,
        expected_version: u64,
        draft: EntryDraft,
        time_provider: &SafeTimeProvider,
    ) -> Result<EntryId> {
        if expected_version != self.state.version {
            return Err(ServicingError::VersionConflict {
                expected: expected_version,
                current: self.state.version,
            });
        }
        self.record_entry(actor, draft, time_provider)
    }

    /// administratively amend an entry, reversing and reapplying its
    /// balance effects
    pub fn update_entry(
        &mut self,
        actor: &Actor,
        entry_id: EntryId,
        draft: EntryDraft,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        require_owner(actor, "amending a ledger entry")?;

        let position = self
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(ServicingError::EntryNotFound { id: entry_id })?;

        validate_split(&self.config.terms, &draft)?;

        // the amended ledger as a whole must still fit the principal
        let mut others = Money::ZERO;
        for (i, entry) in self.entries.iter().enumerate() {
            if i != position {
                others += entry.asal_amount;
            }
        }
        let headroom = (self.config.principal_amount - others).max(Money::ZERO);
        if draft.asal_amount > headroom {
            return Err(ServicingError::ExceedsRemainingBalance {
                remaining: headroom,
                requested: draft.asal_amount,
            });
        }

        let now = time_provider.now();
        let old_amount = self.entries[position].amount;
        {
            let entry = &mut self.entries[position];
            entry.amount = draft.amount;
            entry.asal_amount = draft.asal_amount;
            entry.interest_amount = draft.interest_amount;
            entry.payment_method = draft.payment_method;
            entry.note = draft.note;
        }
        let new_amount = self.entries[position].amount;

        let old_status = self.state.status;
        self.reproject(now);

        self.events.emit(Event::EntryAmended {
            loan_id: self.id,
            entry_id,
            old_amount,
            new_amount,
            amended_by: actor.name.clone(),
            timestamp: now,
        });
        self.emit_balance_transitions(old_status, now);
        self.refresh_status_at(now.date_naive(), now);

        tracing::info!(
            loan_id = %self.id,
            entry_id = %entry_id,
            old_amount = %old_amount,
            new_amount = %new_amount,
            "ledger entry amended"
        );

        Ok(())
    }

    /// administratively remove an entry, restoring its principal portion
    /// to the balance; a settled loan with balance again reactivates
    pub fn delete_entry(
        &mut self,
        actor: &Actor,
        entry_id: EntryId,
        time_provider: &SafeTimeProvider,
    ) -> Result<LedgerEntry> {
        require_owner(actor, "reversing a ledger entry")?;

        let position = self
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(ServicingError::EntryNotFound { id: entry_id })?;

        let now = time_provider.now();
        let removed = self.entries.remove(position);

        let old_status = self.state.status;
        self.reproject(now);

        self.events.emit(Event::EntryReversed {
            loan_id: self.id,
            entry_id,
            amount: removed.amount,
            asal_restored: removed.asal_amount,
            reversed_by: actor.name.clone(),
            timestamp: now,
        });
        self.emit_balance_transitions(old_status, now);
        self.refresh_status_at(now.date_naive(), now);

        tracing::info!(
            loan_id = %self.id,
            entry_id = %entry_id,
            asal_restored = %removed.asal_amount,
            "ledger entry reversed"
        );

        Ok(removed)
    }

    /// recompute active/overdue from the product rules as of a date
    ///
    /// recovery is immediate: the moment the overdue condition no longer
    /// holds, the loan is active again. settled loans are left alone.
    pub fn refresh_status(&mut self, time_provider: &SafeTimeProvider) -> LoanStatus {
        let now = time_provider.now();
        self.refresh_status_at(now.date_naive(), now)
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn last_entry_date(&self) -> Option<NaiveDate> {
        Projector::new(self.config.principal_amount, &self.entries)
            .last_entry()
            .map(|e| e.recorded_on())
    }

    fn validate_draft(&self, draft: &EntryDraft, entry_date: NaiveDate) -> Result<()> {
        if entry_date < self.config.start_date {
            return Err(ServicingError::EntryBeforeStart {
                entry_date,
                start_date: self.config.start_date,
            });
        }

        validate_split(&self.config.terms, draft)?;

        let remaining = self.current_balance();
        if draft.asal_amount > remaining {
            return Err(ServicingError::ExceedsRemainingBalance {
                remaining,
                requested: draft.asal_amount,
            });
        }

        if let LoanTerms::DailyInterest {
            allow_asal_payment_anytime: false,
            ..
        } = self.config.terms
        {
            validate_interest_first(self.total_pending_interest(entry_date), draft)?;
        }

        Ok(())
    }

    fn apply_recorded(&mut self, entry: LedgerEntry, now: DateTime<Utc>) {
        let old_status = self.state.status;
        let old_pending = self.state.pending_interest;

        let snapshot = entry.clone();
        self.entries.push(entry);
        self.reproject(now);

        self.events.emit(Event::EntryRecorded {
            loan_id: self.id,
            entry_id: snapshot.id,
            amount: snapshot.amount,
            asal: snapshot.asal_amount,
            interest: snapshot.interest_amount,
            method: snapshot.payment_method,
            collected_by: snapshot.collected_by.clone(),
            timestamp: now,
        });

        let new_pending = self.state.pending_interest;
        if new_pending > old_pending {
            self.events.emit(Event::InterestCarried {
                loan_id: self.id,
                shortfall: new_pending - old_pending,
                total_pending: new_pending,
                timestamp: now,
            });
        } else if snapshot.carries_interest() && new_pending.is_zero() {
            self.events.emit(Event::InterestSettled {
                loan_id: self.id,
                amount: snapshot.interest_amount,
                settled_on: snapshot.recorded_on(),
                timestamp: now,
            });
        }

        self.emit_balance_transitions(old_status, now);
        self.refresh_status_at(now.date_naive(), now);

        tracing::info!(
            loan_id = %self.id,
            amount = %snapshot.amount,
            asal = %snapshot.asal_amount,
            interest = %snapshot.interest_amount,
            collected_by = %snapshot.collected_by,
            "ledger entry recorded"
        );
    }

    /// rebuild every derived figure from the surviving ledger rows
    fn reproject(&mut self, now: DateTime<Utc>) {
        self.entries.sort_by_key(|e| e.recorded_at);

        let projector = Projector::new(self.config.principal_amount, &self.entries);
        let totals = projector.totals();
        let remaining = projector.balance();
        let last = projector.last_entry().map(|e| (e.amount, e.recorded_at));

        let (pending, last_settled) = self.replay_carry();

        self.state.remaining_amount = remaining;
        self.state.pending_interest = pending;
        self.state.last_interest_settled_on = last_settled;
        self.state.total_collected = totals.collected;
        self.state.total_asal_paid = totals.asal;
        self.state.total_interest_paid = totals.interest;
        self.state.entry_count = totals.entries;
        self.state.last_payment_amount = last.map(|(amount, _)| amount);
        self.state.last_payment_at = last.map(|(_, at)| at);

        if remaining.is_zero() {
            self.state.update_status(LoanStatus::Settled, now);
        } else if self.state.status == LoanStatus::Settled {
            self.state.update_status(LoanStatus::Active, now);
        }

        self.state.bump_version();
    }

    /// replay the pending-interest carry across the ledger in time order
    ///
    /// each compound entry owes the interest accrued since the previous
    /// entry plus any carried shortfall. paying short rolls the gap
    /// forward; paying in full clears it. replaying from scratch keeps
    /// the figure consistent after amendments and reversals.
    fn replay_carry(&self) -> (Money, Option<NaiveDate>) {
        let mut pending = Money::ZERO;
        let mut last_settled = None;

        match &self.config.terms {
            LoanTerms::DailyCollection { .. } => {}
            LoanTerms::MonthlyInterest {
                monthly_interest_rate,
                interest_cycle_day,
            } => {
                let engine = MonthlyInterestEngine::new(*monthly_interest_rate, *interest_cycle_day);
                for (i, entry) in self.entries.iter().enumerate() {
                    let day = entry.recorded_on();
                    let cycle = engine.cycle_window(day);
                    let prefix = Projector::new(self.config.principal_amount, &self.entries[..i]);

                    // one charge per cycle: the first entry of a cycle
                    // carries it, later entries in the window do not
                    let charge_scheduled = cycle.start >= self.config.start_date;
                    let already_collected = prefix.interest_collected_in(&cycle);
                    let charge = if charge_scheduled && !already_collected {
                        engine.interest_due(prefix.balance_before(cycle.start))
                    } else {
                        Money::ZERO
                    };

                    let expected = charge + pending;
                    if entry.interest_amount < expected {
                        pending = expected - entry.interest_amount;
                    } else {
                        pending = Money::ZERO;
                    }
                }
            }
            LoanTerms::DailyInterest {
                daily_interest_rate,
                ..
            } => {
                let engine = DailyInterestEngine::new(*daily_interest_rate, None);
                let mut anchor = self.config.start_date;
                for (i, entry) in self.entries.iter().enumerate() {
                    let day = entry.recorded_on();
                    let balance_before =
                        Projector::new(self.config.principal_amount, &self.entries[..i]).balance();
                    let accrued = engine.accrued(balance_before, elapsed_days(anchor, day));

                    let expected = accrued + pending;
                    if entry.interest_amount < expected {
                        pending = expected - entry.interest_amount;
                    } else {
                        pending = Money::ZERO;
                        last_settled = Some(day);
                    }
                    anchor = day;
                }
            }
        }

        (pending, last_settled)
    }

    fn emit_balance_transitions(&mut self, old_status: LoanStatus, now: DateTime<Utc>) {
        let new_status = self.state.status;
        if old_status == new_status {
            return;
        }

        match new_status {
            LoanStatus::Settled => {
                self.events.emit(Event::LoanSettled {
                    loan_id: self.id,
                    total_collected: self.state.total_collected,
                    timestamp: now,
                });
                self.events.emit(Event::StatusChanged {
                    loan_id: self.id,
                    old_status,
                    new_status,
                    reason: "balance cleared".to_string(),
                    timestamp: now,
                });
                tracing::info!(loan_id = %self.id, "loan settled");
            }
            _ if old_status == LoanStatus::Settled => {
                self.events.emit(Event::LoanReactivated {
                    loan_id: self.id,
                    restored_balance: self.state.remaining_amount,
                    timestamp: now,
                });
                self.events.emit(Event::StatusChanged {
                    loan_id: self.id,
                    old_status,
                    new_status,
                    reason: "balance restored by reversal".to_string(),
                    timestamp: now,
                });
                tracing::info!(
                    loan_id = %self.id,
                    balance = %self.state.remaining_amount,
                    "settled loan reactivated"
                );
            }
            _ => {}
        }
    }

    fn refresh_status_at(&mut self, as_of: NaiveDate, now: DateTime<Utc>) -> LoanStatus {
        if self.state.status == LoanStatus::Settled {
            return self.state.status;
        }

        let status = self.accrual_status(as_of);
        let target = if status.is_overdue() {
            LoanStatus::Overdue
        } else {
            LoanStatus::Active
        };

        if target != self.state.status {
            let old_status = self.state.status;
            self.state.update_status(target, now);
            let reason = match target {
                LoanStatus::Overdue => format!("{} days overdue", status.days_overdue()),
                _ => "collections back in line".to_string(),
            };
            self.events.emit(Event::StatusChanged {
                loan_id: self.id,
                old_status,
                new_status: target,
                reason,
                timestamp: now,
            });
            tracing::debug!(loan_id = %self.id, from = ?old_status, to = ?target, "status refreshed");
        }

        self.state.status
    }
}

fn require_owner(actor: &Actor, action: &str) -> Result<()> {
    if !actor.is_owner() {
        return Err(ServicingError::NotAuthorized {
            action: action.to_string(),
            required: ActorRole::Owner,
            actual: actor.role,
        });
    }
    Ok(())
}
