use hourglass_rs::SafeTimeProvider;

use crate::config::LoanConfig;
use crate::decimal::Money;
use crate::errors::{Result, ServicingError};
use crate::events::{Event, EventStore};
use crate::expense::Expense;
use crate::ledger::{EntryDraft, LedgerEntry};
use crate::loan::Loan;
use crate::types::{Actor, ActorRole, EntryId, ExpenseId, LoanId, LoanStatus};

/// the whole loan book: every open loan plus the expense ledger
///
/// a reference embedding for services and tests; a real deployment
/// would keep the same operations behind its own storage engine.
#[derive(Default)]
pub struct LoanBook {
    pub loans: Vec<Loan>,
    pub expenses: Vec<Expense>,
    pub events: EventStore,
}

impl LoanBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loan(&self, id: LoanId) -> Result<&Loan> {
        self.loans
            .iter()
            .find(|l| l.id == id)
            .ok_or(ServicingError::LoanNotFound { id })
    }

    pub fn loan_mut(&mut self, id: LoanId) -> Result<&mut Loan> {
        self.loans
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(ServicingError::LoanNotFound { id })
    }

    /// open a loan and add it to the book
    pub fn open_loan(
        &mut self,
        config: LoanConfig,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanId> {
        let loan = Loan::open(config, time_provider)?;
        let id = loan.id;
        self.loans.push(loan);
        Ok(id)
    }

    /// change the principal of a loan nothing has been collected on;
    /// the remaining balance re-derives from the new figure
    pub fn update_principal(
        &mut self,
        actor: &Actor,
        id: LoanId,
        new_principal: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        require_owner(actor, "editing a loan")?;

        let loan = self.loan_mut(id)?;
        if loan.has_entries() {
            return Err(ServicingError::LoanHasEntries {
                entries: loan.entries.len(),
            });
        }

        let old_principal = loan.config.principal_amount;
        let mut updated = loan.config.clone();
        updated.principal_amount = new_principal;
        updated.validate()?;

        loan.config = updated;
        loan.state.remaining_amount = new_principal;
        loan.state.bump_version();

        let now = time_provider.now();
        loan.events.emit(Event::LoanUpdated {
            loan_id: id,
            old_principal,
            new_principal,
            timestamp: now,
        });

        tracing::info!(
            loan_id = %id,
            old_principal = %old_principal,
            new_principal = %new_principal,
            "loan principal updated"
        );

        Ok(())
    }

    /// remove a loan nothing has been collected on
    pub fn remove_loan(
        &mut self,
        actor: &Actor,
        id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        require_owner(actor, "removing a loan")?;

        let position = self
            .loans
            .iter()
            .position(|l| l.id == id)
            .ok_or(ServicingError::LoanNotFound { id })?;
        if self.loans[position].has_entries() {
            return Err(ServicingError::LoanHasEntries {
                entries: self.loans[position].entries.len(),
            });
        }

        let removed = self.loans.remove(position);
        self.events.emit(Event::LoanRemoved {
            loan_id: id,
            timestamp: time_provider.now(),
        });
        tracing::info!(loan_id = %id, "loan removed");

        Ok(removed)
    }

    pub fn record_entry(
        &mut self,
        actor: &Actor,
        loan_id: LoanId,
        draft: EntryDraft,
        time_provider: &SafeTimeProvider,
    ) -> Result<EntryId> {
        self.loan_mut(loan_id)?
            .record_entry(actor, draft, time_provider)
    }

    pub fn record_entry_versioned(
        &mut self,
        actor: &Actor,
        loan_id: LoanId,
        expected_version: u64,
        draft: EntryDraft,
        time_provider: &SafeTimeProvider,
    ) -> Result<EntryId> {
        self.loan_mut(loan_id)?
            .record_entry_versioned(actor, expected_version, draft, time_provider)
    }

    pub fn update_entry(
        &mut self,
        actor: &Actor,
        loan_id: LoanId,
        entry_id: EntryId,
        draft: EntryDraft,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.loan_mut(loan_id)?
            .update_entry(actor, entry_id, draft, time_provider)
    }

    pub fn delete_entry(
        &mut self,
        actor: &Actor,
        loan_id: LoanId,
        entry_id: EntryId,
        time_provider: &SafeTimeProvider,
    ) -> Result<LedgerEntry> {
        self.loan_mut(loan_id)?
            .delete_entry(actor, entry_id, time_provider)
    }

    /// add an operating expense
    pub fn record_expense(
        &mut self,
        actor: &Actor,
        description: impl Into<String>,
        amount: Money,
        incurred_on: chrono::NaiveDate,
    ) -> Result<ExpenseId> {
        let expense = Expense::new(description, amount, incurred_on, actor.name.clone())?;
        let id = expense.id;

        self.events.emit(Event::ExpenseRecorded {
            description: expense.description.clone(),
            amount: expense.amount,
            incurred_on: expense.incurred_on,
            recorded_by: expense.recorded_by.clone(),
        });
        self.expenses.push(expense);

        tracing::info!(expense_id = %id, amount = %amount, "expense recorded");
        Ok(id)
    }

    pub fn remove_expense(&mut self, actor: &Actor, id: ExpenseId) -> Result<Expense> {
        require_owner(actor, "removing an expense")?;

        let position = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(ServicingError::ExpenseNotFound { id })?;
        Ok(self.expenses.remove(position))
    }

    /// refresh active/overdue on every unsettled loan, the daily sweep
    pub fn refresh_statuses(&mut self, time_provider: &SafeTimeProvider) {
        for loan in &mut self.loans {
            loan.refresh_status(time_provider);
        }
    }

    /// every stored balance equals its ledger fold
    pub fn reconcile_all(&self) -> bool {
        self.loans.iter().all(|l| l.reconcile())
    }

    /// balance still out across unsettled loans
    pub fn total_outstanding(&self) -> Money {
        self.loans
            .iter()
            .filter(|l| l.state.status != LoanStatus::Settled)
            .fold(Money::ZERO, |sum, l| sum + l.current_balance())
    }

    /// ledger entries the actor may see: owners see everything,
    /// collectors only what they collected
    pub fn entries_visible_to(&self, actor: &Actor) -> Vec<&LedgerEntry> {
        self.loans
            .iter()
            .flat_map(|l| l.entries.iter())
            .filter(|e| actor.role == ActorRole::Owner || e.collected_by == actor.name)
            .collect()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
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
