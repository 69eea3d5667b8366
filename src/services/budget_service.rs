//! Running entrance-fee tracking against the trip budget.
//!
//! Locked places are always accepted, even past the budget; the
//! tracker then raises the itinerary-level over-budget flag instead of
//! excluding them. Non-locked places that would exceed the budget are
//! simply skipped so a cheaper alternative can still be tried.

#[derive(Debug, Clone)]
pub struct BudgetTracker {
    budget_total: f64,
    spent: f64,
    over_budget: bool,
}

impl BudgetTracker {
    pub fn new(budget_total: f64) -> Self {
        Self {
            budget_total,
            spent: 0.0,
            over_budget: false,
        }
    }

    /// Whether a candidate with this fee may be committed. Locked
    /// candidates always pass; this only answers, it does not spend.
    pub fn accepts(&self, fee: f64, locked: bool) -> bool {
        locked || self.spent + fee <= self.budget_total
    }

    /// Commit a fee that `accepts` approved.
    pub fn commit(&mut self, fee: f64) {
        self.spent += fee;
        if self.spent > self.budget_total {
            self.over_budget = true;
        }
    }

    pub fn spent(&self) -> f64 {
        self.spent
    }

    pub fn over_budget(&self) -> bool {
        self.over_budget
    }
}
