//! Monthly budgets per category.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    MoneyCents, ResultEngine,
    store::{Document, StoreError},
};

/// Budget period. Only monthly budgets exist today; the field is persisted so
/// documents stay self-describing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
}

impl BudgetPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
        }
    }
}

/// A spending target for one expense category.
///
/// There is no stored `spent` field: how much of the budget is consumed is a
/// derived view over matching expense transactions (`Engine::budget_spent`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(skip)]
    pub id: String,
    pub category: String,
    pub amount: MoneyCents,
    pub period: BudgetPeriod,
}

impl Budget {
    pub fn fields(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl TryFrom<Document> for Budget {
    type Error = StoreError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        let mut budget: Budget = serde_json::from_value(document.fields)?;
        budget.id = document.id;
        Ok(budget)
    }
}

/// User-typed budget form data.
#[derive(Clone, Debug)]
pub struct BudgetDraft {
    pub category: String,
    pub amount: String,
}

impl BudgetDraft {
    pub fn build(self) -> ResultEngine<Budget> {
        Ok(Budget {
            id: String::new(),
            category: self.category,
            amount: self.amount.parse()?,
            period: BudgetPeriod::Monthly,
        })
    }
}
