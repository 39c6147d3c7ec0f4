//! Per-user category registry.
//!
//! One document per namespace holding two ordered name lists. Transactions
//! reference categories by name, so removing a name never touches existing
//! transactions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    EngineError, ResultEngine, TransactionKind,
    store::{Document, StoreError},
};

/// Income categories seeded on first use.
pub const DEFAULT_INCOME: [&str; 3] = ["Salario", "Freelance", "Inversiones"];
/// Expense categories seeded on first use.
pub const DEFAULT_EXPENSE: [&str; 4] = ["Comida", "Transporte", "Entretenimiento", "Servicios"];

/// The single category record of a user namespace.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySet {
    #[serde(skip)]
    pub id: String,
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl CategorySet {
    /// Returns the fixed defaults written for a brand-new namespace.
    pub fn seeded() -> Self {
        Self {
            id: String::new(),
            income: DEFAULT_INCOME.iter().map(|s| s.to_string()).collect(),
            expense: DEFAULT_EXPENSE.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn list(&self, kind: TransactionKind) -> &[String] {
        match kind {
            TransactionKind::Income => &self.income,
            TransactionKind::Expense => &self.expense,
        }
    }

    fn list_mut(&mut self, kind: TransactionKind) -> &mut Vec<String> {
        match kind {
            TransactionKind::Income => &mut self.income,
            TransactionKind::Expense => &mut self.expense,
        }
    }

    /// Appends a name to one list. Names are unique within their list.
    pub fn add(&mut self, name: &str, kind: TransactionKind) -> ResultEngine<()> {
        let list = self.list_mut(kind);
        if list.iter().any(|existing| existing == name) {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        list.push(name.to_string());
        Ok(())
    }

    /// Removes a name from one list. Returns `false` when the name was not
    /// present.
    pub fn remove(&mut self, name: &str, kind: TransactionKind) -> bool {
        let list = self.list_mut(kind);
        let before = list.len();
        list.retain(|existing| existing != name);
        list.len() != before
    }

    /// All category names, income first, in list order.
    pub fn all(&self) -> Vec<&str> {
        self.income
            .iter()
            .chain(self.expense.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn fields(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl TryFrom<Document> for CategorySet {
    type Error = StoreError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        let mut categories: CategorySet = serde_json::from_value(document.fields)?;
        categories.id = document.id;
        Ok(categories)
    }
}
