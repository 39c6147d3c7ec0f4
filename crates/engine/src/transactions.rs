//! Transaction primitives and the list filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    MoneyCents, ResultEngine,
    store::{Document, StoreError},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// A single income or expense movement.
///
/// `category` references a category by name, not by a referential key; this
/// is a permanent design constraint of the data model (categories cannot be
/// renamed).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(skip)]
    pub id: String,
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    pub wallet_id: String,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    pub fn fields(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl TryFrom<Document> for Transaction {
    type Error = StoreError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        let mut transaction: Transaction = serde_json::from_value(document.fields)?;
        transaction.id = document.id;
        Ok(transaction)
    }
}

/// User-typed transaction form data.
///
/// Only the amount is validated (it must parse as a decimal); everything else
/// is taken as-is.
#[derive(Clone, Debug)]
pub struct TransactionDraft {
    pub amount: String,
    pub kind: TransactionKind,
    pub wallet_id: String,
    pub category: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl TransactionDraft {
    pub fn build(self) -> ResultEngine<Transaction> {
        Ok(Transaction {
            id: String::new(),
            kind: self.kind,
            amount: self.amount.parse()?,
            wallet_id: self.wallet_id,
            category: self.category,
            date: self.date,
            note: self.note,
        })
    }
}

/// How an active search term interacts with the structural filter fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Search is AND-combined with wallet/kind/category/date fields.
    #[default]
    And,
    /// An active search term disables the structural fields entirely
    /// (legacy behavior of the original client).
    Bypass,
}

/// Filter over the transaction list.
///
/// A transaction passes when it satisfies every **set** structural field
/// (unset fields match everything) and, when a search term is set, a
/// case-insensitive substring match on category, note, owning wallet's name
/// or the decimal rendering of the amount. [`SearchMode`] selects how the two
/// halves combine.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub wallet_id: Option<String>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub search_mode: SearchMode,
}

impl TransactionFilter {
    pub fn is_empty(&self) -> bool {
        self.wallet_id.is_none()
            && self.kind.is_none()
            && self.category.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.active_search().is_none()
    }

    fn active_search(&self) -> Option<&str> {
        self.search.as_deref().filter(|term| !term.is_empty())
    }

    fn structural_match(&self, transaction: &Transaction) -> bool {
        if let Some(wallet_id) = &self.wallet_id
            && transaction.wallet_id != *wallet_id
        {
            return false;
        }
        if let Some(kind) = self.kind
            && transaction.kind != kind
        {
            return false;
        }
        if let Some(category) = &self.category
            && transaction.category != *category
        {
            return false;
        }
        if let Some(from) = self.date_from
            && transaction.date < from
        {
            return false;
        }
        if let Some(to) = self.date_to
            && transaction.date > to
        {
            return false;
        }
        true
    }

    fn search_match(&self, transaction: &Transaction, wallet_name: Option<&str>) -> bool {
        let Some(term) = self.active_search() else {
            return true;
        };
        let term = term.to_lowercase();

        if transaction.category.to_lowercase().contains(&term) {
            return true;
        }
        if let Some(note) = &transaction.note
            && note.to_lowercase().contains(&term)
        {
            return true;
        }
        if let Some(name) = wallet_name
            && name.to_lowercase().contains(&term)
        {
            return true;
        }
        transaction.amount.to_string().contains(&term)
    }

    /// Evaluates the filter against one transaction.
    ///
    /// `wallet_name` is the resolved name of the owning wallet, if it still
    /// exists; it only participates in the search match.
    pub fn matches(&self, transaction: &Transaction, wallet_name: Option<&str>) -> bool {
        match self.search_mode {
            SearchMode::And => {
                self.structural_match(transaction) && self.search_match(transaction, wallet_name)
            }
            SearchMode::Bypass => {
                if self.active_search().is_some() {
                    self.search_match(transaction, wallet_name)
                } else {
                    self.structural_match(transaction)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn transaction() -> Transaction {
        Transaction {
            id: "t1".to_string(),
            kind: TransactionKind::Expense,
            amount: MoneyCents::new(3000),
            wallet_id: "w1".to_string(),
            category: "Comida".to_string(),
            date: date("2024-01-15"),
            note: Some("Almuerzo".to_string()),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TransactionFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&transaction(), None));
    }

    #[test]
    fn structural_fields_are_exact_matches() {
        let tx = transaction();

        let mut filter = TransactionFilter {
            wallet_id: Some("w1".to_string()),
            kind: Some(TransactionKind::Expense),
            category: Some("Comida".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&tx, None));

        filter.wallet_id = Some("w2".to_string());
        assert!(!filter.matches(&tx, None));
    }

    #[test]
    fn date_range_is_inclusive() {
        let tx = transaction();

        let filter = TransactionFilter {
            date_from: Some(date("2024-01-15")),
            date_to: Some(date("2024-01-15")),
            ..Default::default()
        };
        assert!(filter.matches(&tx, None));

        let filter = TransactionFilter {
            date_from: Some(date("2024-01-16")),
            ..Default::default()
        };
        assert!(!filter.matches(&tx, None));

        let filter = TransactionFilter {
            date_to: Some(date("2024-01-14")),
            ..Default::default()
        };
        assert!(!filter.matches(&tx, None));
    }

    #[test]
    fn search_is_case_insensitive_over_all_text_fields() {
        let tx = transaction();
        let mut filter = TransactionFilter {
            search: Some("comida".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&tx, None));

        filter.search = Some("ALMUERZO".to_string());
        assert!(filter.matches(&tx, None));

        filter.search = Some("efect".to_string());
        assert!(filter.matches(&tx, Some("Efectivo")));
        assert!(!filter.matches(&tx, None));

        // "30" is a substring of the rendered amount "30.00".
        filter.search = Some("30".to_string());
        assert!(filter.matches(&tx, None));

        filter.search = Some("taxi".to_string());
        assert!(!filter.matches(&tx, None));
    }

    #[test]
    fn and_mode_combines_search_with_structural_fields() {
        let tx = transaction();
        let filter = TransactionFilter {
            kind: Some(TransactionKind::Income),
            search: Some("comida".to_string()),
            search_mode: SearchMode::And,
            ..Default::default()
        };
        assert!(!filter.matches(&tx, None));
    }

    #[test]
    fn bypass_mode_ignores_structural_fields_while_searching() {
        let tx = transaction();
        let mut filter = TransactionFilter {
            kind: Some(TransactionKind::Income),
            search: Some("comida".to_string()),
            search_mode: SearchMode::Bypass,
            ..Default::default()
        };
        assert!(filter.matches(&tx, None));

        // Without a term the structural fields apply again.
        filter.search = Some(String::new());
        assert!(!filter.matches(&tx, None));
    }

    #[test]
    fn draft_only_validates_the_amount() {
        let draft = TransactionDraft {
            amount: "30".to_string(),
            kind: TransactionKind::Expense,
            wallet_id: "w1".to_string(),
            category: "Comida".to_string(),
            date: date("2024-01-01"),
            note: None,
        };
        let tx = draft.build().unwrap();
        assert_eq!(tx.amount, MoneyCents::new(3000));

        let draft = TransactionDraft {
            amount: "treinta".to_string(),
            kind: TransactionKind::Expense,
            wallet_id: "w1".to_string(),
            category: "Comida".to_string(),
            date: date("2024-01-01"),
            note: None,
        };
        assert!(draft.build().is_err());
    }
}
