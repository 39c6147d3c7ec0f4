//! Explicit UI-state struct owned by the presentation layer.
//!
//! This replaces what the original client kept as ambient per-component
//! state: the active tab, the open modal and the transaction filter set. The
//! engine never reads this; panels pass the filter to
//! `Engine::filtered_transactions` on render.

use crate::{TransactionFilter, TransactionKind};

/// Mutually-exclusive top-level panels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Dashboard,
    Wallets,
    Transactions,
    Budgets,
    Categories,
}

/// The modal dialogs of the application. At most one is open at a time.
#[derive(Clone, Debug, PartialEq)]
pub enum Modal {
    AddTransaction,
    AddWallet,
    AddCategory,
    AddBudget,
    DeleteWallet(String),
    DeleteCategory {
        name: String,
        kind: TransactionKind,
    },
}

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub active_tab: Tab,
    modal: Option<Modal>,
    pub filters: TransactionFilter,
    pub show_filters: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches panel. No side effects beyond re-rendering.
    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Opens a modal. Modal exclusivity is enforced: any open modal is
    /// replaced.
    pub fn open(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    /// Closes the open modal, on submit or cancel.
    pub fn close(&mut self) {
        self.modal = None;
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn toggle_filters(&mut self) {
        self.show_filters = !self.show_filters;
    }
}
