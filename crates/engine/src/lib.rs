//! Finance state engine.
//!
//! Holds one authenticated user's wallets, transactions, budgets and
//! categories in an in-memory mirror, synchronizes mutations with a remote
//! document store and derives summary/filter views for presentation.
//!
//! Write path: every mutation persists to the store first and only then
//! applies the change to the mirror. A failed remote write therefore returns
//! `Err` with the mirror untouched; the mirror never runs ahead of the store.

pub use budgets::{Budget, BudgetDraft, BudgetPeriod};
pub use categories::CategorySet;
pub use error::EngineError;
pub use money::MoneyCents;
pub use transactions::{
    SearchMode, Transaction, TransactionDraft, TransactionFilter, TransactionKind,
};
pub use wallets::{Wallet, WalletDraft};

mod budgets;
mod categories;
mod error;
mod money;
pub mod session;
pub mod store;
mod transactions;
pub mod ui;
mod wallets;

use store::{Document, DocumentStore, collections};

type ResultEngine<T> = Result<T, EngineError>;

/// The in-memory mirror of one user namespace, plus its store handle.
///
/// The mirror lives for the duration of a session: it is built by
/// [`Engine::load`] after the session gate resolves an identity and dropped
/// on logout.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
    user_id: String,
    wallets: Vec<Wallet>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    categories: CategorySet,
}

impl<S: DocumentStore> Engine<S> {
    /// Fetches the user's collections and builds the mirror.
    ///
    /// The three flat collections are fetched sequentially, then the single
    /// category record is resolved; a brand-new namespace gets the default
    /// categories written before the engine is returned. Runs once per
    /// identity.
    pub async fn load(store: S, user_id: &str) -> ResultEngine<Self> {
        let wallets = Self::fetch(&store, user_id, collections::WALLETS).await?;
        let transactions = Self::fetch(&store, user_id, collections::TRANSACTIONS).await?;
        let budgets = Self::fetch(&store, user_id, collections::BUDGETS).await?;

        let mut documents = store.list_all(user_id, collections::CATEGORIES).await?;
        let categories = match documents.len() {
            0 => {
                let mut seeded = CategorySet::seeded();
                seeded.id = store
                    .create(user_id, collections::CATEGORIES, seeded.fields()?)
                    .await?;
                tracing::debug!(user = user_id, "seeded default categories");
                seeded
            }
            // The namespace holds a single category record; ignore any
            // stragglers beyond the first.
            _ => CategorySet::try_from(documents.swap_remove(0))?,
        };

        Ok(Self {
            store,
            user_id: user_id.to_string(),
            wallets,
            transactions,
            budgets,
            categories,
        })
    }

    async fn fetch<T>(store: &S, user_id: &str, collection: &str) -> ResultEngine<Vec<T>>
    where
        T: TryFrom<Document, Error = store::StoreError>,
    {
        let documents = store.list_all(user_id, collection).await?;
        let mut items = Vec::with_capacity(documents.len());
        for document in documents {
            items.push(T::try_from(document)?);
        }
        Ok(items)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Creates a transaction from form data and prepends it to the mirror
    /// (the list is newest-first by insertion, not by date).
    pub async fn add_transaction(&mut self, draft: TransactionDraft) -> ResultEngine<&Transaction> {
        let mut transaction = draft.build()?;
        transaction.id = self
            .store
            .create(&self.user_id, collections::TRANSACTIONS, transaction.fields()?)
            .await?;
        self.transactions.insert(0, transaction);
        Ok(&self.transactions[0])
    }

    /// Deletes a transaction. Idempotent: deleting an already-absent id is
    /// `Ok` and leaves the mirror unchanged.
    pub async fn delete_transaction(&mut self, id: &str) -> ResultEngine<()> {
        self.store
            .delete(&self.user_id, collections::TRANSACTIONS, id)
            .await?;
        self.transactions.retain(|transaction| transaction.id != id);
        Ok(())
    }

    pub async fn add_wallet(&mut self, draft: WalletDraft) -> ResultEngine<&Wallet> {
        let mut wallet = draft.build()?;
        wallet.id = self
            .store
            .create(&self.user_id, collections::WALLETS, wallet.fields()?)
            .await?;
        self.wallets.push(wallet);
        Ok(&self.wallets[self.wallets.len() - 1])
    }

    /// Deletes a wallet together with every transaction referencing it.
    ///
    /// Dependent transactions are deleted first, one remote delete each, and
    /// removed from the mirror as the store acknowledges. Store deletes are
    /// idempotent, so a failure mid-cascade leaves a retryable state: the
    /// wallet still exists and no surviving transaction references a deleted
    /// wallet.
    pub async fn delete_wallet(&mut self, wallet_id: &str) -> ResultEngine<()> {
        if !self.wallets.iter().any(|wallet| wallet.id == wallet_id) {
            return Err(EngineError::KeyNotFound(wallet_id.to_string()));
        }

        let dependent: Vec<String> = self
            .transactions
            .iter()
            .filter(|transaction| transaction.wallet_id == wallet_id)
            .map(|transaction| transaction.id.clone())
            .collect();

        for transaction_id in dependent {
            self.store
                .delete(&self.user_id, collections::TRANSACTIONS, &transaction_id)
                .await?;
            self.transactions
                .retain(|transaction| transaction.id != transaction_id);
        }

        self.store
            .delete(&self.user_id, collections::WALLETS, wallet_id)
            .await?;
        self.wallets.retain(|wallet| wallet.id != wallet_id);
        Ok(())
    }

    /// Adds a category name to the income or expense list.
    ///
    /// Read-modify-write of the single category record; two concurrent
    /// sessions editing it resolve last-writer-wins.
    pub async fn add_category(&mut self, name: &str, kind: TransactionKind) -> ResultEngine<()> {
        let mut updated = self.categories.clone();
        updated.add(name, kind)?;
        self.store
            .update(
                &self.user_id,
                collections::CATEGORIES,
                &updated.id,
                updated.fields()?,
            )
            .await?;
        self.categories = updated;
        Ok(())
    }

    /// Removes a category name. Removing an absent name is a no-op; existing
    /// transactions referencing the name are left alone.
    pub async fn delete_category(&mut self, name: &str, kind: TransactionKind) -> ResultEngine<()> {
        let mut updated = self.categories.clone();
        if !updated.remove(name, kind) {
            return Ok(());
        }
        self.store
            .update(
                &self.user_id,
                collections::CATEGORIES,
                &updated.id,
                updated.fields()?,
            )
            .await?;
        self.categories = updated;
        Ok(())
    }

    pub async fn add_budget(&mut self, draft: BudgetDraft) -> ResultEngine<&Budget> {
        let mut budget = draft.build()?;
        budget.id = self
            .store
            .create(&self.user_id, collections::BUDGETS, budget.fields()?)
            .await?;
        self.budgets.push(budget);
        Ok(&self.budgets[self.budgets.len() - 1])
    }

    /// Sum of income-transaction amounts.
    pub fn total_income(&self) -> MoneyCents {
        self.sum_by_kind(TransactionKind::Income)
    }

    /// Sum of expense-transaction amounts.
    pub fn total_expenses(&self) -> MoneyCents {
        self.sum_by_kind(TransactionKind::Expense)
    }

    fn sum_by_kind(&self, kind: TransactionKind) -> MoneyCents {
        self.transactions
            .iter()
            .filter(|transaction| transaction.kind == kind)
            .map(|transaction| transaction.amount)
            .sum()
    }

    /// Sum of stored wallet balances. Independent of transaction content:
    /// balances are maintained by the user, not derived.
    pub fn total_balance(&self) -> MoneyCents {
        self.wallets.iter().map(|wallet| wallet.balance).sum()
    }

    /// How much of a budget its matching expense transactions consume.
    pub fn budget_spent(&self, budget: &Budget) -> MoneyCents {
        self.transactions
            .iter()
            .filter(|transaction| {
                transaction.kind == TransactionKind::Expense
                    && transaction.category == budget.category
            })
            .map(|transaction| transaction.amount)
            .sum()
    }

    /// The transactions passing `filter`, in mirror order.
    ///
    /// Recomputed on every call; the owning wallet's name is resolved here so
    /// the free-text search can match on it.
    pub fn filtered_transactions(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|transaction| {
                let wallet_name = self
                    .wallets
                    .iter()
                    .find(|wallet| wallet.id == transaction.wallet_id)
                    .map(|wallet| wallet.name.as_str());
                filter.matches(transaction, wallet_name)
            })
            .collect()
    }
}
