//! The module contains `Wallet` struct and its implementation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    MoneyCents, ResultEngine,
    store::{Document, StoreError},
};

/// A wallet.
///
/// A wallet is a representation of a real wallet, a bank account or anything
/// else where money are kept. Its balance is a stored field maintained by the
/// user, never derived from transactions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Store-assigned document id.
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub balance: MoneyCents,
}

impl Wallet {
    /// Serializes the wallet into document fields (the id lives outside the
    /// field payload).
    pub fn fields(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl TryFrom<Document> for Wallet {
    type Error = StoreError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        let mut wallet: Wallet = serde_json::from_value(document.fields)?;
        wallet.id = document.id;
        Ok(wallet)
    }
}

/// User-typed wallet form data. The balance is parsed on build; nothing else
/// is validated.
#[derive(Clone, Debug)]
pub struct WalletDraft {
    pub name: String,
    pub balance: String,
}

impl WalletDraft {
    pub fn build(self) -> ResultEngine<Wallet> {
        Ok(Wallet {
            id: String::new(),
            name: self.name,
            balance: self.balance.parse()?,
        })
    }
}
