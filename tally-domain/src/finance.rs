//! Transactions against a savings account, grouped by category.
//!
//! Amounts are [`Decimal`] end to end; snapshots store them as text so no
//! precision is lost on a save/load round trip.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::{Entity, GroupIndex, RepoError, Repository, SnapshotStore, SortOrder, Storage};

use crate::error::{DomainError, DomainResult};
use crate::manager::{doc_name, load_repo, save_repo, FlushPolicy};

pub const TRANSACTIONS_DOC: &str = "transactions";
pub const ACCOUNT_DOC: &str = "account";

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentChannel {
    #[default]
    BankTransfer,
    MobileMoney,
    CryptoWallet,
}

impl fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentChannel::BankTransfer => write!(f, "Bank Transfer"),
            PaymentChannel::MobileMoney => write!(f, "Mobile Money"),
            PaymentChannel::CryptoWallet => write!(f, "Crypto Wallet"),
        }
    }
}

impl FromStr for PaymentChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "bank" | "bank_transfer" => Ok(PaymentChannel::BankTransfer),
            "mobile" | "mobile_money" => Ok(PaymentChannel::MobileMoney),
            "crypto" | "crypto_wallet" => Ok(PaymentChannel::CryptoWallet),
            other => Err(format!(
                "unknown channel '{other}'; expected: bank, mobile, crypto"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u32,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub channel: PaymentChannel,
}

impl Transaction {
    pub fn new(
        id: u32,
        date: DateTime<Utc>,
        amount: Decimal,
        category: impl Into<String>,
        channel: PaymentChannel,
    ) -> Self {
        Self {
            id,
            date,
            amount,
            category: category.into(),
            channel,
        }
    }

    fn validate(&self) -> Result<(), RepoError> {
        if self.amount <= Decimal::ZERO {
            return Err(RepoError::invalid(
                Self::KIND,
                format!("amount must be positive (got {})", self.amount),
            ));
        }
        if self.category.trim().is_empty() {
            return Err(RepoError::invalid(Self::KIND, "category cannot be empty"));
        }
        Ok(())
    }
}

impl Entity for Transaction {
    type Id = u32;
    const KIND: &'static str = "transaction";

    fn id(&self) -> u32 {
        self.id
    }
}

/// Account that refuses any debit larger than its balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsAccount {
    pub number: String,
    pub balance: Decimal,
}

impl SavingsAccount {
    pub fn new(number: impl Into<String>, balance: Decimal) -> Self {
        Self {
            number: number.into(),
            balance,
        }
    }

    /// The account after debiting `transaction`.
    pub fn apply(&self, transaction: &Transaction) -> DomainResult<SavingsAccount> {
        if transaction.amount > self.balance {
            return Err(DomainError::InsufficientFunds {
                balance: self.balance,
                requested: transaction.amount,
            });
        }
        Ok(Self {
            balance: self.balance - transaction.amount,
            ..self.clone()
        })
    }
}

/// Transaction log, category index and the account they are applied to.
#[derive(Debug)]
pub struct FinanceManager<S> {
    account: SavingsAccount,
    transactions: Repository<Transaction>,
    by_category: GroupIndex<String, Transaction>,
    store: SnapshotStore<S>,
    flush: FlushPolicy,
}

impl<S: Storage> FinanceManager<S> {
    pub fn new(store: SnapshotStore<S>, account: SavingsAccount) -> Self {
        Self {
            account,
            transactions: Repository::new(),
            by_category: GroupIndex::new(),
            store,
            flush: FlushPolicy::default(),
        }
    }

    pub fn with_flush(mut self, flush: FlushPolicy) -> Self {
        self.flush = flush;
        self
    }

    /// Open `ACC123456` with 1000 and record the three sample transactions.
    pub fn seed_at(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.transactions.is_empty() {
            return Err(RepoError::duplicate(Transaction::KIND, 1).into());
        }
        self.account = SavingsAccount::new("ACC123456", Decimal::new(1000, 0));
        for (id, amount, category, channel) in [
            (1, 200, "Groceries", PaymentChannel::MobileMoney),
            (2, 150, "Utilities", PaymentChannel::BankTransfer),
            (3, 500, "Entertainment", PaymentChannel::CryptoWallet),
        ] {
            self.record(Transaction::new(
                id,
                now,
                Decimal::new(amount, 0),
                category,
                channel,
            ))?;
        }
        tracing::info!(balance = %self.account.balance, "finance seeded");
        Ok(())
    }

    pub fn seed(&mut self) -> DomainResult<()> {
        self.seed_at(Utc::now())
    }

    /// Validate, debit the account, store the transaction and refresh the
    /// category index. Any failure leaves the balance unchanged.
    pub fn record(&mut self, transaction: Transaction) -> DomainResult<&SavingsAccount> {
        transaction.validate()?;
        if self.transactions.contains(transaction.id) {
            return Err(RepoError::duplicate(Transaction::KIND, transaction.id).into());
        }
        let debited = self.account.apply(&transaction)?;
        tracing::info!(
            id = transaction.id,
            amount = %transaction.amount,
            channel = %transaction.channel,
            "transaction processed"
        );
        self.transactions.add(transaction)?;
        self.account = debited;
        self.rebuild_index();
        self.after_change()?;
        Ok(&self.account)
    }

    /// Transactions in `category`, newest first.
    pub fn by_category(&self, category: &str) -> Option<&[Transaction]> {
        self.by_category.lookup(&category.to_string())
    }

    pub fn categories(&self) -> Vec<&str> {
        self.by_category.keys().map(String::as_str).collect()
    }

    pub fn rebuild_index(&mut self) {
        self.by_category.rebuild(
            &self.transactions.all(),
            |t| t.category.clone(),
            |t| t.date,
            SortOrder::Descending,
        );
    }

    pub fn account(&self) -> &SavingsAccount {
        &self.account
    }

    pub fn transactions(&self) -> &Repository<Transaction> {
        &self.transactions
    }

    pub fn save(&self) -> DomainResult<()> {
        save_repo(&self.store, TRANSACTIONS_DOC, &self.transactions)?;
        self.store
            .save_value(&doc_name(&self.store, ACCOUNT_DOC), &self.account)?;
        Ok(())
    }

    /// Replace the transaction log and account with their saved snapshots.
    /// A missing account document keeps the current account.
    ///
    /// Both documents are read before either is applied; on error the
    /// manager is unchanged.
    pub fn load(&mut self) -> DomainResult<()> {
        let mut transactions = Repository::new();
        load_repo(&self.store, TRANSACTIONS_DOC, &mut transactions)?;
        let account = self
            .store
            .load_value::<SavingsAccount>(&doc_name(&self.store, ACCOUNT_DOC))?;

        self.transactions = transactions;
        if let Some(account) = account {
            self.account = account;
        }
        self.rebuild_index();
        Ok(())
    }

    fn after_change(&self) -> DomainResult<()> {
        match self.flush {
            FlushPolicy::Manual => Ok(()),
            FlushPolicy::EveryChange => self.save(),
        }
    }
}
