//! `tally finance` — savings account and categorized transactions.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use tally_domain::{FinanceManager, PaymentChannel, SavingsAccount, Transaction};

use super::{done, print_json, print_table};
use crate::config::Config;

/// Account used until one has been seeded or saved.
const DEFAULT_ACCOUNT: &str = "ACC123456";

#[derive(Subcommand, Debug)]
pub enum FinanceCommand {
    /// Open the sample account and record the sample transactions.
    Seed,

    /// Record a transaction dated now and debit the account.
    Record(RecordArgs),

    /// Show the account balance.
    Account {
        #[arg(long)]
        json: bool,
    },

    /// List transactions, optionally for one category (newest first).
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    pub id: u32,
    #[arg(allow_negative_numbers = true)]
    pub amount: Decimal,
    pub category: String,

    /// bank | mobile | crypto
    #[arg(long, default_value = "bank")]
    pub channel: PaymentChannel,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "id")]
    id: u32,
    #[tabled(rename = "date")]
    date: String,
    #[tabled(rename = "category")]
    category: String,
    #[tabled(rename = "channel")]
    channel: String,
    #[tabled(rename = "amount")]
    amount: Decimal,
}

#[derive(Serialize)]
struct AccountJson<'a> {
    number: &'a str,
    balance: Decimal,
    transactions: usize,
}

pub fn run(command: FinanceCommand, config: &Config) -> Result<()> {
    let mut manager = FinanceManager::new(
        config.store()?,
        SavingsAccount::new(DEFAULT_ACCOUNT, Decimal::ZERO),
    );
    manager.load().context("failed to load finance records")?;

    let changed = match command {
        FinanceCommand::Seed => {
            manager.seed()?;
            done(format!(
                "Seeded account {} (balance {})",
                manager.account().number,
                manager.account().balance
            ));
            true
        }
        FinanceCommand::Record(args) => {
            let channel = args.channel;
            let account = manager.record(Transaction::new(
                args.id,
                Utc::now(),
                args.amount,
                args.category,
                channel,
            ))?;
            done(format!(
                "Recorded {} via {channel}; balance {}",
                args.amount, account.balance
            ));
            true
        }
        FinanceCommand::Account { json } => {
            let account = manager.account();
            if json {
                print_json(&AccountJson {
                    number: &account.number,
                    balance: account.balance,
                    transactions: manager.transactions().len(),
                })?;
            } else {
                println!("Account {}: balance {}", account.number, account.balance);
            }
            false
        }
        FinanceCommand::List(args) => {
            list(&manager, args)?;
            false
        }
    };

    if changed {
        manager.save().context("failed to save finance records")?;
    }
    Ok(())
}

fn list<S: tally_core::Storage>(manager: &FinanceManager<S>, args: ListArgs) -> Result<()> {
    let transactions: Vec<&Transaction> = match args.category.as_deref() {
        Some(category) => manager
            .by_category(category)
            .unwrap_or_default()
            .iter()
            .collect(),
        None => manager.transactions().iter().collect(),
    };
    if args.json {
        return print_json(&transactions);
    }

    let rows = transactions
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.format("%Y-%m-%d %H:%M").to_string(),
            category: t.category.clone(),
            channel: t.channel.to_string(),
            amount: t.amount,
        })
        .collect();
    print_table(rows, "No transactions recorded.");
    Ok(())
}
