//! `tally inventory` — free-form item log.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tabled::Tabled;

use tally_domain::{InventoryItem, InventoryManager};

use super::{done, print_json, print_table};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum InventoryCommand {
    /// Show every logged item.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Log a new item, dated now.
    Add(ItemArgs),

    /// Rename and restock an existing item.
    Update(ItemArgs),

    /// Delete an item.
    Delete { id: u32 },
}

#[derive(Args, Debug)]
pub struct ItemArgs {
    pub id: u32,
    pub name: String,
    #[arg(allow_negative_numbers = true)]
    pub quantity: i32,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "id")]
    id: u32,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "quantity")]
    quantity: i32,
    #[tabled(rename = "added")]
    added: String,
}

pub fn run(command: InventoryCommand, config: &Config) -> Result<()> {
    let mut manager = InventoryManager::new(config.store()?);
    manager.load().context("failed to load inventory")?;

    let changed = match command {
        InventoryCommand::List { json } => {
            let items: Vec<&InventoryItem> = manager.items().iter().collect();
            if json {
                print_json(&items)?;
            } else {
                let rows = items
                    .into_iter()
                    .map(|item| ItemRow {
                        id: item.id,
                        name: item.name.clone(),
                        quantity: item.quantity,
                        added: item.date_added.format("%Y-%m-%d").to_string(),
                    })
                    .collect();
                print_table(rows, "Inventory is empty.");
            }
            false
        }
        InventoryCommand::Add(args) => {
            let item = manager.add_item(args.id, args.name, args.quantity)?;
            done(format!(
                "Added #{} ({}) x{}",
                item.id, item.name, item.quantity
            ));
            true
        }
        InventoryCommand::Update(args) => {
            let item = manager.update_item(args.id, args.name, args.quantity)?;
            done(format!(
                "Updated #{} ({}) x{}",
                item.id, item.name, item.quantity
            ));
            true
        }
        InventoryCommand::Delete { id } => {
            let item = manager.delete_item(id)?;
            done(format!("Deleted #{} ({})", item.id, item.name));
            true
        }
    };

    if changed {
        manager.save().context("failed to save inventory")?;
    }
    Ok(())
}
