//! `tally warehouse` — electronics and grocery stock.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tally_domain::{ElectronicItem, GroceryItem, Section, WarehouseManager};

use super::{done, print_json, print_table};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum WarehouseCommand {
    /// Add the sample stock (Laptop, Smartphone, Rice, Milk).
    Seed,

    /// Show current stock.
    List(ListArgs),

    /// Add an electronic item.
    AddElectronic(AddElectronicArgs),

    /// Add a grocery item.
    AddGrocery(AddGroceryArgs),

    /// Increase the stock of an item by a positive amount.
    Increase(ChangeArgs),

    /// Set the stock of an item to an exact, non-negative quantity.
    Set(ChangeArgs),

    /// Remove an item.
    Remove(TargetArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show one section: electronics | groceries.
    #[arg(long)]
    pub section: Option<Section>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddElectronicArgs {
    pub id: u32,
    pub name: String,
    #[arg(allow_negative_numbers = true)]
    pub quantity: i32,

    #[arg(long)]
    pub brand: String,

    #[arg(long, default_value_t = 12)]
    pub warranty_months: u32,
}

#[derive(Args, Debug)]
pub struct AddGroceryArgs {
    pub id: u32,
    pub name: String,
    #[arg(allow_negative_numbers = true)]
    pub quantity: i32,

    /// Expiry date, YYYY-MM-DD.
    #[arg(long, value_name = "DATE")]
    pub expires: NaiveDate,
}

#[derive(Args, Debug)]
pub struct ChangeArgs {
    /// electronics | groceries
    pub section: Section,
    pub id: u32,
    #[arg(allow_negative_numbers = true)]
    pub amount: i32,
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// electronics | groceries
    pub section: Section,
    pub id: u32,
}

pub fn run(command: WarehouseCommand, config: &Config) -> Result<()> {
    let mut manager = WarehouseManager::new(config.store()?);
    manager.load().context("failed to load warehouse records")?;

    let changed = match command {
        WarehouseCommand::Seed => {
            manager.seed()?;
            done("Seeded warehouse with sample stock");
            true
        }
        WarehouseCommand::List(args) => {
            list(&manager, args)?;
            false
        }
        WarehouseCommand::AddElectronic(args) => {
            let name = args.name.clone();
            manager.add_electronic(ElectronicItem::new(
                args.id,
                args.name,
                args.quantity,
                args.brand,
                args.warranty_months,
            ))?;
            done(format!("Added electronics #{} ({name})", args.id));
            true
        }
        WarehouseCommand::AddGrocery(args) => {
            let name = args.name.clone();
            manager.add_grocery(GroceryItem::new(
                args.id,
                args.name,
                args.quantity,
                args.expires,
            ))?;
            done(format!("Added groceries #{} ({name})", args.id));
            true
        }
        WarehouseCommand::Increase(args) => {
            let level = manager.increase_stock(args.section, args.id, args.amount)?;
            done(format!(
                "Increased {} #{} ({}) to {}",
                level.section, level.id, level.name, level.quantity
            ));
            true
        }
        WarehouseCommand::Set(args) => {
            let level = manager.update_quantity(args.section, args.id, args.amount)?;
            done(format!(
                "Set {} #{} ({}) to {}",
                level.section, level.id, level.name, level.quantity
            ));
            true
        }
        WarehouseCommand::Remove(args) => {
            let level = manager.remove_item(args.section, args.id)?;
            done(format!(
                "Removed {} #{} ({})",
                level.section, level.id, level.name
            ));
            true
        }
    };

    if changed {
        manager.save().context("failed to save warehouse records")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct StockJson<'a> {
    electronics: Vec<&'a ElectronicItem>,
    groceries: Vec<&'a GroceryItem>,
}

#[derive(Tabled)]
struct StockRow {
    #[tabled(rename = "section")]
    section: String,
    #[tabled(rename = "id")]
    id: u32,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "quantity")]
    quantity: i32,
    #[tabled(rename = "detail")]
    detail: String,
}

fn list<S: tally_core::Storage>(manager: &WarehouseManager<S>, args: ListArgs) -> Result<()> {
    let show = |section: Section| args.section.map_or(true, |only| only == section);

    let electronics: Vec<&ElectronicItem> = if show(Section::Electronics) {
        manager.electronics().iter().collect()
    } else {
        Vec::new()
    };
    let groceries: Vec<&GroceryItem> = if show(Section::Groceries) {
        manager.groceries().iter().collect()
    } else {
        Vec::new()
    };

    if args.json {
        return print_json(&StockJson {
            electronics,
            groceries,
        });
    }

    let rows = electronics
        .into_iter()
        .map(|item| StockRow {
            section: Section::Electronics.to_string(),
            id: item.id,
            name: item.name.clone(),
            quantity: item.quantity,
            detail: format!("{}, {} months warranty", item.brand, item.warranty_months),
        })
        .chain(groceries.into_iter().map(|item| StockRow {
            section: Section::Groceries.to_string(),
            id: item.id,
            name: item.name.clone(),
            quantity: item.quantity,
            detail: format!("expires {}", item.expiry_date),
        }))
        .collect();
    print_table(rows, "No stock recorded.");
    Ok(())
}
