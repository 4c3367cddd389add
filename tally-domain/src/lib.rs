//! tally-domain: the four record-keeping managers built on tally-core.
//!
//! Each manager owns its repositories, keeps any derived index in step with
//! them, and saves/loads through a [`tally_core::SnapshotStore`]. Verbs
//! return [`DomainError`] instead of printing; the CLI decides how to report.

pub mod error;
pub mod finance;
pub mod health;
pub mod inventory;
pub mod manager;
pub mod stock;
pub mod warehouse;

pub use error::{DomainError, DomainResult};
pub use finance::{FinanceManager, PaymentChannel, SavingsAccount, Transaction};
pub use health::{HealthManager, Patient, Prescription};
pub use inventory::{InventoryItem, InventoryManager};
pub use manager::FlushPolicy;
pub use stock::Stocked;
pub use warehouse::{ElectronicItem, GroceryItem, Section, StockLevel, WarehouseManager};
