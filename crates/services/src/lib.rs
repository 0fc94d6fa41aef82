//! Orchestration services for Kitabu.
//!
//! Each service is a stateless facade over the shared document store:
//! it validates with the pure core logic, then applies every
//! multi-document mutation inside one optimistic store transaction.
//! Services hold the store behind an `Arc` and are cheap to clone per
//! request.
//!
//! Balance mutation is routed exclusively through the ledger service;
//! the domain services (sales, purchasing, expenses, wallet, assets)
//! compose it with the governance engine and the sequence issuer.

pub mod admin;
pub mod approval;
pub mod assets;
pub mod budget;
pub mod expenses;
pub mod hr;
pub mod inventory;
pub mod ledger;
pub mod payroll;
pub mod purchasing;
pub mod sales;
pub mod sequence;
pub mod wallet;

pub use admin::AdminService;
pub use approval::{ApprovalOutcome, ApprovalService};
pub use assets::AssetService;
pub use budget::BudgetService;
pub use expenses::ExpenseService;
pub use hr::HrService;
pub use inventory::InventoryService;
pub use ledger::LedgerService;
pub use payroll::PayrollService;
pub use purchasing::PurchasingService;
pub use sales::SalesService;
pub use sequence::SequenceService;
pub use wallet::WalletService;
