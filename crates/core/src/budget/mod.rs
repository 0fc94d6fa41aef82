//! Budget allocation variance analysis.

pub mod types;
pub mod variance;

pub use types::{AllocationVariance, BudgetAllocation};
pub use variance::{allocation_variance, signed_actual_delta};
