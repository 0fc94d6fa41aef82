//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `EmployeeId` where an
//! `AccountId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(InstitutionId, "Unique identifier for a tenant institution.");
typed_id!(UserId, "Unique identifier for an acting user.");
typed_id!(
    AccountId,
    "Unique identifier for a chart of accounts entry."
);
typed_id!(JournalEntryId, "Unique identifier for a journal entry.");
typed_id!(FiscalPeriodId, "Unique identifier for a fiscal period.");
typed_id!(
    ApprovalWorkflowId,
    "Unique identifier for an approval workflow policy."
);
typed_id!(
    ApprovalRequestId,
    "Unique identifier for an approval request."
);
typed_id!(EmployeeId, "Unique identifier for an employee.");
typed_id!(
    ComponentId,
    "Unique identifier for a recurring pay component."
);
typed_id!(LoanId, "Unique identifier for an employee loan.");
typed_id!(PayrollRunId, "Unique identifier for a payroll run.");
typed_id!(PayslipId, "Unique identifier for a payslip.");
typed_id!(ProductId, "Unique identifier for a product.");
typed_id!(BatchId, "Unique identifier for a stock batch.");
typed_id!(StockMovementId, "Unique identifier for a stock movement.");
typed_id!(InvoiceId, "Unique identifier for a sales invoice.");
typed_id!(PurchaseOrderId, "Unique identifier for a purchase order.");
typed_id!(
    RequisitionId,
    "Unique identifier for an expense requisition."
);
typed_id!(WalletId, "Unique identifier for a customer wallet.");
typed_id!(AssetId, "Unique identifier for a fixed asset.");
