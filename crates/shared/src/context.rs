//! Tenant context supplied by the session layer.
//!
//! Authentication happens outside this core; every call receives an
//! already-resolved institution and acting user. No cross-tenant
//! reference is representable because every store key embeds the
//! institution id from this context.

use serde::{Deserialize, Serialize};

use crate::types::{InstitutionId, UserId};

/// Identity of the tenant and acting user for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantCtx {
    /// The tenant institution every read/write is partitioned under.
    pub institution_id: InstitutionId,
    /// The authenticated user performing the action.
    pub user_id: UserId,
}

impl TenantCtx {
    /// Creates a new tenant context.
    #[must_use]
    pub const fn new(institution_id: InstitutionId, user_id: UserId) -> Self {
        Self {
            institution_id,
            user_id,
        }
    }
}
