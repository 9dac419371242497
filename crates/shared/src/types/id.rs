//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `CheckId` where a `PaymentId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
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

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
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

typed_id!(BankId, "Unique identifier for a bank.");
typed_id!(AccountTypeId, "Unique identifier for an account type.");
typed_id!(CurrencyId, "Unique identifier for a currency.");
typed_id!(AccountId, "Unique identifier for a bank account.");
typed_id!(MovementId, "Unique identifier for a ledger movement.");
typed_id!(
    CorrelationId,
    "Identifier shared by every movement of one multi-leg operation."
);
typed_id!(CheckId, "Unique identifier for a check.");
typed_id!(CheckTypeId, "Unique identifier for a check type.");
typed_id!(SupplierId, "Unique identifier for a supplier.");
typed_id!(InvoiceId, "Unique identifier for a purchase invoice.");
typed_id!(PaymentId, "Unique identifier for a supplier payment.");
typed_id!(ReconciliationId, "Unique identifier for a bank reconciliation.");
