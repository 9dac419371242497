//! Check lifecycle.
//!
//! A check is issued once and then either cleared or voided:
//! - Issued → Cleared (clear)
//! - Issued → Voided (void)
//!
//! Every transition posts or adjusts a ledger movement; this module decides
//! which ones, the database layer writes them.

pub mod lifecycle;
pub mod types;

pub use lifecycle::CheckLifecycle;
pub use types::{CheckRecord, CheckStatus, IssueCheckInput};
