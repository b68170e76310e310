//! Service layer - pipeline stages and their orchestration
//!
//! Each stage is a small, synchronous unit. `import` strings them together
//! over a batch of sources; `assemble` turns the resulting documents into
//! a return document.

pub mod assemble;
pub mod dedup;
pub mod group;
pub mod header;
pub mod import;
pub mod normalize;
pub mod remediation;
pub mod validate;

pub use assemble::{natural_cmp, ReturnAssembler};
pub use dedup::DuplicateTracker;
pub use group::{DocumentGrouper, Fold};
pub use header::{HeaderDetection, HeaderResolver};
pub use import::{FileOutcome, ImportOutcome, ImportService, ImportSummary};
pub use normalize::RowNormalizer;
pub use remediation::{PendingRow, Promotion, RemediationQueue};
pub use validate::RowValidator;
