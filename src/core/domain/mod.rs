//! Domain types.

mod fingerprint;
mod report;
mod stage;

pub use fingerprint::Fingerprint;
pub use report::{BulkReport, Enrollment, Freshness};
pub use stage::Stage;
