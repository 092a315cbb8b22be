//! Metadata ledger for levelhub.
//!
//! Tracks, per level, how many times it has been fetched and when it was
//! first seen. The whole mapping lives in memory behind one mutex and is
//! rewritten to disk as a complete JSON snapshot after every mutation; there
//! is no append log and nothing to replay.
//!
//! The snapshot format is a JSON object of `id -> [view_count, created_at]`:
//!
//! ```json
//! {"Castle-Bob":[3,1700000000],"Tower-Alice":[0,1700000500]}
//! ```

pub mod clock;
pub mod entry;
pub mod error;
pub mod ledger;
mod snapshot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::LedgerEntry;
pub use error::{LedgerError, LedgerResult};
pub use ledger::MetadataLedger;
