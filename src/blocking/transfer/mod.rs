#[doc(hidden)]
pub mod full;
#[doc(hidden)]
pub mod index;
mod progress;
mod runner;

pub use full::CollectionCopy;
pub use index::{rewrite_namespace, sync_indexes};
pub use progress::{progress_step, ConsoleReporter, Progress, Reporter};
pub use runner::{Direction, Transfer, TransferPlan, TransferState, TransferSummary};
