//! Progress values of a collection copy, and the observer which displays them.
use std::io::Write;

/// updates are emitted roughly every 1/1000 of a percent of a collection.
const STEPS_PER_COLLECTION: u64 = 100_000;

/// How many documents to copy between two progress reports, never less than 1.
///
/// # Example
/// ```
/// use mongo_transfer::blocking::transfer::progress_step;
/// assert_eq!(progress_step(0), 1);
/// assert_eq!(progress_step(99_999), 1);
/// assert_eq!(progress_step(2_500_000), 25);
/// ```
pub fn progress_step(total: u64) -> u64 {
    (total / STEPS_PER_COLLECTION).max(1)
}

/// Copy progress of one collection, after one more document is copied.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    collection: String,
    copied: u64,
    total: u64,
    step: u64,
}

impl Progress {
    pub(crate) fn new(collection: &str, copied: u64, total: u64, step: u64) -> Self {
        Progress {
            collection: collection.to_string(),
            copied,
            total,
            step,
        }
    }

    /// collection being copied.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// documents copied so far.
    pub fn copied(&self) -> u64 {
        self.copied
    }

    /// estimated document count, read once before copying.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Copied percentage against the estimated total.
    ///
    /// The total is an estimate on a possibly live source, so this can exceed 100.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.copied as f64 / self.total as f64 * 100.0
    }

    /// whether this progress falls on a report point.
    pub fn should_report(&self) -> bool {
        self.copied % self.step == 0
    }
}

/// Observer of a running transfer, it never affects control flow.
pub trait Reporter {
    /// called on every report point of a collection copy.
    fn progress(&mut self, progress: &Progress);

    /// called after all documents of `collection` are copied.
    fn collection_done(&mut self, collection: &str, copied: u64);

    /// called before index records are copied.
    fn indexes_started(&mut self);

    /// called after `count` index records are copied.
    fn indexes_done(&mut self, count: usize);
}

/// Writes human readable progress lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    fn display(&self, message: &str) {
        let mut out = std::io::stdout();
        // display is best effort, a closed stdout must not abort a transfer.
        let _ = out.write_all(message.as_bytes());
        let _ = out.flush();
    }
}

impl Reporter for ConsoleReporter {
    fn progress(&mut self, progress: &Progress) {
        self.display(&format!(
            "\rSyncing {}: {} of {} ({:.2}%)... ",
            progress.collection(),
            progress.copied(),
            progress.total(),
            progress.percentage()
        ));
    }

    fn collection_done(&mut self, _collection: &str, _copied: u64) {
        self.display("\n done\n");
    }

    fn indexes_started(&mut self) {
        self.display("Syncing indexes...");
    }

    fn indexes_done(&mut self, _count: usize) {
        self.display(" done\n");
    }
}
