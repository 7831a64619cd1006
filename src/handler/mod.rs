//! Handlers receive finished records and push their rendering into a sink.
//!
//! Implement `Handler` to add a backend; the router stores handlers as
//! `Arc<dyn Handler>` and may share one instance across many channels.

mod collector;
mod file;
pub mod row;
mod stream;

pub use collector::CollectorHandler;
pub use file::FileHandler;
pub use row::{JsonlRowSink, LogRow, RowHandler, RowSink};
pub use stream::{StreamHandler, StreamTarget};

use crate::Error;
use crate::level::Level;
use crate::record::Record;

/// `Send + Sync` so one handler instance can serve every channel it is attached to.
pub trait Handler: Send + Sync {
    /// Renders and writes one record.
    ///
    /// # Errors
    /// Sink failures (I/O, serialization). The logger reports them and keeps
    /// dispatching to the remaining handlers.
    fn handle(&self, record: &Record) -> Result<(), Error>;

    /// Writes several records. The default calls `handle` for each record this
    /// handler accepts, stopping at the first error.
    ///
    /// # Errors
    /// The first sink failure.
    fn handle_batch(&self, records: &[Record]) -> Result<(), Error> {
        for record in records.iter().filter(|r| self.is_handling(r.level())) {
            self.handle(record)?;
        }
        Ok(())
    }

    /// Whether records of `level` are accepted at all.
    fn is_handling(&self, _level: Level) -> bool {
        true
    }

    /// # Errors
    /// I/O errors from the underlying sink.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Releases held resources. A closed handler may be written to again and
    /// reacquires what it needs.
    ///
    /// # Errors
    /// I/O errors while flushing the sink.
    fn close(&self) -> Result<(), Error> {
        self.flush()
    }

    /// Label used in diagnostics and configuration errors.
    fn name(&self) -> &str;
}
