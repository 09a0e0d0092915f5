/// Core functionality modules
///
/// Contains the task bookkeeping: validated writes and filtered reads.

pub mod recorder;
pub mod retriever;

pub use recorder::{parse_due_date, Recorder};
pub use retriever::Retriever;
