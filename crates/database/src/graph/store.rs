use crate::graph::types::WriteBatch;
use crate::kuzu::types::DatabaseError;

/// Destination of the loader's write batches.
///
/// Every batch is applied atomically: either all of its operations take
/// effect or none do. Batches are applied in the order they are submitted,
/// and a later batch may reference nodes written by an earlier one.
pub trait GraphStore {
    fn execute_batch(&mut self, batch: &WriteBatch) -> Result<(), DatabaseError>;
}
