//! Entity store: the key-value backend seam and the typed repository.

mod backend;
mod repository;

pub use backend::{KvBackend, MemoryBackend};
pub use repository::{keys, EntityRepository, WriteBatch};
