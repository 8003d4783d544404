//! An ordered key/value store built on a skip list.
//!
//! [`SkipList`] is the core: an ordered multimap with randomized express
//! levels, node handles, and predecessor-based deletion. [`MemTable`] adapts
//! it to the [`Storage`] interface with unique keys.

use anyhow::Result;
use bytes::Bytes;
use thiserror::Error;

mod arena;
pub mod error;
pub mod level;
pub mod memtable;
pub mod node;
pub mod options;
pub mod skiplist;
mod validate;

pub use error::SkipListError;
pub use level::{GeometricLevels, LevelGenerator};
pub use memtable::MemTable;
pub use node::{Node, NodeId};
pub use options::{Options, DEFAULT_LEVELS, DEFAULT_PROBABILITY};
pub use skiplist::SkipList;

pub trait Storage {
    fn put(&mut self, key: Bytes, value: Bytes) -> Result<()>;
    fn delete(&mut self, key: Bytes) -> Result<()>;
    fn get(&self, key: Bytes) -> Result<Option<Bytes>>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("delete failed")]
    DeleteFailed,
}
