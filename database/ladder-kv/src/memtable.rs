//! A LevelDB-style memtable on top of the skip list
//!
//! Keys are unique here: `put` on an existing key replaces its value in place.
//!

use anyhow::Result;
use bytes::Bytes;
use tracing::trace;

use crate::options::Options;
use crate::skiplist::SkipList;
use crate::{Storage, StorageError};

#[derive(Debug)]
pub struct MemTable {
    list: SkipList<Bytes, Bytes>,
    approximate_size: usize,
}

impl MemTable {
    pub fn new(options: Options) -> MemTable {
        MemTable {
            list: SkipList::with_options(options),
            approximate_size: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Bytes of keys and values currently held.
    pub fn approximate_size(&self) -> usize {
        self.approximate_size
    }
}

impl Default for MemTable {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Storage for MemTable {
    fn put(&mut self, key: Bytes, value: Bytes) -> Result<()> {
        if let Some(old) = self.list.get_mut(&key) {
            self.approximate_size = self.approximate_size - old.len() + value.len();
            *old = value;
            return Ok(());
        }
        self.approximate_size += key.len() + value.len();
        trace!(key_len = key.len(), size = self.approximate_size, "memtable put");
        self.list.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: Bytes) -> Result<()> {
        let value = self.list.remove(&key).ok_or(StorageError::DeleteFailed)?;
        self.approximate_size -= key.len() + value.len();
        Ok(())
    }

    fn get(&self, key: Bytes) -> Result<Option<Bytes>> {
        Ok(self.list.get(&key).cloned())
    }
}
