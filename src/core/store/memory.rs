//! In-memory document storage.

use std::sync::Arc;

use parking_lot::Mutex;

use super::Store;
use crate::error::Result;

/// A document held in memory.
///
/// Clones share the same buffer, so a test can keep one handle to inspect
/// what a vault or roster wrote through another.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    contents: Arc<Mutex<Option<String>>>,
}

impl Memory {
    /// Empty store; reads return `None` until the first write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }

    /// Snapshot of the current contents.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl Store for Memory {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<()> {
        *self.contents.lock() = Some(contents.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
