//! Shared corpus handle with snapshot swapping

use crate::QuoteStore;
use std::sync::{Arc, RwLock};
use tracing::info;

/// A corpus that can be replaced while readers hold the previous version
///
/// Readers take an `Arc<C>` snapshot and keep using it for as long as they
/// like. [`SharedCorpus::replace`] swaps in a fully built corpus; no reader
/// ever sees one in the middle of loading.
#[derive(Debug)]
pub struct SharedCorpus<C = QuoteStore> {
    current: Arc<RwLock<Arc<C>>>,
}

// Manual impl: cloning the handle must not require `C: Clone`
impl<C> Clone for SharedCorpus<C> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}

impl<C> SharedCorpus<C> {
    /// Wrap an initial corpus
    pub fn new(corpus: C) -> Self {
        Self::from_arc(Arc::new(corpus))
    }

    /// Wrap an already shared corpus
    pub fn from_arc(corpus: Arc<C>) -> Self {
        Self {
            current: Arc::new(RwLock::new(corpus)),
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<C> {
        // A poisoned lock still guards a complete Arc
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Swap in a new corpus and return the previous snapshot
    pub fn replace(&self, corpus: C) -> Arc<C> {
        let next = Arc::new(corpus);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        info!("Replacing corpus snapshot");
        std::mem::replace(&mut *guard, next)
    }
}
