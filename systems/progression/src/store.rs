use alien_maze_core::{BestTimeStore, StoreError};

/// Best-time store kept in memory for the lifetime of the process.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryBestTimeStore {
    best: Option<f64>,
    saves: usize,
}

impl MemoryBestTimeStore {
    /// Creates a store that already holds a best time.
    #[must_use]
    pub const fn with_best(seconds: f64) -> Self {
        Self {
            best: Some(seconds),
            saves: 0,
        }
    }

    /// Value currently stored.
    #[must_use]
    pub const fn best(&self) -> Option<f64> {
        self.best
    }

    /// Number of writes received.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl BestTimeStore for MemoryBestTimeStore {
    fn load(&self) -> Result<Option<f64>, StoreError> {
        Ok(self.best)
    }

    fn save(&mut self, seconds: f64) -> Result<(), StoreError> {
        self.best = Some(seconds);
        self.saves += 1;
        Ok(())
    }
}
