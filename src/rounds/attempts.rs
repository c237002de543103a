use std::collections::HashMap;

/// Per-level attempt history for one session.
#[derive(Debug, Clone, Default)]
pub struct AttemptCounter {
    counts: HashMap<u32, u32>,
}

impl AttemptCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the 1-based number of the attempt being started at `level` and
    /// records it. Failed rounds count too, so a retry is attempt 2, 3, ...
    pub fn next(&mut self, level: u32) -> u32 {
        let count = self.counts.entry(level).or_insert(0);
        *count += 1;
        *count
    }

    pub fn attempts_at(&self, level: u32) -> u32 {
        self.counts.get(&level).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
