/// Configuration for batch loading operations
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum number of keys bound into a single membership query
    pub max_batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 1000,
        }
    }
}

impl BatchConfig {
    /// Chunk size actually used for `dialect`, never above its bind limit and never zero
    pub fn effective_batch_size(&self, dialect: crate::backends::SqlDialect) -> usize {
        self.max_batch_size.clamp(1, dialect.max_bind_parameters())
    }
}
