/// Resource limits applied while loading trees and accepting answers
///
/// Generous enough for any hand-authored questionnaire while keeping
/// hostile input (huge files, huge answers, runaway depth) bounded.
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum tree source size in bytes
    /// Real usage: ~10KB, Limit: 5MB
    pub max_file_size_bytes: usize,

    /// Maximum size of a submitted answer value in bytes
    /// Real usage: ~40 bytes, Limit: 1KB
    pub max_answer_bytes: usize,

    /// Maximum number of answers on any root-to-recommendation path
    /// Real usage: ~4, Limit: 32
    pub max_tree_depth: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024, // 5 MB
            max_answer_bytes: 1024,               // 1 KB
            max_tree_depth: 32,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }
}
