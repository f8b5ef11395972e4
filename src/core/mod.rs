pub mod buffer;
pub mod engine;
pub mod filters;
pub mod queue;
pub mod wire;

use std::fmt;

/// Filter applied by the worker pool, selected per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Photographic negative: every sample maps to `255 - s`.
    Negative,
    /// Intensity slice: samples at or beyond either threshold saturate to
    /// white, samples strictly between `t1` and `t2` pass through.
    Slice { t1: u8, t2: u8 },
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Negative => write!(f, "negative"),
            FilterMode::Slice { t1, t2 } => write!(f, "slice(t1={}, t2={})", t1, t2),
        }
    }
}
