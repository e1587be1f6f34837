//! Market context for flow state readings.

pub mod relative_strength;

// Re-export commonly used types for convenience
pub use relative_strength::{
    analyze_relative_strength, format_relative_strength, narrative_boundary_hint, total_return,
    BenchmarkComparison, RelativeStrength, SIGNIFICANT_DIVERGENCE_PCT, SIGNIFICANT_MOVE_PCT,
};
