use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

/// Tuning knobs of the printer. Every field falls back to its default when
/// missing from a settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintSettings {
    pub sweep: SweepSettings,
    pub long_edges: LongEdgeSettings,
    /// Rows whose sorted elements are kept by the generator.
    #[serde(default = "default_row_cache_capacity")]
    pub row_cache_capacity: usize,
    /// Rows sampled by `recommended_width`.
    #[serde(default = "default_width_sample_rows")]
    pub width_sample_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    /// Distance between cached checkpoints.
    pub block_size: usize,
    /// Longest walk used to rebuild a checkpoint. Edges longer than this are
    /// lost in the middle of their span.
    pub walk_size: usize,
    /// Protected entries per checkpoint cache; twice as many probationary ones.
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongEdgeSettings {
    pub hidden: bool,
    /// Edges at least this long are abbreviated while long edges are hidden.
    pub long_edge_size: usize,
    pub long_edge_part_size: usize,
    /// Edges at least this long are abbreviated even while long edges are shown.
    pub very_long_edge_size: usize,
    pub very_long_edge_part_size: usize,
    /// Put arrows next to the endpoints of long edges while they are shown.
    pub show_arrow_when_shown: bool,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            sweep: SweepSettings::default(),
            long_edges: LongEdgeSettings::default(),
            row_cache_capacity: default_row_cache_capacity(),
            width_sample_rows: default_width_sample_rows(),
        }
    }
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            block_size: 40,
            walk_size: 1000,
            cache_capacity: 10,
        }
    }
}

impl Default for LongEdgeSettings {
    fn default() -> Self {
        Self {
            hidden: true,
            long_edge_size: 30,
            long_edge_part_size: 1,
            very_long_edge_size: 1000,
            very_long_edge_part_size: 250,
            show_arrow_when_shown: true,
        }
    }
}

/// Upper bound for every cache capacity setting; caches scan linearly.
pub const MAX_CACHE_CAPACITY: usize = 10_000;

fn default_row_cache_capacity() -> usize {
    100
}

fn default_width_sample_rows() -> usize {
    100
}

impl PrintSettings {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let settings: PrintSettings =
            serde_json::from_str(json).context("Failed to parse print settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize print settings")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.sweep.block_size > 0, "block_size must be positive");
        ensure!(
            (1..=MAX_CACHE_CAPACITY).contains(&self.sweep.cache_capacity),
            "cache_capacity must be between 1 and {}",
            MAX_CACHE_CAPACITY
        );
        ensure!(
            (1..=MAX_CACHE_CAPACITY).contains(&self.row_cache_capacity),
            "row_cache_capacity must be between 1 and {}",
            MAX_CACHE_CAPACITY
        );
        let long = &self.long_edges;
        ensure!(
            long.long_edge_part_size > 0 && long.very_long_edge_part_size > 0,
            "long edge part sizes must be positive"
        );
        ensure!(
            long.long_edge_size > long.long_edge_part_size.saturating_mul(2),
            "long_edge_size {} leaves no hidden middle for part size {}",
            long.long_edge_size,
            long.long_edge_part_size
        );
        ensure!(
            long.very_long_edge_size > long.very_long_edge_part_size.saturating_mul(2),
            "very_long_edge_size {} leaves no hidden middle for part size {}",
            long.very_long_edge_size,
            long.very_long_edge_part_size
        );
        // Shorter walks lose the middle of edges that are drawn in full.
        let drawn_in_full = long.long_edge_size.max(long.very_long_edge_size);
        ensure!(
            self.sweep.walk_size >= drawn_in_full,
            "walk_size {} is shorter than edges drawn in full ({} rows)",
            self.sweep.walk_size,
            drawn_in_full
        );
        Ok(())
    }
}
