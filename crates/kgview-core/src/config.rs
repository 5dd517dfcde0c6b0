//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Fixed community palette, indexed by community id modulo its length.
pub const COMMUNITY_COLORS: [&str; 15] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#bfef45",
    "#fabed4", "#469990", "#dcbeff", "#9A6324", "#fffac8", "#800000", "#aaffc3",
];

/// Paths to the kgview data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Knowledge graph database (`data/graphrag.db`).
    pub database: PathBuf,
    /// Optional view configuration override (`data/viz-config.json`).
    pub viz_config_file: PathBuf,
}

impl DataPaths {
    /// Resolve data paths under a root directory. Nothing is created: the
    /// store is opened read-only and the view config is optional.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            database: root.join("graphrag.db"),
            viz_config_file: root.join("viz-config.json"),
            root,
        }
    }
}

/// Inclusive pixel range a numeric measure is mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: i64,
    pub max: i64,
}

impl SizeRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Integer midpoint, used when the comparison domain is degenerate.
    pub fn midpoint(&self) -> i64 {
        (self.min + self.max).div_euclid(2)
    }
}

/// Parameters of the community → entity → chunk view transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// Minimum visible-member count for a community to be shown on its own.
    pub min_community_size: usize,
    /// Semantic groups declaring more members than this are never nested.
    pub max_compound_size: usize,
    pub palette: Vec<String>,
    pub other_color: String,
    pub semantic_group_color: String,
    /// PageRank → entity node size.
    pub entity_size: SizeRange,
    /// Visible member count → community meta-node size.
    pub community_size: SizeRange,
    /// Fixed size of the folded "other" meta-node.
    pub other_size: i64,
    pub title_len: usize,
    pub member_name_len: usize,
    pub edge_description_len: usize,
    /// Members listed on each community meta-node.
    pub top_members: usize,
    /// Sample descriptions kept per aggregated meta-edge.
    pub max_edge_samples: usize,
    /// Keep only the N largest communities before filtering (0 = all).
    pub top_communities: usize,
    /// Keep entities without relationships in the visible set.
    pub include_isolated: bool,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            min_community_size: 2,
            max_compound_size: 15,
            palette: COMMUNITY_COLORS.iter().map(|c| c.to_string()).collect(),
            other_color: "#555555".to_string(),
            semantic_group_color: "#bfef45".to_string(),
            entity_size: SizeRange::new(25, 90),
            community_size: SizeRange::new(40, 120),
            other_size: 40,
            title_len: 35,
            member_name_len: 25,
            edge_description_len: 80,
            top_members: 5,
            max_edge_samples: 5,
            top_communities: 0,
            include_isolated: false,
        }
    }
}

impl VizConfig {
    /// Reject configurations the transformation cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.min_community_size == 0 {
            return Err(Error::Config(
                "min_community_size must be at least 1".to_string(),
            ));
        }
        if self.palette.is_empty() {
            return Err(Error::Config("palette must not be empty".to_string()));
        }
        for (name, range) in [
            ("entity_size", self.entity_size),
            ("community_size", self.community_size),
        ] {
            if range.min > range.max {
                return Err(Error::Config(format!(
                    "{} range is inverted: {} > {}",
                    name, range.min, range.max
                )));
            }
        }
        Ok(())
    }

    /// Palette color for a community id.
    pub fn color_for(&self, community_id: i64) -> &str {
        let idx = community_id.rem_euclid(self.palette.len() as i64) as usize;
        &self.palette[idx]
    }

    /// Load overrides from a JSON file, falling back to defaults when absent.
    pub fn load(path: &Path) -> Result<Self> {
        let config = match std::fs::read_to_string(path) {
            Ok(data) => {
                info!("Loading view configuration from {}", path.display());
                serde_json::from_str::<Self>(&data)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No view configuration at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => return Err(Error::Io(e)),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Top-level kgview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KgViewConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Knowledge graph database consumed by the view.
    pub db_path: PathBuf,
    pub viz: VizConfig,
}

impl KgViewConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3004);

        let data_paths = DataPaths::new(data_dir);
        let db_path = std::env::var("KGVIEW_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_paths.database.clone());
        let viz = VizConfig::load(&data_paths.viz_config_file)?;

        Ok(Self {
            port,
            data_paths,
            db_path,
            viz,
        })
    }
}
