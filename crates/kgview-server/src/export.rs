//! Static export: writes the graph payload to a JSON file for offline
//! rendering.

use std::path::{Path, PathBuf};

use tracing::info;

use kgview_core::{Result, VizConfig};
use kgview_engine::{GraphPayload, ViewPipeline, ViewStats};
use kgview_store::GraphStore;

/// Outcome of one export.
#[derive(Debug)]
pub struct ExportReport {
    pub output: PathBuf,
    pub bytes_written: usize,
    pub stats: ViewStats,
}

/// Run the view over `db_path` and write the payload as pretty JSON.
pub fn run_export(db_path: &Path, output: &Path, viz: &VizConfig) -> Result<ExportReport> {
    let store = GraphStore::open(db_path)?;
    let view = ViewPipeline::run(&store, viz)?;
    let stats = view.stats.clone();

    let json = serde_json::to_string_pretty(&GraphPayload::from(view))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &json)?;

    info!("Wrote {} bytes to {}", json.len(), output.display());

    Ok(ExportReport {
        output: output.to_path_buf(),
        bytes_written: json.len(),
        stats,
    })
}

pub fn print_report(report: &ExportReport) {
    let stats = &report.stats;
    println!("=== kgview Export ===");
    println!();
    println!("Output:             {}", report.output.display());
    println!("Size:               {:.1} KB", report.bytes_written as f64 / 1024.0);
    println!();
    println!("Entities loaded:    {}", stats.entities_loaded);
    println!("Isolated excluded:  {}", stats.isolated_excluded);
    println!("Unnamed excluded:   {}", stats.unnamed_excluded);
    println!(
        "Communities:        {} included, {} folded ({} entities)",
        stats.communities_included, stats.communities_folded, stats.folded_entities
    );
    println!("Level 0:            {} meta-nodes, {} meta-edges", stats.meta_nodes, stats.meta_edges);
    println!(
        "Level 1:            {} entities, {} edges, {} semantic groups",
        stats.total_entities, stats.intra_edges, stats.nested_groups
    );
    println!(
        "Level 2:            {} entities with chunks, {} refs, {} unique texts",
        stats.entities_with_chunks, stats.chunk_refs, stats.unique_chunk_texts
    );
}
