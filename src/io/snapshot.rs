//! Mesh precomputation snapshot.
//!
//! The visibility precompute is the expensive part of setup, so the facet
//! table and its visibility graph can be cached together as one JSON file
//! and reloaded in later runs. The format is a local implementation detail,
//! not an interchange surface.

use crate::mesh::facet::FacetTable;
use crate::mesh::visibility::VisibilityGraph;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct MeshSnapshot {
    table: FacetTable,
    visibility: VisibilityGraph,
}

/// Writes the facet table and its visibility graph to a JSON snapshot.
pub fn write_snapshot(path: &Path, table: &FacetTable, visibility: &VisibilityGraph) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    let snapshot = MeshSnapshot {
        table: table.clone(),
        visibility: visibility.clone(),
    };
    serde_json::to_writer(writer, &snapshot)
        .with_context(|| format!("Failed to serialize snapshot to: {}", path.display()))?;

    Ok(())
}

/// Reads a facet table and visibility graph back from a JSON snapshot.
pub fn read_snapshot(path: &Path) -> Result<(FacetTable, VisibilityGraph)> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let snapshot: MeshSnapshot = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize snapshot from: {}", path.display()))?;
    ensure!(
        snapshot.visibility.facet_count() == snapshot.table.count(),
        "Snapshot is inconsistent: {} facets vs {} visibility rows",
        snapshot.table.count(),
        snapshot.visibility.facet_count()
    );

    Ok((snapshot.table, snapshot.visibility))
}
