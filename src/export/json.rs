//! JSON export of the render model

use crate::errors::ExportResult;
use crate::types::RenderModel;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write the render model as pretty-printed JSON, creating parent directories
pub fn write_render_model(model: &RenderModel, path: &Path) -> ExportResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, model)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(
        "Wrote {} nodes and {} edges to {}",
        model.nodes.len(),
        model.edges.len(),
        path.display()
    );
    Ok(())
}

/// Read a previously exported render model
pub fn read_render_model(path: &Path) -> ExportResult<RenderModel> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
