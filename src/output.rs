use crate::tree::{TreeMapping, WebpRecord};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Write the folder tree as sorted, 4-space indented JSON
pub fn write_tree_json(tree: &TreeMapping, output_path: &Path) -> Result<()> {
    write_text(&to_pretty_json(tree)?, output_path)
}

/// Write WebP records as a single-line draw.io library
pub fn write_library_xml(records: &[WebpRecord], output_path: &Path) -> Result<()> {
    write_text(&library_xml(records)?, output_path)
}

fn library_xml(records: &[WebpRecord]) -> Result<String> {
    let json = serde_json::to_string(records).context("Failed to serialize WebP records")?;
    Ok(format!("<mxlibrary>{}</mxlibrary>\n", json))
}

/// Serialize with 4-space indentation
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("Failed to serialize JSON")?;

    Ok(String::from_utf8(buf)?)
}

/// Overwrite a text file
pub fn write_text(contents: &str, output_path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;

    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    Ok(())
}
