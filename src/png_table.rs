use crate::output::write_text;
use crate::placeholder::replace_between;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CDN_URL: &str = "https://cdn.jsdelivr.net/gh/walkxcode/dashboard-icons/png/";
const ICONS_START: &str = "<!-- ICONS -->";
const ICONS_END: &str = "<!-- END ICONS -->";
const TABLE_HEAD: &str = "\n\n| Icon filename | Preview |\n| ------------- | ------- |\n";

/// Rewrite the PNG table between the icon markers of `icons_md`
pub fn generate(png_dir: &Path, icons_md: &Path, verbose: bool) -> Result<usize> {
    let pngs = list_pngs(png_dir)?;
    if verbose {
        println!("Found {} PNG files in {}", pngs.len(), png_dir.display());
    }

    let rows: Vec<String> = pngs.iter().map(|p| table_row(p)).collect();

    let current = std::fs::read_to_string(icons_md)
        .with_context(|| format!("Failed to read {}", icons_md.display()))?;

    let mut updated = replace_between(&current, ICONS_START, ICONS_END, &render_region(&rows))
        .with_context(|| format!("Cannot update table in {}", icons_md.display()))?;
    if !updated.ends_with('\n') {
        updated.push('\n');
    }

    write_text(&updated, icons_md)?;

    Ok(rows.len())
}

/// `*.png` files directly inside `dir`, sorted by name
fn list_pngs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pngs = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let is_png = path.extension().map(|ext| ext == "png").unwrap_or(false);
        if is_png && !entry.file_type().is_dir() {
            pngs.push(path.to_path_buf());
        }
    }

    Ok(pngs)
}

pub fn table_row(file: &Path) -> String {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!(
        r#"| `{name}` | <a href="{CDN_URL}{name}"><img src="{CDN_URL}{name}" alt="{stem}" height="50"></a> |"#
    )
}

/// Everything that goes between the two markers
pub fn render_region(rows: &[String]) -> String {
    format!("{}{}\n\n", TABLE_HEAD, rows.join("\n"))
}
