use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Prefix of every embedded image in a draw.io library
pub const WEBP_DATA_PREFIX: &str = "data:image/webp;base64,";

/// Display size of library shapes, in pixels
const SHAPE_SIZE: u32 = 48;

/// Folder key -> sorted file names. Keys are `/`-separated on every platform.
pub type TreeMapping = BTreeMap<String, Vec<String>>;

/// A WebP image embedded as a draw.io library entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebpRecord {
    /// `data:image/webp;base64,...` URI holding the raw file bytes
    pub data: String,
    pub w: u32,
    pub h: u32,
    /// File name without extension
    pub title: String,
    pub aspect: String,
}

/// Walk every root folder and collect its file tree and WebP library records
pub fn build_tree<P: AsRef<Path>>(
    roots: &[P],
    verbose: bool,
) -> Result<(TreeMapping, Vec<WebpRecord>)> {
    let mut tree = TreeMapping::new();
    let mut records = Vec::new();

    for root in roots {
        let root = root.as_ref();
        let resolved = std::fs::canonicalize(root)
            .with_context(|| format!("Failed to resolve {}", root.display()))?;
        let base = base_key(&resolved)?;
        log::debug!("Walking {} as '{}'", resolved.display(), base);

        // Roots sharing a name overwrite each other's keys, never merge lists
        for (key, files) in walk_root(&resolved, &base, &mut records, verbose)? {
            tree.insert(key, files);
        }
    }

    Ok((tree, records))
}

fn walk_root(
    root: &Path,
    base: &str,
    records: &mut Vec<WebpRecord>,
    verbose: bool,
) -> Result<TreeMapping> {
    let mut tree = TreeMapping::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        let path = entry.path();

        // Symlinked directories are listed but not followed
        if entry.file_type().is_dir() || path.is_dir() {
            continue;
        }

        let dir = path.parent().unwrap_or(root);
        let relative = dir.strip_prefix(root).unwrap_or(Path::new(""));
        let name = entry.file_name().to_string_lossy().into_owned();

        if is_webp(&name) {
            let record = webp_record(path)?;
            if verbose {
                println!("  Encoded: {} ({} bytes)", path.display(), record.data.len());
            }
            records.push(record);
        }

        tree.entry(key_for(base, relative)).or_default().push(name);
    }

    for files in tree.values_mut() {
        files.sort();
    }

    Ok(tree)
}

/// Final segment of a resolved root, or the working directory's name for `/`
fn base_key(resolved: &Path) -> Result<String> {
    if let Some(name) = resolved.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default())
}

/// Join a base key with a directory path relative to its root
pub fn key_for(base: &str, relative: &Path) -> String {
    let mut key = base.to_string();

    for component in relative.components() {
        if let Component::Normal(segment) = component {
            key.push('/');
            key.push_str(&segment.to_string_lossy());
        }
    }

    key
}

/// Case-insensitive `.webp` extension check
pub fn is_webp(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".webp")
}

/// Read a WebP file and wrap it as a library record
pub fn webp_record(path: &Path) -> Result<WebpRecord> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(WebpRecord {
        data: format!("{}{}", WEBP_DATA_PREFIX, STANDARD.encode(&bytes)),
        w: SHAPE_SIZE,
        h: SHAPE_SIZE,
        title,
        aspect: "fixed".to_string(),
    })
}
