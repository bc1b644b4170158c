use crate::output::{to_pretty_json, write_text};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use walkdir::WalkDir;

/// Icon name -> contents of its metadata file
pub type MetaMap = BTreeMap<String, Value>;

/// Outcome of one aggregation run
#[derive(Debug, Default)]
pub struct MetaReport {
    pub icons: usize,
    /// Names with no `<name>.json` in the metadata directory
    pub missing: Vec<String>,
}

/// Merge every `meta_dir/*.json` (plus `extra_names`) into `output_path`
pub fn generate(
    meta_dir: &Path,
    output_path: &Path,
    extra_names: &[String],
    verbose: bool,
) -> Result<MetaReport> {
    std::fs::create_dir_all(meta_dir)
        .with_context(|| format!("Failed to create {}", meta_dir.display()))?;

    let mut names = icon_names(meta_dir)?;
    names.extend(extra_names.iter().cloned());
    if verbose {
        println!("Collecting metadata for {} icons", names.len());
    }

    let (meta, missing) = aggregate(meta_dir, &names)?;
    write_text(&to_pretty_json(&meta)?, output_path)?;

    Ok(MetaReport {
        icons: meta.len(),
        missing,
    })
}

/// Stems of the `*.json` files directly inside `meta_dir`
pub fn icon_names(meta_dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();

    for entry in WalkDir::new(meta_dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", meta_dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_dir() || path.extension().map(|e| e != "json").unwrap_or(true) {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            names.insert(stem.to_string_lossy().into_owned());
        }
    }

    Ok(names)
}

/// Read `<name>.json` for every name; missing files are reported, not fatal
pub fn aggregate(meta_dir: &Path, names: &BTreeSet<String>) -> Result<(MetaMap, Vec<String>)> {
    let mut meta = MetaMap::new();
    let mut missing = Vec::new();

    for name in names {
        let path = meta_dir.join(format!("{}.json", name));
        if !path.is_file() {
            println!("Missing meta for {}", name);
            missing.push(name.clone());
            continue;
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value: Value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        log::debug!("Loaded metadata for {}", name);
        meta.insert(name.clone(), value);
    }

    Ok((meta, missing))
}
