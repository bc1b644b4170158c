use crate::output::write_text;
use crate::placeholder::insert_after;
use crate::tree::TreeMapping;
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

const CDN_URL: &str = "https://cdn.jsdelivr.net/gh/homarr-labs/dashboard-icons";
const ICONS_MARKER: &str = "<!-- ICONS -->";

/// An icon file format published on the CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Webp,
    Png,
    Svg,
}

impl Format {
    const ALL: [Format; 3] = [Format::Webp, Format::Png, Format::Svg];

    /// Parse a top-level `tree.json` key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == key)
    }

    /// File extension, also the CDN folder name
    pub fn extension(self) -> &'static str {
        match self {
            Format::Webp => "webp",
            Format::Png => "png",
            Format::Svg => "svg",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Format::Webp => "WebP",
            Format::Png => "PNG",
            Format::Svg => "SVG",
        }
    }
}

/// Formats available for one icon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IconFormats {
    pub webp: bool,
    pub png: bool,
    pub svg: bool,
}

impl IconFormats {
    pub fn has(&self, format: Format) -> bool {
        match format {
            Format::Webp => self.webp,
            Format::Png => self.png,
            Format::Svg => self.svg,
        }
    }

    fn set(&mut self, format: Format) {
        match format {
            Format::Webp => self.webp = true,
            Format::Png => self.png = true,
            Format::Svg => self.svg = true,
        }
    }
}

/// Render the icons table from `tree.json` into the template's placeholder
pub fn generate(
    tree_path: &Path,
    template_path: &Path,
    output_path: &Path,
    verbose: bool,
) -> Result<usize> {
    let tree_json = std::fs::read_to_string(tree_path)
        .with_context(|| format!("Failed to read {}", tree_path.display()))?;
    let tree: TreeMapping = serde_json::from_str(&tree_json)
        .with_context(|| format!("Failed to parse {}", tree_path.display()))?;

    let icons = group_icons(&tree);
    if verbose {
        let files: usize = tree.values().map(Vec::len).sum();
        println!("Grouped {} files into {} icons", files, icons.len());
    }

    let template = std::fs::read_to_string(template_path)
        .with_context(|| format!("Failed to read {}", template_path.display()))?;

    let page = insert_after(&template, ICONS_MARKER, &format!("\n{}", render_table(&icons)))
        .map_err(|e| anyhow!("{} in {}", e, template_path.display()))?;

    write_text(&page, output_path)?;

    Ok(icons.len())
}

/// Group file names by icon name (file name up to the last `.`)
pub fn group_icons(tree: &TreeMapping) -> BTreeMap<String, IconFormats> {
    let mut icons: BTreeMap<String, IconFormats> = BTreeMap::new();

    for (key, files) in tree {
        let Some(format) = Format::from_key(key) else {
            eprintln!("Warning: skipping '{}': expected one of webp, png, svg", key);
            continue;
        };

        for file in files {
            let name = file.rsplit_once('.').map(|(base, _)| base).unwrap_or(file);
            icons.entry(name.to_string()).or_default().set(format);
        }
    }

    icons
}

/// Header, separator and one row per icon
pub fn render_table(icons: &BTreeMap<String, IconFormats>) -> String {
    let mut lines = vec![
        "| Name | Links | Preview |".to_string(),
        "|------|-------|---------|".to_string(),
    ];
    lines.extend(icons.iter().map(|(name, formats)| table_row(name, formats)));
    lines.join("\n")
}

pub fn table_row(name: &str, formats: &IconFormats) -> String {
    let links: Vec<String> = Format::ALL
        .into_iter()
        .map(|format| format_link(name, format, formats.has(format)))
        .collect();

    let preview = format!(r#"<img src="{CDN_URL}/webp/{name}.webp" height="50" alt="{name}">"#);

    format!("| {} | {} | {} |", name, links.join(" "), preview)
}

fn format_link(name: &str, format: Format, available: bool) -> String {
    if available {
        let ext = format.extension();
        format!(r#"✅ <a href="{CDN_URL}/{ext}/{name}.{ext}">{}</a>"#, format.label())
    } else {
        format!("❌ {}", format.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree(entries: &[(&str, &[&str])]) -> TreeMapping {
        entries
            .iter()
            .map(|(k, files)| (k.to_string(), files.iter().map(|f| f.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_group_icons() {
        let icons = group_icons(&tree(&[
            ("png", &["plex.png", "radarr.png"]),
            ("svg", &["plex.svg"]),
            ("webp", &["plex.webp", "sonarr.webp"]),
        ]));

        assert_eq!(icons.keys().collect::<Vec<_>>(), vec!["plex", "radarr", "sonarr"]);
        assert_eq!(icons["plex"], IconFormats { webp: true, png: true, svg: true });
        assert_eq!(icons["radarr"], IconFormats { webp: false, png: true, svg: false });
    }

    #[test]
    fn test_group_icons_skips_unknown_keys() {
        let icons = group_icons(&tree(&[("png/extra", &["x.png"]), ("png", &["y.png"])]));
        assert_eq!(icons.keys().collect::<Vec<_>>(), vec!["y"]);
    }

    #[test]
    fn test_dotted_names_keep_inner_dots() {
        let icons = group_icons(&tree(&[("svg", &["home-assistant.alt.svg"])]));
        assert!(icons.contains_key("home-assistant.alt"));
    }

    #[test]
    fn test_table_row() {
        let row = table_row("plex", &IconFormats { webp: true, png: false, svg: true });
        assert_eq!(
            row,
            "| plex | \
             ✅ <a href=\"https://cdn.jsdelivr.net/gh/homarr-labs/dashboard-icons/webp/plex.webp\">WebP</a> \
             ❌ PNG \
             ✅ <a href=\"https://cdn.jsdelivr.net/gh/homarr-labs/dashboard-icons/svg/plex.svg\">SVG</a> | \
             <img src=\"https://cdn.jsdelivr.net/gh/homarr-labs/dashboard-icons/webp/plex.webp\" height=\"50\" alt=\"plex\"> |"
        );
    }

    #[test]
    fn test_generate_writes_page() {
        let tmp = TempDir::new().unwrap();
        let tree_path = tmp.path().join("tree.json");
        let template = tmp.path().join("TEMPLATE.md");
        let output = tmp.path().join("ICONS.md");
        std::fs::write(&tree_path, r#"{"png": ["a.png"], "webp": ["a.webp"]}"#).unwrap();
        std::fs::write(&template, "# Icons\n<!-- ICONS -->\n").unwrap();

        let count = generate(&tree_path, &template, &output, false).unwrap();

        assert_eq!(count, 1);
        let page = std::fs::read_to_string(&output).unwrap();
        assert!(page.starts_with("# Icons\n<!-- ICONS -->\n| Name | Links | Preview |\n|------|-------|---------|\n| a | ✅"));
        assert!(page.ends_with("|\n"));
    }

    #[test]
    fn test_generate_without_placeholder_fails() {
        let tmp = TempDir::new().unwrap();
        let tree_path = tmp.path().join("tree.json");
        let template = tmp.path().join("TEMPLATE.md");
        let output = tmp.path().join("ICONS.md");
        std::fs::write(&tree_path, r#"{"png": ["a.png"]}"#).unwrap();
        std::fs::write(&template, "# Icons\n").unwrap();
        std::fs::write(&output, "previous contents").unwrap();

        let err = generate(&tree_path, &template, &output, false).unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("<!-- ICONS --> placeholder not found in {}", template.display())
        );
        assert_eq!(std::fs::read_to_string(&template).unwrap(), "# Icons\n");
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous contents");
    }
}
