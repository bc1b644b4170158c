mod icons_page;
mod meta;
mod output;
mod placeholder;
mod png_table;
mod tree;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "icon-tools")]
#[command(about = "Maintenance tooling for the dashboard icon repository")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write tree.json (folder index) and tree.xml (draw.io library of WebP icons)
    Tree {
        /// Folders to index
        #[arg(required = true)]
        folders: Vec<PathBuf>,

        /// Output directory for tree.json and tree.xml
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Generate ICONS.md with WebP/PNG/SVG links from tree.json
    IconsPage {
        /// Folder tree with webp, png and svg keys
        #[arg(long, default_value = "tree.json")]
        tree: PathBuf,

        /// Markdown template containing the <!-- ICONS --> placeholder
        #[arg(long, default_value = "scripts/TEMPLATE.md")]
        template: PathBuf,

        /// Generated markdown file
        #[arg(short, long, default_value = "ICONS.md")]
        output: PathBuf,
    },

    /// Rewrite the PNG preview table in ICONS.md in place
    PngTable {
        /// Folder containing the PNG icons
        #[arg(long, default_value = "png")]
        png_dir: PathBuf,

        /// Markdown file with <!-- ICONS --> and <!-- END ICONS --> markers
        #[arg(long, default_value = "ICONS.md")]
        icons: PathBuf,
    },

    /// Merge per-icon metadata files into meta.json
    Meta {
        /// Directory of <icon>.json files
        #[arg(long, default_value = "meta")]
        meta_dir: PathBuf,

        /// Combined metadata file
        #[arg(short, long, default_value = "meta.json")]
        output: PathBuf,

        /// Additional icon names expected to have metadata
        names: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(level).init();

    match cli.command {
        Commands::Tree { folders, output } => {
            generate_tree(&folders, &output, cli.verbose)?;
        }
        Commands::IconsPage {
            tree,
            template,
            output,
        } => {
            let count = icons_page::generate(&tree, &template, &output, cli.verbose)?;
            println!("{} has been successfully generated ({} icons).", output.display(), count);
        }
        Commands::PngTable { png_dir, icons } => {
            let count = png_table::generate(&png_dir, &icons, cli.verbose)?;
            println!("Done! {} rows written to {}.", count, icons.display());
            println!("Please commit the new {} file.", icons.display());
        }
        Commands::Meta {
            meta_dir,
            output,
            names,
        } => {
            let report = meta::generate(&meta_dir, &output, &names, cli.verbose)?;
            println!("Wrote metadata for {} icons to {}", report.icons, output.display());
            if !report.missing.is_empty() {
                println!("{} icons have no metadata", report.missing.len());
            }
        }
    }

    Ok(())
}

fn generate_tree(folders: &[PathBuf], output_dir: &Path, verbose: bool) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    if verbose {
        for folder in folders {
            println!("Scanning: {}", folder.display());
        }
    }

    let (folder_tree, records) = tree::build_tree(folders, verbose)?;

    let tree_json_path = output_dir.join("tree.json");
    output::write_tree_json(&folder_tree, &tree_json_path)?;
    println!("Folder tree successfully written to '{}'.", tree_json_path.display());

    if records.is_empty() {
        println!("No WebP files found for XML generation.");
        return Ok(());
    }

    let xml_path = output_dir.join("tree.xml");
    output::write_library_xml(&records, &xml_path)?;
    println!(
        "{} WebP assets successfully written to '{}'.",
        records.len(),
        xml_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tree_requires_folders() {
        let err = Cli::try_parse_from(["icon-tools", "tree"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_tree_parses_folders_and_output() {
        let cli = Cli::try_parse_from(["icon-tools", "tree", "webp", "png", "-o", "out"]).unwrap();
        match cli.command {
            Commands::Tree { folders, output } => {
                assert_eq!(folders, vec![PathBuf::from("webp"), PathBuf::from("png")]);
                assert_eq!(output, PathBuf::from("out"));
            }
            _ => panic!("expected tree command"),
        }
    }

    #[test]
    fn test_generate_tree_without_files_skips_xml() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("empty");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        let out = tmp.path().join("out");

        generate_tree(&[root], &out, false).unwrap();

        assert_eq!(std::fs::read_to_string(out.join("tree.json")).unwrap(), "{}");
        assert!(!out.join("tree.xml").exists());
    }

    #[test]
    fn test_generate_tree_writes_library() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("webp");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("plex.webp"), b"RIFF").unwrap();
        std::fs::write(root.join("notes.txt"), b"x").unwrap();
        let out = tmp.path().join("out");

        generate_tree(&[root], &out, false).unwrap();

        let tree_json = std::fs::read_to_string(out.join("tree.json")).unwrap();
        assert!(tree_json.contains("\"webp\": ["));
        let xml = std::fs::read_to_string(out.join("tree.xml")).unwrap();
        assert!(xml.starts_with("<mxlibrary>[{\"data\":\"data:image/webp;base64,UklGRg==\""));
        assert!(xml.contains("\"title\":\"plex\""));
        assert!(xml.ends_with("</mxlibrary>\n"));
    }

    #[test]
    fn test_generate_tree_names_unwritable_output() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("icons");
        std::fs::create_dir_all(&root).unwrap();
        let blocker = tmp.path().join("out");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = generate_tree(&[root], &blocker, false).unwrap_err();

        assert_eq!(err.to_string(), format!("Failed to create {}", blocker.display()));
    }
}
