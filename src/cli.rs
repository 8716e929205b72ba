use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::catalog::store::{load_catalog, save_catalog, DEFAULT_CATALOG_PATH};
use crate::catalog::validate::{validate_catalog_file, ValidationSeverity};
use crate::config::{load_config, PatchConfig};
use crate::fields::{complete_catalog, join_fields, Rng};
use crate::gallery::{add_images, enhance_galleries, generate_candidates, thin_galleries};
use crate::logging;
use crate::report::CompletenessReport;

/// Read, patch, and validate a JSON product catalog.
#[derive(Debug, Parser)]
#[command(name = "catalog-patch")]
#[command(about = "Patch and check a JSON product catalog", long_about = None)]
pub struct Cli {
    /// Catalog file (JSON array of products).
    #[arg(long, global = true, default_value = DEFAULT_CATALOG_PATH, value_name = "PATH")]
    pub catalog: PathBuf,

    /// YAML file overriding the CDN naming guesses and default-value pools.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug-level logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Append candidate CDN image URLs (unverified) to each product's gallery.
    EnhanceGalleries {
        /// Write the result here instead of over the catalog.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Append image URLs to one product; without URLs, list products with thin galleries.
    AddImages {
        /// Product id (compared as a string).
        id: Option<String>,
        /// Image URLs to append.
        urls: Vec<String>,
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Fill missing shipping/warranty fields with randomized defaults.
    Complete {
        /// Seed for reproducible picks (default: OS entropy).
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        dry_run: bool,
    },

    /// Report which products miss required shipping/warranty fields.
    Analyze {
        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
        /// Also write incomplete products to a CSV file.
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },

    /// Check every product is complete; exits 1 otherwise.
    Verify,

    /// Structural checks (ids, names/skus, category, price, image URLs, galleries).
    Validate,

    /// Print candidate image URLs for one details URL and gallery, without touching any file.
    Candidates {
        details_url: String,
        gallery: Vec<String>,
    },
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };
    logging::init_logging(cli.verbose);

    match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    }
}

fn dispatch(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    let catalog = cli.catalog.as_path();

    match cli.command {
        Command::EnhanceGalleries { output, dry_run } => {
            handle_enhance(catalog, output.as_deref(), dry_run, &config)
        }
        Command::AddImages { id, urls, output } => match id {
            Some(id) if !urls.is_empty() => handle_add_images(catalog, output.as_deref(), &id, &urls),
            _ => handle_list_thin(catalog),
        },
        Command::Complete { seed, dry_run } => handle_complete(catalog, seed, dry_run, &config),
        Command::Analyze { json, csv } => handle_analyze(catalog, json, csv.as_deref()),
        Command::Verify => handle_verify(catalog),
        Command::Validate => handle_validate(catalog),
        Command::Candidates {
            details_url,
            gallery,
        } => {
            for url in generate_candidates(&config.gallery, Some(&details_url), &gallery) {
                println!("{url}");
            }
            Ok(0)
        }
    }
}

fn handle_enhance(
    catalog: &Path,
    output: Option<&Path>,
    dry_run: bool,
    config: &PatchConfig,
) -> Result<i32> {
    let mut products = load_catalog(catalog)?;
    tracing::info!("enhancing image galleries in {}", catalog.display());

    let summary = enhance_galleries(&mut products, &config.gallery);

    println!("{}", "=".repeat(60));
    println!("Total products: {}", summary.total_products);
    println!("Products with new candidate images: {}", summary.enhanced_products);
    println!("Candidate images added (unverified): {}", summary.new_images);
    println!(
        "Average candidates per product: {:.1}",
        summary.average_new_images()
    );
    for change in summary.changes.iter().filter(|c| c.added() > 0) {
        println!(
            "  ID {}: {} ({} -> {})",
            change.id, change.name, change.before, change.after
        );
    }

    let target = output.unwrap_or(catalog);
    if dry_run {
        println!("Dry run: {} not written", target.display());
    } else if summary.is_empty() && output.is_none() {
        println!("No changes; {} left untouched", target.display());
    } else {
        save_catalog(target, &products)?;
        println!("Saved: {}", target.display());
    }
    Ok(0)
}

fn handle_add_images(
    catalog: &Path,
    output: Option<&Path>,
    id: &str,
    urls: &[String],
) -> Result<i32> {
    let mut products = load_catalog(catalog)?;
    let report = add_images(&mut products, id, urls)?;

    let target = output.unwrap_or(catalog);
    save_catalog(target, &products)?;
    println!("Product '{}' updated", report.name);
    println!(
        "  gallery: {} -> {} images (+{})",
        report.before, report.after, report.added
    );
    println!("Saved: {}", target.display());
    Ok(0)
}

fn handle_list_thin(catalog: &Path) -> Result<i32> {
    let products = load_catalog(catalog)?;
    let thin = thin_galleries(&products);
    if thin.is_empty() {
        println!("All {} products have more than one gallery image.", products.len());
        return Ok(0);
    }

    println!("Products with at most one gallery image ({} of {}):", thin.len(), products.len());
    for (product, count) in thin {
        println!(
            "  ID: {:>3} | gallery: {} image(s) | {}",
            product.id.to_string(),
            count,
            product.display_name(50)
        );
    }
    println!();
    println!("usage: catalog-patch add-images <id> <url> [url]...");
    Ok(0)
}

fn handle_complete(
    catalog: &Path,
    seed: Option<u64>,
    dry_run: bool,
    config: &PatchConfig,
) -> Result<i32> {
    let mut products = load_catalog(catalog)?;
    let mut rng = match seed {
        Some(seed) => Rng::new(seed),
        None => Rng::from_entropy(),
    };

    let summary = complete_catalog(&mut products, &config.fields, &mut rng);
    if summary.completed.is_empty() {
        println!(
            "All {} products already have complete shipping/warranty fields.",
            summary.total_products
        );
        return Ok(0);
    }

    for done in &summary.completed {
        println!("  ID {}: {} <- {}", done.id, done.name, join_fields(&done.filled));
    }
    println!(
        "Products completed: {}/{}",
        summary.completed.len(),
        summary.total_products
    );

    if dry_run {
        println!("Dry run: {} not written", catalog.display());
    } else {
        save_catalog(catalog, &products)?;
        println!("Saved: {}", catalog.display());
    }
    Ok(0)
}

fn handle_analyze(catalog: &Path, json: bool, csv: Option<&Path>) -> Result<i32> {
    let products = load_catalog(catalog)?;
    let report = CompletenessReport::build(&products);

    if json {
        let payload =
            serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{payload}");
    } else {
        print!("{}", report.render_analysis(50, 10));
    }

    if let Some(path) = csv {
        report
            .write_csv(path)
            .with_context(|| format!("failed to write csv '{}'", path.display()))?;
        tracing::info!("wrote {} incomplete rows to {}", report.incomplete.len(), path.display());
    }
    Ok(0)
}

fn handle_verify(catalog: &Path) -> Result<i32> {
    let products = load_catalog(catalog)?;
    let report = CompletenessReport::build(&products);
    print!("{}", report.render_verification(40));

    if report.is_complete() {
        println!("\nAll products have complete shipping/warranty fields.");
        Ok(0)
    } else {
        println!("\n{} products still incomplete", report.incomplete.len());
        Ok(1)
    }
}

fn handle_validate(catalog: &Path) -> Result<i32> {
    let report = validate_catalog_file(catalog)?;
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }

    let errors = report.count(ValidationSeverity::Error);
    let warnings = report.count(ValidationSeverity::Warning);
    if errors > 0 {
        eprintln!("validation failed: {errors} error(s), {warnings} warning(s)");
        Ok(1)
    } else {
        println!(
            "validation passed: {} ({warnings} warning(s))",
            catalog.display()
        );
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(args(&[
            "catalog-patch",
            "complete",
            "--seed",
            "7",
            "--catalog",
            "fixture.json",
        ]))
        .unwrap();
        assert_eq!(cli.catalog, PathBuf::from("fixture.json"));
        assert!(matches!(
            cli.command,
            Command::Complete {
                seed: Some(7),
                dry_run: false
            }
        ));
    }

    #[test]
    fn catalog_defaults_to_services_path() {
        let cli = Cli::try_parse_from(args(&["catalog-patch", "verify"])).unwrap();
        assert_eq!(cli.catalog, PathBuf::from(DEFAULT_CATALOG_PATH));
    }

    #[test]
    fn add_images_collects_trailing_urls() {
        let cli = Cli::try_parse_from(args(&["catalog-patch", "add-images", "4", "a.png", "b.png"]))
            .unwrap();
        match cli.command {
            Command::AddImages { id, urls, .. } => {
                assert_eq!(id.as_deref(), Some("4"));
                assert_eq!(urls, vec!["a.png", "b.png"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_subcommand_is_usage_error() {
        assert_eq!(run_with_args(&args(&["catalog-patch", "serve"])), 2);
        assert_eq!(run_with_args(&args(&["catalog-patch"])), 2);
    }
}
