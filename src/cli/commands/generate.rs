//! Generate command.

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::generator::RouteGenerator;

/// Run generate command - one full pipeline pass.
pub fn run(settings: Settings) -> Result<()> {
    let generator = RouteGenerator::new(settings);
    let report = generator
        .generate(None)
        .context("Failed to generate routes")?;

    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }
    println!(
        "Generated {} routes from {} page files",
        report.routes, report.files
    );
    println!("  routes:   {}", report.routes_path.display());
    println!("  manifest: {}", report.manifest_path.display());
    Ok(())
}
