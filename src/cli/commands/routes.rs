//! Routes command - print synthesis results without writing.

use anyhow::Result;

use crate::config::Settings;
use crate::generator::RouteGenerator;

pub fn run(settings: Settings, tree: bool) -> Result<()> {
    let context = RouteGenerator::new(settings).scan()?;

    for warning in &context.warnings {
        eprintln!("Warning: {warning}");
    }

    if tree {
        println!("{}", serde_json::to_string_pretty(&context.trees)?);
        return Ok(());
    }

    let width = context
        .custom_entries
        .iter()
        .chain(&context.entries)
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    for (name, path) in context.custom_entries.iter().chain(&context.entries) {
        let path = path.as_deref().unwrap_or("-");
        println!("{name:<width$}  {path}");
    }
    Ok(())
}
