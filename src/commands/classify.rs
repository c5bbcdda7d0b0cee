//! Show where a directory sits in the work/prod hierarchy

use crate::core::context::AdeContext;
use crate::core::error::{AdeResult, ResultExt};
use crate::site::{ModuleLocation, classify_path};
use std::path::Path;

/// Run the classify command
pub fn run_classify(ctx: &AdeContext, path: &Path, json: bool) -> AdeResult<()> {
  let path = if path.is_absolute() {
    path.to_path_buf()
  } else {
    std::env::current_dir().context("Failed to read current directory")?.join(path)
  };

  let location = classify_path(&path, &ctx.env)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&location)?);
  } else {
    print_location(&path, &location);
  }

  Ok(())
}

fn print_location(path: &Path, location: &ModuleLocation) {
  println!("📍 {}", path.display());
  println!("  Module:    {}", location.module.as_deref().unwrap_or("-"));
  println!(
    "  Area:      {}",
    location.area.map(|area| area.as_str()).unwrap_or("invalid")
  );
  println!("  Domain:    {}", location.domain);
  println!("  Version:   {}", location.version);
  println!("  Toolchain: {}", location.toolchain);
}
