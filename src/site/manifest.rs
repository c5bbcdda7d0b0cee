//! `module.ini` manifests that pin a module's name independent of its path

use crate::core::error::{AdeError, AdeResult, ResultExt};
use ini::Ini;
use std::path::{Path, PathBuf};

/// Locations searched for a manifest, relative to the module root
pub const MANIFEST_LOCATIONS: [&str; 2] = ["etc/module.ini", "configure/module.ini"];

/// First manifest present under `module_root`
pub fn find_manifest(module_root: &Path) -> Option<PathBuf> {
  MANIFEST_LOCATIONS
    .iter()
    .map(|relative| module_root.join(relative))
    .find(|candidate| candidate.is_file())
}

/// Read `[general] name` from a manifest file
pub fn read_module_name(manifest: &Path) -> AdeResult<String> {
  let ini = Ini::load_from_file(manifest).with_context(|| format!("Failed to read {}", manifest.display()))?;

  ini
    .section(Some("general"))
    .and_then(|general| general.get("name"))
    .map(|name| name.trim().to_string())
    .ok_or_else(|| {
      AdeError::with_help(
        format!("{} has no name in its [general] section", manifest.display()),
        "Add `name = <module>` under [general], or delete the manifest.",
      )
    })
}

/// Module name declared by the manifest under `module_root`, if any
pub fn module_name_override(module_root: &Path) -> AdeResult<Option<String>> {
  find_manifest(module_root).map(|manifest| read_module_name(&manifest)).transpose()
}
