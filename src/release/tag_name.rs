//! Release naming conventions per area

use crate::core::error::ReleaseError;
use crate::site::Area;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// `1-0`, `1-0-2`, `4-5dls1`, `4-5-1dls2-3`
static DLS_TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d+-\d+(-\d+)?(dls\d+(-\d+)*)?$").expect("dls tag pattern is valid"));

/// PEP 440 style release numbers used by python3 modules
static PYTHON3_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\d+(\.\d+)*((a|b|rc)\d+)?(\.post\d+)?(\.dev\d+)?$").expect("python3 tag pattern is valid")
});

/// Decides whether a release name is acceptable for an area
pub trait TagValidator {
  fn is_valid_tag_name(&self, name: &str, area: Area) -> bool;
}

/// Naming rules applied at DLS
#[derive(Debug, Clone, Copy, Default)]
pub struct DlsTagConvention;

impl TagValidator for DlsTagConvention {
  fn is_valid_tag_name(&self, name: &str, area: Area) -> bool {
    match area {
      Area::Python3 => PYTHON3_TAG_RE.is_match(name),
      _ => DLS_TAG_RE.is_match(name),
    }
  }
}

/// Make a release name follow the area convention.
///
/// Only dots are rewritten (`1.2` becomes `1-2`); anything still invalid is
/// rejected.
pub fn normalize_release(release: &str, area: Area, validator: &impl TagValidator) -> Result<String, ReleaseError> {
  if validator.is_valid_tag_name(release, area) {
    return Ok(release.to_string());
  }

  let rewritten = release.replace('.', "-");
  warn!(release, area = %area, "release does not conform to convention");
  if rewritten != release {
    warn!(release, rewritten = %rewritten, "replacing '.' with '-'");
  }

  if validator.is_valid_tag_name(&rewritten, area) {
    Ok(rewritten)
  } else {
    Err(ReleaseError::InvalidName {
      release: release.to_string(),
    })
  }
}

/// [`normalize_release`] for an optional name; `None` passes through
pub fn normalize_release_name(
  release: Option<&str>,
  area: Area,
  validator: &impl TagValidator,
) -> Result<Option<String>, ReleaseError> {
  release.map(|release| normalize_release(release, area, validator)).transpose()
}
