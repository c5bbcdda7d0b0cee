//! Property-based tests for release ordering and path classification

use dls_ade::release::{ReleaseSet, increment, normalize};
use dls_ade::site::{Area, Domain, Environment, classify_path};
use proptest::prelude::*;
use std::path::Path;

fn release() -> impl Strategy<Value = String> {
  "[0-9]{1,4}(-[0-9]{1,4}){0,2}"
}

fn tag() -> impl Strategy<Value = String> {
  "[0-9]{1,3}(-[0-9]{1,3}){0,3}(beta[0-9])?(dls[0-9]{1,2}(-[0-9]{1,2})?)?"
}

proptest! {
  #[test]
  fn normalize_is_deterministic(tag in ".{0,24}") {
    prop_assert_eq!(normalize(&tag), normalize(&tag));
  }

  #[test]
  fn prerelease_sorts_before_release(release in release()) {
    let prerelease = format!("{}beta1", release);
    prop_assert!(normalize(&prerelease) < normalize(&release));
  }

  #[test]
  fn local_patch_sorts_after_upstream(release in release(), patch in 1u32..50) {
    let patched = format!("{}dls{}", release, patch);
    prop_assert!(normalize(&release) < normalize(&patched));
  }

  #[test]
  fn increment_bumps_last_number(release in release()) {
    let next = increment(&release).unwrap();
    let (head, last) = release.rsplit_once('-').unwrap_or(("", &release));
    let (next_head, next_last) = next.rsplit_once('-').unwrap_or(("", &next));

    prop_assert_eq!(head, next_head);
    prop_assert_eq!(next_last.parse::<u64>().unwrap(), last.parse::<u64>().unwrap() + 1);
    prop_assert!(normalize(&release) < normalize(&next));
  }

  #[test]
  fn sorted_is_ordered_permutation(tags in prop::collection::hash_set(tag(), 0..12)) {
    let set: ReleaseSet = tags.iter().cloned().collect();
    let sorted = set.sorted();

    prop_assert_eq!(sorted.len(), tags.len());
    prop_assert!(sorted.iter().all(|tag| tags.contains(*tag)));
    prop_assert!(sorted.windows(2).all(|pair| normalize(pair[0]) <= normalize(pair[1])));
    let latest = set.latest();
    prop_assert_eq!(latest.as_deref(), sorted.last().copied());
  }

  #[test]
  fn work_module_path_classifies_back(module in "[a-z][a-z0-9_]{2,12}") {
    prop_assume!(module != "prefix");
    let env = Environment::new("R3.14.12.3", "7").unwrap();
    let path = Area::Support.dev_path(&env).join(&module);

    let location = classify_path(&path, &env).unwrap();
    prop_assert_eq!(location.module.as_deref(), Some(module.as_str()));
    prop_assert_eq!(location.area, Some(Area::Support));
    prop_assert_eq!(location.domain, Domain::Work);
    prop_assert_eq!(location.version.as_str(), "work");
  }

  #[test]
  fn prod_module_path_keeps_release(module in "[a-z][a-z0-9_]{2,12}", release in release()) {
    let env = Environment::new("R3.14.12.3", "7").unwrap();
    let path = Area::Python.prod_path(&env).join(&module).join(&release);

    let location = classify_path(Path::new(&path), &env).unwrap();
    prop_assert_eq!(location.module.as_deref(), Some(module.as_str()));
    prop_assert_eq!(location.version, release);
  }
}
