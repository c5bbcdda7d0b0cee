//! Tests for `dls-ade list-releases`

use crate::helpers::{EPICS, TestSite, run_dls_ade, stdout};
use anyhow::Result;

#[test]
fn test_list_git_releases_in_version_order() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", EPICS)?;
  for tag in ["1-9", "1-10", "1-9-1", "1-10beta1"] {
    module.push_commit(tag)?;
    module.release(tag)?;
  }

  let output = run_dls_ade(&site.path, &["list-releases", "motor", "--git"])?;
  let listed: Vec<String> = stdout(&output)
    .lines()
    .skip(1)
    .map(|line| line.trim().to_string())
    .collect();
  assert_eq!(listed, vec!["1-9", "1-9-1", "1-10beta1", "1-10"]);
  Ok(())
}

#[test]
fn test_list_latest_git_release() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", EPICS)?;
  module.release("0-9")?;
  module.push_commit("next")?;
  module.release("0-10")?;

  let output = run_dls_ade(&site.path, &["list-releases", "motor", "-g", "-l"])?;
  assert!(stdout(&output).contains("The latest release for motor in the repository is: 0-10"));
  Ok(())
}

#[test]
fn test_list_git_releases_json() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("ioc", "BL02I/MO", EPICS)?;
  module.release("2-0")?;

  let output = run_dls_ade(&site.path, &["list-releases", "BL02I/MO", "-a", "ioc", "-g", "--json"])?;
  let listing: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(listing["module"], "BL02I/MO");
  assert_eq!(listing["area"], "ioc");
  assert_eq!(listing["releases"], serde_json::json!(["2-0"]));
  Ok(())
}

#[test]
fn test_list_git_without_releases() -> Result<()> {
  let site = TestSite::new()?;
  site.add_module("support", "motor", EPICS)?;

  let output = run_dls_ade(&site.path, &["list-releases", "motor", "--git"])?;
  assert!(stdout(&output).contains("motor: No releases made in git"));
  Ok(())
}

#[test]
fn test_list_prod_releases() -> Result<()> {
  let site = TestSite::new()?;
  site.install(&format!("{}/support", EPICS), "motor", &["6-10", "6-9", "6-9-1"])?;

  let output = run_dls_ade(&site.path, &["list-releases", "motor"])?;
  let out = stdout(&output);
  assert!(out.contains("Previous releases for motor in prod:"));
  let listed: Vec<&str> = out.lines().skip(1).map(str::trim).collect();
  assert_eq!(listed, vec!["6-9", "6-9-1", "6-10"]);
  Ok(())
}

#[test]
fn test_list_prod_without_releases() -> Result<()> {
  let site = TestSite::new()?;

  let output = run_dls_ade(&site.path, &["list-releases", "motor"])?;
  assert!(stdout(&output).contains(&format!("motor: No releases made for {}", EPICS)));
  Ok(())
}
