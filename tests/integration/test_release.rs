//! Tests for `dls-ade release`

use crate::helpers::{EPICS, TestSite, dls_ade, run_dls_ade, stderr, stdout};
use anyhow::Result;

#[test]
fn test_release_tags_commit_and_queues_build() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", EPICS)?;
  let sha = module.push_commit("Fix limits")?;

  let output = run_dls_ade(&site.path, &["release", "motor", "1-2", "-c", &sha, "-m", "Fix limits"])?;
  assert!(stdout(&output).contains("Making tag 1-2"));

  assert_eq!(module.server_tags()?, vec!["1-2"]);
  assert_eq!(module.tag_subject("1-2")?, "motor: Released version 1-2. Fix limits");

  let jobs = site.queued_jobs()?;
  assert_eq!(jobs.len(), 1);
  assert_eq!(jobs[0]["module"], "motor");
  assert_eq!(jobs[0]["area"], "support");
  assert_eq!(jobs[0]["version"], "1-2");
  assert_eq!(jobs[0]["epics"], EPICS);
  assert_eq!(jobs[0]["test_only"], false);
  Ok(())
}

#[test]
fn test_release_existing_tag_is_rebuilt() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", EPICS)?;
  module.release("1-0")?;

  let output = run_dls_ade(&site.path, &["release", "motor", "1-0"])?;
  assert!(stdout(&output).contains("none created"));

  assert_eq!(module.server_tags()?, vec!["1-0"]);
  let jobs = site.queued_jobs()?;
  assert_eq!(jobs.len(), 1);
  assert_eq!(jobs[0]["version"], "1-0");
  Ok(())
}

#[test]
fn test_release_already_exists() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", EPICS)?;
  module.release("1-0")?;

  let output = dls_ade(&site.path, &["release", "motor", "1-0", "-c", "HEAD"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Release 1-0 already exists."));
  assert!(site.queued_jobs()?.is_empty());
  Ok(())
}

#[test]
fn test_release_not_found_without_commit() -> Result<()> {
  let site = TestSite::new()?;
  site.add_module("support", "motor", EPICS)?;

  let output = dls_ade(&site.path, &["release", "motor", "2-0"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Release 2-0 not found and commit not specified."));
  Ok(())
}

#[test]
fn test_release_without_version() -> Result<()> {
  let site = TestSite::new()?;

  let output = dls_ade(&site.path, &["release", "motor"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Module release not specified"));
  Ok(())
}

#[test]
fn test_release_next_version() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", EPICS)?;
  module.release("1-9")?;
  module.push_commit("More motors")?;

  run_dls_ade(&site.path, &["release", "motor", "-n"])?;

  let mut tags = module.server_tags()?;
  tags.sort();
  assert_eq!(tags, vec!["1-10", "1-9"]);
  assert_eq!(site.queued_jobs()?[0]["version"], "1-10");
  Ok(())
}

#[test]
fn test_release_next_version_of_new_module() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("ioc", "BL02I/MO", EPICS)?;

  run_dls_ade(&site.path, &["release", "BL02I/MO", "-a", "ioc", "-n"])?;
  assert_eq!(module.server_tags()?, vec!["0-1"]);
  Ok(())
}

#[test]
fn test_release_epics_mismatch() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", "R3.14.12.7")?;
  module.release("1-0")?;

  let output = dls_ade(&site.path, &["release", "motor", "1-0"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("without using the -e flag"));
  assert!(site.queued_jobs()?.is_empty());
  Ok(())
}

#[test]
fn test_release_epics_change_allowed_with_flag() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", "R3.14.12.7")?;
  module.release("1-0")?;

  run_dls_ade(&site.path, &["release", "motor", "1-0", "-e", EPICS])?;
  assert_eq!(site.queued_jobs()?.len(), 1);
  Ok(())
}

#[test]
fn test_release_dry_run() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", EPICS)?;

  let output = run_dls_ade(&site.path, &["release", "motor", "-n", "--dry-run"])?;
  assert!(stdout(&output).contains("Version: 0-1"));
  assert!(stdout(&output).contains("Dry-run"));

  assert!(module.server_tags()?.is_empty());
  assert!(site.queued_jobs()?.is_empty());
  Ok(())
}

#[test]
fn test_release_test_build_of_commit() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", EPICS)?;
  let sha = module.push_commit("Try this")?;

  run_dls_ade(&site.path, &["release", "motor", "-c", &sha, "-T"])?;

  assert!(module.server_tags()?.is_empty());
  let jobs = site.queued_jobs()?;
  assert_eq!(jobs[0]["version"], sha);
  assert_eq!(jobs[0]["test_only"], true);
  Ok(())
}

#[test]
fn test_release_from_local_checkout() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", EPICS)?;
  module.release("0-3")?;

  let repo = module.checkout.display().to_string();
  run_dls_ade(&site.path, &["release", "motor", "-n", "--repo", &repo])?;

  let mut tags = module.server_tags()?;
  tags.sort();
  assert_eq!(tags, vec!["0-3", "0-4"]);
  Ok(())
}

#[test]
fn test_release_invalid_name() -> Result<()> {
  let site = TestSite::new()?;
  site.add_module("support", "motor", EPICS)?;

  let output = dls_ade(&site.path, &["release", "motor", "release-one", "-c", "HEAD"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(site.queued_jobs()?.is_empty());
  Ok(())
}

#[test]
fn test_release_unknown_commit() -> Result<()> {
  let site = TestSite::new()?;
  let module = site.add_module("support", "motor", EPICS)?;

  let output = dls_ade(&site.path, &["release", "motor", "-c", "deadbeef", "-T"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Commit deadbeef not found"));

  let output = dls_ade(&site.path, &["release", "motor", "1-0", "-c", "deadbeef"])?;
  assert_eq!(output.status.code(), Some(1));

  assert!(module.server_tags()?.is_empty());
  assert!(site.queued_jobs()?.is_empty());
  Ok(())
}
