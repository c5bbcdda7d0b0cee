//! Tests for `dls-ade classify` and `dls-ade env`

use crate::helpers::{EPICS, TestSite, run_dls_ade, stdout};
use anyhow::Result;

fn classify(site: &TestSite, path: &std::path::Path) -> Result<serde_json::Value> {
  let path = path.display().to_string();
  let output = run_dls_ade(&site.path, &["classify", &path, "--json"])?;
  Ok(serde_json::from_str(&stdout(&output))?)
}

#[test]
fn test_classify_work_support_module() -> Result<()> {
  let site = TestSite::new()?;
  let path = site.dls_sw.join("work").join(EPICS).join("support/motor");

  let location = classify(&site, &path)?;
  assert_eq!(location["module"], "motor");
  assert_eq!(location["area"], "support");
  assert_eq!(location["domain"], "work");
  assert_eq!(location["version"], "work");
  assert_eq!(location["toolchain"], EPICS);
  Ok(())
}

#[test]
fn test_classify_prod_ioc() -> Result<()> {
  let site = TestSite::new()?;
  let path = site.dls_sw.join("prod").join(EPICS).join("ioc/BL02I/MO/1-5");

  let location = classify(&site, &path)?;
  assert_eq!(location["module"], "BL02I/MO");
  assert_eq!(location["area"], "ioc");
  assert_eq!(location["domain"], "prod");
  assert_eq!(location["version"], "1-5");
  Ok(())
}

#[test]
fn test_classify_other_epics_version() -> Result<()> {
  let site = TestSite::new()?;
  let path = site.dls_sw.join("prod/R3.14.12.7/support/motor/6-9");

  let location = classify(&site, &path)?;
  assert_eq!(location["module"], "motor");
  assert_eq!(location["version"], "6-9");
  assert_eq!(location["toolchain"], "R3.14.12.7");
  Ok(())
}

#[test]
fn test_classify_outside_site() -> Result<()> {
  let site = TestSite::new()?;
  let location = classify(&site, &site.path.join("motor"))?;
  assert_eq!(location["area"], serde_json::Value::Null);
  assert_eq!(location["domain"], "invalid");
  assert_eq!(location["version"], "invalid");
  Ok(())
}

#[test]
fn test_env_lists_every_area() -> Result<()> {
  let site = TestSite::new()?;

  let output = run_dls_ade(&site.path, &["env", "--json"])?;
  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  let areas = report["areas"].as_array().map(Vec::len);
  assert_eq!(areas, Some(9));
  assert_eq!(report["areas"][0]["area"], "support");
  Ok(())
}
