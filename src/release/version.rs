//! Release tag ordering and incrementing
//!
//! DLS release names are not semver. `4-5beta2dls1-3` is upstream version
//! `4-5beta2` with local patch `1-3`. Tags are compared by a key of
//! `(number, suffix)` pairs, where a bare number carries the suffix `z` so
//! that `5beta2` sorts before `5`.

use crate::core::error::ReleaseError;
use std::fmt;

/// Suffix given to a number with nothing after it
const BARE_SUFFIX: &str = "z";

/// Scalars each `dls` part is padded to
const PART_SCALARS: usize = 6;

/// Scalars the whole key is padded to
const KEY_SCALARS: usize = 12;

/// Tokens taken from each part
const TOKENS_PER_PART: usize = 4;

/// One `(number, suffix)` pair of a [`VersionKey`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyPart {
  pub number: u64,
  pub suffix: String,
}

impl KeyPart {
  fn padding() -> Self {
    Self {
      number: 0,
      suffix: String::new(),
    }
  }

  fn from_token(token: &str) -> Self {
    let digits_end = token.find(|c: char| !c.is_ascii_digit()).unwrap_or(token.len());
    if digits_end == 0 {
      return Self {
        number: 0,
        suffix: token.to_string(),
      };
    }

    let (digits, rest) = token.split_at(digits_end);
    Self {
      number: parse_saturating(digits),
      suffix: if rest.is_empty() {
        BARE_SUFFIX.to_string()
      } else {
        rest.to_string()
      },
    }
  }
}

/// Comparable form of a release tag.
///
/// Pairs compare in order; a key that is a prefix of another sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionKey(Vec<KeyPart>);

impl VersionKey {
  pub fn parts(&self) -> &[KeyPart] {
    &self.0
  }
}

impl fmt::Display for VersionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let rendered: Vec<String> = self
      .0
      .iter()
      .map(|part| format!("{}:{:?}", part.number, part.suffix))
      .collect();
    write!(f, "[{}]", rendered.join(", "))
  }
}

/// Parse a release tag into its sort key. Never fails.
pub fn normalize(tag: &str) -> VersionKey {
  let mut parts = Vec::with_capacity(KEY_SCALARS / 2);

  for part in tag.splitn(2, "dls") {
    let part = part.replace(['.', '_'], "-");
    parts.extend(part.splitn(TOKENS_PER_PART, '-').map(KeyPart::from_token));
    pad(&mut parts, PART_SCALARS);
  }
  pad(&mut parts, KEY_SCALARS);

  VersionKey(parts)
}

fn pad(parts: &mut Vec<KeyPart>, scalars: usize) {
  while parts.len() * 2 < scalars {
    parts.push(KeyPart::padding());
  }
}

fn parse_saturating(digits: &str) -> u64 {
  digits.bytes().fold(0u64, |acc, digit| {
    acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
  })
}

/// Bump the last number in a release name by one.
///
/// `0-9` becomes `0-10`, `4-5dls2` becomes `4-5dls3`. Every other character
/// is kept.
pub fn increment(release: &str) -> Result<String, ReleaseError> {
  let runs = digit_runs(release);
  let Some(last) = runs.iter().rposition(|run| run.starts_with(|c: char| c.is_ascii_digit())) else {
    return Err(ReleaseError::NoNumericComponent {
      release: release.to_string(),
    });
  };

  let mut incremented = String::with_capacity(release.len() + 1);
  for (index, run) in runs.iter().enumerate() {
    if index == last {
      incremented.push_str(&add_one(run));
    } else {
      incremented.push_str(run);
    }
  }
  Ok(incremented)
}

/// Split into alternating runs of ASCII digits and everything else
fn digit_runs(value: &str) -> Vec<&str> {
  let mut runs = Vec::new();
  let mut start = 0;
  let mut previous_digit = None;

  for (index, c) in value.char_indices() {
    let is_digit = c.is_ascii_digit();
    if previous_digit.is_some_and(|previous| previous != is_digit) {
      runs.push(&value[start..index]);
      start = index;
    }
    previous_digit = Some(is_digit);
  }
  if start < value.len() {
    runs.push(&value[start..]);
  }
  runs
}

/// Decimal `digits + 1`, without leading zeros
fn add_one(digits: &str) -> String {
  let trimmed = digits.trim_start_matches('0');
  let mut bytes: Vec<u8> = trimmed.bytes().collect();

  let mut carry = true;
  for byte in bytes.iter_mut().rev() {
    if *byte == b'9' {
      *byte = b'0';
    } else {
      *byte += 1;
      carry = false;
      break;
    }
  }
  if carry {
    bytes.insert(0, b'1');
  }

  bytes.into_iter().map(char::from).collect()
}
