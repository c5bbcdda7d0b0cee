//! Release versioning
//!
//! - **version**: tag sort keys and incrementing
//! - **set**: the releases of a module, in release order
//! - **tag_name**: per-area naming conventions for new tags
//! - **decision**: what to release and whether to tag first
//!
//! Nothing here touches git or the filesystem. Tags come in as a
//! [`ReleaseSet`]; a [`ReleaseDecision`] goes out to the caller, which owns
//! tagging and build submission.

pub mod decision;
pub mod set;
pub mod tag_name;
pub mod version;

pub use decision::{ReleaseDecision, ReleaseRequest, determine_version_to_release};
pub use set::{ReleaseSet, sort_by_release};
pub use tag_name::{DlsTagConvention, TagValidator, normalize_release_name};
pub use version::{VersionKey, increment, normalize};
