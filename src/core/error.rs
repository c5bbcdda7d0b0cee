//! Error types for dls-ade with contextual messages and exit codes
//!
//! A single top-level error type groups failures by category. Every category
//! can supply a help message pointing the user at a fix.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for dls-ade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (bad arguments, unknown release, bad config)
  User = 1,
  /// System error (git, build queue, I/O)
  System = 2,
  /// Validation failure (inconsistent EPICS versions, area table mismatch)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for dls-ade
#[derive(Debug)]
pub enum AdeError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Environment and path classification errors
  Site(SiteError),

  /// Release decision errors
  Release(ReleaseError),

  /// Build submission errors
  Build(BuildError),

  /// Validation errors (argument combinations, EPICS consistency)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl AdeError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    AdeError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    AdeError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      AdeError::Message { message, context, help } => AdeError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      AdeError::Io(e) => AdeError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      AdeError::Config(_) => ExitCode::User,
      AdeError::Git(GitError::RefNotFound { .. }) => ExitCode::User,
      AdeError::Git(_) => ExitCode::System,
      AdeError::Site(SiteError::PathClassificationInconsistency { .. }) => ExitCode::Validation,
      AdeError::Site(_) => ExitCode::User,
      AdeError::Release(_) => ExitCode::User,
      AdeError::Build(_) => ExitCode::System,
      AdeError::Validation(_) => ExitCode::Validation,
      AdeError::Io(_) => ExitCode::System,
      AdeError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      AdeError::Config(e) => e.help_message(),
      AdeError::Git(e) => e.help_message(),
      AdeError::Site(e) => e.help_message(),
      AdeError::Release(e) => e.help_message(),
      AdeError::Build(e) => e.help_message(),
      AdeError::Validation(e) => e.help_message(),
      AdeError::Message { help, .. } => help.clone(),
      AdeError::Io(_) => None,
    }
  }
}

impl fmt::Display for AdeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AdeError::Config(e) => write!(f, "{}", e),
      AdeError::Git(e) => write!(f, "{}", e),
      AdeError::Site(e) => write!(f, "{}", e),
      AdeError::Release(e) => write!(f, "{}", e),
      AdeError::Build(e) => write!(f, "{}", e),
      AdeError::Validation(e) => write!(f, "{}", e),
      AdeError::Io(e) => write!(f, "I/O error: {}", e),
      AdeError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for AdeError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      AdeError::Io(e) => Some(e),
      AdeError::Release(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for AdeError {
  fn from(err: io::Error) -> Self {
    AdeError::Io(err)
  }
}

impl From<String> for AdeError {
  fn from(msg: String) -> Self {
    AdeError::message(msg)
  }
}

impl From<&str> for AdeError {
  fn from(msg: &str) -> Self {
    AdeError::message(msg)
  }
}

impl From<ReleaseError> for AdeError {
  fn from(err: ReleaseError) -> Self {
    AdeError::Release(err)
  }
}

impl From<SiteError> for AdeError {
  fn from(err: SiteError) -> Self {
    AdeError::Site(err)
  }
}

impl From<toml_edit::de::Error> for AdeError {
  fn from(err: toml_edit::de::Error) -> Self {
    AdeError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for AdeError {
  fn from(err: serde_json::Error) -> Self {
    AdeError::message(format!("JSON error: {}", err))
  }
}

impl From<ini::Error> for AdeError {
  fn from(err: ini::Error) -> Self {
    AdeError::message(format!("INI parse error: {}", err))
  }
}

impl From<regex::Error> for AdeError {
  fn from(err: regex::Error) -> Self {
    AdeError::message(format!("Invalid pattern: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for AdeError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    AdeError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Missing required field
  MissingField { field: String },

  /// Field present but unusable
  InvalidValue { field: String, value: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingField { field } => Some(format!("Set `{}` in ade.toml or remove the empty entry.", field)),
      ConfigError::InvalidValue { field, .. } => Some(format!("Check the value of `{}` in ade.toml.", field)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidValue { field, value } => {
        write!(f, "Invalid value for {} in config: '{}'", field, value)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Reference does not name a commit in the repository
  RefNotFound { reference: String },

  /// Clone of a module repository failed
  CloneFailed { url: String, stderr: String },

  /// Pushing a new tag failed
  PushFailed {
    remote: String,
    tag: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("already exists") {
          Some("Another release created this tag first. List releases and pick a new name.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check that your SSH key is registered with the git server.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Clone the module first or check the path: {}",
        path.display()
      )),
      GitError::RefNotFound { .. } => Some("Check the commit given with -c exists on the server.".to_string()),
      GitError::CloneFailed { .. } => {
        Some("Check the module name and area, or pass --repo to use a local checkout.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::RefNotFound { reference } => write!(f, "Commit {} not found in the repository", reference),
      GitError::CloneFailed { url, stderr } => {
        write!(f, "Failed to clone {}\n{}", url, stderr)
      }
      GitError::PushFailed { remote, tag, reason } => {
        write!(f, "Push of tag {} to {} failed: {}", tag, remote, reason)
      }
    }
  }
}

/// Environment, area table and path classification errors
#[derive(Debug)]
pub enum SiteError {
  /// Explicit EPICS version does not look like R3.14.12.3
  MalformedToolchainVersion { value: String },

  /// Explicit RHEL version is not a major version number
  MalformedRhelVersion { value: String },

  /// Area is not in the area table
  UnsupportedArea { name: String },

  /// Classified path does not sit under the root of its own area.
  /// This is an area table bug, not bad user input.
  PathClassificationInconsistency { path: PathBuf, root: PathBuf },
}

impl SiteError {
  fn help_message(&self) -> Option<String> {
    match self {
      SiteError::MalformedToolchainVersion { .. } => {
        Some("Expected an EPICS version like R3.14.12.3 (optionally with a _64 suffix).".to_string())
      }
      SiteError::MalformedRhelVersion { .. } => Some("Give the RHEL major version only, e.g. -r 7.".to_string()),
      SiteError::UnsupportedArea { .. } => Some(format!(
        "Supported areas are: {}",
        crate::site::Area::ALL
          .iter()
          .map(|a| a.as_str())
          .collect::<Vec<_>>()
          .join(", ")
      )),
      SiteError::PathClassificationInconsistency { .. } => {
        Some("Please report this; the area table disagrees with itself.".to_string())
      }
    }
  }
}

impl fmt::Display for SiteError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SiteError::MalformedToolchainVersion { value } => {
        write!(f, "Expected epics version like R3.14.8.2, got: {}", value)
      }
      SiteError::MalformedRhelVersion { value } => write!(f, "Expected rhel version like 7, got: {}", value),
      SiteError::UnsupportedArea { name } => write!(f, "Area '{}' is not supported", name),
      SiteError::PathClassificationInconsistency { path, root } => {
        write!(f, "'{}' should start with '{}'", path.display(), root.display())
      }
    }
  }
}

/// Errors produced while deciding what to release
///
/// These are expected outcomes of user input. No side effect has happened
/// when one of them is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseError {
  /// Release requested without a commit, but no such tag exists
  NotFound { release: String },

  /// Release requested at a commit, but the tag is already taken
  AlreadyExists { release: String },

  /// Release name breaks the area's naming convention even after normalisation
  InvalidName { release: String },

  /// Previous release has no number to increment
  NoNumericComponent { release: String },

  /// Neither a release, a commit nor the next version was requested
  MissingRelease,
}

impl ReleaseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::NotFound { .. } => {
        Some("Pass --commit to create the tag, or run `dls-ade list-releases` to see existing tags.".to_string())
      }
      ReleaseError::AlreadyExists { .. } => Some("Drop --commit to rebuild the existing release.".to_string()),
      ReleaseError::InvalidName { .. } => Some("Release names look like 1-0, 1-0-2 or 4-5dls1-3.".to_string()),
      ReleaseError::NoNumericComponent { .. } => {
        Some("Give the release name explicitly; the last release cannot be incremented.".to_string())
      }
      ReleaseError::MissingRelease => Some("Give a release, use --next-version, or test a --commit.".to_string()),
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::NotFound { release } => {
        write!(f, "Release {} not found and commit not specified.", release)
      }
      ReleaseError::AlreadyExists { release } => write!(f, "Release {} already exists.", release),
      ReleaseError::InvalidName { release } => write!(f, "Release {} could not be made valid.", release),
      ReleaseError::NoNumericComponent { release } => {
        write!(f, "Release {} has no numeric component to increment.", release)
      }
      ReleaseError::MissingRelease => write!(
        f,
        "Module release not specified; required unless testing a specified commit, or requesting next version."
      ),
    }
  }
}

impl std::error::Error for ReleaseError {}

/// Build submission errors
#[derive(Debug)]
pub enum BuildError {
  /// Queue directory missing
  QueueMissing { path: PathBuf },

  /// Writing the build request failed
  SubmitFailed { job: String, reason: String },
}

impl BuildError {
  fn help_message(&self) -> Option<String> {
    match self {
      BuildError::QueueMissing { .. } => Some("Set [build] queue in ade.toml to an existing directory.".to_string()),
      BuildError::SubmitFailed { .. } => None,
    }
  }
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::QueueMissing { path } => {
        write!(f, "Build queue directory does not exist: {}", path.display())
      }
      BuildError::SubmitFailed { job, reason } => {
        write!(f, "Failed to submit build job {}: {}", job, reason)
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// Command line options that cannot be combined
  InvalidArguments { reason: String },

  /// Module was last built against a different EPICS version
  EpicsMismatch { module_epics: String, build_epics: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::InvalidArguments { .. } => Some("Run `dls-ade release --help` for usage.".to_string()),
      ValidationError::EpicsMismatch { build_epics, .. } => Some(format!(
        "Pass `-e {}` to release under this EPICS version anyway.",
        build_epics
      )),
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::InvalidArguments { reason } => write!(f, "{}", reason),
      ValidationError::EpicsMismatch {
        module_epics,
        build_epics,
      } => {
        write!(
          f,
          "You are trying to release a {} module under {} without using the -e flag",
          module_epics, build_epics
        )
      }
    }
  }
}

/// Result type alias for dls-ade
pub type AdeResult<T> = Result<T, AdeError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> AdeResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> AdeResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<AdeError>,
{
  fn context(self, ctx: impl Into<String>) -> AdeResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> AdeResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &AdeError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
