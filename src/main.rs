use clap::{Parser, Subcommand};
use dls_ade::commands::{self, ListReleasesArgs, ReleaseArgs};
use dls_ade::core::context::{AdeContext, EnvironmentOverrides};
use dls_ade::core::error::{AdeError, print_error};
use dls_ade::core::telemetry::{init_tracing, level_for_verbosity};
use std::path::PathBuf;

/// Release DLS modules and find where they live
#[derive(Parser)]
#[command(name = "dls-ade")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// EPICS version, e.g. R3.14.12.7 (default: $DLS_EPICS_RELEASE)
  #[arg(short, long, global = true)]
  epics: Option<String>,

  /// RHEL major version (default: probed from /etc/os-release)
  #[arg(short, long, global = true)]
  rhel: Option<String>,

  /// More logging (-v info, -vv debug, -vvv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Log as JSON lines
  #[arg(long, global = true)]
  log_json: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Tag a release and submit it to the build server
  Release {
    /// Name of the module to release
    module: String,
    /// Release number, e.g. 1-0 (not needed with -n, or -c with -T)
    release: Option<String>,
    /// Area of the module
    #[arg(short, long, default_value = "support")]
    area: String,
    /// Use the next version number as the release version
    #[arg(short, long)]
    next_version: bool,
    /// Create the release tag at this commit
    #[arg(short, long)]
    commit: Option<String>,
    /// Added to the tag message "<module>: Released version <release>."
    #[arg(short, long, default_value = "")]
    message: String,
    /// Only do a test build on the build server
    #[arg(short = 'T', long)]
    test_only: bool,
    /// Rebuild even if the release already exists in prod
    #[arg(short, long)]
    force: bool,
    /// Use a local checkout instead of cloning from the server
    #[arg(long)]
    repo: Option<PathBuf>,
    /// Show the decision without tagging or submitting
    #[arg(long)]
    dry_run: bool,
  },

  /// List the releases of a module
  ListReleases {
    /// Name of the module
    module: String,
    /// Area of the module
    #[arg(short, long, default_value = "support")]
    area: String,
    /// Only show the latest release
    #[arg(short, long)]
    latest: bool,
    /// List tags in the repository instead of releases in prod
    #[arg(short, long)]
    git: bool,
    /// Read tags from a local checkout (implies --git)
    #[arg(long)]
    repo: Option<PathBuf>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show the module, area and version a directory belongs to
  Classify {
    /// Directory to classify
    path: PathBuf,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show the resolved environment and area paths
  Env {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.log_json, level_for_verbosity(cli.verbose));

  let root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // Config and environment are resolved once and shared by every command
  let overrides = EnvironmentOverrides {
    epics: cli.epics,
    rhel: cli.rhel,
  };
  let ctx = match AdeContext::build(&root, &overrides) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Release {
      module,
      release,
      area,
      next_version,
      commit,
      message,
      test_only,
      force,
      repo,
      dry_run,
    } => commands::run_release(
      &ctx,
      &ReleaseArgs {
        module,
        release,
        area,
        next_version,
        commit,
        message,
        test_only,
        force,
        repo,
        dry_run,
      },
    ),
    Commands::ListReleases {
      module,
      area,
      latest,
      git,
      repo,
      json,
    } => commands::run_list_releases(
      &ctx,
      &ListReleasesArgs {
        module,
        area,
        latest,
        git,
        repo,
        json,
      },
    ),
    Commands::Classify { path, json } => commands::run_classify(&ctx, &path, json),
    Commands::Env { json } => commands::run_env(&ctx, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: AdeError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
