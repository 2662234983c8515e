//! `matchdesk` admin console
//!
//! Command line front end for the dashboard pages and dialogs.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use matchdesk_core::Config;
use matchdesk_core::types::{
    MatchFilters, MatchStatus, PhotoFilters, PhotoStatus, ReportFilters, ReportStatus,
};
use matchdesk_core::utils::selected_file_from_path;
use matchdesk_dashboard::pages::{
    MatchesPage, MediaPage, ModerationPage, OverviewPage, SettingsPage,
};
use matchdesk_dashboard::template::{TEMPLATE_FILE_NAME, write_template};
use matchdesk_dashboard::{
    AddTargetOutcome, AppState, BulkUploadDialog, BulkUploadOrchestrator, FileGesture,
    IntakeOutcome, ResultPanel, SubmitOutcome, SwipeCreationForm,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Command line interface for the matchdesk admin console
#[derive(Parser)]
#[command(
    name = "matchdesk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Admin console for the dating app backend",
    long_about = "Browse matches, photos and reports, bulk upload users from a spreadsheet, create swipes by hand and edit application settings against the admin API."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error), overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Use built-in sample data instead of the admin API
    #[arg(long)]
    offline: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Write the bulk upload CSV template
    Template {
        /// Where to write the template
        #[arg(short, long, value_name = "FILE", default_value = TEMPLATE_FILE_NAME)]
        output: PathBuf,
    },

    /// Bulk upload users from a CSV file
    Upload {
        /// Spreadsheet to upload
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Create swipes from one user toward up to five others
    Swipes {
        /// Source user id; omit to list selectable users
        #[arg(long, value_name = "USER_ID")]
        from: Option<String>,

        /// Target user id, repeatable
        #[arg(long = "to", value_name = "USER_ID")]
        targets: Vec<String>,
    },

    /// List matches
    Matches {
        /// Only matches with this status
        #[arg(short, long)]
        status: Option<MatchStatusArg>,

        /// Search by user name
        #[arg(long)]
        search: Option<String>,

        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// End this match before listing
        #[arg(long, value_name = "MATCH_ID")]
        end: Option<String>,
    },

    /// List uploaded photos
    Media {
        /// Only photos with this status
        #[arg(short, long)]
        status: Option<PhotoStatusArg>,

        /// Only photos of this user
        #[arg(long, value_name = "USER_ID")]
        user: Option<String>,

        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Approve this photo before listing
        #[arg(long, value_name = "PHOTO_ID", conflicts_with = "reject")]
        approve: Option<String>,

        /// Reject this photo before listing
        #[arg(long, value_name = "PHOTO_ID")]
        reject: Option<String>,
    },

    /// List user reports
    Reports {
        /// Only reports with this status
        #[arg(short, long)]
        status: Option<ReportStatusArg>,

        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Resolve this report before listing
        #[arg(long, value_name = "REPORT_ID", conflicts_with = "dismiss")]
        resolve: Option<String>,

        /// Dismiss this report before listing
        #[arg(long, value_name = "REPORT_ID")]
        dismiss: Option<String>,
    },

    /// Show or change application settings
    Settings {
        /// Minimum sign-up age
        #[arg(long)]
        min_age: Option<u32>,

        /// Maximum age shown in discovery
        #[arg(long)]
        max_age: Option<u32>,

        /// Discovery radius in km
        #[arg(long)]
        max_distance: Option<u32>,

        /// Swipes per user per day
        #[arg(long)]
        daily_swipes: Option<u32>,

        /// Hold new photos for moderation
        #[arg(long)]
        photo_moderation: Option<bool>,

        /// Put the app in maintenance mode
        #[arg(long)]
        maintenance: Option<bool>,
    },

    /// Show dashboard stats, activity, top locations and analytics
    Overview,

    /// Show or validate configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Match status accepted on the command line
#[derive(Clone, Copy, ValueEnum)]
enum MatchStatusArg {
    Active,
    Unmatched,
    Expired,
}

impl From<MatchStatusArg> for MatchStatus {
    fn from(arg: MatchStatusArg) -> Self {
        match arg {
            MatchStatusArg::Active => Self::Active,
            MatchStatusArg::Unmatched => Self::Unmatched,
            MatchStatusArg::Expired => Self::Expired,
        }
    }
}

/// Photo status accepted on the command line
#[derive(Clone, Copy, ValueEnum)]
enum PhotoStatusArg {
    Pending,
    Approved,
    Rejected,
}

impl From<PhotoStatusArg> for PhotoStatus {
    fn from(arg: PhotoStatusArg) -> Self {
        match arg {
            PhotoStatusArg::Pending => Self::Pending,
            PhotoStatusArg::Approved => Self::Approved,
            PhotoStatusArg::Rejected => Self::Rejected,
        }
    }
}

/// Report status accepted on the command line
#[derive(Clone, Copy, ValueEnum)]
enum ReportStatusArg {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl From<ReportStatusArg> for ReportStatus {
    fn from(arg: ReportStatusArg) -> Self {
        match arg {
            ReportStatusArg::Pending => Self::Pending,
            ReportStatusArg::Reviewed => Self::Reviewed,
            ReportStatusArg::Resolved => Self::Resolved,
            ReportStatusArg::Dismissed => Self::Dismissed,
        }
    }
}

/// Main entry point for the admin console
///
/// # Errors
///
/// Returns error if configuration, logging or the chosen command fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(ref level) = cli.log_level {
        config.logging.level.clone_from(level);
    }
    if cli.json {
        config.logging.format = "json".to_string();
    }
    matchdesk_core::init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        offline = cli.offline,
        "matchdesk starting"
    );

    if let Commands::Config { show } = cli.command {
        return handle_config_command(&config, show);
    }
    if let Commands::Template { ref output } = cli.command {
        write_template(output).await?;
        println!("Template written to {}", output.display());
        return Ok(());
    }

    let state = if cli.offline {
        AppState::offline(config)
    } else {
        AppState::new(config).context("Failed to create admin API client")?
    };

    match cli.command {
        Commands::Upload { file } => upload(&state, file).await,
        Commands::Swipes { from, targets } => swipes(&state, from, &targets).await,
        Commands::Matches {
            status,
            search,
            page,
            end,
        } => {
            let mut view = MatchesPage::new(state.service.clone(), state.config.dashboard.page_size);
            if let Some(id) = end {
                view.end_match(&id).await?;
                println!("Ended match {id}");
            }
            let filters = MatchFilters {
                status: status.map(Into::into),
                search,
            };
            view.load_with(filters, page).await;
            print!("{}", view.render());
            Ok(())
        }
        Commands::Media {
            status,
            user,
            page,
            approve,
            reject,
        } => {
            let mut view = MediaPage::new(state.service.clone(), state.config.dashboard.page_size);
            if let Some(id) = approve {
                view.approve(&id).await?;
                println!("Approved photo {id}");
            }
            if let Some(id) = reject {
                view.reject(&id).await?;
                println!("Rejected photo {id}");
            }
            let filters = PhotoFilters {
                status: status.map(Into::into),
                user_id: user,
            };
            view.load_with(filters, page).await;
            print!("{}", view.render());
            Ok(())
        }
        Commands::Reports {
            status,
            page,
            resolve,
            dismiss,
        } => {
            let mut view =
                ModerationPage::new(state.service.clone(), state.config.dashboard.page_size);
            if let Some(id) = resolve {
                view.resolve(&id).await?;
                println!("Resolved report {id}");
            }
            if let Some(id) = dismiss {
                view.dismiss(&id).await?;
                println!("Dismissed report {id}");
            }
            let filters = ReportFilters {
                status: status.map(Into::into),
            };
            view.load_with(filters, page).await;
            print!("{}", view.render());
            Ok(())
        }
        Commands::Settings {
            min_age,
            max_age,
            max_distance,
            daily_swipes,
            photo_moderation,
            maintenance,
        } => {
            let mut view = SettingsPage::new(state.service.clone());
            if !view.load().await {
                bail!(
                    "Failed to load settings: {}",
                    view.error().unwrap_or("unknown error")
                );
            }
            view.edit(|s| {
                if let Some(v) = min_age {
                    s.min_age = v;
                }
                if let Some(v) = max_age {
                    s.max_age = v;
                }
                if let Some(v) = max_distance {
                    s.max_distance_km = v;
                }
                if let Some(v) = daily_swipes {
                    s.daily_swipe_limit = v;
                }
                if let Some(v) = photo_moderation {
                    s.require_photo_moderation = v;
                }
                if let Some(v) = maintenance {
                    s.maintenance_mode = v;
                }
            });
            if view.is_dirty() {
                view.save().await?;
                println!("Settings saved");
            }
            print!("{}", view.render());
            Ok(())
        }
        Commands::Overview => {
            let mut view = OverviewPage::new(state.service.clone(), &state.config.dashboard);
            if !view.load().await {
                warn!(sections = ?view.failed_sections(), "Some overview sections are unavailable");
            }
            print!("{}", view.render());
            Ok(())
        }
        Commands::Config { .. } | Commands::Template { .. } => Ok(()),
    }
}

/// Load configuration from an explicit file or the default location
fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    Ok(config)
}

/// Handle config subcommand
fn handle_config_command(config: &Config, show: bool) -> anyhow::Result<()> {
    config.validate()?;
    if show {
        let rendered = serde_json::to_string_pretty(config)?;
        println!("{rendered}");
    } else {
        println!("Configuration is valid");
    }
    Ok(())
}

/// Run the bulk upload dialog for one file
async fn upload(state: &AppState, path: PathBuf) -> anyhow::Result<()> {
    let file = selected_file_from_path(&path)
        .with_context(|| format!("Cannot read {}", path.display()))?;

    let orchestrator = Arc::new(BulkUploadOrchestrator::new(
        state.service.clone(),
        state.config.upload.max_file_size,
    ));
    let mut dialog = BulkUploadDialog::new(orchestrator);

    if let IntakeOutcome::Rejected { name } = dialog.select(FileGesture::Picker(Some(file))) {
        bail!("{name} is not a CSV or Excel file");
    }

    let result = dialog
        .upload(|r| {
            info!(success = r.success, errors = r.error_count, "Upload complete");
        })
        .await?;
    print!("{}", ResultPanel::new(result));
    Ok(())
}

/// Run the swipe dialog: list users, or submit a selection
async fn swipes(state: &AppState, from: Option<String>, targets: &[String]) -> anyhow::Result<()> {
    let mut form = SwipeCreationForm::new(state.service.clone());
    form.load_users(state.config.dashboard.user_picker_size).await;

    if from.is_none() && targets.is_empty() {
        for user in form.users() {
            println!("{}  {}", user.id, user.label());
        }
        return Ok(());
    }

    form.set_source(from);
    for target in targets {
        match form.add_target(Some(target)) {
            AddTargetOutcome::Added | AddTargetOutcome::NoSelection => {}
            AddTargetOutcome::Duplicate => println!("Skipping {target}: already a target"),
            AddTargetOutcome::IsSource => println!("Skipping {target}: same as source user"),
            AddTargetOutcome::Full => println!("Skipping {target}: at most five targets"),
        }
    }

    match form.submit(|| println!("Swipe list refreshed")).await {
        SubmitOutcome::Created { count } => {
            println!("Created {count} swipe(s)");
            Ok(())
        }
        SubmitOutcome::Incomplete | SubmitOutcome::Failed => {
            bail!("{}", form.error().unwrap_or("Failed to create swipes"))
        }
    }
}
