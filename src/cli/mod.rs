//! Command-line interface for daisy
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command family is implemented in its own submodule.

use clap::{Parser, Subcommand};

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::Planner;
use crate::output::OutputOptions;
use crate::session::Session;

mod auth;
mod planner;
mod task;
mod view;
mod weather;

/// daisy - personal task planner
///
/// A CLI client for the daisy planner service: planners, slot-tagged
/// tasks, daily/weekly/monthly views, and a weather widget.
#[derive(Parser, Debug)]
#[command(name = "daisy")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to the daisy config directory)
    #[arg(long, global = true, env = "DAISY_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    /// Backend API base URL (overrides the config file)
    #[arg(long, global = true, env = "DAISY_API_URL")]
    pub api_url: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Account email
        email: String,

        /// Password (prefer the environment variable over the flag)
        #[arg(long, env = "DAISY_PASSWORD")]
        password: String,
    },

    /// Create an account
    Register {
        /// Username
        username: String,

        /// Account email
        email: String,

        /// Password
        #[arg(long, env = "DAISY_PASSWORD")]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Profile management
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Planner management
    #[command(subcommand)]
    Planner(PlannerCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Daily view: one day, one row per hour
    Day(view::DayArgs),

    /// Weekly view: Sunday-anchored week of hour slots
    Week(view::WeekArgs),

    /// Monthly view and day notes
    #[command(subcommand)]
    Month(view::MonthCommands),

    /// Current weather for a city
    Weather {
        /// City name (defaults to [weather] city from config)
        city: Option<String>,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Set the profile location (used as the default weather city)
    SetLocation {
        /// City or place name
        location: String,
    },
}

/// Planner subcommands
#[derive(Subcommand, Debug)]
pub enum PlannerCommands {
    /// List planners
    Ls,

    /// Create a planner
    New {
        /// Planner name
        name: String,

        /// View granularity: daily, weekly, monthly
        #[arg(long, default_value = "daily")]
        view: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to a planner slot
    Add {
        /// Planner name or id
        planner: String,

        /// Note text (the slot tag is synthesized, not typed)
        note: String,

        /// Slot date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Slot hour 0-23 (omit for a date-only monthly slot)
        #[arg(long)]
        hour: Option<u32>,

        /// Skip slot tagging entirely
        #[arg(long)]
        plain: bool,
    },

    /// List tasks in a planner
    Ls {
        /// Planner name or id
        planner: String,

        /// Only show pending or completed tasks
        #[arg(long)]
        status: Option<String>,
    },

    /// Mark a task completed
    Done {
        /// Task id
        id: i64,
    },

    /// Mark a task pending again
    Reopen {
        /// Task id
        id: i64,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: i64,
    },

    /// Replace a task's note, keeping its slot tag.
    ///
    /// The backend has no update endpoint, so this deletes the old task and
    /// creates a new one; if the create fails the old task is already gone.
    Edit {
        /// Planner name or id
        planner: String,

        /// Task id
        id: i64,

        /// New note text
        note: String,
    },
}

/// Per-invocation context shared by command handlers.
pub struct Context {
    pub config: Config,
    pub session: Session,
    pub options: OutputOptions,
}

impl Context {
    fn new(cli: &Cli) -> Result<Self> {
        let mut config = Config::load_or_default(cli.config.as_deref())?;
        if let Some(api_url) = &cli.api_url {
            config.api.base_url = api_url.clone();
        }
        Ok(Self {
            config,
            session: Session::default_location()?,
            options: OutputOptions {
                json: cli.json,
                quiet: cli.quiet,
            },
        })
    }

    /// Client without a session token, for login/register.
    pub fn anonymous_client(&self) -> Result<ApiClient> {
        ApiClient::new(self.config.api.base_url.clone(), None)
    }

    /// Client carrying the stored session token. Fails fast when logged
    /// out instead of round-tripping a doomed request.
    pub fn client(&self) -> Result<ApiClient> {
        let token = self.session.require_token()?;
        ApiClient::new(self.config.api.base_url.clone(), Some(token))
    }

    /// Drop the stored token when the backend rejected it, so the next
    /// command starts from a clean logged-out state.
    pub fn handle_auth_failure(&self, err: &Error) {
        if matches!(err, Error::SessionExpired) {
            if let Err(clear_err) = self.session.clear() {
                tracing::warn!(error = %clear_err, "failed to clear session token");
            }
        }
    }
}

/// Find a planner by id or (case-insensitive) name.
pub async fn resolve_planner(client: &ApiClient, name_or_id: &str) -> Result<Planner> {
    let planners = client.planners().await?;

    if let Ok(id) = name_or_id.parse::<i64>() {
        if let Some(planner) = planners.iter().find(|p| p.id == id) {
            return Ok(planner.clone());
        }
    }

    planners
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name_or_id))
        .ok_or_else(|| Error::PlannerNotFound(name_or_id.to_string()))
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let ctx = Context::new(&self)?;
        let runtime = tokio::runtime::Runtime::new()?;

        let result = runtime.block_on(async {
            match &self.command {
                Commands::Login { email, password } => auth::login(&ctx, email, password).await,
                Commands::Register {
                    username,
                    email,
                    password,
                } => auth::register(&ctx, username, email, password).await,
                Commands::Logout => auth::logout(&ctx),
                Commands::Whoami => auth::whoami(&ctx).await,
                Commands::Profile(cmd) => match cmd {
                    ProfileCommands::SetLocation { location } => {
                        auth::set_location(&ctx, location).await
                    }
                },
                Commands::Planner(cmd) => match cmd {
                    PlannerCommands::Ls => planner::list(&ctx).await,
                    PlannerCommands::New { name, view } => planner::create(&ctx, name, view).await,
                },
                Commands::Task(cmd) => task::run(&ctx, cmd).await,
                Commands::Day(args) => view::day(&ctx, args).await,
                Commands::Week(args) => view::week(&ctx, args).await,
                Commands::Month(cmd) => view::month(&ctx, cmd).await,
                Commands::Weather { city } => weather::show(&ctx, city.as_deref()).await,
            }
        });

        if let Err(err) = &result {
            ctx.handle_auth_failure(err);
        }
        result
    }
}

/// Parse a `YYYY-MM-DD` argument, defaulting to today.
pub fn parse_date_arg(date: Option<&str>) -> Result<chrono::NaiveDate> {
    match date {
        Some(raw) => chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            Error::InvalidArgument(format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
