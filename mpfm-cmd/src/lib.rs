//! Command implementations for the MPFM CLI.
//!
//! Every command talks to the monitoring REST API. The session token of
//! `login --remember` is kept in a JSON file between runs.

use clap::{ArgGroup, Subcommand};
use mpfm_model::alarm::AlarmStatus;
use mpfm_model::flow::TimeRange;
use std::path::PathBuf;

pub mod alarms;
pub mod assets;
pub mod auth;
pub mod chart;
pub mod session;
pub mod watch;

use chart::ChartTarget;
use session::Context;

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "MPFM_PASSWORD", hide_env_values = true)]
        password: String,

        /// Keep the session across runs
        #[arg(long)]
        remember: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Create an account
    Signup {
        #[arg(long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "MPFM_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        company: Option<String>,
    },

    /// Request a password reset email
    ForgotPassword {
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password with the token from the reset email
    ResetPassword {
        #[arg(long)]
        token: String,

        #[arg(short, long, env = "MPFM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Print the asset hierarchy with devices under their wells
    Tree {
        /// Expand every node
        #[arg(short = 'a', long)]
        expand_all: bool,

        /// Expand the node with this id and reveal its ancestors (repeatable)
        #[arg(short = 'x', long)]
        expand: Vec<String>,

        /// Attach devices to wells by well id instead of well name
        #[arg(long)]
        join_by_id: bool,
    },

    /// List devices, optionally under one hierarchy node
    Devices {
        /// List every device under this node instead of one page
        #[arg(long)]
        hierarchy: Option<String>,

        #[arg(long, default_value_t = 1, conflicts_with = "hierarchy")]
        page: u32,

        #[arg(long, default_value_t = 10, conflicts_with = "hierarchy")]
        limit: u32,

        /// Also write the listed devices to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List alarms
    Alarms {
        #[arg(long)]
        hierarchy: Option<String>,

        #[arg(long)]
        device: Option<String>,

        /// active, acknowledged or resolved
        #[arg(long)]
        status: Option<AlarmStatus>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Acknowledge or resolve an alarm
    SetAlarmStatus {
        id: String,

        /// acknowledged or resolved
        status: AlarmStatus,
    },

    /// Print the flow-rate history of a device or hierarchy node
    #[command(group(ArgGroup::new("target").required(true).args(["device", "hierarchy"])))]
    Chart {
        #[arg(long)]
        device: Option<String>,

        #[arg(long)]
        hierarchy: Option<String>,

        /// hour, day, week or month
        #[arg(short, long, default_value_t = TimeRange::Day)]
        range: TimeRange,
    },

    /// Print the dashboard summary cards
    Summary {
        #[arg(long)]
        hierarchy: Option<String>,
    },

    /// Poll a scope and print newer figures as they arrive
    Watch {
        #[arg(long)]
        hierarchy: Option<String>,

        #[arg(long)]
        device: Option<String>,

        /// Stop after this many polls
        #[arg(long)]
        ticks: Option<u64>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    let mut ctx = Context::from_env()?;
    let ctx = &mut ctx;
    match command {
        Command::Login {
            email,
            password,
            remember,
        } => auth::run_login(ctx, email, password, remember).await,
        Command::Logout => auth::run_logout(ctx),
        Command::Whoami => auth::run_whoami(ctx).await,
        Command::Signup {
            name,
            email,
            password,
            company,
        } => auth::run_signup(ctx, name, email, password, company).await,
        Command::ForgotPassword { email } => auth::run_forgot_password(ctx, email).await,
        Command::ResetPassword { token, password } => {
            auth::run_reset_password(ctx, token, password).await
        }
        Command::Tree {
            expand_all,
            expand,
            join_by_id,
        } => assets::run_tree(ctx, expand_all, expand, join_by_id).await,
        Command::Devices {
            hierarchy,
            page,
            limit,
            csv,
        } => assets::run_devices(ctx, hierarchy, page, limit, csv.as_deref()).await,
        Command::Alarms {
            hierarchy,
            device,
            status,
            page,
            limit,
        } => alarms::run_alarms(ctx, hierarchy, device, status, page, limit).await,
        Command::SetAlarmStatus { id, status } => {
            alarms::run_set_alarm_status(ctx, id, status).await
        }
        Command::Chart {
            device,
            hierarchy,
            range,
        } => {
            let target = match (device, hierarchy) {
                (Some(id), _) => ChartTarget::Device(id),
                (None, Some(id)) => ChartTarget::Hierarchy(id),
                (None, None) => anyhow::bail!("Pass --device or --hierarchy"),
            };
            chart::run_chart(ctx, target, range).await
        }
        Command::Summary { hierarchy } => assets::run_summary(ctx, hierarchy).await,
        Command::Watch {
            hierarchy,
            device,
            ticks,
        } => watch::run_watch(ctx, hierarchy, device, ticks).await,
    }
}
