use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use crate::commands::{auth, bus, configure, list};
use crate::config::Config;
use crate::core::data::{BusStatus, Role};
use crate::core::query::DateFilter;
use crate::dictation::Language;
use crate::utils::error::AppResult;

#[derive(Parser)]
#[command(name = "chalobus")]
#[command(about = "Community bus-tracking board: report and check live bus status")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Show storage-level debug logs")]
    pub debug: bool,

    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Log board changes (-vv for debug)"
    )]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Only log errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Commands {
    pub fn execute(self, config: Config) -> AppResult<()> {
        match self {
            Commands::Register(args) => auth::handle_register_command(&config, &args),
            Commands::Login(args) => auth::handle_login_command(&config, &args),
            Commands::Logout => auth::handle_logout_command(&config),
            Commands::Whoami => auth::handle_whoami_command(&config),
            Commands::Profile(args) => auth::handle_profile_command(&config, &args),
            Commands::List(args) => list::handle_list_command(&config, &args),
            Commands::Show(args) => bus::handle_show_command(&config, &args),
            Commands::Add(args) => bus::handle_add_command(&config, &args),
            Commands::Edit(args) => bus::handle_edit_command(&config, &args),
            Commands::Status(args) => bus::handle_status_command(&config, &args),
            Commands::Delete(args) => bus::handle_delete_command(&config, &args),
            Commands::Config(args) => configure::handle_config_command(config, args.command),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a passenger or conductor account
    Register(RegisterArgs),

    /// Sign in with phone number and password
    Login(LoginArgs),

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Show or update your profile
    Profile(ProfileArgs),

    /// List buses, optionally searching and filtering by date
    List(ListArgs),

    /// Show one bus in detail
    Show(ShowArgs),

    /// Add a bus (admins and conductors)
    Add(AddArgs),

    /// Edit a bus (admins and conductors)
    Edit(EditArgs),

    /// Report the live status of a bus
    Status(StatusArgs),

    /// Delete a bus (admins and conductors)
    Delete(DeleteArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub phone: Option<String>,

    #[arg(long, help = "Password (prompted without echo when omitted)")]
    pub password: Option<String>,

    #[arg(short, long, value_enum, default_value_t = Role::Passenger)]
    pub role: Role,
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub phone: Option<String>,

    #[arg(long, help = "Password (prompted without echo when omitted)")]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct ProfileArgs {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(
        long,
        value_name = "PATH_OR_URL",
        help = "Profile photo; pass an empty string to remove it"
    )]
    pub photo: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(help = "Search bus name or number")]
    pub query: Option<String>,

    #[arg(short, long, value_enum, help = "Date availability filter (defaults to config)")]
    pub date: Option<DateFilter>,

    #[arg(long, help = "Speak the search text instead of typing it")]
    pub voice: bool,

    #[arg(long, value_enum, help = "Dictation language (defaults to config)")]
    pub lang: Option<Language>,

    #[arg(short, long, value_enum)]
    pub format: Option<ListFormat>,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(help = "Bus ID or registration number")]
    pub identifier: String,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short = 'N', long)]
    pub number: Option<String>,

    #[arg(short, long, help = "Comma-separated route stops")]
    pub stops: Option<String>,

    #[arg(long, default_value_t = true, action = ArgAction::Set, help = "Runs tomorrow")]
    pub tomorrow: bool,

    #[arg(
        long = "next-week",
        default_value_t = true,
        action = ArgAction::Set,
        help = "Runs within the next 7 days"
    )]
    pub next_week: bool,
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(help = "Bus ID or registration number")]
    pub identifier: String,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short = 'N', long)]
    pub number: Option<String>,

    #[arg(short, long, help = "Comma-separated route stops (replaces the route)")]
    pub stops: Option<String>,

    #[arg(long)]
    pub tomorrow: Option<bool>,

    #[arg(long = "next-week")]
    pub next_week: Option<bool>,
}

#[derive(Args)]
pub struct StatusArgs {
    #[arg(help = "Bus ID or registration number")]
    pub identifier: String,

    #[arg(value_enum)]
    pub status: BusStatus,

    #[arg(long, help = "How late the bus is, e.g. 15, 15m, 1h30m")]
    pub delay: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(help = "Bus ID or registration number")]
    pub identifier: String,

    #[arg(short, long)]
    pub force: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum ListFormat {
    Simple,
    Detailed,
    Table,
    Json,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Open,

    /// Reset configuration to defaults
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_args() {
        let cli =
            Cli::try_parse_from(["chalobus", "list", "express", "-d", "7days", "-f", "json"])
                .unwrap();
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.query.as_deref(), Some("express"));
                assert_eq!(args.date, Some(DateFilter::Next7Days));
                assert_eq!(args.format, Some(ListFormat::Json));
                assert!(!args.voice);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_status_args() {
        let cli = Cli::try_parse_from([
            "chalobus",
            "status",
            "AP 10 K 5566",
            "delayed",
            "--delay",
            "1h",
        ])
        .unwrap();
        match cli.command {
            Commands::Status(args) => {
                assert_eq!(args.identifier, "AP 10 K 5566");
                assert_eq!(args.status, BusStatus::Delayed);
                assert_eq!(args.delay.as_deref(), Some("1h"));
            }
            _ => panic!("expected status"),
        }
        assert!(Cli::try_parse_from(["chalobus", "status", "x", "late"]).is_err());
    }

    #[test]
    fn test_add_availability_defaults() {
        let cli = Cli::try_parse_from([
            "chalobus",
            "add",
            "-n",
            "Town",
            "-N",
            "T1",
            "--tomorrow",
            "false",
        ])
        .unwrap();
        match cli.command {
            Commands::Add(args) => {
                assert!(!args.tomorrow);
                assert!(args.next_week);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["chalobus", "whoami", "-vv", "--debug"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.debug);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_register_role_default() {
        let cli = Cli::try_parse_from(["chalobus", "register", "-p", "999"]).unwrap();
        match cli.command {
            Commands::Register(args) => assert_eq!(args.role, Role::Passenger),
            _ => panic!("expected register"),
        }
    }
}
