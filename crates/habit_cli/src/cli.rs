use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "habit", version, about = "Track behaviors and improvement items")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        default_value = "habit_tracker.sqlite3",
        help = "SQLite database file"
    )]
    pub db: PathBuf,
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Absolute directory for rolling log files (logging is off when omitted)"
    )]
    pub log_dir: Option<String>,
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        help = "trace|debug|info|warn|error (defaults by build mode)"
    )]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print core health and version.
    Ping,
    Register(Register),
    Login(Login),
    Logout,
    /// Show the signed-in user.
    Whoami,
    #[command(subcommand)]
    Behavior(BehaviorCommand),
    #[command(subcommand)]
    Item(ItemCommand),
}

#[derive(Args, Debug)]
pub struct Register {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Args, Debug)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum BehaviorCommand {
    /// List behaviors in creation order.
    List,
    /// Behaviors with the most items first.
    Top(BehaviorTop),
    Show(BehaviorShow),
    Create(BehaviorCreate),
    Delete(BehaviorShow),
}

#[derive(Args, Debug)]
pub struct BehaviorTop {
    #[arg(long, default_value_t = habit_core::HOME_BEHAVIOR_LIMIT)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct BehaviorShow {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct BehaviorCreate {
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "indigo", help = "indigo|blue|green|yellow|red|purple|pink")]
    pub color: String,
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    Add(ItemAdd),
    Update(ItemUpdate),
    Remove(ItemRemove),
}

#[derive(Args, Debug)]
pub struct ItemAdd {
    pub behavior_id: String,
    pub text: String,
}

#[derive(Args, Debug)]
pub struct ItemUpdate {
    pub behavior_id: String,
    pub item_id: String,
    #[arg(long, help = "New text (keeps the current text when omitted)")]
    pub text: Option<String>,
    #[arg(long, help = "Completion flag (keeps the current flag when omitted)")]
    pub completed: Option<bool>,
}

#[derive(Args, Debug)]
pub struct ItemRemove {
    pub behavior_id: String,
    pub item_id: String,
}
