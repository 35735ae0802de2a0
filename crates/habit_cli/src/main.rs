//! Command-line driver for the habit tracker core.
//!
//! Every invocation opens the SQLite store, restores the persisted session,
//! runs one command and exits.

mod cli;
mod error;

use clap::Parser;
use habit_core::db::open_db;
use habit_core::{
    default_log_level, init_logging, sort_items_for_display, top_behaviors, Behavior,
    BehaviorColor, BehaviorError, KeyValueStore, SqliteStore, Tracker,
};

use log::info;

use crate::cli::{BehaviorCommand, Cli, Command, ItemCommand};
use crate::error::CliError;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let Cli {
        db,
        log_dir,
        log_level,
        command,
    } = Cli::parse();

    if let Some(log_dir) = log_dir {
        let level = log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, &log_dir)?;
    }

    if let Command::Ping = command {
        println!("habit_core ping={}", habit_core::ping());
        println!("habit_core version={}", habit_core::core_version());
        return Ok(());
    }

    let conn = open_db(&db)?;
    let store = SqliteStore::try_new(&conn)?;
    let mut tracker = Tracker::start(&store)?;
    info!(
        "event=cli_run module=cli status=start signed_in={}",
        tracker.current_user().is_some()
    );

    match command {
        Command::Ping => {}
        Command::Register(args) => {
            let user = tracker.register(&args.username, &args.email, &args.password)?;
            println!("registered {} <{}> id={}", user.username, user.email, user.id);
        }
        Command::Login(args) => {
            let user = tracker.login(&args.email, &args.password)?;
            println!("signed in as {} <{}>", user.username, user.email);
        }
        Command::Logout => {
            tracker.logout();
            println!("signed out");
        }
        Command::Whoami => match tracker.current_user() {
            Some(user) => println!("{} <{}> id={}", user.username, user.email, user.id),
            None => println!("not signed in"),
        },
        Command::Behavior(command) => run_behavior(&mut tracker, command)?,
        Command::Item(command) => run_item(&mut tracker, command)?,
    }

    Ok(())
}

fn run_behavior<S: KeyValueStore + ?Sized>(
    tracker: &mut Tracker<'_, S>,
    command: BehaviorCommand,
) -> Result<(), CliError> {
    match command {
        BehaviorCommand::List => {
            let behaviors = tracker.behaviors_mut().list()?;
            if behaviors.is_empty() {
                println!("no behaviors");
            }
            for behavior in &behaviors {
                println!("{}", format_behavior_line(behavior));
            }
        }
        BehaviorCommand::Top(args) => {
            let behaviors = tracker.behaviors_mut().list()?;
            for behavior in top_behaviors(&behaviors, args.limit) {
                println!("{}", format_behavior_line(behavior));
            }
        }
        BehaviorCommand::Show(args) => match tracker.behaviors().get(&args.id) {
            Some(behavior) => print!("{}", format_behavior_detail(behavior)),
            None => println!("behavior not found: {}", args.id),
        },
        BehaviorCommand::Create(args) => {
            let color: BehaviorColor = args.color.parse()?;
            let behavior = tracker
                .behaviors_mut()
                .create(&args.title, &args.description, color)?;
            println!("created behavior {}", behavior.id);
        }
        BehaviorCommand::Delete(args) => {
            tracker.behaviors_mut().delete(&args.id)?;
            println!("deleted behavior {}", args.id);
        }
    }
    Ok(())
}

fn run_item<S: KeyValueStore + ?Sized>(
    tracker: &mut Tracker<'_, S>,
    command: ItemCommand,
) -> Result<(), CliError> {
    match command {
        ItemCommand::Add(args) => {
            let item = tracker
                .behaviors_mut()
                .add_item(&args.behavior_id, &args.text)?;
            println!("added item {}", item.id);
        }
        ItemCommand::Update(args) => {
            let repo = tracker.behaviors();
            if repo.owner().is_none() {
                return Err(BehaviorError::NotAuthenticated.into());
            }
            let behavior = repo
                .get(&args.behavior_id)
                .ok_or_else(|| BehaviorError::BehaviorNotFound(args.behavior_id.clone()))?;
            let item = behavior
                .item(&args.item_id)
                .ok_or_else(|| BehaviorError::ItemNotFound {
                    behavior_id: args.behavior_id.clone(),
                    item_id: args.item_id.clone(),
                })?;
            let text = args.text.unwrap_or_else(|| item.text.clone());
            let completed = args.completed.unwrap_or(item.completed);
            tracker
                .behaviors_mut()
                .update_item(&args.behavior_id, &args.item_id, &text, completed)?;
            println!("updated item {}", args.item_id);
        }
        ItemCommand::Remove(args) => {
            tracker
                .behaviors_mut()
                .delete_item(&args.behavior_id, &args.item_id)?;
            println!("removed item {}", args.item_id);
        }
    }
    Ok(())
}

fn format_behavior_line(behavior: &Behavior) -> String {
    let stats = behavior.completion();
    format!(
        "{}  [{}] {}  {}/{} ({}%)",
        behavior.id, behavior.color, behavior.title, stats.completed, stats.total, stats.percentage
    )
}

fn format_behavior_detail(behavior: &Behavior) -> String {
    let stats = behavior.completion();
    let mut out = format!("{}\n", format_behavior_line(behavior));
    if !behavior.description.is_empty() {
        out.push_str(&format!("  {}\n", behavior.description_preview()));
    }
    out.push_str(&format!(
        "  {} of {} items completed\n",
        stats.completed, stats.total
    ));
    for item in sort_items_for_display(&behavior.items) {
        let mark = if item.completed { "x" } else { " " };
        out.push_str(&format!("  [{mark}] {}  {}\n", item.id, item.text));
    }
    out
}
