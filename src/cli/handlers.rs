use std::error::Error;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::outline_store::OutlineStore;
use crate::logging;
use crate::mindmap::{self, MindMap};
use crate::model::config::Config;
use crate::ops::check::check_outline;
use crate::parse::{clean_text, decorate_title, parse_outline};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = config_io::load_config(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.mindmap.root = root;
    }
    logging::init(&config.log.level);

    let json = cli.json;
    match cli.command {
        // Write commands
        Commands::Init => cmd_init(&config),
        Commands::Add(args) => cmd_add(&config, args),
        Commands::Sub(args) => cmd_sub(&config, args),
        Commands::Status(args) => cmd_status(&config, args, json),

        // Read commands
        Commands::Show(args) => cmd_show(&config, args, json),
        Commands::Check(args) => cmd_check(&config, args, json),
        Commands::Days => cmd_days(&config, json),
        Commands::Clean(args) => {
            println!("{}", clean_text(&args.text));
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Run `f` against a fresh updater, then stop it so the event is on disk
/// before the process exits
fn with_mind_map(config: &Config, f: impl FnOnce(&dyn MindMap)) -> Result<u64, Box<dyn Error>> {
    let mm: Arc<dyn MindMap> = mindmap::build_mind_map(&config.mindmap)?;
    f(mm.as_ref());
    mm.stop();
    let processed = mm.processed_count();
    tracing::info!(processed, "mind map events applied");
    Ok(processed)
}

fn report_disabled(config: &Config) -> bool {
    if !config.mindmap.enabled {
        eprintln!("mind map tracking is disabled in the config");
    }
    !config.mindmap.enabled
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_init(config: &Config) -> Result<(), Box<dyn Error>> {
    with_mind_map(config, |mm| mm.initialize_daily_mind_map(today()))?;
    if !report_disabled(config) {
        let store = OutlineStore::new(&config.mindmap.root);
        println!("{}", store.path_for(today()).display());
    }
    Ok(())
}

fn cmd_add(config: &Config, args: AddArgs) -> Result<(), Box<dyn Error>> {
    let id = args.id.as_deref().unwrap_or(&args.title);
    with_mind_map(config, |mm| mm.append_task(id, &args.title))?;
    if !report_disabled(config) {
        println!("{}", clean_text(&args.title));
    }
    Ok(())
}

fn cmd_sub(config: &Config, args: SubArgs) -> Result<(), Box<dyn Error>> {
    let id = args.id.as_deref().unwrap_or(&args.title);
    with_mind_map(config, |mm| mm.append_subtask(&args.parent, id, &args.title))?;
    if !report_disabled(config) {
        println!("{} > {}", clean_text(&args.parent), clean_text(&args.title));
    }
    Ok(())
}

fn cmd_status(config: &Config, args: StatusArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let processed = with_mind_map(config, |mm| match &args.parent {
        Some(parent) => mm.update_subtask_status(parent, &args.task, args.status),
        None => mm.update_task_status(&args.task, args.status),
    })?;

    // What the notes file would show for this task now
    let line = decorate_title(&args.task, args.status, today());
    if json {
        let out = StatusJson {
            task: clean_text(&args.task),
            parent: args.parent.as_deref().map(clean_text),
            status: args.status,
            line,
            processed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        report_disabled(config);
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(config: &Config, args: ShowArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let store = OutlineStore::new(&config.mindmap.root);
    let date = args.date.unwrap_or_else(today);
    let content = store.read_to_string(date)?;
    let outline = parse_outline(&content);

    if json {
        let out = ShowJson {
            path: store.path_for(date).display().to_string(),
            outline: &outline,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", format_outline(&outline));
    }
    Ok(())
}

fn cmd_check(config: &Config, args: ShowArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let store = OutlineStore::new(&config.mindmap.root);
    let date = args.date.unwrap_or_else(today);
    let content = store.read_to_string(date)?;
    let result = check_outline(&content, Some(date));

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_check(&result));
    }
    if !result.valid {
        return Err(format!("{} has structural errors", store.path_for(date).display()).into());
    }
    Ok(())
}

fn cmd_days(config: &Config, json: bool) -> Result<(), Box<dyn Error>> {
    let store = OutlineStore::new(&config.mindmap.root);
    let dates: Vec<String> = store
        .list_dates()?
        .into_iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&dates)?);
    } else {
        for date in dates {
            println!("{}", date);
        }
    }
    Ok(())
}
