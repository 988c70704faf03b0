mod init;
pub use init::cmd_init;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::project_io::{self, Project, ProjectError};
use crate::io::recovery;
use crate::model::task::{Task, TaskId, ViewMode};
use crate::ops::filter::FilterView;
use crate::session::edit::SaveTrigger;
use crate::session::{App, Intent, Outcome};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let start = start_dir(cli.project_dir.as_deref())?;

    match cli.command {
        Commands::Init(args) => cmd_init(args, &start),

        // Read commands
        Commands::List(args) => cmd_list(&start, args, json),
        Commands::Count => cmd_count(&start, json),
        Commands::Recovery => cmd_recovery(&start),

        // Write commands
        Commands::Add(args) => cmd_add(&start, args, json),
        Commands::Toggle(args) => cmd_toggle(&start, args.id, json),
        Commands::Edit(args) => cmd_edit(&start, args, json),
        Commands::Rm(args) => cmd_rm(&start, args.id, json),
        Commands::Clear => cmd_clear(&start, json),
        Commands::Mv(args) => cmd_mv(&start, args, json),
        Commands::Filter(args) => cmd_filter(&start, args.mode),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start_dir(project_dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match project_dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn load_project_from(start: &Path) -> Result<Project, ProjectError> {
    let root = project_io::discover_project(start)?;
    project_io::load_project(&root)
}

fn open_list(start: &Path) -> Result<(Project, App), ProjectError> {
    let project = load_project_from(start)?;
    let app = App::open(project.store());
    Ok((project, app))
}

/// Flush anything the session still holds. A failure here is a warning:
/// the snapshot is already in the recovery log.
fn finish(app: App) {
    if let Err(e) = app.shutdown() {
        eprintln!("warning: could not save tasks: {}", e);
    }
}

/// Tell the user about outcomes that need attention. Returns whether the
/// list changed in memory.
fn report(outcome: &Outcome) -> bool {
    match outcome {
        Outcome::Saved => true,
        Outcome::Unsaved(e) => {
            eprintln!("warning: change kept in memory only: {}", e);
            true
        }
        Outcome::Ignored(reason) => {
            eprintln!("nothing to do: {}", reason);
            false
        }
        Outcome::Refreshed | Outcome::Tracked => false,
    }
}

fn find_task(app: &App, id: TaskId) -> Option<&Task> {
    app.tasks().iter().find(|t| t.id == id)
}

fn print_task(task: &Task, project: &Project, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!(
            "{}",
            format_task_line(task, 0, project.config.ui.max_width)
        );
    }
    Ok(())
}

fn print_view(view: &FilterView, project: &Project, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        println!("{}", render_view(view, project.config.ui.max_width));
    }
    Ok(())
}

fn print_deleted(id: TaskId, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted {}", id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(start: &Path, args: ListArgs, json: bool) -> CmdResult {
    let (project, mut app) = open_list(start)?;
    let mode = args.filter.unwrap_or(project.config.view.filter);

    let rendered: Rc<RefCell<Option<FilterView>>> = Rc::new(RefCell::new(None));
    let sink = rendered.clone();
    app.subscribe(move |view| *sink.borrow_mut() = Some(view.clone()));
    app.dispatch(Intent::SetFilter(mode));

    let view = rendered.borrow_mut().take().unwrap_or_else(|| app.view());
    print_view(&view, &project, json)?;
    finish(app);
    Ok(())
}

fn cmd_count(start: &Path, json: bool) -> CmdResult {
    let (_project, app) = open_list(start)?;
    let view = app.view();
    if json {
        let out = CountJson {
            remaining: view.remaining,
            total: view.total,
            label: view.remaining_label(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", view.remaining_label());
    }
    finish(app);
    Ok(())
}

fn cmd_recovery(start: &Path) -> CmdResult {
    let project = load_project_from(start)?;
    match recovery::read_recovery_log(&project.list_dir) {
        Some(log) if !log.trim().is_empty() => print!("{}", log),
        _ => println!("Recovery log is empty"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(start: &Path, args: AddArgs, json: bool) -> CmdResult {
    let (project, mut app) = open_list(start)?;
    let outcome = app.dispatch(Intent::Add(args.text.join(" ")));
    if report(&outcome)
        && let Some(task) = app.tasks().last()
    {
        if json {
            print_task(task, &project, true)?;
        } else {
            println!("{}", task.id);
        }
    }
    finish(app);
    Ok(())
}

fn cmd_toggle(start: &Path, id: TaskId, json: bool) -> CmdResult {
    let (project, mut app) = open_list(start)?;
    let outcome = app.dispatch(Intent::Toggle(id));
    if report(&outcome)
        && let Some(task) = find_task(&app, id)
    {
        print_task(task, &project, json)?;
    }
    finish(app);
    Ok(())
}

fn cmd_edit(start: &Path, args: EditArgs, json: bool) -> CmdResult {
    let (project, mut app) = open_list(start)?;
    let started = app.dispatch(Intent::StartEdit(args.id));
    if matches!(started, Outcome::Ignored(_)) {
        report(&started);
    } else {
        let outcome = app.dispatch(Intent::SaveEdit {
            draft: args.text.join(" "),
            trigger: SaveTrigger::Confirm,
        });
        if report(&outcome) {
            match find_task(&app, args.id) {
                Some(task) => print_task(task, &project, json)?,
                None => print_deleted(args.id, json)?,
            }
        }
    }
    finish(app);
    Ok(())
}

fn cmd_rm(start: &Path, id: TaskId, json: bool) -> CmdResult {
    let (_project, mut app) = open_list(start)?;
    if report(&app.dispatch(Intent::Delete(id))) {
        print_deleted(id, json)?;
    }
    finish(app);
    Ok(())
}

fn cmd_clear(start: &Path, json: bool) -> CmdResult {
    let (_project, mut app) = open_list(start)?;
    let before = app.tasks().len();
    if report(&app.dispatch(Intent::ClearCompleted)) {
        let removed = before - app.tasks().len();
        if json {
            println!("{}", serde_json::to_string_pretty(&RemovedJson { removed })?);
        } else {
            println!("Removed {} completed", removed);
        }
    }
    finish(app);
    Ok(())
}

/// Replays the pointer gesture a drag would produce: pick up, hover over
/// the target's upper or lower half, release on it.
fn cmd_mv(start: &Path, args: MvArgs, json: bool) -> CmdResult {
    let (target, place_after) = match (args.before, args.after) {
        (Some(target), _) => (target, false),
        (None, Some(target)) => (target, true),
        (None, None) => return Err("mv needs --before or --after".into()),
    };
    let (project, mut app) = open_list(start)?;

    let begun = app.dispatch(Intent::DragBegin(args.id));
    if !matches!(begun, Outcome::Ignored(_)) {
        app.dispatch(Intent::DragHover {
            over: target,
            offset: if place_after { 0.75 } else { 0.25 },
            extent: 1.0,
        });
        let outcome = app.dispatch(Intent::Drop(Some(target)));
        if report(&outcome) {
            print_view(&FilterView::derive(app.tasks(), ViewMode::All), &project, json)?;
        }
    } else {
        report(&begun);
    }
    finish(app);
    Ok(())
}

fn cmd_filter(start: &Path, mode: ViewMode) -> CmdResult {
    let project = load_project_from(start)?;
    let mut doc = config_io::read_config_document(&project.list_dir)?;
    config_io::set_default_filter(&mut doc, mode);
    config_io::write_config_document(&project.list_dir, &doc)?;
    println!("Default filter set to {}", mode);
    Ok(())
}
