use chrono::NaiveDate;

use crate::io::config_io::{read_config, write_config};
use crate::model::{NewTask, Priority, Task, TaskPatch, TaskStatus};
use crate::service::{Backend, HttpTaskService, InMemoryTaskService, ServiceError};

use super::commands::*;

/// Dispatch a parsed CLI invocation
pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let Some(command) = cli.command else {
        // No subcommand launches the TUI; main handles that path
        return Ok(());
    };

    match command {
        // Login only touches the config file
        Commands::Login(args) => cmd_login(args),
        command => {
            let backend = make_backend(cli.offline)?;
            match command {
                Commands::Login(_) => unreachable!("handled above"),
                Commands::Whoami => cmd_whoami(backend.as_ref(), json),
                Commands::List(args) => cmd_list(backend.as_ref(), args, json),
                Commands::Projects => cmd_projects(backend.as_ref(), json),
                Commands::Add(args) => cmd_add(backend.as_ref(), args, json),
                Commands::Edit(args) => cmd_edit(backend.as_ref(), args, json),
                Commands::Done(args) => cmd_done(backend.as_ref(), args, json),
                Commands::Rm(args) => cmd_rm(backend.as_ref(), args),
            }
        }
    }
}

fn make_backend(offline: bool) -> Result<Box<dyn Backend>, Box<dyn std::error::Error>> {
    if offline {
        return Ok(Box::new(InMemoryTaskService::demo()));
    }
    let config = read_config()?;
    Ok(Box::new(HttpTaskService::new(&config.service)?))
}

fn cmd_login(args: LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = read_config()?;
    config.service.token = Some(args.token);
    if let Some(url) = args.url {
        config.service.base_url = url;
    }
    write_config(&config)?;
    println!("token saved to config ({})", config.service.base_url);
    Ok(())
}

fn cmd_whoami(backend: &dyn Backend, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match backend.fetch_session()? {
        Some(session) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&session)?);
            } else {
                println!("{}", session.display_name());
            }
        }
        None => return Err("not signed in".into()),
    }
    Ok(())
}

fn cmd_list(
    backend: &dyn Backend,
    args: ListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tasks = backend.list_tasks()?;
    if let Some(status) = args.status {
        tasks.retain(|t| t.status == status);
    }
    if let Some(project) = args.project {
        tasks.retain(|t| t.project_id == project);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }
    if tasks.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    for task in &tasks {
        println!("{}", format_task_row(task));
    }
    Ok(())
}

fn cmd_projects(backend: &dyn Backend, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let projects = backend.list_projects()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }
    for project in &projects {
        println!("{:>4}  {}", project.id, project.name);
    }
    Ok(())
}

fn cmd_add(
    backend: &dyn Backend,
    args: AddArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.title.trim().is_empty() {
        return Err("title must not be empty".into());
    }
    let project_id = match args.project {
        Some(id) => id,
        // Same default as the dialog: first project in listed order
        None => backend
            .list_projects()?
            .first()
            .map(|p| p.id)
            .ok_or("no projects exist — pass --project")?,
    };
    let due_date = args.due.as_deref().map(parse_due).transpose()?;

    let task = backend.create_task(&NewTask {
        title: args.title.trim().to_string(),
        description: args.description,
        status: args.status.unwrap_or(TaskStatus::Pending),
        priority: args.priority.unwrap_or(Priority::Medium),
        due_date,
        project_id,
    })?;

    print_task(&task, json, "created")
}

fn cmd_edit(
    backend: &dyn Backend,
    args: EditArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let existing = find_task(backend, args.id)?;

    let due_date = match args.due.as_deref() {
        None => existing.due_date,
        Some("none") => None,
        Some(raw) => Some(parse_due(raw)?),
    };
    let title = args.title.unwrap_or(existing.title);
    if title.trim().is_empty() {
        return Err("title must not be empty".into());
    }

    let task = backend.update_task(&TaskPatch {
        id: existing.id,
        title: title.trim().to_string(),
        description: args.description.unwrap_or(existing.description),
        status: args.status.unwrap_or(existing.status),
        priority: args.priority.unwrap_or(existing.priority),
        due_date,
        project_id: args.project.unwrap_or(existing.project_id),
    })?;

    print_task(&task, json, "updated")
}

fn cmd_done(
    backend: &dyn Backend,
    args: DoneArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let existing = find_task(backend, args.id)?;
    let task = backend.update_task(&TaskPatch {
        id: existing.id,
        title: existing.title,
        description: existing.description,
        status: TaskStatus::Completed,
        priority: existing.priority,
        due_date: existing.due_date,
        project_id: existing.project_id,
    })?;
    print_task(&task, json, "done")
}

fn cmd_rm(backend: &dyn Backend, args: RmArgs) -> Result<(), Box<dyn std::error::Error>> {
    backend.delete_task(args.id)?;
    println!("deleted #{}", args.id);
    Ok(())
}

fn find_task(backend: &dyn Backend, id: i64) -> Result<Task, ServiceError> {
    backend
        .list_tasks()?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or(ServiceError::NotFound(id))
}

fn parse_due(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid due date '{raw}' (expected YYYY-MM-DD)"))
}

fn print_task(task: &Task, json: bool, verb: &str) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{verb} {}", format_task_row(task));
    }
    Ok(())
}

/// One task per line: `#id [state] priority  title  (due date)`
pub fn format_task_row(task: &Task) -> String {
    let due = task
        .due_date
        .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    format!(
        "#{:<4} [{}] {:<6} {}{}",
        task.id,
        task.status.checkbox_char(),
        task.priority.label().to_lowercase(),
        task.title,
        due
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task() -> Task {
        Task {
            id: 12,
            title: "Write docs".into(),
            description: String::new(),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            project_id: 1,
        }
    }

    #[test]
    fn test_format_task_row() {
        assert_eq!(
            format_task_row(&task()),
            "#12   [>] high   Write docs  due 2026-09-01"
        );
    }

    #[test]
    fn test_format_task_row_without_due() {
        let mut t = task();
        t.due_date = None;
        t.status = TaskStatus::Completed;
        assert_eq!(format_task_row(&t), "#12   [x] high   Write docs");
    }

    #[test]
    fn test_parse_due() {
        assert_eq!(parse_due("2026-09-01"), Ok(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()));
        assert!(parse_due("tomorrow").is_err());
    }
}
