// taskmind - keeps your tasks and guesses what you'll do next
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use anyhow::Context;
use taskmind_lib::{
    core::{parse_due_date, Recorder, Retriever},
    db::{SortField, SortOrder, Task, TaskQuery, TaskStatus},
    intelligence::{
        Analyzer, SuggestionMode, SuggestionReport, SuggestionRequest, TargetSpec,
    },
    Config, Database, TaskError,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if let Err(e) = run(&args).await {
        match e.downcast_ref::<TaskError>() {
            Some(task_error) => eprintln!("Error: {}", task_error.user_message()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> anyhow::Result<()> {
    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "add" => handle_add(&args[2..]).await,
        "list" => handle_list(&args[2..]).await,
        "update" => handle_update(&args[2..]).await,
        "delete" => handle_delete(&args[2..]).await,
        "suggest" => handle_suggest(&args[2..]).await,
        "status" => handle_status().await,
        "version" | "-v" | "--version" => {
            println!("taskmind v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

/// Flags and positional words, split apart
struct ParsedArgs {
    positional: Vec<String>,
    flags: Vec<(String, String)>,
    switches: Vec<String>,
}

impl ParsedArgs {
    // Flags that never take a value
    const SWITCHES: &'static [&'static str] = &["--json"];

    fn parse(args: &[String]) -> Result<Self, TaskError> {
        let mut parsed = ParsedArgs {
            positional: Vec::new(),
            flags: Vec::new(),
            switches: Vec::new(),
        };

        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            if Self::SWITCHES.contains(&arg.as_str()) {
                parsed.switches.push(arg.clone());
            } else if arg.starts_with("--") {
                i += 1;
                let value = args.get(i).ok_or_else(|| {
                    TaskError::InvalidArgument(format!("{} needs a value", arg))
                })?;
                parsed.flags.push((arg.clone(), value.clone()));
            } else {
                parsed.positional.push(arg.clone());
            }
            i += 1;
        }

        Ok(parsed)
    }

    // Last occurrence wins
    fn flag(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|(flag, _)| flag == name)
            .map(|(_, value)| value.as_str())
    }

    fn switch(&self, name: &str) -> bool {
        self.switches.iter().any(|s| s == name)
    }

    fn parsed_flag<T: std::str::FromStr<Err = TaskError>>(
        &self,
        name: &str,
    ) -> Result<Option<T>, TaskError> {
        self.flag(name).map(str::parse).transpose()
    }
}

fn parse_id(raw: Option<&str>) -> Result<i64, TaskError> {
    let raw = raw.ok_or_else(|| TaskError::InvalidArgument("missing task id".to_string()))?;
    raw.parse()
        .map_err(|_| TaskError::InvalidArgument(format!("'{}' is not a task id", raw)))
}

// Negative budgets are a caller mistake, not an empty request
fn parse_limit(raw: &str) -> Result<usize, TaskError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| TaskError::InvalidArgument(format!("'{}' is not a number", raw)))?;

    usize::try_from(value)
        .map_err(|_| TaskError::InvalidArgument(format!("limit must not be negative, got {}", value)))
}

async fn handle_add(args: &[String]) -> anyhow::Result<()> {
    let parsed = ParsedArgs::parse(args)?;
    let title = parsed.positional.join(" ");
    let due_date = parsed.flag("--due").map(parse_due_date).transpose()?;

    let db = get_database().await?;
    let recorder = Recorder::new(Arc::new(db));

    let task = recorder
        .create(&title, parsed.flag("--description"), due_date)
        .await?;

    println!("Added task {}: {}", task.id, task.title);

    Ok(())
}

async fn handle_list(args: &[String]) -> anyhow::Result<()> {
    let parsed = ParsedArgs::parse(args)?;
    let query = TaskQuery {
        status: parsed.parsed_flag::<TaskStatus>("--status")?,
        sort_by: parsed.parsed_flag::<SortField>("--sort")?.unwrap_or_default(),
        order: parsed.parsed_flag::<SortOrder>("--order")?.unwrap_or_default(),
    };

    let db = get_database().await?;
    let retriever = Retriever::new(Arc::new(db));
    let tasks = retriever.list(&query).await?;

    if parsed.switch("--json") {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
    } else {
        println!("\nTasks:");
        println!("{}", "=".repeat(60));
        for task in &tasks {
            print_task(task);
        }
        println!("{}", "=".repeat(60));
    }

    Ok(())
}

async fn handle_update(args: &[String]) -> anyhow::Result<()> {
    let parsed = ParsedArgs::parse(args)?;
    let id = parse_id(parsed.positional.first().map(String::as_str))?;
    let status = parsed.parsed_flag::<TaskStatus>("--status")?;

    let db = get_database().await?;
    let recorder = Recorder::new(Arc::new(db));

    let task = recorder
        .update(id, parsed.flag("--title"), parsed.flag("--description"), status)
        .await?;

    println!("Updated task {}:", task.id);
    print_task(&task);

    Ok(())
}

async fn handle_delete(args: &[String]) -> anyhow::Result<()> {
    let parsed = ParsedArgs::parse(args)?;
    let id = parse_id(parsed.positional.first().map(String::as_str))?;

    let db = get_database().await?;
    Recorder::new(Arc::new(db)).delete(id).await?;

    println!("Task deleted");

    Ok(())
}

async fn handle_suggest(args: &[String]) -> anyhow::Result<()> {
    let parsed = ParsedArgs::parse(args)?;
    let config = Config::from_env()?;

    let target = match (parsed.flag("--target"), parsed.flag("--query")) {
        (Some(_), Some(_)) => {
            return Err(TaskError::InvalidArgument(
                "use either --target or --query, not both".to_string(),
            )
            .into())
        }
        (Some(id), None) => Some(TargetSpec::Task(parse_id(Some(id))?)),
        (None, Some(text)) => Some(TargetSpec::Query(text.to_string())),
        (None, None) => None,
    };

    let request = SuggestionRequest {
        mode: parsed.parsed_flag::<SuggestionMode>("--mode")?.unwrap_or_default(),
        status: parsed.parsed_flag::<TaskStatus>("--status")?,
        target,
        limit: match parsed.flag("--limit") {
            Some(raw) => parse_limit(raw)?,
            None => config.default_limit,
        },
    };

    let db = open_database(&config).await?;
    let analyzer = Analyzer::new(Arc::new(db));
    let report = analyzer.suggest(&request).await?;

    if parsed.switch("--json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No suggestions available yet.");
        println!("Add and complete a few more tasks to build up history!");
        return Ok(());
    }

    println!("{}", "=".repeat(60));
    println!("Suggested Follow-ups");
    println!("{}", "=".repeat(60));

    match &report {
        SuggestionReport::Tasks(tasks) => {
            for (i, task) in tasks.iter().enumerate() {
                println!("\n{}. {}", i + 1, task.title);
                if let Some(description) = &task.description {
                    println!("   {}", description);
                }
                if let Some(due) = task.due_date {
                    println!("   due {}", due.format("%Y-%m-%d %H:%M"));
                }
            }
        }
        SuggestionReport::FollowUps(follow_ups) => {
            for (i, follow_up) in follow_ups.iter().enumerate() {
                println!("\n{}. {} [{}]", i + 1, follow_up.label, follow_up.pattern_type);
                println!("   related: {}", follow_up.related.join(", "));
            }
        }
    }

    println!("\n{}", "=".repeat(60));

    Ok(())
}

async fn handle_status() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let db = open_database(&config).await?;
    let stats = db.stats().await?;

    println!("\ntaskmind Status");
    println!("{}", "=".repeat(60));
    println!("\nDatabase: {}", db.path().display());
    println!("\nTasks:");
    println!("  Total:       {}", stats.total_tasks);
    println!("  Pending:     {}", stats.pending);
    println!("  In progress: {}", stats.in_progress);
    println!("  Completed:   {}", stats.completed);
    println!("{}", "=".repeat(60));

    Ok(())
}

fn print_task(task: &Task) {
    let marker = match task.status {
        TaskStatus::Completed => "x",
        TaskStatus::InProgress => "~",
        TaskStatus::Pending => " ",
    };
    let due = task
        .due_date
        .map(|d| format!(" (due {})", d.format("%Y-%m-%d")))
        .unwrap_or_default();

    println!("{:4}. [{}] {}{}", task.id, marker, task.title, due);
    if let Some(description) = &task.description {
        println!("        {}", description);
    }
}

async fn get_database() -> anyhow::Result<Database> {
    let config = Config::from_env()?;
    open_database(&config).await
}

async fn open_database(config: &Config) -> anyhow::Result<Database> {
    Database::new(&config.db_path)
        .await
        .with_context(|| format!("opening task database at {}", config.db_path.display()))
}

fn print_usage() {
    println!(
        r#"taskmind v{} - Your tasks, and what usually comes next

USAGE:
    taskmind <COMMAND> [OPTIONS]

COMMANDS:
    add <title> [--description D] [--due DATE]
                           Add a task
    list [--status S] [--sort created_at|due_date] [--order asc|desc] [--json]
                           List tasks
    update <id> [--title T] [--description D] [--status S]
                           Change a task
    delete <id>            Delete a task
    suggest [--mode smart|frequency|sequence|time] [--status S]
            [--target ID | --query TEXT] [--limit N] [--json]
                           Suggest follow-up tasks
    status                 Show task counts
    version                Show version
    help                   Show this help

STATUS VALUES:
    pending, in_progress, completed

ENVIRONMENT:
    TASKMIND_DB            Database path (default: ~/.taskmind/tasks.db)
    TASKMIND_LIMIT         Default suggestion count (default: 5)
    RUST_LOG               Log filter, e.g. taskmind_lib=debug

EXAMPLES:
    taskmind add Buy groceries --due 2026-10-20
    taskmind update 3 --status completed
    taskmind suggest --status completed --limit 3
    taskmind suggest --query "renew license"
"#,
        env!("CARGO_PKG_VERSION")
    );
}
