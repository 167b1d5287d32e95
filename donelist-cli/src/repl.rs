//! Interactive client session
//!
//! Reads one command per line, drives the view-state machine, calls the
//! service, and re-renders after every action. Mutations never patch the
//! local collection; on success they trigger a full refetch of the
//! current filter/page so the server stays the source of truth.
//! Failures are logged and shown as a one-line notice; there is no retry
//! and no rollback.

use std::io::Write;
use std::time::Duration;

use chrono::offset::LocalResult;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use donelist_core::{TaskFilter, TaskPatch};

use crate::api::{ApiClient, ApiClientError};
use crate::render::render;
use crate::session::{FetchTicket, Session};

/// Default timeout for requests issued by the interactive client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add {
        title: String,
        due_date: Option<DateTime<Utc>>,
    },
    SetCompleted {
        index: usize,
        completed: bool,
    },
    Remove {
        index: usize,
    },
    Edit {
        index: usize,
    },
    EditTitle {
        title: String,
    },
    EditDue {
        due_date: Option<DateTime<Utc>>,
    },
    Save,
    Cancel,
    Filter {
        filter: TaskFilter,
    },
    Page {
        page: u32,
    },
    Next,
    Prev,
    Refresh,
    Help,
    Quit,
}

const HELP_TEXT: &str = "\
commands:
  add <title> [@ <due>]   create a task, e.g. add Buy milk @ 2026-03-14 10:00
  done <n> / undone <n>   toggle completion of task n on this page
  rm <n>                  delete task n on this page
  edit <n>                start editing task n (then: title, due, save, cancel)
  title <text>            change the edit draft's title
  due <when|none>         change or clear the edit draft's due date
  save / cancel           commit or discard the edit draft
  filter <name>           all | incomplete | complete | today
  page <n> / next / prev  pagination
  refresh                 refetch the current page
  help / quit";

/// Parse a due date from `2026-03-14T10:00:00Z`, `2026-03-14 10:00`
/// (local time), or `2026-03-14` (local midnight).
pub fn parse_due(input: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return local_to_utc(naive);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return local_to_utc(date.and_hms_opt(0, 0, 0).unwrap_or_default());
    }
    Err(format!(
        "could not parse due date '{input}' (expected RFC 3339, 'YYYY-MM-DD HH:MM', or 'YYYY-MM-DD')"
    ))
}

fn local_to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>, String> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
        LocalResult::None => Err(format!("local time '{naive}' does not exist")),
    }
}

fn parse_index(arg: Option<&str>, verb: &str) -> Result<usize, String> {
    let Some(arg) = arg else {
        return Err(format!("usage: {verb} <n>"));
    };
    let index: usize = arg
        .parse()
        .map_err(|_| format!("'{arg}' is not a task number"))?;
    if index == 0 {
        return Err("task numbers start at 1".to_string());
    }
    Ok(index)
}

/// Parse one input line into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "add" => {
            let (title, due_date) = match rest.split_once(" @ ") {
                Some((title, due)) => (title.trim(), Some(parse_due(due.trim())?)),
                None => (rest, None),
            };
            if title.is_empty() {
                return Err("usage: add <title> [@ <due>]".to_string());
            }
            Ok(Command::Add {
                title: title.to_string(),
                due_date,
            })
        }
        "done" => Ok(Command::SetCompleted {
            index: parse_index(Some(rest).filter(|r| !r.is_empty()), "done")?,
            completed: true,
        }),
        "undone" => Ok(Command::SetCompleted {
            index: parse_index(Some(rest).filter(|r| !r.is_empty()), "undone")?,
            completed: false,
        }),
        "rm" => Ok(Command::Remove {
            index: parse_index(Some(rest).filter(|r| !r.is_empty()), "rm")?,
        }),
        "edit" => Ok(Command::Edit {
            index: parse_index(Some(rest).filter(|r| !r.is_empty()), "edit")?,
        }),
        "title" => {
            if rest.is_empty() {
                return Err("usage: title <text>".to_string());
            }
            Ok(Command::EditTitle {
                title: rest.to_string(),
            })
        }
        "due" => {
            if rest.is_empty() {
                return Err("usage: due <when|none>".to_string());
            }
            let due_date = if rest == "none" {
                None
            } else {
                Some(parse_due(rest)?)
            };
            Ok(Command::EditDue { due_date })
        }
        "save" => Ok(Command::Save),
        "cancel" => Ok(Command::Cancel),
        "filter" => {
            let filter = rest
                .parse::<TaskFilter>()
                .map_err(|e| e.to_string())?;
            Ok(Command::Filter { filter })
        }
        "page" => {
            let page: u32 = rest
                .parse()
                .map_err(|_| format!("'{rest}' is not a page number"))?;
            if page == 0 {
                return Err("pages start at 1".to_string());
            }
            Ok(Command::Page { page })
        }
        "next" => Ok(Command::Next),
        "prev" => Ok(Command::Prev),
        "refresh" => Ok(Command::Refresh),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("type 'help' for commands".to_string()),
        other => Err(format!("unknown command '{other}', type 'help'")),
    }
}

/// True for commands that operate on the edit draft; any other command
/// dismisses an open draft first, like clicking outside the edit area.
fn is_edit_scoped(command: &Command) -> bool {
    matches!(
        command,
        Command::EditTitle { .. } | Command::EditDue { .. } | Command::Save | Command::Cancel
    )
}

async fn fetch(api: &ApiClient, session: &mut Session, ticket: FetchTicket) {
    match api.list(ticket.filter, ticket.page).await {
        Ok(listing) => {
            session.apply_listing(ticket, listing);
        }
        Err(e) => {
            tracing::error!(error = %e, "List fetch failed");
            session.apply_fetch_error(ticket, e.to_string());
        }
    }
}

/// Refetch the current filter/page after a successful mutation.
async fn resync(api: &ApiClient, session: &mut Session) {
    let ticket = session.refresh();
    fetch(api, session, ticket).await;
}

fn report_failure(session: &mut Session, action: &str, error: &ApiClientError) {
    tracing::error!(error = %error, action, "Request failed");
    session.set_notice(format!("{action} failed: {error}"));
}

async fn read_line() -> Option<String> {
    let line = tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        match std::io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf),
            Err(_) => None,
        }
    })
    .await;
    line.ok().flatten()
}

/// Run the interactive session against `server`.
pub async fn run(server: String) -> Result<(), ApiClientError> {
    let api = ApiClient::new(server, REQUEST_TIMEOUT)?;
    let mut session = Session::new();

    let ticket = session.refresh();
    fetch(&api, &mut session, ticket).await;
    print!("{}", render(session.state()));

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let Some(line) = read_line().await else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                session.set_notice(message);
                print!("{}", render(session.state()));
                continue;
            }
        };

        if session.is_editing() && !is_edit_scoped(&command) {
            session.dismiss_edit();
        }

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP_TEXT}");
                continue;
            }
            Command::Add { title, due_date } => match api.create(&title, due_date).await {
                Ok(_) => resync(&api, &mut session).await,
                Err(e) => report_failure(&mut session, "add", &e),
            },
            Command::SetCompleted { index, completed } => {
                let target = session.state().tasks.get(index - 1).map(|t| t.id.clone());
                match target {
                    Some(id) => match api.update(&id, &TaskPatch::completion(completed)).await {
                        Ok(_) => resync(&api, &mut session).await,
                        Err(e) => report_failure(&mut session, "update", &e),
                    },
                    None => session.set_notice(format!("no task {index} on this page")),
                }
            }
            Command::Remove { index } => {
                let target = session.state().tasks.get(index - 1).map(|t| t.id.clone());
                match target {
                    Some(id) => match api.delete(&id).await {
                        Ok(_) => resync(&api, &mut session).await,
                        Err(e) => report_failure(&mut session, "delete", &e),
                    },
                    None => session.set_notice(format!("no task {index} on this page")),
                }
            }
            Command::Edit { index } => {
                let target = session.state().tasks.get(index - 1).map(|t| t.id.clone());
                match target {
                    Some(id) => {
                        session.begin_edit(&id);
                    }
                    None => session.set_notice(format!("no task {index} on this page")),
                }
            }
            Command::EditTitle { title } => {
                if !session.edit_title(title) {
                    session.set_notice("no task is being edited".to_string());
                }
            }
            Command::EditDue { due_date } => {
                if !session.edit_due_date(due_date) {
                    session.set_notice("no task is being edited".to_string());
                }
            }
            Command::Save => match session.take_edit() {
                Some(draft) => {
                    let patch = TaskPatch::default()
                        .with_title(draft.title)
                        .with_due_date(draft.due_date);
                    match api.update(&draft.task_id, &patch).await {
                        Ok(_) => resync(&api, &mut session).await,
                        Err(e) => report_failure(&mut session, "save", &e),
                    }
                }
                None => session.set_notice("no task is being edited".to_string()),
            },
            Command::Cancel => session.dismiss_edit(),
            Command::Filter { filter } => {
                let ticket = session.set_filter(filter);
                fetch(&api, &mut session, ticket).await;
            }
            Command::Page { page } => {
                let ticket = session.set_page(page);
                fetch(&api, &mut session, ticket).await;
            }
            Command::Next => {
                if let Some(ticket) = session.next_page() {
                    fetch(&api, &mut session, ticket).await;
                }
            }
            Command::Prev => {
                if let Some(ticket) = session.prev_page() {
                    fetch(&api, &mut session, ticket).await;
                }
            }
            Command::Refresh => resync(&api, &mut session).await,
        }

        print!("{}", render(session.state()));
    }

    Ok(())
}
