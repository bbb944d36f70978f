use crate::catalog::{CatalogApi, CatalogError};
use crate::domain::models::{Amenity, Cafe, FilterCriteria};
use crate::services::orchestrator::Orchestrator;
use crate::services::output::print_frame;
use crate::services::session::{Edit, Session, Ticket};
use crate::services::view::{render_screen, screen};
use std::io::BufRead;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tracing::debug;

const HELP: &str = "commands: loc <text> | loc | wifi | sockets | toilet | calls | clear | \
select <id> | deselect | refresh | show | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Edit(Edit),
    Select(i64),
    Deselect,
    Refresh,
    Show,
    Help,
    Quit,
}

enum Event {
    Line(String),
    Eof,
    Fetched(Ticket, Result<Vec<Cafe>, CatalogError>),
}

/// Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let cmd = match word.to_ascii_lowercase().as_str() {
        "loc" | "location" => Command::Edit(Edit::Location(
            Some(rest.to_string()).filter(|r| !r.is_empty()),
        )),
        "clear" => Command::Edit(Edit::Clear),
        "select" => {
            let id = rest
                .parse()
                .map_err(|_| format!("select needs a numeric cafe id, got {:?}", rest))?;
            Command::Select(id)
        }
        "deselect" => Command::Deselect,
        "refresh" => Command::Refresh,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => match Amenity::from_label(other) {
            Some(a) => Command::Edit(Edit::Toggle(a)),
            None => return Err(format!("unknown command: {}", other)),
        },
    };
    Ok(Some(cmd))
}

fn spawn_stdin_reader(tx: Sender<Event>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::Eof);
    });
}

/// Fresh cache hits are answered inline; everything else goes to a worker thread.
fn dispatch<A>(orchestrator: &Orchestrator<A>, ticket: Ticket, tx: &Sender<Event>)
where
    A: CatalogApi + Clone + Send + 'static,
{
    if !ticket.refresh {
        if let Some(hit) = orchestrator.cached(&ticket.plan) {
            let _ = tx.send(Event::Fetched(ticket, Ok(hit)));
            return;
        }
    }
    debug!(seq = ticket.seq, key = %ticket.key, "dispatching fetch");
    let orchestrator = orchestrator.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = orchestrator.fetch(&ticket.plan, true);
        let _ = tx.send(Event::Fetched(ticket, result));
    });
}

fn render(json: bool, session: &Session) -> anyhow::Result<()> {
    let report = screen(
        session.criteria(),
        session.outcome(),
        session.selection().get(),
    );
    print_frame(json, report, render_screen)
}

/// Event loop: one thread owns the session; stdin and fetch workers feed it.
///
/// `quit` (or end of input) waits for the in-flight request of the current
/// criteria so the final frame is settled.
pub fn run_browse<A>(
    json: bool,
    orchestrator: &Orchestrator<A>,
    criteria: FilterCriteria,
) -> anyhow::Result<()>
where
    A: CatalogApi + Clone + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    spawn_stdin_reader(tx.clone());

    let mut session = Session::new(criteria);
    let ticket = session.start(false);
    render(json, &session)?;
    dispatch(orchestrator, ticket, &tx);

    let mut quitting = false;
    loop {
        if quitting && !session.is_loading() {
            break;
        }
        let Ok(event) = rx.recv() else { break };
        match event {
            Event::Fetched(ticket, result) => {
                if session.deliver(&ticket, result) {
                    render(json, &session)?;
                }
            }
            Event::Eof => quitting = true,
            Event::Line(_) if quitting => {}
            Event::Line(line) => match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => quitting = true,
                Ok(Some(Command::Help)) => eprintln!("{}", HELP),
                Ok(Some(Command::Show)) => render(json, &session)?,
                Ok(Some(Command::Edit(edit))) => {
                    let ticket = session.apply_edit(edit);
                    render(json, &session)?;
                    dispatch(orchestrator, ticket, &tx);
                }
                Ok(Some(Command::Refresh)) => {
                    let ticket = session.start(true);
                    render(json, &session)?;
                    dispatch(orchestrator, ticket, &tx);
                }
                Ok(Some(Command::Select(id))) => match session.select(id) {
                    Ok(_) => render(json, &session)?,
                    Err(e) => eprintln!("{}", e),
                },
                Ok(Some(Command::Deselect)) => {
                    session.deselect();
                    render(json, &session)?;
                }
                Err(msg) => eprintln!("{}\n{}", msg, HELP),
            },
        }
    }
    Ok(())
}
