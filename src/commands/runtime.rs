use crate::cli::{CacheCommands, Cli, Commands};
use crate::commands::Context;
use crate::domain::models::{AddReport, CacheReport, FilterCriteria, LocateReport};
use crate::services::cache::now_secs;
use crate::services::geo::locate;
use crate::services::orchestrator::QueryOutcome;
use crate::services::output::print_one;
use crate::services::session::Selection;
use crate::services::view::{
    list_report, map_report, render_detail, render_header, render_list, render_map,
    render_screen, screen,
};
use tracing::info;

/// On failure, text mode still renders the view's own error state before the
/// command exits with the error.
fn load(
    ctx: &Context,
    json: bool,
    criteria: &FilterCriteria,
    refresh: bool,
    failed_view: impl Fn(&QueryOutcome) -> Vec<String>,
) -> anyhow::Result<QueryOutcome> {
    match ctx.orchestrator.filtered(criteria, refresh) {
        Ok(cafes) => Ok(QueryOutcome::settled(Ok(cafes))),
        Err(e) => {
            if !json {
                let failed = QueryOutcome::failed(&e);
                for line in failed_view(&failed) {
                    println!("{}", line);
                }
            }
            Err(e.into())
        }
    }
}

fn list_lines(criteria: &FilterCriteria, outcome: &QueryOutcome) -> Vec<String> {
    let mut lines = render_header(criteria);
    lines.extend(render_list(&list_report(criteria, outcome), None));
    lines
}

fn map_lines(criteria: &FilterCriteria, outcome: &QueryOutcome) -> Vec<String> {
    let mut lines = render_header(criteria);
    lines.extend(render_map(&map_report(outcome, None)));
    lines
}

fn selection_for(outcome: &QueryOutcome, id: Option<i64>) -> anyhow::Result<Selection> {
    let mut selection = Selection::default();
    if let Some(id) = id {
        selection.select(id, &outcome.cafes)?;
    }
    Ok(selection)
}

pub fn handle_runtime_commands(cli: &Cli, ctx: &Context) -> anyhow::Result<()> {
    match &cli.command {
        Commands::List { filters, refresh } => {
            let criteria = filters.criteria();
            let outcome = load(ctx, cli.json, &criteria, *refresh, |o| list_lines(&criteria, o))?;
            let report = list_report(&criteria, &outcome);
            print_one(cli.json, report, |r| {
                let mut lines = render_header(&r.criteria);
                lines.extend(render_list(r, None));
                lines
            })?;
        }
        Commands::Map {
            filters,
            select,
            refresh,
        } => {
            let criteria = filters.criteria();
            let outcome = load(ctx, cli.json, &criteria, *refresh, |o| map_lines(&criteria, o))?;
            let selection = selection_for(&outcome, *select)?;
            let report = map_report(&outcome, selection.get());
            print_one(cli.json, report, |r| {
                let mut lines = render_header(&criteria);
                lines.extend(render_map(r));
                lines
            })?;
        }
        Commands::View {
            filters,
            select,
            refresh,
        } => {
            let criteria = filters.criteria();
            let outcome = load(ctx, cli.json, &criteria, *refresh, |o| {
                render_screen(&screen(&criteria, o, None))
            })?;
            let selection = selection_for(&outcome, *select)?;
            let report = screen(&criteria, &outcome, selection.get());
            print_one(cli.json, report, render_screen)?;
        }
        Commands::Random => {
            let cafe = ctx.orchestrator.random()?;
            print_one(cli.json, cafe, render_detail)?;
        }
        Commands::Add(args) => {
            let draft = args.draft();
            let out = ctx.orchestrator.add(&draft)?;
            info!(name = %draft.name, "cafe added");
            let report = AddReport {
                success: if out.success.is_empty() {
                    format!("added {}", draft.name)
                } else {
                    out.success
                },
                cafe: out.cafe,
            };
            print_one(cli.json, report, |r| {
                let mut lines = vec![r.success.clone()];
                if let Some(c) = &r.cafe {
                    lines.extend(render_detail(c));
                }
                lines
            })?;
        }
        Commands::Locate { map_url } => {
            let found = locate(map_url);
            let report = LocateReport {
                map_url: map_url.clone(),
                matched: found.matched,
                lat: found.coordinates.lat,
                lng: found.coordinates.lng,
            };
            print_one(cli.json, report, |r| {
                vec![format!("{}\t{}\t{} ({})", r.lat, r.lng, r.map_url, r.matched)]
            })?;
        }
        Commands::Cache { command } => {
            let (action, removed) = match (command, &ctx.cache) {
                (CacheCommands::Clear, Some(cache)) => ("clear", cache.invalidate_all()?),
                (CacheCommands::Prune, Some(cache)) => ("prune", cache.prune(now_secs())?),
                (CacheCommands::Clear, None) => ("clear", 0),
                (CacheCommands::Prune, None) => ("prune", 0),
            };
            let report = CacheReport {
                action: action.to_string(),
                removed,
            };
            print_one(cli.json, report, |r| {
                vec![format!("{}: removed {} entries", r.action, r.removed)]
            })?;
        }
        Commands::Browse { .. } => {
            anyhow::bail!("browse is handled by the session loop")
        }
    }

    Ok(())
}
