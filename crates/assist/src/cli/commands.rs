//! # Dispatch
//!
//! [`run`] parses arguments, sets up logging and the [`AssistContext`], then
//! routes each subcommand to one [`AssistApi`](assistapp::api::AssistApi)
//! call and prints the result.
//!
//! Output goes to stdout, in text or (with `-o json`) as the serialized
//! library result. Errors bubble up to `main`, which prints them and exits
//! with status 1.

use super::logging;
use super::render;
use super::setup::{
    selector, ChartCommands, Cli, Commands, CompareCommands, ConfigCommands, HealthCommands,
    LifeCommands, OutputFormat, PayCommands, TaskCommands,
};
use anyhow::Result;
use assistapp::analytics::{DateRange, Month};
use assistapp::commands::health::HealthQuery;
use assistapp::commands::life::LifeSearch;
use assistapp::commands::payments::NewPayment;
use assistapp::commands::CmdResult;
use assistapp::config::AssistConfig;
use assistapp::index::DisplayRecord;
use assistapp::init::{global_config_path, initialize, AssistContext};
use assistapp::model::{today, Domain, PaymentPatch, TaskPatch, CATEGORIES, MOODS};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Needs no data, and must work even when the config is broken.
    if let Commands::Config(ConfigCommands::Template) = cli.command {
        print!("{}", AssistConfig::template());
        return Ok(());
    }

    let ctx = initialize(cli.data.clone(), cli.config.clone())?;
    debug!(command = ?cli.command, "dispatching");
    let out = Printer { format: cli.output };

    match cli.command {
        Commands::Task(cmd) => handle_task(ctx, &out, cmd),
        Commands::Health(cmd) => handle_health(ctx, &out, cmd),
        Commands::Life(cmd) => handle_life(ctx, &out, cmd),
        Commands::Pay(cmd) => handle_pay(ctx, &out, cmd),
        Commands::Config(cmd) => handle_config(&ctx, &out, cmd),
    }
}

struct Printer {
    format: OutputFormat,
}

impl Printer {
    fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Records listed by a read command, then any messages.
    fn listing<T: Serialize>(
        &self,
        result: &CmdResult<T>,
        rows: fn(&[DisplayRecord<T>]) -> String,
        empty: &str,
    ) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(result);
        }
        if result.listed.is_empty() {
            if result.messages.is_empty() {
                println!("{}", empty);
            }
        } else {
            print!("{}", rows(&result.listed));
        }
        print!("{}", render::messages(&result.messages));
        Ok(())
    }

    /// The outcome of a mutation: just its messages in text mode.
    fn outcome<T: Serialize>(&self, result: &CmdResult<T>) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(result);
        }
        print!("{}", render::messages(&result.messages));
        Ok(())
    }

    fn value<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(value);
        }
        print!("{}", text(value));
        Ok(())
    }
}

fn handle_task(mut ctx: AssistContext, out: &Printer, cmd: TaskCommands) -> Result<()> {
    let api = &mut ctx.api;
    match cmd {
        TaskCommands::Add { content, priority } => out.outcome(&api.add_task(&content, priority)?),
        TaskCommands::List { pending } => {
            out.listing(&api.list_tasks(pending), render::tasks, "No tasks.")
        }
        TaskCommands::Done { positions } => {
            out.outcome(&api.complete_tasks(&selector(&positions))?)
        }
        TaskCommands::Edit {
            position,
            content,
            priority,
        } => {
            let patch = TaskPatch {
                content,
                priority,
                completed: None,
            };
            out.outcome(&api.edit_task(&position, patch)?)
        }
        TaskCommands::Delete { positions } => {
            out.outcome(&api.delete_tasks(&selector(&positions))?)
        }
    }
}

fn handle_health(mut ctx: AssistContext, out: &Printer, cmd: HealthCommands) -> Result<()> {
    let api = &mut ctx.api;
    match cmd {
        HealthCommands::Add(values) => out.outcome(&api.add_health(values.into())?),
        HealthCommands::List => out.listing(&api.list_health(), render::health, "No health records."),
        HealthCommands::Show { positions } => out.listing(
            &api.show_health(&selector(&positions))?,
            render::health_full,
            "No health records.",
        ),
        HealthCommands::Edit { position, values } => {
            out.outcome(&api.edit_health(&position, values.into())?)
        }
        HealthCommands::Delete { positions } => {
            out.outcome(&api.delete_health(&selector(&positions))?)
        }
        HealthCommands::Query {
            from,
            to,
            min_weight,
            max_weight,
        } => {
            let bounds = HealthQuery {
                from,
                to,
                min_weight,
                max_weight,
            };
            out.listing(&api.query_health(&bounds), render::health, "No matching records.")
        }
        HealthCommands::Stats => out.value(&api.health_stats(), render::health_stats),
    }
}

fn handle_life(mut ctx: AssistContext, out: &Printer, cmd: LifeCommands) -> Result<()> {
    let api = &mut ctx.api;
    match cmd {
        LifeCommands::Add(entry) => out.outcome(&api.add_life(entry.into())?),
        LifeCommands::List => out.listing(&api.list_life(), render::life, "No entries."),
        LifeCommands::Show { positions } => out.listing(
            &api.show_life(&selector(&positions))?,
            render::life_full,
            "No entries.",
        ),
        LifeCommands::Edit { position, entry } => {
            out.outcome(&api.edit_life(&position, entry.into())?)
        }
        LifeCommands::Delete { positions } => {
            out.outcome(&api.delete_life(&selector(&positions))?)
        }
        LifeCommands::Search {
            title,
            content,
            category,
            mood,
        } => {
            let keywords = LifeSearch {
                title,
                content,
                category,
                mood,
            };
            out.listing(&api.search_life(&keywords), render::life, "No matching entries.")
        }
        LifeCommands::Categories => out.value(&CATEGORIES, |words| render::vocabulary(words)),
        LifeCommands::Moods => out.value(&MOODS, |words| render::vocabulary(words)),
    }
}

fn handle_pay(mut ctx: AssistContext, out: &Printer, cmd: PayCommands) -> Result<()> {
    let api = &mut ctx.api;
    match cmd {
        PayCommands::Add {
            amount,
            kind,
            at,
            category,
            note,
            tags,
        } => {
            let input = NewPayment {
                amount,
                kind,
                at,
                category,
                note,
                tags,
            };
            out.outcome(&api.add_payment(input)?)
        }
        PayCommands::List => out.listing(&api.list_payments(), render::payments, "No payments."),
        PayCommands::Show { ids } => out.listing(
            &api.show_payments(&selector(&ids))?,
            render::payments,
            "No payments.",
        ),
        PayCommands::Edit {
            id,
            amount,
            kind,
            at,
            category,
            note,
            tags,
        } => {
            let patch = PaymentPatch {
                amount,
                kind,
                at,
                category,
                note,
                tags,
            };
            out.outcome(&api.edit_payment(&id, patch)?)
        }
        PayCommands::Delete { ids } => out.outcome(&api.delete_payments(&selector(&ids))?),
        PayCommands::Query(criteria) => out.listing(
            &api.query_payments(&criteria.into()),
            render::payments,
            "No matching payments.",
        ),
        PayCommands::Search(criteria) => out.listing(
            &api.search_payments(&criteria.into()),
            render::payments,
            "No matching payments.",
        ),
        PayCommands::Compare(CompareCommands::Month { month }) => {
            let month = month.unwrap_or_else(|| Month::of(today()));
            out.value(&api.compare_months(month), |c| {
                render::comparison(c, |m| m.to_string())
            })
        }
        PayCommands::Compare(CompareCommands::Ranges {
            from1,
            to1,
            from2,
            to2,
        }) => {
            let baseline = DateRange::new(from1, to1)?;
            let current = DateRange::new(from2, to2)?;
            out.value(&api.compare_ranges(baseline, current), |c| {
                render::comparison(c, |r| format!("{} .. {}", r.start, r.end))
            })
        }
        PayCommands::Compare(CompareCommands::Categories) => {
            out.value(&api.category_totals(), |totals| render::category_totals(totals))
        }
        PayCommands::Chart(ChartCommands::Monthly) => {
            out.value(&api.monthly_chart(), |bars| render::monthly_chart(bars))
        }
        PayCommands::Chart(ChartCommands::Categories { kind }) => {
            out.value(&api.category_chart(kind), |slices| render::category_chart(slices))
        }
        PayCommands::Insights { month } => {
            let month = month.unwrap_or_else(|| Month::of(today()));
            out.value(&api.insights(month), render::insights)
        }
    }
}

fn handle_config(ctx: &AssistContext, out: &Printer, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let rules = ctx.api.categorizer().rules();
            let effective = json!({
                "data_dir": ctx.data_dir,
                "category_rules": rules,
            });
            out.value(&effective, |_| {
                let mut text = format!("data_dir = {}\n", ctx.data_dir.display());
                let source = if ctx.config.category_rules.is_some() {
                    "configured"
                } else {
                    "built-in"
                };
                text.push_str(&format!("category rules ({}):\n", source));
                for rule in rules {
                    text.push_str(&format!("  {}: {}\n", rule.category, rule.keywords.join(", ")));
                }
                text
            })
        }
        ConfigCommands::Path => {
            let files: Vec<_> = Domain::ALL
                .iter()
                .map(|d| (d.to_string(), ctx.api.location(*d)))
                .collect();
            let paths = json!({
                "data_dir": ctx.data_dir,
                "global_config": global_config_path(),
                "files": files.iter().cloned().collect::<std::collections::BTreeMap<_, _>>(),
            });
            out.value(&paths, |_| {
                let mut text = format!("data dir: {}\n", ctx.data_dir.display());
                if let Some(global) = global_config_path() {
                    text.push_str(&format!("global config: {}\n", global.display()));
                }
                for (domain, path) in &files {
                    text.push_str(&format!("{}: {}\n", domain, path.display()));
                }
                text
            })
        }
        // Handled before the context exists
        ConfigCommands::Template => Ok(()),
    }
}
