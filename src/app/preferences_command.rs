use super::{cli_manager::logging_level_cli_arg, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use crustaspic::{
    io::{AspicReader, TheoryReader},
    preferences::{
        detect_cycles, populate, preference_statistics, sync, transitive_closure, validate_round_trip,
    },
};
use log::{info, warn};
use serde::Serialize;
use serde_json::json;
use std::io::Write;

const CMD_NAME: &str = "preferences";

const ARG_ACTION: &str = "ACTION";
const ARG_THEORY: &str = "THEORY";

pub(crate) struct PreferencesCommand;

impl PreferencesCommand {
    pub(crate) fn new() -> Self {
        PreferencesCommand
    }
}

impl<'a> Command<'a> for PreferencesCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Translates the preference applications of an argument graph")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args().help("the JSON file that contains the argument graph"))
            .arg(
                Arg::with_name(ARG_ACTION)
                    .short("a")
                    .long("action")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&["populate", "stats", "round-trip", "closure", "cycles", "sync"])
                    .default_value("populate")
                    .help("the operation to apply to the preferences")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_THEORY)
                    .long("theory")
                    .empty_values(false)
                    .multiple(false)
                    .help("the theory whose preferences are written to the graph (sync action)")
                    .required_if(ARG_ACTION, "sync"),
            )
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let mut graph = common::read_graph(common::value_of(arg_matches, common::ARG_INPUT)?)?;
        match common::value_of(arg_matches, ARG_ACTION)? {
            "populate" => {
                let populated = populate(&graph)?;
                info!("read {} preference(s)", populated.len());
                write_json(&populated)
            }
            "stats" => {
                let stats = preference_statistics(&graph)?;
                info!(
                    "{} preference(s), {} cycle(s)",
                    stats.total_preferences,
                    stats.cycle_count()
                );
                write_json(&stats)
            }
            "round-trip" => {
                let report = validate_round_trip(&mut graph)?;
                if report.success {
                    info!("the round trip preserved the preferences");
                } else {
                    report.errors.iter().for_each(|e| warn!("{}", e));
                }
                write_json(&report)
            }
            "closure" => {
                let populated = populate(&graph)?;
                let premise_closure = transitive_closure(&populated.premise_preferences);
                let rule_closure = transitive_closure(&populated.rule_preferences);
                info!(
                    "the closure adds {} preference(s)",
                    (premise_closure.len() + rule_closure.len()).saturating_sub(populated.len())
                );
                write_json(&json!({
                    "premisePreferences": premise_closure,
                    "rulePreferences": rule_closure,
                }))
            }
            "cycles" => {
                let populated = populate(&graph)?;
                let premise_cycles = detect_cycles(&populated.premise_preferences);
                let rule_cycles = detect_cycles(&populated.rule_preferences);
                info!("found {} cycle(s)", premise_cycles.len() + rule_cycles.len());
                write_json(&json!({
                    "premiseCycles": premise_cycles,
                    "ruleCycles": rule_cycles,
                }))
            }
            "sync" => {
                let mut reader = AspicReader::default();
                reader.add_warning_handler(Box::new(|line, msg| warn!("at line {}: {}", line, msg)));
                let theory = common::read_file_path_with(common::value_of(arg_matches, ARG_THEORY)?, &|r| {
                    reader.read(r)
                })?;
                let report = sync(&theory, &mut graph)?;
                info!(
                    "created {} preference application(s), skipped {}",
                    report.created, report.skipped
                );
                report.errors.iter().for_each(|e| warn!("{}", e));
                write_json(&graph)
            }
            other => Err(anyhow!(r#"unknown action "{}""#, other)),
        }
    }
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = std::io::stdout();
    serde_json::to_writer_pretty(&mut out, value).context("while writing a JSON document")?;
    writeln!(out).context("while writing a JSON document")
}
