use super::{cli_manager::logging_level_cli_arg, command::Command, common};
use anyhow::{Context, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use crustaspic::rationality::{check_well_formedness, transposition_summary, validate_transposition_closure};
use log::{info, warn};
use std::io::Write;

const CMD_NAME: &str = "check";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks a theory for errors and reports its well-formedness")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::reader_arg())
            .arg(common::output_arg())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let input = common::read_input(arg_matches)?;
        let report = check_well_formedness(&input.theory);
        info!(
            "{}",
            transposition_summary(&validate_transposition_closure(input.theory.rules()))
        );
        report.violations.iter().for_each(|v| warn!("{}", v));
        let mut out = std::io::stdout();
        if common::is_json_output(arg_matches)? {
            serde_json::to_writer_pretty(&mut out, &report).context("while writing the report")?;
            writeln!(out).context("while writing the report")?;
        } else {
            let status = if report.well_formed {
                "well-formed"
            } else {
                "not well-formed"
            };
            writeln!(out, "{}", status).context("while writing the report")?;
            writeln!(out, "closure property {}", report.closure_property).context("while writing the report")?;
        }
        Ok(())
    }
}
