use super::{cli_manager::logging_level_cli_arg, command::Command, common};
use anyhow::{Context, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use crustaspic::{
    aspic::Rule,
    io::AspicWriter,
    rationality::{apply_transposition_closure, transposition_summary, validate_transposition_closure},
};
use log::info;
use std::io::Write;

const CMD_NAME: &str = "transpose";

pub(crate) struct TransposeCommand;

impl TransposeCommand {
    pub(crate) fn new() -> Self {
        TransposeCommand
    }
}

impl<'a> Command<'a> for TransposeCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Closes the strict rules of a theory under transposition and writes the resulting theory")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::reader_arg())
            .arg(common::output_arg())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let mut theory = common::read_input(arg_matches)?.theory;
        info!(
            "{}",
            transposition_summary(&validate_transposition_closure(theory.rules()))
        );
        let closed = apply_transposition_closure(theory.rules())
            .into_iter()
            .filter(|r| r.is_strict())
            .collect::<Vec<Rule>>();
        let n_added = closed.len() - theory.strict_rules().count();
        theory
            .replace_strict_rules(closed)
            .context("while adding the transposed rules")?;
        info!("added {} transposed rule(s)", n_added);
        let mut out = std::io::stdout();
        if common::is_json_output(arg_matches)? {
            serde_json::to_writer_pretty(&mut out, &theory).context("while writing the theory")?;
            writeln!(out).context("while writing the theory")
        } else {
            AspicWriter::default().write_theory(&theory, &mut out)
        }
    }
}
