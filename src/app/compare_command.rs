use super::{cli_manager::logging_level_cli_arg, command::Command, common};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use crustaspic::evaluation::Evaluator;
use log::info;

const CMD_NAME: &str = "compare";

pub(crate) struct CompareCommand;

impl CompareCommand {
    pub(crate) fn new() -> Self {
        CompareCommand
    }
}

impl<'a> Command<'a> for CompareCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Compares the evaluations of a theory under the last-link and weakest-link orderings")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::reader_arg())
            .args(&common::evaluation_args())
            .arg(common::output_arg())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let input = common::read_input(arg_matches)?;
        let request = common::create_request(arg_matches, input.theory)?;
        let evaluator = Evaluator::default().with_limits(common::create_output_limits(arg_matches)?);
        let comparison = evaluator
            .compare_orderings(&request)
            .map_err(common::evaluation_error)?;
        info!(
            "{} argument(s) change their status between the orderings",
            comparison.status_differences.len()
        );
        let writer = common::create_response_writer(arg_matches)?;
        writer.write_comparison(&mut std::io::stdout(), &comparison)
    }
}
