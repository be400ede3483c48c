use super::{cli_manager::logging_level_cli_arg, command::Command, common};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use crustaspic::evaluation::Evaluator;
use log::{info, warn};

const CMD_NAME: &str = "evaluate";

pub(crate) struct EvaluateCommand;

impl EvaluateCommand {
    pub(crate) fn new() -> Self {
        EvaluateCommand
    }
}

impl<'a> Command<'a> for EvaluateCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Builds the arguments of a theory and computes their grounded status")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::reader_arg())
            .arg(common::ordering_arg())
            .args(&common::evaluation_args())
            .arg(common::output_arg())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let input = common::read_input(arg_matches)?;
        let request = common::create_request(arg_matches, input.theory)?;
        let evaluator = Evaluator::default().with_limits(common::create_output_limits(arg_matches)?);
        let response = match &input.graph {
            Some(g) => evaluator.evaluate_with_store(&request, g),
            None => evaluator.evaluate(&request),
        }
        .map_err(common::evaluation_error)?;
        info!(
            "{} argument(s), {} attack(s), {} defeat(s), {} in the grounded extension",
            response.metrics.argument_count,
            response.metrics.attack_count,
            response.metrics.defeat_count,
            response.grounded_extension.len()
        );
        response.warnings.iter().for_each(|w| warn!("{}", w));
        let writer = common::create_response_writer(arg_matches)?;
        writer.write_response(&mut std::io::stdout(), &response)
    }
}
