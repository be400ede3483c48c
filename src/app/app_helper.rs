use super::{cli_manager::CliManager, command::Command};
use anyhow::Result;
use log::{error, info};
use std::{ffi::OsString, sync::Once, time::Instant};

static LOGGER_INIT: Once = Once::new();

/// The main struct used to build the app.
///
/// This helper should be used this way:
/// 1. create a new instance of this helper,
/// 2. add the commands of the app,
/// 3. call [`launch_app`](Self::launch_app).
///
/// Launching the app initializes the logger, reads the CLI arguments and executes the right command.
/// If an error is returned by a command, the error stack is logged and a status of 1 is returned to the system.
pub(crate) struct AppHelper<'a> {
    cli_manager: CliManager<'a>,
}

impl<'a> AppHelper<'a> {
    pub(crate) fn new(app_name: &'a str, version: &'a str, author: &'a str, about: &'a str) -> Self {
        AppHelper {
            cli_manager: CliManager::new(app_name, version, author, about),
        }
    }

    pub(crate) fn add_command(&mut self, command: Box<dyn Command<'a> + 'a>) {
        self.cli_manager.add_command(command);
    }

    /// Launches the app with the arguments given by `std::env::args_os()`.
    pub(crate) fn launch_app(self) {
        self.launch_app_with_args(std::env::args_os())
    }

    pub(crate) fn launch_app_with_args<I, T>(self, args: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        if let Err(e) = self.execute_app(args) {
            error!("an error occurred: {}", e);
            e.chain()
                .skip(1)
                .for_each(|err| error!("caused by: {}", err));
            std::process::exit(1);
        }
    }

    fn execute_app<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let start_time = Instant::now();
        let result = self.cli_manager.parse_cli(args);
        if result.is_ok() {
            info!("exiting successfully after {:?}", start_time.elapsed());
        }
        result
    }
}

pub(crate) fn init_logger() {
    init_logger_with_level(log::LevelFilter::Info)
}

/// Initializes the logger; only the first call has an effect.
///
/// Logs are written to the standard error, leaving the standard output to the results.
pub(crate) fn init_logger_with_level(level: log::LevelFilter) {
    LOGGER_INIT.call_once(|| {
        let colors = fern::colors::ColoredLevelConfig::new().info(fern::colors::Color::Cyan);
        fern::Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "![{:5}] {} {}",
                    colors.color(record.level()),
                    chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                    message
                ))
            })
            .level(level)
            .chain(std::io::stderr())
            .apply()
            .unwrap_or(());
    });
}
