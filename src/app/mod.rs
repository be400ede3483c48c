mod app_helper;

mod authors_command;
pub(crate) use authors_command::AuthorsCommand;

mod check_command;
pub(crate) use check_command::CheckCommand;

mod cli_manager;

mod command;

pub(crate) mod common;

mod compare_command;
pub(crate) use compare_command::CompareCommand;

mod evaluate_command;
pub(crate) use evaluate_command::EvaluateCommand;

mod preferences_command;
pub(crate) use preferences_command::PreferencesCommand;

mod transpose_command;
pub(crate) use transpose_command::TransposeCommand;

mod writable_string;
