use super::{
    app_helper::AppHelper, command::Command, AuthorsCommand, CheckCommand, CompareCommand, EvaluateCommand,
    PreferencesCommand, TransposeCommand,
};
use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches};
use crustaspic::{
    aspic::{ArgumentationTheory, DefeatCriterion, OrderingPolicy},
    evaluation::{EvaluationError, EvaluationRequest, OutputLimits},
    graph::{derive_theory, ArgumentGraph},
    io::{AspicReader, JsonReader, JsonWriter, ResponseWriter, TextWriter, TheoryReader},
};
use log::{info, warn};
use std::{
    fs::{self, File},
    io::{BufReader, Read},
    path::PathBuf,
    str::FromStr,
};

pub(crate) fn create_app_helper() -> AppHelper<'static> {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS").unwrap_or("unknown authors");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        authors,
        "Crustaspic, a structured argumentation (ASPIC+) evaluator.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(CheckCommand::new()),
        Box::new(CompareCommand::new()),
        Box::new(EvaluateCommand::new()),
        Box::new(PreferencesCommand::new()),
        Box::new(TransposeCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app
}

pub(crate) fn value_of<'a>(arg_matches: &'a ArgMatches<'_>, name: &str) -> Result<&'a str> {
    arg_matches
        .value_of(name)
        .ok_or_else(|| anyhow!("missing value for argument {}", name))
}

fn parsed_value_of<T>(arg_matches: &ArgMatches<'_>, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = value_of(arg_matches, name)?;
    value
        .parse::<T>()
        .map_err(|e| anyhow!(r#"invalid value "{}" for argument {}: {}"#, value, name, e))
}

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_args() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file that contains the theory")
        .required(true)
}

pub(crate) const ARG_READER: &str = "READER";

pub(crate) fn reader_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_READER)
        .short("r")
        .long("reader")
        .empty_values(false)
        .multiple(false)
        .possible_values(&["aspic", "json", "graph"])
        .default_value("aspic")
        .help("the input file format (text theory, JSON theory or JSON argument graph)")
        .required(false)
}

pub(crate) const ARG_OUTPUT: &str = "OUTPUT";

pub(crate) fn output_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_OUTPUT)
        .short("o")
        .long("output")
        .empty_values(false)
        .multiple(false)
        .possible_values(&["text", "json"])
        .default_value("text")
        .help("the output format")
        .required(false)
}

pub(crate) fn is_json_output(arg_matches: &ArgMatches<'_>) -> Result<bool> {
    Ok(value_of(arg_matches, ARG_OUTPUT)? == "json")
}

pub(crate) fn create_response_writer(arg_matches: &ArgMatches<'_>) -> Result<Box<dyn ResponseWriter>> {
    if is_json_output(arg_matches)? {
        Ok(Box::new(JsonWriter::new_pretty()))
    } else {
        Ok(Box::new(TextWriter::default()))
    }
}

const ARG_ORDERING: &str = "ORDERING";
const ARG_CRITERION: &str = "CRITERION";
const ARG_MAX_DEPTH: &str = "MAX_DEPTH";
const ARG_MAX_ARGUMENTS: &str = "MAX_ARGUMENTS";
const ARG_NO_STRICT_DEDUPE: &str = "NO_STRICT_DEDUPE";
const ARG_REQUIRE_CONSISTENCY: &str = "REQUIRE_CONSISTENCY";
const ARG_TRANSITIVE_CLOSURE: &str = "TRANSITIVE_CLOSURE";
const ARG_NO_CYCLE_DETECTION: &str = "NO_CYCLE_DETECTION";
const ARG_MAX_RETURNED_ARGUMENTS: &str = "MAX_RETURNED_ARGUMENTS";
const ARG_MAX_RETURNED_RELATIONS: &str = "MAX_RETURNED_RELATIONS";

pub(crate) fn ordering_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_ORDERING)
        .long("ordering")
        .empty_values(false)
        .multiple(false)
        .possible_values(&["last-link", "weakest-link"])
        .default_value("last-link")
        .help("the argument ordering policy")
        .required(false)
}

pub(crate) fn evaluation_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_CRITERION)
            .long("criterion")
            .empty_values(false)
            .multiple(false)
            .possible_values(&["strict", "not-worse"])
            .default_value("strict")
            .help("the preference condition attacks must meet to be defeats")
            .required(false),
        Arg::with_name(ARG_MAX_DEPTH)
            .long("max-depth")
            .empty_values(false)
            .multiple(false)
            .default_value("5")
            .help("the maximal number of construction rounds (1 to 10)")
            .required(false),
        Arg::with_name(ARG_MAX_ARGUMENTS)
            .long("max-arguments")
            .empty_values(false)
            .multiple(false)
            .default_value("1000")
            .help("the maximal number of arguments (10 to 5000)")
            .required(false),
        Arg::with_name(ARG_NO_STRICT_DEDUPE)
            .long("no-strict-dedupe")
            .help("keep equivalent arguments with a strict top rule"),
        Arg::with_name(ARG_REQUIRE_CONSISTENCY)
            .long("require-consistency")
            .help("skip rule applications with inconsistent premises"),
        Arg::with_name(ARG_TRANSITIVE_CLOSURE)
            .long("transitive-closure")
            .help("complete the preferences by transitivity"),
        Arg::with_name(ARG_NO_CYCLE_DETECTION)
            .long("no-cycle-detection")
            .help("do not report cycles among the preferences"),
        Arg::with_name(ARG_MAX_RETURNED_ARGUMENTS)
            .long("max-returned-arguments")
            .empty_values(false)
            .multiple(false)
            .help("the maximal number of arguments listed in the output")
            .required(false),
        Arg::with_name(ARG_MAX_RETURNED_RELATIONS)
            .long("max-returned-relations")
            .empty_values(false)
            .multiple(false)
            .help("the maximal number of attacks (and of defeats) listed in the output")
            .required(false),
    ]
}

pub(crate) fn create_request(
    arg_matches: &ArgMatches<'_>,
    theory: ArgumentationTheory,
) -> Result<EvaluationRequest> {
    let mut request = EvaluationRequest::new(theory);
    if arg_matches.is_present(ARG_ORDERING) {
        request.ordering = parsed_value_of::<OrderingPolicy>(arg_matches, ARG_ORDERING)?;
    }
    request.defeat_criterion = parsed_value_of::<DefeatCriterion>(arg_matches, ARG_CRITERION)?;
    request.max_depth = parsed_value_of(arg_matches, ARG_MAX_DEPTH)?;
    request.max_arguments = parsed_value_of(arg_matches, ARG_MAX_ARGUMENTS)?;
    request.dedupe_strict_rules = !arg_matches.is_present(ARG_NO_STRICT_DEDUPE);
    request.require_consistency = arg_matches.is_present(ARG_REQUIRE_CONSISTENCY);
    request.compute_transitive_closure = arg_matches.is_present(ARG_TRANSITIVE_CLOSURE);
    request.detect_cycles = !arg_matches.is_present(ARG_NO_CYCLE_DETECTION);
    request.validate().map_err(evaluation_error)?;
    Ok(request)
}

pub(crate) fn create_output_limits(arg_matches: &ArgMatches<'_>) -> Result<OutputLimits> {
    let mut limits = OutputLimits::default();
    if arg_matches.is_present(ARG_MAX_RETURNED_ARGUMENTS) {
        limits.max_arguments = parsed_value_of(arg_matches, ARG_MAX_RETURNED_ARGUMENTS)?;
    }
    if arg_matches.is_present(ARG_MAX_RETURNED_RELATIONS) {
        let max = parsed_value_of(arg_matches, ARG_MAX_RETURNED_RELATIONS)?;
        limits.max_attacks = max;
        limits.max_defeats = max;
    }
    Ok(limits)
}

/// Turns an evaluation error into an app error, keeping the cause of internal errors.
pub(crate) fn evaluation_error(e: EvaluationError) -> anyhow::Error {
    let body = e.to_response(true).error;
    anyhow!("{} ({})", body.message, body.code)
}

/// The content of an input file.
pub(crate) struct Input {
    pub(crate) theory: ArgumentationTheory,
    pub(crate) graph: Option<ArgumentGraph>,
}

pub(crate) fn read_input(arg_matches: &ArgMatches<'_>) -> Result<Input> {
    let file = value_of(arg_matches, ARG_INPUT)?;
    let input = match value_of(arg_matches, ARG_READER)? {
        "aspic" => {
            let mut reader = AspicReader::default();
            reader.add_warning_handler(Box::new(|line, msg| warn!("at line {}: {}", line, msg)));
            Input {
                theory: read_file_path_with(file, &|r| reader.read(r))?,
                graph: None,
            }
        }
        "json" => Input {
            theory: read_file_path_with(file, &|r| JsonReader::default().read(r))?,
            graph: None,
        },
        "graph" => {
            let graph = read_graph(file)?;
            let (theory, warnings) = derive_theory(&graph)?;
            warnings.iter().for_each(|w| warn!("{}", w));
            Input {
                theory,
                graph: Some(graph),
            }
        }
        other => return Err(anyhow!(r#"unknown reader "{}""#, other)),
    };
    let theory = &input.theory;
    info!(
        "the theory has {} rule(s), {} knowledge base element(s) and {} contrariness pair(s)",
        theory.rules().len(),
        theory.knowledge_base().len(),
        theory.contraries().len()
    );
    Ok(input)
}

pub(crate) fn read_graph(file_path: &str) -> Result<ArgumentGraph> {
    let graph = read_file_path_with(file_path, &|r| {
        let mut json = String::new();
        r.read_to_string(&mut json).context("while reading the graph")?;
        ArgumentGraph::from_json(&json)
    })?;
    info!(
        "the argument graph has {} claim(s) and {} argument(s)",
        graph.claims().len(),
        graph.arguments().len()
    );
    Ok(graph)
}

pub(crate) fn read_file_path_with<F, R>(file_path: &str, reader: &F) -> Result<R>
where
    F: Fn(&mut dyn Read) -> Result<R>,
{
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(
        File::open(&canonicalized).with_context(|| format!("while opening file {:?}", canonicalized))?,
    );
    (reader)(&mut file_reader)
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}
