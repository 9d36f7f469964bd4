//! Command-line interface for rnc2rng
//! Compiles a RELAX NG compact syntax schema to RELAX NG XML, or dumps the intermediate
//! tokens and trees for inspection.
//!
//! Usage:
//!   rnc2rng [`<path>`|-]                          - Compile to XML (stdin when omitted)
//!   rnc2rng `<path>` --emit tokens                 - List the tokens
//!   rnc2rng `<path>` --emit tree --stage bodies    - Dump the tree after a pass
//!   rnc2rng `<path>` --config `<file>`             - Layer a TOML configuration file

use clap::{Arg, ArgAction, ArgMatches, Command};
use rnc2rng::rnc::config::{Emit, Loader, Rnc2RngConfig};
use rnc2rng::rnc::error::{format_source_context, CompileError, ErrorCategory};
use rnc2rng::rnc::formats::{tokens_to_json, tokens_to_simple, to_treeviz_str, SerializeOptions};
use rnc2rng::rnc::lexing::preprocess;
use rnc2rng::rnc::transforms::stages::SerializeXml;
use rnc2rng::rnc::transforms::standard::{
    CORE_TOKENIZATION, TO_BODIES, TO_DEFINES, TO_PAIRS, TO_SCHEMA,
};
use rnc2rng::rnc::transforms::Runnable;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("rnc2rng")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile RELAX NG compact syntax to RELAX NG XML")
        .arg(
            Arg::new("path")
                .help("Path to the .rnc file ('-' or omitted reads standard input)")
                .index(1),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .short('e')
                .help("Output: xml, tokens, token-json or tree (default from configuration)")
                .value_parser(["xml", "tokens", "token-json", "tree"]),
        )
        .arg(
            Arg::new("stage")
                .long("stage")
                .short('s')
                .help("Pass after which --emit tree dumps the tree")
                .value_parser(["pairs", "bodies", "defines", "namespaces"])
                .default_value("namespaces"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("spans")
                .long("spans")
                .help("Append byte ranges to token listings")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(matches)?;
    let source = read_source(matches.get_one::<String>("path").map(String::as_str))?;
    let emit = match matches.get_one::<String>("emit") {
        Some(name) => Emit::parse(name).ok_or_else(|| format!("Unknown output '{}'", name))?,
        None => config.inspect.emit,
    };
    debug!(?emit, bytes = source.len(), "compiling");

    let output = match emit {
        Emit::Xml => {
            let options = SerializeOptions::from(&config.output);
            let schema = TO_SCHEMA
                .run(source.clone())
                .map_err(|err| report(err, &source))?;
            let xml = SerializeXml::with_options(options)
                .run(schema)
                .map_err(|err| report(err, &source))?;
            format!("{}\n", xml)
        }
        Emit::Tokens => {
            let tokens = CORE_TOKENIZATION.run(source)?;
            tokens_to_simple(&tokens, config.inspect.show_spans)
        }
        Emit::TokenJson => {
            let tokens = CORE_TOKENIZATION.run(source)?;
            format!("{}\n", tokens_to_json(&tokens, config.inspect.show_spans)?)
        }
        Emit::Tree => {
            let stage = matches
                .get_one::<String>("stage")
                .map(String::as_str)
                .unwrap_or("namespaces");
            let nodes = match stage {
                "pairs" => TO_PAIRS.run(source.clone()),
                "bodies" => TO_BODIES.run(source.clone()),
                "defines" => TO_DEFINES.run(source.clone()),
                _ => TO_SCHEMA
                    .run(source.clone())
                    .map(|schema| schema.items().to_vec()),
            }
            .map_err(|err| report(err, &source))?;
            to_treeviz_str(&nodes)
        }
    };

    print!("{}", output);
    Ok(())
}

fn load_config(matches: &ArgMatches) -> Result<Rnc2RngConfig, Box<dyn std::error::Error>> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if matches.get_flag("spans") {
        loader = loader.set_override("inspect.show_spans", true)?;
    }
    Ok(loader.build()?)
}

fn read_source(path: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    match path {
        None | Some("-") => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("Cannot read '{}': {}", path, err).into()),
    }
}

/// Print the diagnostic details of a compile error to stderr.
fn report(err: CompileError, source: &str) -> CompileError {
    if err.category() == ErrorCategory::Internal {
        eprintln!("This is a bug in rnc2rng, please report it.");
    }
    if let Some(offset) = err.offset() {
        eprintln!("{}", format_source_context(&preprocess(source), offset));
    }
    err
}
