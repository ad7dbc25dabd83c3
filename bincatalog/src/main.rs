//! Catalog command-line tool for checking and transcoding catalog documents.
//!
//! Usage: catalog [OPTIONS] [FILE|-]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (catalog, json, yaml, toml, cbor)
//!   -o, --output <FILE>    Write output to specified file
//!   --array                Top-level value is an array instead of a record
//!   --check                Check if file is valid (exit 0 if valid, 1 if invalid)
//!   --lenient              Ignore anything after the top-level value
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! Diagnostics go to stderr, filtered by the `CATALOG_LOG` environment
//! variable (for example `CATALOG_LOG=libcatalog=debug`).

use libcatalog::{encode, Format, ParseContext, Parser, ParserConfig, Tokenizer, Value};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

mod transcode;

/// Output formats accepted by `-t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Catalog,
    Json,
    Yaml,
    Toml,
    Cbor,
}

fn parse_output(s: &str) -> Option<Output> {
    match s {
        "catalog" | "cat" | "ssc" => Some(Output::Catalog),
        "json" => Some(Output::Json),
        "yaml" | "yml" => Some(Output::Yaml),
        "toml" => Some(Output::Toml),
        "cbor" => Some(Output::Cbor),
        _ => None,
    }
}

/// Options gathered from the command line.
struct Options<'a> {
    to: Output,
    output_file: Option<&'a str>,
    input_path: Option<&'a str>,
    array: bool,
    check_only: bool,
    lenient: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("CATALOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let mut opts = Options {
        to: Output::Catalog,
        output_file: None,
        input_path: None,
        array: false,
        check_only: false,
        lenient: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("catalog {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                match parse_output(&args[i]) {
                    Some(to) => opts.to = to,
                    None => {
                        eprintln!("Error: Unknown format: {}", args[i]);
                        process::exit(1);
                    }
                }
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                opts.output_file = Some(&args[i]);
            }
            "--array" => opts.array = true,
            "--check" => opts.check_only = true,
            "--lenient" => opts.lenient = true,
            "-" => {
                // Explicit stdin
                // input_path stays None, which means stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if opts.input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                opts.input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    if opts.check_only && opts.output_file.is_some() {
        eprintln!("Error: --check and --output are mutually exclusive");
        process::exit(1);
    }

    let input = match read_input(opts.input_path) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    process::exit(process_input(&input, &opts));
}

fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("reading {}: {}", path, e)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("reading stdin: {}", e))?;
            Ok(buffer)
        }
    }
}

fn process_input(input: &str, opts: &Options) -> i32 {
    let filename = opts.input_path.map(|p| {
        Path::new(p)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| p.to_string())
    });
    let ctx = ParseContext::new(filename.as_deref());
    let config = ParserConfig::new().with_allow_trailing(opts.lenient);
    let mut parser = Parser::new(Tokenizer::with_context(input, ctx.clone()))
        .with_context(ctx)
        .with_config(config);

    let result = if opts.array {
        parser.parse_top_level_array().map(Value::Array)
    } else {
        parser.parse_top_level_record().map(Value::Record)
    };

    let value = match result {
        Ok(value) => value,
        Err(e) => {
            match opts.input_path {
                Some(path) => eprintln!("{}: {}", path, e),
                None => eprintln!("Parse error: {}", e),
            }
            return 1;
        }
    };
    debug!(kind = ?value.kind(), "parsed document");

    if opts.check_only {
        if let Some(path) = opts.input_path {
            println!("{}: ok", path);
        }
        return 0;
    }

    output_value(&value, opts.to, opts.output_file)
}

fn output_value(value: &Value, to: Output, output_file: Option<&str>) -> i32 {
    let result = match to {
        Output::Catalog => Ok(encode(value, Format::Catalog).into_bytes()),
        Output::Json => Ok(encode(value, Format::Json).into_bytes()),
        Output::Yaml => transcode::yaml::encode(value).map(String::into_bytes),
        Output::Toml => transcode::toml::encode(value).map(String::into_bytes),
        Output::Cbor => transcode::cbor::encode(value),
    };

    let mut output = match result {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: Cannot convert to {:?}: {}", to, e);
            return 1;
        }
    };

    // Text output ends with a newline
    if to != Output::Cbor && !output.ends_with(b"\n") {
        output.push(b'\n');
    }

    match write_output(&output, output_file) {
        Ok(()) => {
            info!(bytes = output.len(), format = ?to, "wrote output");
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn write_output(output: &[u8], output_file: Option<&str>) -> Result<(), String> {
    match output_file {
        Some(path) => fs::write(path, output).map_err(|e| format!("writing {}: {}", path, e)),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output)
                .map_err(|e| format!("writing to stdout: {}", e))
        }
    }
}

fn print_help() {
    println!(
        "catalog - catalog file checker and transcoder

USAGE:
    catalog [OPTIONS] [FILE|-]

ARGS:
    [FILE|-]    Input file (reads from stdin if not provided or '-')

OPTIONS:
    -t, --to <FORMAT>      Output format [default: catalog]
                           Supported: catalog, json, yaml, toml, cbor

    -o, --output <FILE>    Write output to specified file

    --array                Parse the input as a top-level array instead of a record

    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    --lenient              Ignore anything after the top-level value

    -h, --help             Print help

    -V, --version          Print version

ENVIRONMENT:
    CATALOG_LOG            Log filter for diagnostics on stderr [default: warn]

EXAMPLES:
    # Validate a catalog file
    catalog --check solarsys.ssc

    # Reformat a catalog file
    catalog solarsys.ssc

    # Convert to JSON (unit annotations become Property%Family members)
    catalog -t json solarsys.ssc

    # Convert to CBOR (binary)
    catalog -t cbor solarsys.ssc -o solarsys.cbor"
    );
}
