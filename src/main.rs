use std::fs;

use cinder::{Bindings, Error, Interpreter, config::Config};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// cinder runs small scripts written in a C-like language with closures,
/// lists and dicts.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells cinder to read the script from a file instead of the argument.
    #[arg(short, long)]
    file: bool,

    /// Deepest allowed nesting of expressions and blocks.
    #[arg(long, default_value_t = cinder::config::DEFAULT_MAX_NESTING_DEPTH)]
    max_depth: usize,

    /// Deepest allowed chain of function calls.
    #[arg(long, default_value_t = cinder::config::DEFAULT_MAX_CALL_DEPTH)]
    max_calls: usize,

    /// Stop after this many statements and loop iterations.
    #[arg(long)]
    step_limit: Option<u64>,

    /// Predefine a global variable; the value is evaluated as a cinder
    /// expression, e.g. `--define n=10` or `--define "name='bob'"`.
    #[arg(short, long = "define", value_name = "NAME=VALUE", value_parser = parse_define)]
    defines: Vec<(String, String)>,

    contents: String,
}

fn parse_define(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
       .map(|(name, value)| (name.trim().to_string(), value.to_string()))
       .filter(|(name, _)| !name.is_empty())
       .ok_or_else(|| format!("expected NAME=VALUE, found '{raw}'"))
}

/// Installs a log subscriber only when `RUST_LOG` asks for one.
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::registry().with(tracing_subscriber::fmt::layer()
                                                .with_writer(std::io::stderr))
                                      .with(EnvFilter::from_default_env())
                                      .init();
    }
}

fn report(error: &Error) -> ! {
    eprintln!("{error}");
    if let Error::Runtime(runtime) = error {
        let cause = runtime.root_cause();
        if cause != runtime {
            eprintln!("caused by: {cause}");
        }
    }
    std::process::exit(1);
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let (script, file) = if args.file {
        let script = fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        });
        (script, Some(args.contents.as_str()))
    } else {
        (args.contents.clone(), None)
    };

    let config = Config { max_nesting_depth: args.max_depth,
                          max_call_depth:    args.max_calls,
                          step_limit:        args.step_limit, };
    let mut interpreter = Interpreter::with_config(config);
    let mut bindings = Bindings::new();

    for (name, expression) in &args.defines {
        let mut scratch = bindings.clone();
        match interpreter.run(Some(expression), &mut scratch) {
            Ok(value) => {
                bindings.insert(name.clone(), value);
            },
            Err(e) => report(&e),
        }
    }

    let result = match file {
        Some(file) => interpreter.run_named(&script, file, &mut bindings),
        None => interpreter.run(Some(&script), &mut bindings),
    };

    match result {
        Ok(value) => println!("{value}"),
        Err(e) => report(&e),
    }
}
