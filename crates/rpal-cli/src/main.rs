use std::fs;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

const DEFAULT_TIMEOUT_SECS: f64 = 1.5;

/// An interpreter for RPAL.
#[derive(Parser)]
#[command(name = "rpal", version, about)]
struct Cli {
    /// Source file to interpret.
    file: String,

    /// Print the parser's tree and exit, without standardizing or executing it.
    #[arg(long = "ast")]
    ast: bool,

    /// Standardize, print the standardized tree, and exit without executing it.
    #[arg(long = "sast")]
    sast: bool,

    /// Render a top-level tuple result as a brace-wrapped list of its leaf integers.
    #[arg(long = "pretty")]
    pretty: bool,

    /// Wall-clock execution budget, in seconds.
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: f64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.file) {
        Ok(s) => s,
        Err(e) => {
            println!("Error: could not read '{}': {}", cli.file, e);
            return ExitCode::FAILURE;
        }
    };

    if cli.ast {
        return match rpal::ast_listing(&source) {
            Ok(listing) => {
                print!("{listing}");
                ExitCode::SUCCESS
            }
            Err(e) => report(e),
        };
    }

    if cli.sast {
        return match rpal::sast_listing(&source) {
            Ok(listing) => {
                print!("{listing}");
                ExitCode::SUCCESS
            }
            Err(e) => report(e),
        };
    }

    let timeout = Duration::from_secs_f64(cli.timeout.max(0.0));
    match rpal::run(&source, timeout) {
        Ok(value) => {
            println!("Output of the above program is:");
            if cli.pretty {
                println!("{}", rpal::printer::render_pretty(&value));
            } else {
                println!("{}", rpal::printer::render(&value));
            }
            ExitCode::SUCCESS
        }
        Err(e) => report(e),
    }
}

/// On timeout the reference RPAL implementation prints the lone character
/// `1` rather than an `Error:` line; that surface behaviour is preserved
/// here rather than folded into the generic error path (§9 Open Questions).
fn report(e: rpal::PipelineError) -> ExitCode {
    if matches!(e, rpal::PipelineError::Runtime(rpal::RuntimeError::Timeout)) {
        println!("1");
    } else {
        println!("Error: {e}");
    }
    ExitCode::FAILURE
}
