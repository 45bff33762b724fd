use clap::Args;
use log::{info, warn};
use std::fs;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::time::Instant;

use crate::cli_util::print_engine_error;
use crate::config::{InputMode, Overrides, Settings};
use crate::engine;
use crate::io::{ByteInput, FlushingOutput, InputSource, LineInput};
use crate::stats::Report;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print execution statistics after the program finishes
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Maximum pointer excursion from the origin (fallback BF_CELL_LIMIT, config, default 256)
    #[arg(short = 'l', long = "cell-limit", value_name = "N")]
    pub cell_limit: Option<NonZeroUsize>,

    /// Prompt for a line on each `,` and use its first character
    #[arg(long = "line-input")]
    pub line_input: bool,

    /// Read program text from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated program parts; put them after `--` if the first one starts with '-'
    #[arg(value_name = "code")]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        verbose,
        cell_limit,
        line_input,
        file,
        code,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let code_str = if let Some(path) = file {
        // Anything outside the operator set is a comment, so stray non-UTF-8 bytes are fine
        match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                eprintln!("{program}: failed to read code file {path}: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        code.join("")
    };

    let settings = Settings::load(Overrides {
        cell_limit,
        verbose,
        input: line_input.then_some(InputMode::Line),
    });
    info!(
        "cell limit {}, input mode {:?}, verbose {}",
        settings.cell_limit, settings.input, settings.verbose
    );

    // Flush whatever the program printed so far and leave on ctrl+c
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        warn!("failed to set ctrl+c handler: {e}");
    }

    let mut input: Box<dyn InputSource> = match settings.input {
        InputMode::Byte => Box::new(ByteInput::new(io::stdin().lock())),
        InputMode::Line => Box::new(LineInput::new(io::stdin().lock(), io::stdout())),
    };
    let mut output = FlushingOutput::new(io::stdout());

    let started = Instant::now();
    let (counters, result) = engine::run(&code_str, settings.cell_limit, &mut *input, &mut output);
    let report = Report::new(counters, started.elapsed());

    // For readability, ensure output ends with a newline
    println!();
    let _ = io::stdout().flush();

    if let Err(err) = result {
        print_engine_error(Some(program), &code_str, &err);
        return 1;
    }

    if settings.verbose {
        println!();
        println!("{report}");
        let _ = io::stdout().flush();
    }

    0
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [-v] [-l N] [--line-input] "<code>"
  {0} run [-v] [-l N] [--line-input] --file <PATH>

Options:
  --file,       -f <PATH>  Read the program from PATH instead of positional "<code>"
  --cell-limit, -l <N>     Abort once the pointer strays more than N cells from the origin
                           (fallback BF_CELL_LIMIT, then bf.toml, default 256)
  --verbose,    -v         Print operator/operation counts and timing after the run
  --line-input             Prompt with "> " on each `,` and use the first character of the line
  --help,       -h         Show this help

Notes:
- Characters other than ><+-.,[] are ignored, so programs may carry comments.
- Cells are 8 bits wide and wrap; the tape extends in both directions.
- `.` prints unprintable values as '?'.
- `,` reads a single byte from stdin; running out of input is an error.

Examples:
- Flags may appear anywhere; a program starting with '-' goes after `--`:
    {0} run -v -- "-[->+<]>."
- Load a program from a file:
    {0} run --file ./program.bf
- Feed `,` from a file (one byte per `,`):
    {0} run ",.,." < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
