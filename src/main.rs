use clap::{Parser, Subcommand};
use std::env;
use std::io::{self, Write};
use tapebf::commands::run::{self, RunArgs};

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [-v] [-l N] "<code>"        # Run a program (args are concatenated)
  {0} run [-v] [-l N] --file <PATH>   # Run a program loaded from file

Environment:
  BF_CELL_LIMIT   Default cell limit when -l is not given
  BF_CONFIG       Path to the config file (default: <config home>/bf.toml)
  BF_LOG          Log level for stderr diagnostics (off|error|warn|info|debug|trace)

Run "{0} <subcommand> --help" for more info.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run(RunArgs),
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    env_logger::Builder::from_env(env_logger::Env::new().filter_or("BF_LOG", "warn")).init();

    let cli = Cli::parse();

    let Some(command) = cli.command.filter(|_| !cli.help) else {
        print_top_usage_and_exit(&program, if cli.help { 0 } else { 2 });
    };

    let code = match command {
        Command::Run(args) => run::run(&program, args),
    };

    std::process::exit(code);
}
