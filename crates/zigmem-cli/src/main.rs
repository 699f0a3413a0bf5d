//! zigmem CLI — scope-aware memory-pattern analysis for Zig source.
//!
//! This binary provides the `zigmem` command with subcommands for checking
//! files, dumping scope/region structure, initialization, and shell
//! completion. See `zigmem --help` for usage.

use clap::Parser;

mod cli_args;
mod commands;

use cli_args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let formatter: Box<dyn zigmem_output::OutputFormatter> = if cli.json {
        Box::new(zigmem_output::json::JsonFormatter)
    } else if cli.ci {
        Box::new(zigmem_output::ci::CiFormatter)
    } else {
        Box::new(zigmem_output::human::HumanFormatter)
    };

    let exit_code = match cli.command {
        Commands::Check {
            paths,
            strict,
            suppress,
            max_depth,
            lazy,
        } => commands::check::run(
            &*formatter,
            cli.verbose,
            paths,
            strict,
            suppress,
            max_depth,
            lazy,
        ),
        Commands::Scopes { file } => commands::scopes::run(&*formatter, cli.verbose, &file),
        Commands::Regions { file } => commands::regions::run(&*formatter, cli.verbose, &file),
        Commands::Init => commands::init::run(cli.verbose),
        Commands::Completion { shell } => commands::completion::run(&shell),
    };

    std::process::exit(exit_code);
}
