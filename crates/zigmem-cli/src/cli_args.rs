use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "zigmem",
    version,
    about = "Scope-aware memory-pattern analysis for Zig source"
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as structured JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output as CI annotations (GitHub Actions workflow commands)
    #[arg(long, global = true)]
    pub ci: bool,

    /// Include progress diagnostics on stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Analyze files or directories for memory-pattern issues
    Check {
        /// Files or directories to analyze (empty = current directory)
        paths: Vec<String>,
        /// Exit non-zero on warnings as well as errors
        #[arg(long)]
        strict: bool,
        /// Suppress a specific issue code (e.g., M002)
        #[arg(long)]
        suppress: Option<String>,
        /// Override the tracker's maximum nesting depth (0 = unlimited)
        #[arg(long)]
        max_depth: Option<u32>,
        /// Enable lazy parsing for large files
        #[arg(long)]
        lazy: bool,
    },

    /// Dump the scope forest of one file
    Scopes {
        /// File to analyze
        file: String,
    },

    /// Dump the lexical context regions of one file
    Regions {
        /// File to analyze
        file: String,
    },

    /// Write a default zigmem.json and .zigmemignore
    Init,

    /// Generate shell completion scripts
    Completion {
        /// Shell to target (bash, zsh, fish, elvish, powershell)
        shell: String,
    },
}

#[cfg(test)]
#[path = "cli_args_tests.rs"]
mod tests;
