use super::*;
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("failed to parse CLI args")
}

fn parse_err(args: &[&str]) -> clap::error::Error {
    Cli::try_parse_from(args).expect_err("expected parse failure")
}

// --- Subcommand wiring ---

#[test]
fn parse_check_defaults() {
    let cli = parse(&["zigmem", "check"]);
    match cli.command {
        Commands::Check {
            paths,
            strict,
            suppress,
            max_depth,
            lazy,
        } => {
            assert!(paths.is_empty());
            assert!(!strict);
            assert!(suppress.is_none());
            assert!(max_depth.is_none());
            assert!(!lazy);
        }
        _ => panic!("expected Check"),
    }
}

#[test]
fn parse_check_all_flags() {
    let cli = parse(&[
        "zigmem",
        "check",
        "src",
        "lib/util.zig",
        "--strict",
        "--suppress",
        "M002",
        "--max-depth",
        "8",
        "--lazy",
    ]);
    match cli.command {
        Commands::Check {
            paths,
            strict,
            suppress,
            max_depth,
            lazy,
        } => {
            assert_eq!(paths, vec!["src".to_string(), "lib/util.zig".to_string()]);
            assert!(strict);
            assert_eq!(suppress.as_deref(), Some("M002"));
            assert_eq!(max_depth, Some(8));
            assert!(lazy);
        }
        _ => panic!("expected Check"),
    }
}

#[test]
fn parse_scopes() {
    let cli = parse(&["zigmem", "scopes", "src/main.zig"]);
    match cli.command {
        Commands::Scopes { file } => assert_eq!(file, "src/main.zig"),
        _ => panic!("expected Scopes"),
    }
}

#[test]
fn parse_scopes_requires_file() {
    parse_err(&["zigmem", "scopes"]);
}

#[test]
fn parse_regions() {
    let cli = parse(&["zigmem", "regions", "src/main.zig"]);
    match cli.command {
        Commands::Regions { file } => assert_eq!(file, "src/main.zig"),
        _ => panic!("expected Regions"),
    }
}

#[test]
fn parse_init() {
    let cli = parse(&["zigmem", "init"]);
    assert!(matches!(cli.command, Commands::Init));
}

#[test]
fn parse_completion() {
    let cli = parse(&["zigmem", "completion", "zsh"]);
    match cli.command {
        Commands::Completion { shell } => assert_eq!(shell, "zsh"),
        _ => panic!("expected Completion"),
    }
}

// --- Global flags ---

#[test]
fn parse_global_json_flag() {
    let cli = parse(&["zigmem", "check", "--json"]);
    assert!(cli.json);
    assert!(!cli.ci);
}

#[test]
fn parse_global_ci_flag_after_subcommand() {
    let cli = parse(&["zigmem", "scopes", "a.zig", "--ci"]);
    assert!(cli.ci);
}

#[test]
fn parse_verbose_flag() {
    let cli = parse(&["zigmem", "--verbose", "check"]);
    assert!(cli.verbose);
}

#[test]
fn parse_unknown_subcommand_fails() {
    parse_err(&["zigmem", "frobnicate"]);
}

#[test]
fn parse_max_depth_rejects_non_numeric() {
    parse_err(&["zigmem", "check", "--max-depth", "lots"]);
}
