use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Heuristic management and sidecar tooling for DICOM conversion
#[derive(Parser, Debug)]
#[command(
    name = "heudiconv",
    about = "Heuristic management and sidecar tooling for DICOM conversion",
    version,
    long_about = "heudiconv resolves conversion heuristics by name or path, describes the \
                  heuristics it ships with, applies them to scanned series metadata and \
                  keeps JSON sidecar files in a stable, diff-friendly layout."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Directory of registered heuristics (defaults to the bundled set)"
    )]
    pub heuristics_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "List registered heuristics",
        long_about = "Lists every registered heuristic with the first line of its description.\n\n\
                      Examples:\n  \
                      heudiconv list\n  \
                      heudiconv list --format json"
    )]
    List(ListArgs),

    #[command(
        about = "Show the description of a heuristic",
        long_about = "Prints the one-line description of a registered heuristic, or the whole \
                      documentation with --full.\n\n\
                      Examples:\n  \
                      heudiconv describe reproin\n  \
                      heudiconv describe reproin --full"
    )]
    Describe(DescribeArgs),

    #[command(
        about = "Load a heuristic by name or path and report on it",
        long_about = "Resolves a heuristic reference, loads and validates it, and prints where \
                      it was loaded from.\n\n\
                      Examples:\n  \
                      heudiconv check reproin\n  \
                      heudiconv check ./my_study.yaml"
    )]
    Check(CheckArgs),

    #[command(
        about = "Apply a heuristic to scanned series",
        long_about = "Runs a heuristic over a JSON array of series descriptions and prints the \
                      resulting conversion keys with the series assigned to each.\n\n\
                      Examples:\n  \
                      heudiconv apply reproin seqinfo.json\n  \
                      heudiconv apply ./my_study.yaml seqinfo.json -o keys.json"
    )]
    Apply(ApplyArgs),

    #[command(
        about = "Reformat a JSON sidecar file",
        long_about = "Parses a JSON file and prints it in the sidecar layout, or rewrites the \
                      file with --in-place.\n\n\
                      Examples:\n  \
                      heudiconv pretty sub-01_T1w.json\n  \
                      heudiconv pretty --in-place sub-01_T1w.json"
    )]
    Pretty(PrettyArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct DescribeArgs {
    #[arg(value_name = "NAME", help = "Registered heuristic name")]
    pub name: String,

    #[arg(long, help = "Print the complete documentation")]
    pub full: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[arg(value_name = "REFERENCE", help = "Heuristic name or path to a heuristic file")]
    pub reference: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ApplyArgs {
    #[arg(value_name = "REFERENCE", help = "Heuristic name or path to a heuristic file")]
    pub reference: String,

    #[arg(value_name = "SEQINFO", help = "JSON file holding an array of series descriptions")]
    pub seqinfo: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct PrettyArgs {
    #[arg(value_name = "FILE", help = "JSON file to reformat")]
    pub file: PathBuf,

    #[arg(long, help = "Rewrite the file instead of printing it")]
    pub in_place: bool,

    #[arg(long, help = "Sort object keys alphabetically")]
    pub sort_keys: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_list_defaults() {
        let args = CliArgs::parse_from(["heudiconv", "list"]);
        match args.command {
            Commands::List(list_args) => assert_eq!(list_args.format, OutputFormatArg::Human),
            _ => panic!("Expected List command"),
        }
        assert!(args.heuristics_dir.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_describe_full() {
        let args = CliArgs::parse_from(["heudiconv", "describe", "reproin", "--full"]);
        match args.command {
            Commands::Describe(describe) => {
                assert_eq!(describe.name, "reproin");
                assert!(describe.full);
            }
            _ => panic!("Expected Describe command"),
        }
    }

    #[test]
    fn test_apply_args() {
        let args = CliArgs::parse_from([
            "heudiconv",
            "apply",
            "./study.yaml",
            "seqinfo.json",
            "-o",
            "keys.yaml",
            "-f",
            "yaml",
            "--heuristics-dir",
            "/opt/h",
        ]);
        assert_eq!(args.heuristics_dir, Some(PathBuf::from("/opt/h")));
        match args.command {
            Commands::Apply(apply) => {
                assert_eq!(apply.reference, "./study.yaml");
                assert_eq!(apply.seqinfo, PathBuf::from("seqinfo.json"));
                assert_eq!(apply.output, Some(PathBuf::from("keys.yaml")));
                assert_eq!(apply.format, OutputFormatArg::Yaml);
            }
            _ => panic!("Expected Apply command"),
        }
    }

    #[test]
    fn test_pretty_flags() {
        let args = CliArgs::parse_from(["heudiconv", "pretty", "--in-place", "a.json"]);
        match args.command {
            Commands::Pretty(pretty) => {
                assert!(pretty.in_place);
                assert!(!pretty.sort_keys);
                assert_eq!(pretty.file, PathBuf::from("a.json"));
            }
            _ => panic!("Expected Pretty command"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = CliArgs::try_parse_from(["heudiconv", "-v", "-q", "list"]);
        assert!(result.is_err());
    }
}
