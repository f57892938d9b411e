use heudiconv::cli::commands::{CliArgs, Commands};
use heudiconv::cli::handlers::{
    handle_apply, handle_check, handle_describe, handle_list, handle_pretty,
};
use heudiconv::util::logging::parse_level;
use heudiconv::{HeudiconvConfig, HeuristicLoader, HeuristicRegistry, LoggingConfig, VERSION};

use clap::Parser;
use tracing::{debug, warn, Level};

fn main() {
    let args = CliArgs::parse();

    let (mut config, env_error) = match HeudiconvConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => (HeudiconvConfig::default(), Some(e)),
    };
    apply_args(&args, &mut config);
    init_logging_from_config(&config);

    debug!("heudiconv v{} starting", VERSION);
    debug!("Arguments: {:?}", args);
    debug!("{}", config.to_string().trim_end());
    if let Some(e) = env_error {
        warn!("{}", e);
    }
    for issue in config.issues() {
        warn!("{}", issue);
    }

    let registry = HeuristicRegistry::from_config(&config);

    let exit_code = match &args.command {
        Commands::List(list_args) => handle_list(list_args, &registry),
        Commands::Describe(describe_args) => handle_describe(describe_args, &registry),
        Commands::Check(check_args) => handle_check(check_args, &HeuristicLoader::new(registry)),
        Commands::Apply(apply_args) => handle_apply(apply_args, &HeuristicLoader::new(registry)),
        Commands::Pretty(pretty_args) => handle_pretty(pretty_args),
    };

    std::process::exit(exit_code);
}

/// Command line flags take precedence over the environment
fn apply_args(args: &CliArgs, config: &mut HeudiconvConfig) {
    if let Some(dir) = &args.heuristics_dir {
        config.heuristics_dir = dir.clone();
    }

    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    } else if args.verbose {
        config.log_level = "debug".to_string();
    } else if args.quiet {
        config.log_level = "error".to_string();
    }
}

fn init_logging_from_config(config: &HeudiconvConfig) {
    let level = parse_level(&config.log_level).unwrap_or(Level::INFO);

    heudiconv::init_logging(LoggingConfig {
        use_json: config.log_json,
        ..LoggingConfig::with_level(level)
    });
}
