//! Command handlers. Each returns the process exit code.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use super::commands::{ApplyArgs, CheckArgs, DescribeArgs, ListArgs, PrettyArgs};
use super::output::{ModuleSummary, OutputFormatter};
use crate::error::JsonError;
use crate::heuristics::{HeuristicLoader, HeuristicRegistry};
use crate::json::{load_json, load_json_as, pretty_print, save_json_with, sort_keys, SaveOptions};
use crate::seqinfo::SeqInfo;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_DECODE_ERROR: i32 = 2;

fn exit_code(result: Result<()>) -> i32 {
    match result {
        Ok(()) => EXIT_OK,
        Err(e) => {
            error!("{:#}", e);
            let decode = e
                .chain()
                .any(|cause| matches!(cause.downcast_ref::<JsonError>(), Some(JsonError::Decode { .. })));
            if decode {
                EXIT_DECODE_ERROR
            } else {
                EXIT_FAILURE
            }
        }
    }
}

fn emit(output: &str, destination: Option<&Path>) -> Result<()> {
    match destination {
        Some(path) => {
            fs::write(path, format!("{}\n", output))
                .context(format!("Failed to write output to {}", path.display()))?;
            info!("Output written to {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

pub fn handle_list(args: &ListArgs, registry: &HeuristicRegistry) -> i32 {
    exit_code(run_list(args, registry))
}

pub fn handle_describe(args: &DescribeArgs, registry: &HeuristicRegistry) -> i32 {
    exit_code(run_describe(args, registry))
}

pub fn handle_check(args: &CheckArgs, loader: &HeuristicLoader) -> i32 {
    exit_code(run_check(args, loader))
}

pub fn handle_apply(args: &ApplyArgs, loader: &HeuristicLoader) -> i32 {
    exit_code(run_apply(args, loader))
}

pub fn handle_pretty(args: &PrettyArgs) -> i32 {
    exit_code(run_pretty(args))
}

fn run_list(args: &ListArgs, registry: &HeuristicRegistry) -> Result<()> {
    let descriptions = registry.list_descriptions()?;
    debug!("Listing {} heuristics", descriptions.len());
    let formatter = OutputFormatter::new(args.format.into());
    emit(&formatter.format_descriptions(&descriptions)?, None)
}

fn run_describe(args: &DescribeArgs, registry: &HeuristicRegistry) -> Result<()> {
    let description = registry.get_description(&args.name, args.full)?;
    emit(description.trim_end(), None)
}

fn run_check(args: &CheckArgs, loader: &HeuristicLoader) -> Result<()> {
    let module = loader.load(&args.reference)?;
    let formatter = OutputFormatter::new(args.format.into());
    emit(&formatter.format_module(&ModuleSummary::from(&module))?, None)
}

fn run_apply(args: &ApplyArgs, loader: &HeuristicLoader) -> Result<()> {
    let module = loader.load(&args.reference)?;
    let seqinfo: Vec<SeqInfo> = load_json_as(&args.seqinfo)?;
    debug!(
        "Applying heuristic {} to {} series",
        module.name(),
        seqinfo.len()
    );

    let assignments = module.infotodict(&seqinfo);
    let formatter = OutputFormatter::new(args.format.into());
    emit(
        &formatter.format_assignments(&assignments)?,
        args.output.as_deref(),
    )
}

fn run_pretty(args: &PrettyArgs) -> Result<()> {
    let document = load_json(&args.file)?;
    let options = SaveOptions {
        pretty: true,
        sort_keys: args.sort_keys,
    };

    if args.in_place {
        save_json_with(&args.file, &document, options)?;
        info!("Reformatted {}", args.file.display());
        return Ok(());
    }

    let document = if options.sort_keys {
        sort_keys(document)
    } else {
        document
    };
    emit(&pretty_print(&document)?, None)
}
