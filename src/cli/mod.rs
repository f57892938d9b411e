pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{ApplyArgs, CheckArgs, CliArgs, Commands, DescribeArgs, ListArgs, PrettyArgs};
pub use output::{ModuleSummary, OutputFormat, OutputFormatter};
