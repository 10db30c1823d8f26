mod cli;
mod combine_cmd;
mod parse_cmd;
mod process_cmd;
mod reconcile_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Process {
            ref workspace,
            page_batch_size,
            no_combine,
            ref format,
        } => process_cmd::run(workspace, page_batch_size, no_combine, format),
        cli::Commands::Combine {
            ref workspace,
            batch_size,
            ref format,
        } => combine_cmd::run(workspace, batch_size, format),
        cli::Commands::Reconcile {
            ref workspace,
            ref file,
            ref format,
        } => reconcile_cmd::run(workspace, file, format),
        cli::Commands::Parse {
            ref file,
            ref format,
        } => parse_cmd::run(file, format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
