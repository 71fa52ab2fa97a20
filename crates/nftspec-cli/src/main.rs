//! nftspec CLI: the `nftspec` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    support::init_tracing();

    commands::compile::run(commands::compile::Args {
        spec: cli.spec,
        skeleton: cli.skeleton,
        out: cli.out,
        yes: cli.yes,
        json: cli.json,
    });
}
