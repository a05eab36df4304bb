mod convert;
mod inspect;
mod utils;

use crate::cli::{Cli, Commands};
use posterize::PosterizeResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> PosterizeResult<()> {
    let Cli { global: _, command } = cli;
    dispatch(command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(command: Commands) -> PosterizeResult<()> {
    match command {
        Commands::Convert(cmd) => convert::run(cmd),
        Commands::Inspect(cmd) => inspect::run(cmd),
    }
}
