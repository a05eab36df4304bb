use posterize::{PosterizeResult, SvgStats};

use crate::cli::InspectCommand;

/// The main function to run the inspect command.
pub fn run(cmd: InspectCommand) -> PosterizeResult<()> {
    let stats = SvgStats::from_path(&cmd.svg)?;
    println!("{}", stats.report(&cmd.svg));
    Ok(())
}
