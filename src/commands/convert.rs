use posterize::{ConversionSettings, PosterizeResult, Posterizer};

use crate::cli::ConvertCommand;

use super::utils::{derive_svg_path, with_selected_tracer};

/// The main function to run the convert command.
pub fn run(cmd: ConvertCommand) -> PosterizeResult<()> {
    // Settings are validated before the input is decoded.
    let settings = ConversionSettings::from(&cmd.quantization);
    let posterizer = Posterizer::from_settings(&settings)?
        .with_kmeans((&cmd.kmeans).into())
        .with_grouping(cmd.grouping.into());
    let posterizer = with_selected_tracer(posterizer, &cmd.trace);

    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_svg_path(&cmd.input));

    log::info!(
        "converting {} with {:?}",
        cmd.input.display(),
        posterizer.mode()
    );
    let document = posterizer.vectorize_file(&cmd.input)?;
    document.write_to(&output_path)?;
    println!("SVG saved to {}", output_path.display());

    Ok(())
}
