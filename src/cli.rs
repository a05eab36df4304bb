use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use posterize::config::{DEFAULT_COLORS, DEFAULT_THRESHOLD};
use posterize::{ColorSpace, ConversionSettings, EdgeTraceOptions, KmeansSettings, PathGrouping};
#[cfg(feature = "tracer-visioncortex")]
use posterize::{SimplifyMode, VisionCortexOptions};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a raster image into a posterized SVG
    Convert(ConvertCommand),
    /// Print element and fill statistics of an SVG file
    Inspect(InspectCommand),
}

#[derive(Args, Debug)]
pub struct ConvertCommand {
    /// Input image path
    pub input: PathBuf,
    /// Output SVG path (defaults to input name with `.svg`)
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub quantization: QuantizationArgs,
    #[command(flatten)]
    pub kmeans: KmeansArgs,
    /// How traced curves are grouped into path elements
    #[arg(long, value_enum, default_value_t = GroupingArg::PerCurve)]
    pub grouping: GroupingArg,
    #[command(flatten)]
    pub trace: TraceArgs,
}

#[derive(Args, Debug)]
pub struct InspectCommand {
    /// SVG file to inspect
    pub svg: PathBuf,
}

#[derive(Args, Debug)]
pub struct QuantizationArgs {
    /// Number of colors; 1 switches to black and white thresholding
    #[arg(short = 'k', long, default_value_t = DEFAULT_COLORS, allow_negative_numbers = true)]
    pub colors: i64,
    /// Luma threshold (0-255) used when --colors is 1
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    pub threshold: i64,
    /// Fill color (#rrggbb or a color name) used when --colors is 1
    #[arg(long)]
    pub fill: Option<String>,
}

impl From<&QuantizationArgs> for ConversionSettings {
    fn from(args: &QuantizationArgs) -> Self {
        ConversionSettings::default()
            .with_colors(args.colors)
            .with_threshold(args.threshold)
            .with_fill(args.fill.clone())
    }
}

/// Color space the palette is clustered in.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ColorSpaceArg {
    Lab,
    Rgb,
}

impl From<ColorSpaceArg> for ColorSpace {
    fn from(value: ColorSpaceArg) -> Self {
        match value {
            ColorSpaceArg::Lab => ColorSpace::Lab,
            ColorSpaceArg::Rgb => ColorSpace::Rgb,
        }
    }
}

#[derive(Args, Debug)]
pub struct KmeansArgs {
    /// Color space used for palette clustering
    #[arg(long = "color-space", value_enum, default_value_t = ColorSpaceArg::Lab)]
    pub color_space: ColorSpaceArg,
    /// Number of k-means restarts; the best result is kept
    #[arg(long = "kmeans-runs", default_value_t = 3)]
    pub runs: u32,
    /// Maximum iterations per k-means run
    #[arg(long = "kmeans-iterations", default_value_t = 20)]
    pub kmeans_iterations: usize,
    /// Seed for k-means initialisation
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

impl From<&KmeansArgs> for KmeansSettings {
    fn from(args: &KmeansArgs) -> Self {
        KmeansSettings::default()
            .with_color_space(args.color_space.into())
            .with_runs(args.runs)
            .with_max_iterations(args.kmeans_iterations)
            .with_seed(args.seed)
    }
}

/// Path element grouping in the output document.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GroupingArg {
    /// One path element per traced curve
    PerCurve,
    /// One compound path element per color
    PerLayer,
}

impl From<GroupingArg> for PathGrouping {
    fn from(value: GroupingArg) -> Self {
        match value {
            GroupingArg::PerCurve => PathGrouping::PerCurve,
            GroupingArg::PerLayer => PathGrouping::PerLayer,
        }
    }
}

/// Available tracing algorithms.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TracerArg {
    /// Exact pixel boundary outlines
    Edge,
    /// visioncortex clustering with path simplification
    #[cfg(feature = "tracer-visioncortex")]
    Visioncortex,
}

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Tracing algorithm
    #[arg(long, value_enum, default_value_t = TracerArg::Edge)]
    pub tracer: TracerArg,
    /// Drop traced curves enclosing less than this many pixels (edge tracer)
    #[arg(long = "min-area", default_value_t = 0.0)]
    pub min_area: f64,
    #[cfg(feature = "tracer-visioncortex")]
    #[command(flatten)]
    pub visioncortex: VisionCortexArgs,
}

impl From<&TraceArgs> for EdgeTraceOptions {
    fn from(args: &TraceArgs) -> Self {
        EdgeTraceOptions::default().with_min_area(args.min_area)
    }
}

/// Path simplification modes for the visioncortex tracer.
#[cfg(feature = "tracer-visioncortex")]
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TracerMode {
    None,
    Polygon,
    Spline,
}

#[cfg(feature = "tracer-visioncortex")]
impl From<TracerMode> for SimplifyMode {
    fn from(value: TracerMode) -> Self {
        match value {
            TracerMode::None => SimplifyMode::None,
            TracerMode::Polygon => SimplifyMode::Polygon,
            TracerMode::Spline => SimplifyMode::Spline,
        }
    }
}

#[cfg(feature = "tracer-visioncortex")]
#[derive(Args, Debug)]
pub struct VisionCortexArgs {
    /// Path simplification mode
    #[arg(long = "mode", value_enum, default_value_t = TracerMode::Spline)]
    pub mode: TracerMode,
    /// Discard patches smaller than this many pixels squared
    #[arg(long = "filter-speckle", default_value_t = 4)]
    pub filter_speckle: usize,
    /// Corner threshold in degrees
    #[arg(long = "corner-threshold", default_value_t = 60)]
    pub corner_threshold: i32,
    /// Segment length threshold
    #[arg(long = "length-threshold", default_value_t = 4.0)]
    pub length_threshold: f64,
    /// Maximum subdivision iterations
    #[arg(long = "max-iterations", default_value_t = 10)]
    pub trace_iterations: usize,
    /// Splice threshold in degrees
    #[arg(long = "splice-threshold", default_value_t = 45)]
    pub splice_threshold: i32,
}

#[cfg(feature = "tracer-visioncortex")]
impl From<&VisionCortexArgs> for VisionCortexOptions {
    fn from(args: &VisionCortexArgs) -> Self {
        VisionCortexOptions {
            mode: args.mode.into(),
            filter_speckle: args.filter_speckle,
            corner_threshold: args.corner_threshold,
            length_threshold: args.length_threshold,
            max_iterations: args.trace_iterations,
            splice_threshold: args.splice_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_defaults() {
        let cli = Cli::try_parse_from(["posterize", "convert", "photo.jpg"]).unwrap();
        let Commands::Convert(cmd) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(cmd.input, PathBuf::from("photo.jpg"));
        assert!(cmd.output.is_none());
        let settings = ConversionSettings::from(&cmd.quantization);
        assert_eq!(settings.colors, 8);
        assert_eq!(settings.threshold, 128);
        assert!(settings.fill.is_none());
    }

    #[test]
    fn negative_values_reach_validation() {
        let cli = Cli::try_parse_from([
            "posterize",
            "convert",
            "in.png",
            "out.svg",
            "--colors",
            "-3",
            "--threshold",
            "-1",
        ])
        .unwrap();
        let Commands::Convert(cmd) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(cmd.output, Some(PathBuf::from("out.svg")));
        assert_eq!(cmd.quantization.colors, -3);
        assert!(ConversionSettings::from(&cmd.quantization).resolve().is_err());
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::try_parse_from(["posterize", "inspect", "a.svg", "-vv"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
    }

    #[cfg(feature = "tracer-visioncortex")]
    #[test]
    fn iteration_limits_are_independent() {
        let cli = Cli::try_parse_from([
            "posterize",
            "convert",
            "in.png",
            "--tracer",
            "visioncortex",
            "--kmeans-iterations",
            "7",
            "--max-iterations",
            "3",
        ])
        .unwrap();
        let Commands::Convert(cmd) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(KmeansSettings::from(&cmd.kmeans).max_iterations, 7);
        let options = VisionCortexOptions::from(&cmd.trace.visioncortex);
        assert_eq!(options.max_iterations, 3);
    }
}
