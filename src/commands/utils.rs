use std::path::{Path, PathBuf};

use posterize::{PixelEdgeTracer, Posterizer};
#[cfg(feature = "tracer-visioncortex")]
use posterize::VisionCortexTracer;

use crate::cli::{TraceArgs, TracerArg};

/// Install the tracer chosen on the command line.
pub fn with_selected_tracer(posterizer: Posterizer, args: &TraceArgs) -> Posterizer {
    match args.tracer {
        TracerArg::Edge => posterizer.with_tracer(PixelEdgeTracer::new(args.into())),
        #[cfg(feature = "tracer-visioncortex")]
        TracerArg::Visioncortex => {
            posterizer.with_tracer(VisionCortexTracer::new((&args.visioncortex).into()))
        }
    }
}

/// Derive an SVG file path by changing the extension to "svg".
pub fn derive_svg_path(input: &Path) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension("svg");
    path
}
