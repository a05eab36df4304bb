pub mod config;
pub mod diagnose;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod pipeline;
pub mod quantize;
pub mod svg;
pub mod tracer;

pub use config::{ColorSpace, ConversionSettings, FillColor, KmeansSettings, QuantizationMode};
pub use diagnose::SvgStats;
pub use error::{PosterizeError, PosterizeResult, SerializeError, TraceError};
pub use geometry::{Curve, Point, Segment};
pub use svg::{PathGrouping, VectorDocument};
pub use tracer::{BitmapTracer, EdgeTraceOptions, PixelEdgeTracer};
#[cfg(feature = "tracer-visioncortex")]
pub use tracer::{SimplifyMode, VisionCortexOptions, VisionCortexTracer};

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use image::RgbImage;

use crate::pipeline::build_document;

/// Entry point for configuring and running a raster to SVG conversion.
#[derive(Clone)]
pub struct Posterizer {
    mode: QuantizationMode,
    kmeans: KmeansSettings,
    grouping: PathGrouping,
    tracer: Arc<dyn BitmapTracer>,
}

impl Posterizer {
    /// Create a posterizer for an already resolved mode, tracing with
    /// [`PixelEdgeTracer`].
    pub fn new(mode: QuantizationMode) -> Self {
        Self {
            mode,
            kmeans: KmeansSettings::default(),
            grouping: PathGrouping::default(),
            tracer: Arc::new(PixelEdgeTracer::default()),
        }
    }

    /// Validate user supplied settings. Fails before any image is touched.
    pub fn from_settings(settings: &ConversionSettings) -> PosterizeResult<Self> {
        Ok(Self::new(settings.resolve()?))
    }

    /// Set the k-means settings used in palette mode.
    pub fn with_kmeans(mut self, kmeans: KmeansSettings) -> Self {
        self.kmeans = kmeans;
        self
    }

    /// Set how curves are grouped into path elements.
    pub fn with_grouping(mut self, grouping: PathGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Replace the tracing algorithm.
    pub fn with_tracer(mut self, tracer: impl BitmapTracer + 'static) -> Self {
        self.tracer = Arc::new(tracer);
        self
    }

    pub fn mode(&self) -> &QuantizationMode {
        &self.mode
    }

    pub fn kmeans(&self) -> &KmeansSettings {
        &self.kmeans
    }

    pub fn grouping(&self) -> PathGrouping {
        self.grouping
    }

    /// Run quantization, tracing and assembly on a decoded image.
    pub fn vectorize(&self, image: &RgbImage) -> PosterizeResult<VectorDocument> {
        let document = build_document(image, &self.mode, &self.kmeans, self.tracer.as_ref())?;
        Ok(document.with_grouping(self.grouping))
    }

    /// Decode the image at `path` and vectorize it.
    pub fn vectorize_file(&self, path: impl AsRef<Path>) -> PosterizeResult<VectorDocument> {
        let image = image::open(path.as_ref())?.to_rgb8();
        self.vectorize(&image)
    }
}

impl fmt::Debug for Posterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Posterizer")
            .field("mode", &self.mode)
            .field("kmeans", &self.kmeans)
            .field("grouping", &self.grouping)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Mask;
    use image::Rgb;

    struct SquareTracer;

    impl BitmapTracer for SquareTracer {
        fn trace(&self, _mask: &Mask) -> Result<Vec<Curve>, TraceError> {
            let corners: [Point; 4] = [(0, 0).into(), (1, 0).into(), (1, 1).into(), (0, 1).into()];
            Ok(Curve::from_polygon(&corners).into_iter().collect())
        }
    }

    #[test]
    fn invalid_settings_fail_before_work() {
        let err = Posterizer::from_settings(&ConversionSettings::default().with_colors(0))
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn default_settings_use_palette_mode() {
        let posterizer = Posterizer::from_settings(&ConversionSettings::default()).unwrap();
        assert_eq!(posterizer.mode(), &QuantizationMode::Palette { colors: 8 });
        assert_eq!(posterizer.grouping(), PathGrouping::PerCurve);
    }

    #[test]
    fn grouping_is_applied_to_document() {
        let image = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        let doc = Posterizer::new(QuantizationMode::Palette { colors: 2 })
            .with_grouping(PathGrouping::PerLayer)
            .vectorize(&image)
            .unwrap();
        assert_eq!(doc.grouping(), PathGrouping::PerLayer);
    }

    #[test]
    fn custom_tracer_is_used() {
        let image = RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]));
        let doc = Posterizer::from_settings(&ConversionSettings::default().with_colors(1))
            .unwrap()
            .with_tracer(SquareTracer)
            .vectorize(&image)
            .unwrap();
        let svg = doc.to_svg_string().unwrap();
        assert!(svg.contains(r#"<path d="M0,0 L1,0 L1,1 L0,1 L0,0 Z" fill="black"/>"#));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Posterizer::new(QuantizationMode::Palette { colors: 2 })
            .vectorize_file(dir.path().join("missing.png"))
            .unwrap_err();
        assert!(matches!(err, PosterizeError::Image(_)));
    }
}
