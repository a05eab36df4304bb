use thiserror::Error;

use crate::geometry::Point;

/// Result type alias for operations that may fail with [`PosterizeError`].
pub type PosterizeResult<T> = std::result::Result<T, PosterizeError>;

/// Error types that can occur while converting an image into an SVG document.
///
/// Configuration problems are reported before any image work starts; decode,
/// tracing and serialization failures abort the run without writing output.
#[derive(Debug, Error)]
pub enum PosterizeError {
    /// The requested color count is outside `1..=256`.
    #[error("Invalid color count {value}: expected a value between 1 and 256")]
    InvalidColorCount { value: i64 },
    /// The binarization threshold is outside `0..=255`.
    #[error("Invalid threshold {value}: expected a value between 0 and 255")]
    InvalidThreshold { value: i64 },
    /// The fill override is neither a hex color nor a color keyword.
    #[error("Invalid fill color `{value}`: expected #rgb, #rrggbb or a color name")]
    InvalidFill { value: String },
    /// Image loading or decoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The tracer could not process the mask of one layer.
    #[error("Tracing failed for {} ({width}x{height} mask): {source}", layer_label(.index))]
    Trace {
        index: Option<usize>,
        width: u32,
        height: u32,
        #[source]
        source: TraceError,
    },
    /// A traced curve cannot be expressed as closed path data.
    #[error("Cannot serialize curve {curve} of {}: {source}", layer_label(.index))]
    Serialize {
        index: Option<usize>,
        curve: usize,
        #[source]
        source: SerializeError,
    },
    /// The SVG handed to the inspector is not well-formed XML.
    #[error("SVG parsing failed: {0}")]
    Svg(#[from] roxmltree::Error),
}

impl PosterizeError {
    /// Whether the error was caused by invalid conversion settings.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            PosterizeError::InvalidColorCount { .. }
                | PosterizeError::InvalidThreshold { .. }
                | PosterizeError::InvalidFill { .. }
        )
    }
}

fn layer_label(index: &Option<usize>) -> String {
    match index {
        Some(index) => format!("palette index {index}"),
        None => "the monochrome layer".to_string(),
    }
}

/// Failure reported by a [`BitmapTracer`](crate::tracer::BitmapTracer).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TraceError(pub String);

/// Curve shapes that have no valid closed-path encoding.
#[derive(Debug, Error, PartialEq)]
pub enum SerializeError {
    #[error("curve has no segments")]
    EmptyCurve,
    #[error("curve starting at {start} ends at {end}")]
    OpenCurve { start: Point, end: Point },
    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_flagged() {
        assert!(PosterizeError::InvalidColorCount { value: 0 }.is_config());
        assert!(PosterizeError::InvalidThreshold { value: 300 }.is_config());
        assert!(
            PosterizeError::InvalidFill {
                value: "#zz".into()
            }
            .is_config()
        );
        let io = PosterizeError::from(std::io::Error::other("disk"));
        assert!(!io.is_config());
    }

    #[test]
    fn trace_error_names_layer_and_mask_size() {
        let err = PosterizeError::Trace {
            index: Some(3),
            width: 12,
            height: 7,
            source: TraceError("engine gave up".into()),
        };
        let message = err.to_string();
        assert!(message.contains("palette index 3"));
        assert!(message.contains("12x7"));
        assert!(message.contains("engine gave up"));
    }

    #[test]
    fn serialize_error_names_monochrome_layer() {
        let err = PosterizeError::Serialize {
            index: None,
            curve: 2,
            source: SerializeError::EmptyCurve,
        };
        assert_eq!(
            err.to_string(),
            "Cannot serialize curve 2 of the monochrome layer: curve has no segments"
        );
    }
}
