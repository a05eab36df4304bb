//! SVG serialization.
//!
//! Curves become `<path>` elements using `M`, `L`, `C` and `Z` commands. A
//! corner segment is two straight lines (its control point is a real vertex);
//! a smooth segment is one cubic Bezier. This is a pure string builder: the
//! only I/O is [`VectorDocument::write_to`], which writes atomically.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use tempfile::Builder;

use crate::config::FillColor;
use crate::error::SerializeError;
use crate::geometry::{Curve, Point, Segment};
use crate::{PosterizeError, PosterizeResult};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// How curves of one layer map to `<path>` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathGrouping {
    /// One `<path>` per curve.
    #[default]
    PerCurve,
    /// One compound `<path>` per layer, so holes render as holes.
    PerLayer,
}

/// Format one coordinate with the shortest representation that round-trips.
fn format_coordinate(value: f64) -> String {
    if value == 0.0 {
        // Covers -0.0 as well.
        return "0".to_string();
    }
    format!("{value}")
}

fn push_point(out: &mut String, point: Point) -> Result<(), SerializeError> {
    if !point.is_finite() {
        return Err(SerializeError::NonFiniteCoordinate {
            x: point.x,
            y: point.y,
        });
    }
    out.push_str(&format_coordinate(point.x));
    out.push(',');
    out.push_str(&format_coordinate(point.y));
    Ok(())
}

/// Build the `d` attribute for one closed curve.
///
/// Curves without segments, curves that do not return to their start and
/// non-finite coordinates are rejected instead of producing broken markup.
pub fn path_data(curve: &Curve) -> Result<String, SerializeError> {
    let start = curve.start();
    let end = curve.end().ok_or(SerializeError::EmptyCurve)?;
    if end != start {
        return Err(SerializeError::OpenCurve { start, end });
    }

    let mut d = String::with_capacity(16 + curve.segments().len() * 24);
    d.push('M');
    push_point(&mut d, start)?;
    for segment in curve.segments() {
        match *segment {
            Segment::Corner { control, end } => {
                d.push_str(" L");
                push_point(&mut d, control)?;
                d.push_str(" L");
                push_point(&mut d, end)?;
            }
            Segment::Smooth {
                control1,
                control2,
                end,
            } => {
                d.push_str(" C");
                push_point(&mut d, control1)?;
                d.push(' ');
                push_point(&mut d, control2)?;
                d.push(' ');
                push_point(&mut d, end)?;
            }
        }
    }
    d.push_str(" Z");
    Ok(d)
}

/// A serialized `<path>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgPath {
    pub d: String,
    pub fill: String,
}

impl SvgPath {
    pub fn to_element(&self) -> String {
        format!(r#"<path d="{}" fill="{}"/>"#, self.d, self.fill)
    }
}

/// One color entry of a [`VectorDocument`].
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Palette index the layer was traced from; `None` for monochrome output.
    pub index: Option<usize>,
    pub fill: FillColor,
    pub curves: Vec<Curve>,
}

/// The traced image: canvas size plus layers in ascending palette order.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDocument {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    grouping: PathGrouping,
}

impl VectorDocument {
    pub fn new(width: u32, height: u32, layers: Vec<Layer>) -> Self {
        Self {
            width,
            height,
            layers,
            grouping: PathGrouping::default(),
        }
    }

    pub fn with_grouping(mut self, grouping: PathGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn grouping(&self) -> PathGrouping {
        self.grouping
    }

    /// Serialize every layer into path elements, in document order.
    pub fn paths(&self) -> PosterizeResult<Vec<SvgPath>> {
        let mut paths = Vec::new();
        for layer in &self.layers {
            let fill = layer.fill.to_string();
            let mut subpaths = Vec::with_capacity(layer.curves.len());
            for (i, curve) in layer.curves.iter().enumerate() {
                let d = path_data(curve).map_err(|source| PosterizeError::Serialize {
                    index: layer.index,
                    curve: i,
                    source,
                })?;
                subpaths.push(d);
            }

            match self.grouping {
                PathGrouping::PerCurve => paths.extend(subpaths.into_iter().map(|d| SvgPath {
                    d,
                    fill: fill.clone(),
                })),
                PathGrouping::PerLayer if !subpaths.is_empty() => paths.push(SvgPath {
                    d: subpaths.join(" "),
                    fill,
                }),
                PathGrouping::PerLayer => {}
            }
        }
        Ok(paths)
    }

    /// Render the complete SVG document.
    pub fn to_svg_string(&self) -> PosterizeResult<String> {
        let paths = self.paths()?;
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="{SVG_NAMESPACE}" width="{}" height="{}">"#,
            self.width, self.height
        );
        for path in &paths {
            let _ = writeln!(out, "{}", path.to_element());
        }
        out.push_str("</svg>\n");
        Ok(out)
    }

    /// Render the document and move it into place at `path` in one step.
    ///
    /// The markup is written to a temporary file next to the destination and
    /// renamed over it, so a failed run never leaves a partial file behind.
    /// On Unix the file is created with mode `0o666` less the umask, the same
    /// as a plain `File::create`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> PosterizeResult<()> {
        let path = path.as_ref();
        let svg = self.to_svg_string()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut builder = Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut file = builder.tempfile_in(dir)?;
        file.write_all(svg.as_bytes())?;
        file.flush()?;
        file.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}
