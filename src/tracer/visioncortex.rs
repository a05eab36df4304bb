use visioncortex::{BinaryImage, CompoundPathElement, PathSimplifyMode, PointF64, PointI32};

use crate::error::TraceError;
use crate::geometry::{Curve, Point, Segment};
use crate::mask::Mask;

use super::BitmapTracer;

/// Path simplification applied by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimplifyMode {
    /// Raw staircase outlines.
    None,
    /// Simplified straight-edged polygons.
    Polygon,
    /// Smoothed cubic splines with corners preserved.
    #[default]
    Spline,
}

impl From<SimplifyMode> for PathSimplifyMode {
    fn from(value: SimplifyMode) -> Self {
        match value {
            SimplifyMode::None => PathSimplifyMode::None,
            SimplifyMode::Polygon => PathSimplifyMode::Polygon,
            SimplifyMode::Spline => PathSimplifyMode::Spline,
        }
    }
}

/// Options for tracing masks with visioncortex.
#[derive(Debug, Clone)]
pub struct VisionCortexOptions {
    pub mode: SimplifyMode,
    /// Clusters with fewer than `filter_speckle²` pixels are discarded.
    pub filter_speckle: usize,
    /// Minimum angle (degrees) treated as a corner.
    pub corner_threshold: i32,
    pub length_threshold: f64,
    pub max_iterations: usize,
    /// Minimum angle displacement (degrees) to splice a spline.
    pub splice_threshold: i32,
}

impl Default for VisionCortexOptions {
    fn default() -> Self {
        Self {
            mode: SimplifyMode::Spline,
            filter_speckle: 4,
            corner_threshold: 60,
            length_threshold: 4.0,
            max_iterations: 10,
            splice_threshold: 45,
        }
    }
}

/// Adapter over the visioncortex clustering and path simplification engine.
#[derive(Debug, Clone, Default)]
pub struct VisionCortexTracer {
    options: VisionCortexOptions,
}

impl VisionCortexTracer {
    pub fn new(options: VisionCortexOptions) -> Self {
        Self { options }
    }
}

impl BitmapTracer for VisionCortexTracer {
    fn trace(&self, mask: &Mask) -> Result<Vec<Curve>, TraceError> {
        let options = &self.options;
        if !(0..=360).contains(&options.corner_threshold)
            || !(0..=360).contains(&options.splice_threshold)
        {
            return Err(TraceError(format!(
                "angle thresholds must be within 0-360 degrees, got corner {} and splice {}",
                options.corner_threshold, options.splice_threshold
            )));
        }

        let image = to_binary_image(mask);
        let clusters = image.to_clusters(false);
        let min_cluster_size = options.filter_speckle.saturating_mul(options.filter_speckle);

        let mut curves = Vec::new();
        for i in 0..clusters.len() {
            let cluster = clusters.get_cluster(i);
            if cluster.size() < min_cluster_size {
                continue;
            }
            let compound = cluster.to_compound_path(
                options.mode.into(),
                deg2rad(options.corner_threshold),
                options.length_threshold,
                options.max_iterations,
                deg2rad(options.splice_threshold),
            );
            for element in compound.paths {
                let curve = match element {
                    CompoundPathElement::PathI32(path) => polygon_i32(&path.path),
                    CompoundPathElement::PathF64(path) => polygon_f64(&path.path),
                    CompoundPathElement::Spline(spline) => spline_curve(&spline.points)?,
                };
                curves.extend(curve);
            }
        }
        Ok(curves)
    }
}

fn deg2rad(deg: i32) -> f64 {
    f64::from(deg) / 180.0 * std::f64::consts::PI
}

fn to_binary_image(mask: &Mask) -> BinaryImage {
    let (w, h) = mask.dimensions();
    let mut image = BinaryImage::new_w_h(w as usize, h as usize);
    for y in 0..h {
        for x in 0..w {
            if mask.is_set(x, y) {
                image.set_pixel(x as usize, y as usize, true);
            }
        }
    }
    image
}

fn polygon_i32(points: &[PointI32]) -> Option<Curve> {
    let vertices: Vec<Point> = points.iter().map(|p| Point::from((p.x, p.y))).collect();
    Curve::from_polygon(&vertices)
}

fn polygon_f64(points: &[PointF64]) -> Option<Curve> {
    let vertices: Vec<Point> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
    Curve::from_polygon(&vertices)
}

/// A spline is its start point followed by (control, control, end) triples.
fn spline_curve(points: &[PointF64]) -> Result<Option<Curve>, TraceError> {
    let Some((first, rest)) = points.split_first() else {
        return Ok(None);
    };
    if rest.len() % 3 != 0 {
        return Err(TraceError(format!(
            "spline has {} points, expected a start point plus whole control triples",
            points.len()
        )));
    }
    let start = Point::new(first.x, first.y);
    let mut segments: Vec<Segment> = rest
        .chunks_exact(3)
        .map(|c| Segment::Smooth {
            control1: Point::new(c[0].x, c[0].y),
            control2: Point::new(c[1].x, c[1].y),
            end: Point::new(c[2].x, c[2].y),
        })
        .collect();
    if segments.is_empty() {
        return Ok(None);
    }

    let last = segments.last().map(Segment::end).unwrap_or(start);
    if last != start {
        segments.push(Segment::Corner {
            control: last.midpoint(start),
            end: start,
        });
    }
    Ok(Some(Curve::new(start, segments)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_mask() -> Mask {
        Mask::from_fn(12, 12, |x, y| (2..10).contains(&x) && (2..10).contains(&y))
    }

    #[test]
    fn empty_mask_yields_no_curves() {
        let mask = Mask::from_fn(6, 6, |_, _| false);
        let curves = VisionCortexTracer::default().trace(&mask).unwrap();
        assert!(curves.is_empty());
    }

    #[test]
    fn block_traces_to_closed_curves() {
        for mode in [SimplifyMode::None, SimplifyMode::Polygon, SimplifyMode::Spline] {
            let tracer = VisionCortexTracer::new(VisionCortexOptions {
                mode,
                ..VisionCortexOptions::default()
            });
            let curves = tracer.trace(&block_mask()).unwrap();
            assert!(!curves.is_empty(), "{mode:?} produced nothing");
            assert!(curves.iter().all(Curve::is_closed));
        }
    }

    #[test]
    fn speckles_are_filtered() {
        let mask = Mask::from_fn(8, 8, |x, y| x == 3 && y == 3);
        let curves = VisionCortexTracer::default().trace(&mask).unwrap();
        assert!(curves.is_empty());
    }

    #[test]
    fn out_of_range_angles_are_reported() {
        let tracer = VisionCortexTracer::new(VisionCortexOptions {
            corner_threshold: 400,
            ..VisionCortexOptions::default()
        });
        assert!(tracer.trace(&block_mask()).is_err());
    }

    #[test]
    fn open_spline_is_closed_with_a_corner() {
        let points = [
            PointF64::new(0.0, 0.0),
            PointF64::new(1.0, 0.0),
            PointF64::new(2.0, 0.0),
            PointF64::new(2.0, 2.0),
        ];
        let curve = spline_curve(&points).unwrap().unwrap();
        assert_eq!(curve.segments().len(), 2);
        assert!(curve.is_closed());
    }

    #[test]
    fn partial_spline_triple_is_an_error() {
        let points = [
            PointF64::new(0.0, 0.0),
            PointF64::new(1.0, 0.0),
            PointF64::new(2.0, 0.0),
            PointF64::new(2.0, 2.0),
            PointF64::new(1.0, 3.0),
        ];
        assert!(spline_curve(&points).is_err());
        assert!(spline_curve(&[]).unwrap().is_none());
    }

    #[test]
    fn speckle_size_is_squared() {
        // A 3x3 block has 9 pixels: below 4² but not below 3².
        let mask = Mask::from_fn(9, 9, |x, y| (3..6).contains(&x) && (3..6).contains(&y));
        let default = VisionCortexTracer::default().trace(&mask).unwrap();
        assert!(default.is_empty());

        let tracer = VisionCortexTracer::new(VisionCortexOptions {
            mode: SimplifyMode::Polygon,
            filter_speckle: 3,
            ..VisionCortexOptions::default()
        });
        assert!(!tracer.trace(&mask).unwrap().is_empty());
    }
}
