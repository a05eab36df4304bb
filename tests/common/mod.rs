#![allow(dead_code)]

use image::{Rgb, RgbImage};
use svgtypes::{PathParser, PathSegment};

/// A `<path>` element as it appears in the output.
#[derive(Debug, Clone)]
pub struct PathElement {
    pub d: String,
    pub fill: String,
}

/// Root size and path elements of an SVG document.
pub fn parse_document(svg: &str) -> (u32, u32, Vec<PathElement>) {
    let doc = roxmltree::Document::parse(svg).expect("output is well-formed XML");
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "svg");
    assert_eq!(root.tag_name().namespace(), Some("http://www.w3.org/2000/svg"));
    let width = root.attribute("width").unwrap().parse().unwrap();
    let height = root.attribute("height").unwrap().parse().unwrap();
    let paths = root
        .children()
        .filter(|n| n.has_tag_name("path"))
        .map(|n| PathElement {
            d: n.attribute("d").unwrap().to_string(),
            fill: n.attribute("fill").unwrap().to_string(),
        })
        .collect();
    (width, height, paths)
}

/// Absolute points of each subpath, from its `M` up to its `Z`.
pub fn subpaths(d: &str) -> Vec<Vec<(f64, f64)>> {
    let mut result = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for segment in PathParser::from(d) {
        match segment.expect("valid path data") {
            PathSegment::MoveTo { abs: true, x, y } => current = vec![(x, y)],
            PathSegment::LineTo { abs: true, x, y } => current.push((x, y)),
            PathSegment::CurveTo {
                abs: true, x, y, ..
            } => current.push((x, y)),
            PathSegment::ClosePath { .. } => result.push(std::mem::take(&mut current)),
            other => panic!("unexpected segment {other:?}"),
        }
    }
    assert!(current.is_empty(), "path data does not end with Z");
    result
}

/// Shoelace area of a straight-edged subpath; positive for clockwise loops
/// in y-down coordinates.
pub fn signed_area(points: &[(f64, f64)]) -> f64 {
    let twice: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|((x0, y0), (x1, y1))| x0 * y1 - x1 * y0)
        .sum();
    twice / 2.0
}

/// Horizontal bands of distinct colors.
pub fn bands(width: u32, height: u32, colors: &[[u8; 3]]) -> RgbImage {
    let band = height.div_ceil(colors.len() as u32).max(1);
    RgbImage::from_fn(width, height, |_, y| {
        Rgb(colors[((y / band) as usize).min(colors.len() - 1)])
    })
}

/// Smooth two-axis gradient with many distinct colors.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 127 / (width + height).max(1)) as u8,
        ])
    })
}

/// A dark disk centred on a light canvas.
pub fn disk(size: u32, radius: f64) -> RgbImage {
    let centre = f64::from(size) / 2.0;
    RgbImage::from_fn(size, size, |x, y| {
        let dx = f64::from(x) + 0.5 - centre;
        let dy = f64::from(y) + 0.5 - centre;
        if dx * dx + dy * dy <= radius * radius {
            Rgb([20, 20, 20])
        } else {
            Rgb([240, 240, 240])
        }
    })
}
