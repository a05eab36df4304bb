use std::fmt;

/// A point on the pixel-corner lattice. `(0, 0)` is the top-left corner of the
/// top-left pixel; y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(f64::from(x), f64::from(y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One drawing instruction of a [`Curve`]. The start of every segment is the
/// end of the previous one (or the curve start for the first segment).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// A sharp turn: a straight line to `control`, then a straight line to `end`.
    Corner { control: Point, end: Point },
    /// A cubic Bezier arc.
    Smooth {
        control1: Point,
        control2: Point,
        end: Point,
    },
}

impl Segment {
    pub fn end(&self) -> Point {
        match *self {
            Segment::Corner { end, .. } | Segment::Smooth { end, .. } => end,
        }
    }

    /// All points referenced by the segment, in emission order.
    pub fn points(&self) -> Vec<Point> {
        match *self {
            Segment::Corner { control, end } => vec![control, end],
            Segment::Smooth {
                control1,
                control2,
                end,
            } => vec![control1, control2, end],
        }
    }
}

/// A closed outline: a declared start point followed by segments whose last
/// endpoint returns to the start.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    start: Point,
    segments: Vec<Segment>,
}

impl Curve {
    pub fn new(start: Point, segments: Vec<Segment>) -> Self {
        Self { start, segments }
    }

    /// Encode a closed polygon as corner pairs.
    ///
    /// A trailing vertex equal to the first one is ignored. With an odd number
    /// of vertices the closing edge gets its midpoint as the corner vertex.
    /// Returns `None` for fewer than three distinct vertices.
    pub fn from_polygon(vertices: &[Point]) -> Option<Self> {
        let mut vertices = vertices;
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices = &vertices[..vertices.len() - 1];
        }
        if vertices.len() < 3 {
            return None;
        }

        let start = vertices[0];
        let mut segments = Vec::with_capacity(vertices.len() / 2 + 1);
        let mut rest = vertices[1..].chunks_exact(2);
        for pair in rest.by_ref() {
            segments.push(Segment::Corner {
                control: pair[0],
                end: pair[1],
            });
        }
        if let [last] = rest.remainder() {
            segments.push(Segment::Corner {
                control: *last,
                end: start,
            });
        } else {
            let last = segments.last().map(Segment::end).unwrap_or(start);
            segments.push(Segment::Corner {
                control: last.midpoint(start),
                end: start,
            });
        }
        Some(Self::new(start, segments))
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Endpoint of the final segment, if any.
    pub fn end(&self) -> Option<Point> {
        self.segments.last().map(Segment::end)
    }

    pub fn is_closed(&self) -> bool {
        self.end() == Some(self.start)
    }

    /// Signed area of the polygon through every referenced point (shoelace
    /// formula). Positive for clockwise curves in y-down coordinates.
    pub fn signed_area(&self) -> f64 {
        let mut area = 0.0;
        let mut previous = self.start;
        for point in self.segments.iter().flat_map(Segment::points) {
            area += previous.x * point.y - point.x * previous.y;
            previous = point;
        }
        area += previous.x * self.start.y - self.start.x * previous.y;
        area * 0.5
    }
}
