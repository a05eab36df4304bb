//! Exact boundary tracing on the pixel-corner lattice.
//!
//! Every set pixel contributes one directed unit edge per side that faces an
//! unset neighbour. Edges are oriented clockwise around set regions (y grows
//! downwards), so outer boundaries come out clockwise and holes
//! counter-clockwise. Following edges head to tail yields closed loops; at a
//! vertex shared by two diagonal pixels the walk turns towards the interior,
//! which keeps diagonal neighbours in separate regions (4-connectivity).

use std::collections::HashMap;

use crate::error::TraceError;
use crate::geometry::{Curve, Point};
use crate::mask::Mask;

use super::BitmapTracer;

/// Options for [`PixelEdgeTracer`].
#[derive(Debug, Clone, Default)]
pub struct EdgeTraceOptions {
    /// Drop curves enclosing fewer than this many pixels (holes included).
    pub min_area: f64,
}

impl EdgeTraceOptions {
    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }
}

/// Built-in tracer producing straight rectilinear outlines made of
/// corner segments.
#[derive(Debug, Clone, Default)]
pub struct PixelEdgeTracer {
    options: EdgeTraceOptions,
}

impl PixelEdgeTracer {
    pub fn new(options: EdgeTraceOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EdgeTraceOptions {
        &self.options
    }
}

impl BitmapTracer for PixelEdgeTracer {
    fn trace(&self, mask: &Mask) -> Result<Vec<Curve>, TraceError> {
        let (w, h) = mask.dimensions();
        if i32::try_from(w).is_err() || i32::try_from(h).is_err() {
            return Err(TraceError(format!("mask {w}x{h} is too large to trace")));
        }

        let curves = trace_loops(mask)
            .into_iter()
            .filter_map(|corners| Curve::from_polygon(&corners))
            .filter(|curve| curve.signed_area().abs() >= self.options.min_area)
            .collect();
        Ok(curves)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    East,
    South,
    West,
    North,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
        }
    }

    /// The side the traced region lies on when travelling in this direction.
    fn inward(self) -> Direction {
        match self {
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            Direction::North => Direction::East,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    from: (i32, i32),
    direction: Direction,
}

impl Edge {
    fn to(self) -> (i32, i32) {
        let (dx, dy) = self.direction.delta();
        (self.from.0 + dx, self.from.1 + dy)
    }
}

/// Collect boundary edges in raster order of the pixels that own them.
fn boundary_edges(mask: &Mask) -> Vec<Edge> {
    let (w, h) = mask.dimensions();
    let mut edges = Vec::new();
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            if !mask.is_set(x as u32, y as u32) {
                continue;
            }
            let (sx, sy) = (i64::from(x), i64::from(y));
            if !mask.is_set_signed(sx, sy - 1) {
                edges.push(Edge {
                    from: (x, y),
                    direction: Direction::East,
                });
            }
            if !mask.is_set_signed(sx + 1, sy) {
                edges.push(Edge {
                    from: (x + 1, y),
                    direction: Direction::South,
                });
            }
            if !mask.is_set_signed(sx, sy + 1) {
                edges.push(Edge {
                    from: (x + 1, y + 1),
                    direction: Direction::West,
                });
            }
            if !mask.is_set_signed(sx - 1, sy) {
                edges.push(Edge {
                    from: (x, y + 1),
                    direction: Direction::North,
                });
            }
        }
    }
    edges
}

/// Walk every boundary loop and return its turning points, starting from the
/// top-most, left-most corner.
fn trace_loops(mask: &Mask) -> Vec<Vec<Point>> {
    let edges = boundary_edges(mask);
    let mut outgoing: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        outgoing.entry(edge.from).or_default().push(i);
    }

    let successor = |current: usize| -> usize {
        let edge = edges[current];
        let candidates = &outgoing[&edge.to()];
        if candidates.len() == 1 {
            return candidates[0];
        }
        let turn = edge.direction.inward();
        candidates
            .iter()
            .copied()
            .find(|&i| edges[i].direction == turn)
            .unwrap_or(candidates[0])
    };

    let mut visited = vec![false; edges.len()];
    let mut loops = Vec::new();
    for first in 0..edges.len() {
        if visited[first] {
            continue;
        }
        let mut walk = Vec::new();
        let mut current = first;
        loop {
            visited[current] = true;
            walk.push(edges[current]);
            current = successor(current);
            if current == first || visited[current] {
                break;
            }
        }
        loops.push(turning_points(&walk));
    }
    loops
}

fn turning_points(walk: &[Edge]) -> Vec<Point> {
    let mut corners: Vec<(i32, i32)> = walk
        .iter()
        .enumerate()
        .filter(|(i, edge)| {
            let previous = walk[(i + walk.len() - 1) % walk.len()];
            previous.direction != edge.direction
        })
        .map(|(_, edge)| edge.from)
        .collect();

    if let Some(start) = corners
        .iter()
        .enumerate()
        .min_by_key(|(_, (x, y))| (*y, *x))
        .map(|(i, _)| i)
    {
        corners.rotate_left(start);
    }
    corners.into_iter().map(Point::from).collect()
}
