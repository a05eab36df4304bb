use crate::error::TraceError;
use crate::geometry::Curve;
use crate::mask::Mask;

/// An algorithm that turns a binary mask into closed outline curves.
///
/// Each returned curve bounds a connected region of set cells (or a hole in
/// one). An all-unset mask must produce an empty list rather than an error.
pub trait BitmapTracer: Send + Sync {
    fn trace(&self, mask: &Mask) -> Result<Vec<Curve>, TraceError>;
}

impl<T: BitmapTracer + ?Sized> BitmapTracer for Box<T> {
    fn trace(&self, mask: &Mask) -> Result<Vec<Curve>, TraceError> {
        (**self).trace(mask)
    }
}

impl<T: BitmapTracer + ?Sized> BitmapTracer for &T {
    fn trace(&self, mask: &Mask) -> Result<Vec<Curve>, TraceError> {
        (**self).trace(mask)
    }
}

pub mod edge;
#[cfg(feature = "tracer-visioncortex")]
pub mod visioncortex;

pub use edge::{EdgeTraceOptions, PixelEdgeTracer};
#[cfg(feature = "tracer-visioncortex")]
pub use self::visioncortex::{SimplifyMode, VisionCortexOptions, VisionCortexTracer};
