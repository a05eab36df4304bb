use image::RgbImage;

use crate::config::{FillColor, KmeansSettings, QuantizationMode};
use crate::mask::{Mask, foreground_mask};
use crate::quantize::{IndexImage, Palette, quantize};
use crate::svg::{Layer, VectorDocument};
use crate::tracer::BitmapTracer;
use crate::{PosterizeError, PosterizeResult};

/// Trace every non-empty layer of `image` and collect the results in
/// ascending palette order.
pub fn build_document<T>(
    image: &RgbImage,
    mode: &QuantizationMode,
    kmeans: &KmeansSettings,
    tracer: &T,
) -> PosterizeResult<VectorDocument>
where
    T: BitmapTracer + ?Sized,
{
    let (width, height) = image.dimensions();
    let layers: Vec<Layer> = match mode {
        QuantizationMode::Threshold { threshold, fill } => {
            let mask = foreground_mask(image, *threshold);
            trace_layer(None, &mask, fill.clone(), tracer)?
                .into_iter()
                .collect()
        }
        QuantizationMode::Palette { colors } => {
            let quantized = quantize(image, *colors, kmeans)?;
            trace_palette(&quantized.palette, &quantized.indices, tracer)?
        }
    };

    let curves: usize = layers.iter().map(|layer| layer.curves.len()).sum();
    log::info!(
        "traced {}x{} image into {} layers with {} curves",
        width,
        height,
        layers.len(),
        curves
    );
    Ok(VectorDocument::new(width, height, layers))
}

/// Trace one layer per palette entry, skipping entries with no pixels.
pub fn trace_palette<T>(
    palette: &Palette,
    indices: &IndexImage,
    tracer: &T,
) -> PosterizeResult<Vec<Layer>>
where
    T: BitmapTracer + ?Sized,
{
    let trace_index = |index: usize| -> PosterizeResult<Option<Layer>> {
        let Some(color) = palette.get(index) else {
            return Ok(None);
        };
        let mask = Mask::for_index(indices, index as u8);
        trace_layer(Some(index), &mask, FillColor::from(color), tracer)
    };

    #[cfg(feature = "parallel")]
    let results: Vec<PosterizeResult<Option<Layer>>> = {
        use rayon::prelude::*;
        (0..palette.len()).into_par_iter().map(trace_index).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let results: Vec<PosterizeResult<Option<Layer>>> =
        (0..palette.len()).map(trace_index).collect();

    let mut layers = Vec::with_capacity(results.len());
    for result in results {
        if let Some(layer) = result? {
            layers.push(layer);
        }
    }
    Ok(layers)
}

/// Trace a single mask. Empty masks, and masks whose curves were all
/// filtered by the tracer, produce no layer.
fn trace_layer<T>(
    index: Option<usize>,
    mask: &Mask,
    fill: FillColor,
    tracer: &T,
) -> PosterizeResult<Option<Layer>>
where
    T: BitmapTracer + ?Sized,
{
    if mask.is_empty() {
        log::debug!("layer {index:?} has no pixels, skipping");
        return Ok(None);
    }

    let (width, height) = mask.dimensions();
    let curves = tracer
        .trace(mask)
        .map_err(|source| PosterizeError::Trace {
            index,
            width,
            height,
            source,
        })?;
    log::debug!(
        "layer {index:?} ({fill}): {} pixels, {} curves",
        mask.count(),
        curves.len()
    );

    if curves.is_empty() {
        return Ok(None);
    }
    Ok(Some(Layer {
        index,
        fill,
        curves,
    }))
}
