use std::collections::HashMap;

use image::{Rgb, RgbImage};
use kmeans_colors::{Kmeans, get_kmeans};
use palette::{FromColor, IntoColor, Lab, Srgb};

use crate::config::{ColorSpace, KmeansSettings};
use crate::{PosterizeError, PosterizeResult};

/// Largest palette an [`IndexImage`] can address.
pub const MAX_COLORS: usize = 256;

/// Ordered representative colors; position in the list is the palette index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb<u8>>) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rgb<u8>> {
        self.colors.get(index).copied()
    }

    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }
}

/// Per-pixel palette indices, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexImage {
    width: u32,
    height: u32,
    indices: Vec<u8>,
}

impl IndexImage {
    /// Panics if `indices` does not hold exactly `width * height` entries.
    pub fn from_vec(width: u32, height: u32, indices: Vec<u8>) -> Self {
        assert_eq!(
            indices.len(),
            width as usize * height as usize,
            "index buffer does not match {width}x{height}"
        );
        Self {
            width,
            height,
            indices,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.indices[y as usize * self.width as usize + x as usize]
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }
}

/// Output of [`quantize`].
#[derive(Debug, Clone)]
pub struct Quantized {
    pub palette: Palette,
    pub indices: IndexImage,
}

/// Reduce `image` to at most `colors` representative colors.
///
/// Images with no more distinct colors than requested are reproduced exactly,
/// with the palette in raster first-seen order. Otherwise the palette comes
/// from seeded k-means, so the result is deterministic for a given input, and
/// every pixel is indexed by its nearest palette entry.
pub fn quantize(
    image: &RgbImage,
    colors: usize,
    settings: &KmeansSettings,
) -> PosterizeResult<Quantized> {
    if colors == 0 || colors > MAX_COLORS {
        return Err(PosterizeError::InvalidColorCount {
            value: colors as i64,
        });
    }

    let (width, height) = image.dimensions();
    if let Some(quantized) = exact_palette(image, colors) {
        log::debug!(
            "image has {} distinct colors, using them as the palette",
            quantized.palette.len()
        );
        return Ok(quantized);
    }

    let centroids = match settings.color_space {
        ColorSpace::Lab => kmeans_lab(image, colors, settings),
        ColorSpace::Rgb => kmeans_rgb(image, colors, settings),
    };
    let (palette, indices) = assign_nearest(image, &dedupe(centroids), settings.color_space);
    log::debug!(
        "k-means reduced {}x{} image to {} colors",
        width,
        height,
        palette.len()
    );

    Ok(Quantized {
        palette: Palette::new(palette),
        indices: IndexImage::from_vec(width, height, indices),
    })
}

/// Use the image's own colors when there are few enough of them.
fn exact_palette(image: &RgbImage, colors: usize) -> Option<Quantized> {
    let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
    let mut palette = Vec::new();
    let mut indices = Vec::with_capacity(image.len() / 3);

    for px in image.pixels() {
        let index = match lookup.get(&px.0) {
            Some(index) => *index,
            None => {
                if palette.len() == colors {
                    return None;
                }
                let index = palette.len() as u8;
                lookup.insert(px.0, index);
                palette.push(*px);
                index
            }
        };
        indices.push(index);
    }

    let (width, height) = image.dimensions();
    Some(Quantized {
        palette: Palette::new(palette),
        indices: IndexImage::from_vec(width, height, indices),
    })
}

/// Centroids that round to the same 8-bit color share one palette entry.
fn dedupe(centroids: Vec<Rgb<u8>>) -> Vec<Rgb<u8>> {
    let mut palette: Vec<Rgb<u8>> = Vec::with_capacity(centroids.len());
    for color in centroids {
        if !palette.contains(&color) {
            palette.push(color);
        }
    }
    palette
}

/// Index every pixel by its closest palette entry in `space`, first entry
/// winning ties. Entries no pixel is closest to are dropped.
fn assign_nearest(
    image: &RgbImage,
    palette: &[Rgb<u8>],
    space: ColorSpace,
) -> (Vec<Rgb<u8>>, Vec<u8>) {
    let points: Vec<[f32; 3]> = palette.iter().map(|c| coords(*c, space)).collect();
    let mut cache: HashMap<[u8; 3], usize> = HashMap::new();
    let nearest: Vec<usize> = image
        .pixels()
        .map(|px| {
            *cache
                .entry(px.0)
                .or_insert_with(|| nearest_entry(&points, coords(*px, space)))
        })
        .collect();

    let mut remap = vec![None; palette.len()];
    let mut used = Vec::new();
    let indices = nearest
        .into_iter()
        .map(|entry| {
            *remap[entry].get_or_insert_with(|| {
                used.push(palette[entry]);
                (used.len() - 1) as u8
            })
        })
        .collect();
    (used, indices)
}

fn nearest_entry(points: &[[f32; 3]], target: [f32; 3]) -> usize {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (index, point) in points.iter().enumerate() {
        let distance = distance_squared(*point, target);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

fn distance_squared(a: [f32; 3], b: [f32; 3]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Position of `color` in the space k-means clustered in.
fn coords(color: Rgb<u8>, space: ColorSpace) -> [f32; 3] {
    let rgb = to_srgb(color);
    match space {
        ColorSpace::Lab => {
            let lab: Lab = rgb.into_linear().into_color();
            [lab.l, lab.a, lab.b]
        }
        ColorSpace::Rgb => [rgb.red, rgb.green, rgb.blue],
    }
}

fn to_srgb(px: Rgb<u8>) -> Srgb {
    Srgb::new(
        px[0] as f32 / 255.0,
        px[1] as f32 / 255.0,
        px[2] as f32 / 255.0,
    )
}

fn srgb_pixels(image: &RgbImage) -> impl Iterator<Item = Srgb> + '_ {
    image.pixels().map(|px| to_srgb(*px))
}

fn to_rgb8(color: Srgb) -> Rgb<u8> {
    let color: Srgb<u8> = color.into_format();
    Rgb([color.red, color.green, color.blue])
}

fn kmeans_lab(image: &RgbImage, colors: usize, settings: &KmeansSettings) -> Vec<Rgb<u8>> {
    let lab_vec: Vec<Lab> = srgb_pixels(image)
        .map(|rgb| rgb.into_linear().into_color())
        .collect();
    let result = best_of_runs(&lab_vec, colors, settings, settings.lab_converge);
    result
        .centroids
        .iter()
        .map(|lab| to_rgb8(Srgb::from_color(*lab)))
        .collect()
}

fn kmeans_rgb(image: &RgbImage, colors: usize, settings: &KmeansSettings) -> Vec<Rgb<u8>> {
    let rgb_vec: Vec<Srgb> = srgb_pixels(image).collect();
    let result = best_of_runs(&rgb_vec, colors, settings, settings.rgb_converge);
    result.centroids.iter().map(|rgb| to_rgb8(*rgb)).collect()
}

fn best_of_runs<C>(buf: &[C], colors: usize, settings: &KmeansSettings, converge: f32) -> Kmeans<C>
where
    C: kmeans_colors::Calculate + Clone,
{
    let mut result = Kmeans::<C>::new();
    for run in 0..settings.runs.max(1) {
        let run_result = get_kmeans(
            colors,
            settings.max_iterations,
            converge,
            false,
            buf,
            settings.seed.wrapping_add(run as u64),
        );
        if run_result.score < result.score {
            result = run_result;
        }
    }
    result
}
