use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::PosterizeResult;

/// Element counts gathered from an SVG document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvgStats {
    /// Number of `<image>` elements.
    pub image_count: usize,
    /// Distinct `fill` values of `path` and `polygon` elements with their
    /// occurrence counts, in first-seen document order.
    pub fills: Vec<(String, usize)>,
}

impl SvgStats {
    pub fn parse(svg: &str) -> PosterizeResult<Self> {
        let doc = roxmltree::Document::parse(svg)?;
        let mut stats = SvgStats::default();

        for node in doc.descendants().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "image" => stats.image_count += 1,
                "path" | "polygon" => {
                    if let Some(fill) = node.attribute("fill").filter(|f| !f.is_empty()) {
                        stats.record_fill(fill.trim());
                    }
                }
                _ => {}
            }
        }
        Ok(stats)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PosterizeResult<Self> {
        let svg = fs::read_to_string(path)?;
        Self::parse(&svg)
    }

    fn record_fill(&mut self, fill: &str) {
        match self.fills.iter_mut().find(|(seen, _)| seen == fill) {
            Some((_, count)) => *count += 1,
            None => self.fills.push((fill.to_string(), 1)),
        }
    }

    pub fn unique_fills(&self) -> usize {
        self.fills.len()
    }

    /// Total number of filled `path`/`polygon` elements.
    pub fn filled_shapes(&self) -> usize {
        self.fills.iter().map(|(_, count)| count).sum()
    }

    /// Attach the inspected file name for display.
    pub fn report(&self, path: impl Into<PathBuf>) -> StatsReport<'_> {
        StatsReport {
            path: path.into(),
            stats: self,
        }
    }
}

/// Human-readable summary printed by `posterize inspect`.
pub struct StatsReport<'a> {
    path: PathBuf,
    stats: &'a SvgStats,
}

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.path.display())?;
        writeln!(f, "Number of <image> tags: {}", self.stats.image_count)?;
        write!(f, "Unique fill colors ({}):", self.stats.unique_fills())?;
        for (fill, count) in &self.stats.fills {
            write!(f, "\n  {fill}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PosterizeError;

    const SAMPLE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4">
<image href="data:image/jpeg;base64,AAAA" width="4" height="4"/>
<path d="M0,0 L1,0 L1,1 L0,1 L0,0 Z" fill="#ff0000"/>
<g><polygon points="0,0 1,0 1,1" fill=" #00ff00 "/></g>
<path d="M2,2 L3,2 L3,3 L2,3 L2,2 Z" fill="#ff0000"/>
<path d="M0,0 Z"/>
<rect width="1" height="1" fill="blue"/>
</svg>"##;

    #[test]
    fn counts_images_and_fills_in_first_seen_order() {
        let stats = SvgStats::parse(SAMPLE).unwrap();
        assert_eq!(stats.image_count, 1);
        assert_eq!(
            stats.fills,
            vec![("#ff0000".to_string(), 2), ("#00ff00".to_string(), 1)]
        );
        assert_eq!(stats.filled_shapes(), 3);
    }

    #[test]
    fn report_layout() {
        let stats = SvgStats::parse(SAMPLE).unwrap();
        let text = stats.report("out.svg").to_string();
        assert_eq!(
            text,
            "File: out.svg\nNumber of <image> tags: 1\nUnique fill colors (2):\n  #ff0000: 2\n  #00ff00: 1"
        );
    }

    #[test]
    fn empty_document_has_no_fills() {
        let stats =
            SvgStats::parse(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#)
                .unwrap();
        assert_eq!(stats, SvgStats::default());
        assert!(stats.report("x.svg").to_string().ends_with("Unique fill colors (0):"));
    }

    #[test]
    fn empty_fill_attributes_are_not_counted() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2">
<path d="M0,0 L1,0 L1,1 Z" fill=""/>
<polygon points="0,0 1,0 1,1" fill=""/>
<path d="M0,0 L1,0 L1,1 Z" fill="#123456"/>
</svg>"##;
        let stats = SvgStats::parse(svg).unwrap();
        assert_eq!(stats.fills, vec![("#123456".to_string(), 1)]);
        assert_eq!(stats.filled_shapes(), 1);
    }

    #[test]
    fn malformed_markup_is_an_svg_error() {
        let err = SvgStats::parse("<svg><path></svg>").unwrap_err();
        assert!(matches!(err, PosterizeError::Svg(_)));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.svg");
        std::fs::write(&path, SAMPLE).unwrap();
        let stats = SvgStats::from_path(&path).unwrap();
        assert_eq!(stats.unique_fills(), 2);
    }
}
