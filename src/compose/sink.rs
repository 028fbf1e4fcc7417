//! Composite output
//!
//! Displaying a composite is left to whatever implements [`CompositeSink`].
//! The crate ships a file-backed sink; viewers live outside this crate.

use std::path::{Path, PathBuf};

use super::compositor::{compose, Composite};
use super::layout::ComposeOptions;
use crate::error::Result;
use crate::io::save_composite;
use crate::model::{ClusterSet, ImageStore};

/// Receives a finished composite for display or storage
pub trait CompositeSink {
    /// Present the composite full-bleed, without axes or margins
    fn present(&mut self, composite: &Composite) -> Result<()>;
}

/// Writes composites to an image file, format chosen by extension
#[derive(Debug, Clone)]
pub struct PngSink {
    path: PathBuf,
}

impl PngSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PngSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CompositeSink for PngSink {
    fn present(&mut self, composite: &Composite) -> Result<()> {
        save_composite(&self.path, composite)
    }
}

/// Compose `clusters` and hand the result to `sink`
pub fn visualize(
    clusters: &ClusterSet,
    images: &ImageStore,
    options: &ComposeOptions,
    sink: &mut dyn CompositeSink,
) -> Result<()> {
    let composite = compose(clusters, images, options)?;
    sink.present(&composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cluster;
    use image::RgbImage;

    #[derive(Default)]
    struct Recorder {
        shapes: Vec<(usize, usize, usize)>,
    }

    impl CompositeSink for Recorder {
        fn present(&mut self, composite: &Composite) -> Result<()> {
            self.shapes.push(composite.shape());
            Ok(())
        }
    }

    #[test]
    fn test_visualize_passes_composite_through() {
        let clusters =
            ClusterSet::from_clusters(vec![["a", "b"].into_iter().collect::<Cluster>()]).unwrap();
        let images: ImageStore = vec![("a", RgbImage::new(5, 2)), ("b", RgbImage::new(5, 2))]
            .into_iter()
            .collect();

        let mut recorder = Recorder::default();
        visualize(&clusters, &images, &ComposeOptions::default(), &mut recorder).unwrap();
        assert_eq!(recorder.shapes, vec![(4, 5, 3)]);
    }

    #[test]
    fn test_visualize_does_not_present_on_error() {
        let mut recorder = Recorder::default();
        let result = visualize(
            &ClusterSet::new(),
            &ImageStore::new(),
            &ComposeOptions::default(),
            &mut recorder,
        );
        assert!(result.is_err());
        assert!(recorder.shapes.is_empty());
    }
}
