//! File I/O for clustergrid
//!
//! Loads cluster sets from JSON, decodes images into an [`ImageStore`] and
//! writes finished composites. All images are converted to RGB8 on load.

use std::fs;
use std::path::Path;

use log::{debug, info};
use walkdir::WalkDir;

use crate::compose::Composite;
use crate::error::{ClusterError, Result};
use crate::model::{ClusterSet, ImageKey, ImageStore};

/// File extensions picked up by [`read_images`]
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff", "webp"];

/// Read a cluster set stored as `{"<size>": [[path, ...], ...]}`
pub fn load_clusters(path: &Path) -> Result<ClusterSet> {
    let content = fs::read_to_string(path).map_err(|e| ClusterError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let clusters: ClusterSet = serde_json::from_str(&content)?;
    debug!(
        "Loaded {} clusters in {} size buckets from {}",
        clusters.num_clusters(),
        clusters.len(),
        path.display()
    );
    Ok(clusters)
}

/// Write a cluster set as pretty-printed JSON
pub fn save_clusters(path: &Path, clusters: &ClusterSet) -> Result<()> {
    let content = serde_json::to_string_pretty(clusters)?;
    fs::write(path, content).map_err(|e| ClusterError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Decode one image file into RGB8
pub fn load_image(path: &Path) -> Result<image::RgbImage> {
    let image = image::open(path).map_err(|e| ClusterError::ImageDecode {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(image.into_rgb8())
}

/// Decode every image below `dir`, keyed by its path
///
/// Files are visited in file name order; only files with an extension from
/// [`IMAGE_EXTENSIONS`] (case-insensitive) are read.
pub fn read_images(dir: &Path) -> Result<ImageStore> {
    let mut store = ImageStore::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ClusterError::DirectoryError {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || !has_image_extension(entry.path()) {
            continue;
        }
        let image = load_image(entry.path())?;
        store.insert(ImageKey::from(entry.path()), image);
    }

    info!("Read {} images from {}", store.len(), dir.display());
    Ok(store)
}

/// Decode exactly the images referenced by `clusters`
pub fn load_images_for(clusters: &ClusterSet) -> Result<ImageStore> {
    let mut store = ImageStore::new();
    for (_, group) in clusters.buckets() {
        for key in group.iter().flat_map(|cluster| cluster.iter()) {
            if !store.contains(key) {
                let image = load_image(key.path())?;
                store.insert(key.clone(), image);
            }
        }
    }
    debug!("Loaded {} cluster member images", store.len());
    Ok(store)
}

/// Save a composite, format chosen from the file extension
pub fn save_composite(path: &Path, composite: &Composite) -> Result<()> {
    composite
        .buffer
        .save(path)
        .map_err(|e| ClusterError::ImageEncode {
            path: path.to_path_buf(),
            source: e,
        })?;
    info!("Saved composite to {}", path.display());
    Ok(())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cluster;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("a/b.JPG")));
        assert!(has_image_extension(Path::new("b.png")));
        assert!(!has_image_extension(Path::new("notes.txt")));
        assert!(!has_image_extension(Path::new("README")));
    }

    #[test]
    fn test_clusters_json_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("clusters.json");

        let clusters = ClusterSet::from_clusters(vec![
            ["a.jpg", "b.jpg"].into_iter().collect::<Cluster>(),
            ["c.jpg"].into_iter().collect(),
        ])
        .unwrap();
        save_clusters(&path, &clusters).unwrap();

        assert_eq!(load_clusters(&path).unwrap(), clusters);
    }

    #[test]
    fn test_load_clusters_missing_file() {
        let err = load_clusters(Path::new("/nonexistent/clusters.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_READ_ERROR");
    }

    #[test]
    fn test_read_images_skips_other_files() {
        let temp_dir = tempdir().unwrap();
        RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]))
            .save(temp_dir.path().join("b.png"))
            .unwrap();
        RgbImage::from_pixel(2, 2, Rgb([4, 5, 6]))
            .save(temp_dir.path().join("a.png"))
            .unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "not an image").unwrap();

        let store = read_images(temp_dir.path()).unwrap();
        assert_eq!(store.len(), 2);

        let first = store.keys().next().unwrap();
        assert_eq!(first.file_name().unwrap(), "a.png");
        assert_eq!(store.get(first).unwrap().get_pixel(0, 0), &Rgb([4, 5, 6]));
    }

    #[test]
    fn test_corrupt_image() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = load_image(&path).unwrap_err();
        assert_eq!(err.error_code(), "IMAGE_DECODE_ERROR");
    }
}
