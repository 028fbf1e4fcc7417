//! Clustering result types
//!
//! A [`ClusterSet`] groups clusters into buckets keyed by cluster size.
//! Buckets always iterate in ascending size order, and clusters inside a
//! bucket keep the order they were inserted in. Both the compositor's
//! column order and the link tree's directory indices derive from this.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

// ============================================================================
// ImageKey
// ============================================================================

/// Identifier of one image, usually its file path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageKey(PathBuf);

impl ImageKey {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ImageKey(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Final path component, used as the link name
    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.0.file_name()
    }

    /// Absolute form of the key, relative keys are joined onto the current
    /// directory. `.` and `..` are removed lexically; symlinks are not
    /// resolved.
    pub fn absolute(&self) -> std::io::Result<PathBuf> {
        Ok(normalize_lexically(&std::path::absolute(&self.0)?))
    }
}

/// Drop `.` components and fold `..` into its parent. `..` above the root
/// stays at the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if normalized.file_name().is_some() {
                    normalized.pop();
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for ImageKey {
    fn from(s: &str) -> Self {
        ImageKey::new(s)
    }
}

impl From<PathBuf> for ImageKey {
    fn from(p: PathBuf) -> Self {
        ImageKey(p)
    }
}

impl From<&Path> for ImageKey {
    fn from(p: &Path) -> Self {
        ImageKey(p.to_path_buf())
    }
}

// ============================================================================
// Cluster
// ============================================================================

/// Ordered group of images judged similar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cluster(Vec<ImageKey>);

impl Cluster {
    pub fn new(members: Vec<ImageKey>) -> Self {
        Cluster(members)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn members(&self) -> &[ImageKey] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageKey> {
        self.0.iter()
    }
}

impl<K: Into<ImageKey>> FromIterator<K> for Cluster {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Cluster(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Cluster {
    type Item = &'a ImageKey;
    type IntoIter = std::slice::Iter<'a, ImageKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// ClusterStats
// ============================================================================

/// Number of clusters sharing one size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCount {
    /// Members per cluster
    pub size: usize,
    /// Clusters of that size
    pub count: usize,
}

/// (size, count) pairs sorted ascending by size, one per distinct size
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterStats(Vec<SizeCount>);

impl ClusterStats {
    /// Drop every entry whose size is above `cap`
    pub fn retain_max_size(&mut self, cap: usize) {
        self.0.retain(|sc| sc.size <= cap);
    }

    /// Sum of counts, i.e. number of cluster instances
    pub fn total_clusters(&self) -> usize {
        self.0.iter().map(|sc| sc.count).sum()
    }

    /// Largest size present, `None` when empty
    pub fn max_size(&self) -> Option<usize> {
        self.0.last().map(|sc| sc.size)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[SizeCount] {
        &self.0
    }
}

// ============================================================================
// ClusterSet
// ============================================================================

/// Clusters bucketed by size
///
/// Invariants:
/// - every key is positive and every cluster in a bucket has exactly that
///   many members
/// - buckets are never empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<usize, Vec<Cluster>>",
    into = "BTreeMap<usize, Vec<Cluster>>"
)]
pub struct ClusterSet {
    buckets: BTreeMap<usize, Vec<Cluster>>,
}

impl ClusterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group a flat sequence of clusters by size, keeping their order
    /// within each size.
    pub fn from_clusters<I>(clusters: I) -> Result<Self>
    where
        I: IntoIterator<Item = Cluster>,
    {
        let mut set = Self::new();
        for cluster in clusters {
            set.insert(cluster)?;
        }
        Ok(set)
    }

    /// Append a cluster to the bucket matching its size
    pub fn insert(&mut self, cluster: Cluster) -> Result<()> {
        if cluster.is_empty() {
            return Err(ClusterError::invalid_input("clusters must have members"));
        }
        self.buckets.entry(cluster.len()).or_default().push(cluster);
        Ok(())
    }

    /// Buckets in ascending size order
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &[Cluster])> + '_ {
        self.buckets
            .iter()
            .map(|(&size, group)| (size, group.as_slice()))
    }

    /// Clusters of exactly `size` members, in insertion order
    pub fn get(&self, size: usize) -> Option<&[Cluster]> {
        self.buckets.get(&size).map(Vec::as_slice)
    }

    /// Number of distinct cluster sizes
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of cluster instances across all buckets
    pub fn num_clusters(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn stats(&self) -> ClusterStats {
        ClusterStats(
            self.buckets
                .iter()
                .map(|(&size, group)| SizeCount {
                    size,
                    count: group.len(),
                })
                .collect(),
        )
    }
}

impl TryFrom<BTreeMap<usize, Vec<Cluster>>> for ClusterSet {
    type Error = ClusterError;

    fn try_from(mut buckets: BTreeMap<usize, Vec<Cluster>>) -> Result<Self> {
        buckets.retain(|_, group| !group.is_empty());
        for (&size, group) in &buckets {
            if size == 0 {
                return Err(ClusterError::invalid_input("cluster size 0 is not allowed"));
            }
            if let Some(bad) = group.iter().find(|c| c.len() != size) {
                return Err(ClusterError::invalid_input(format!(
                    "cluster with {} members filed under size {}",
                    bad.len(),
                    size
                )));
            }
        }
        Ok(ClusterSet { buckets })
    }
}

impl From<ClusterSet> for BTreeMap<usize, Vec<Cluster>> {
    fn from(set: ClusterSet) -> Self {
        set.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cluster(names: &[&str]) -> Cluster {
        names.iter().copied().collect()
    }

    #[test]
    fn test_from_clusters_groups_by_size() {
        let set = ClusterSet::from_clusters(vec![
            cluster(&["c.jpg", "d.jpg", "e.jpg"]),
            cluster(&["a.jpg", "b.jpg"]),
            cluster(&["f.jpg", "g.jpg"]),
        ])
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.num_clusters(), 3);
        assert_eq!(
            set.get(2).unwrap(),
            &[cluster(&["a.jpg", "b.jpg"]), cluster(&["f.jpg", "g.jpg"])]
        );
    }

    #[test]
    fn test_buckets_ascend_by_size() {
        let set = ClusterSet::from_clusters(vec![
            cluster(&["a", "b", "c", "d"]),
            cluster(&["e"]),
            cluster(&["f", "g"]),
        ])
        .unwrap();

        let sizes: Vec<usize> = set.buckets().map(|(size, _)| size).collect();
        assert_eq!(sizes, vec![1, 2, 4]);
    }

    #[test]
    fn test_stats() {
        let set = ClusterSet::from_clusters(vec![
            cluster(&["a", "b"]),
            cluster(&["c", "d"]),
            cluster(&["e", "f", "g", "h", "i"]),
        ])
        .unwrap();

        let mut stats = set.stats();
        assert_eq!(
            stats.entries(),
            &[
                SizeCount { size: 2, count: 2 },
                SizeCount { size: 5, count: 1 }
            ]
        );
        assert_eq!(stats.total_clusters(), 3);
        assert_eq!(stats.max_size(), Some(5));

        stats.retain_max_size(4);
        assert_eq!(stats.total_clusters(), 2);
        assert_eq!(stats.max_size(), Some(2));
    }

    #[test]
    fn test_insert_rejects_empty_cluster() {
        let mut set = ClusterSet::new();
        let err = set.insert(Cluster::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(set.is_empty());
    }

    #[test]
    fn test_try_from_rejects_size_mismatch() {
        let mut raw = BTreeMap::new();
        raw.insert(3, vec![cluster(&["a", "b"])]);
        assert!(ClusterSet::try_from(raw).is_err());
    }

    #[test]
    fn test_json_form() {
        let json = r#"{"3": [["c.jpg", "d.jpg", "e.jpg"]], "2": [["a.jpg", "b.jpg"]]}"#;
        let set: ClusterSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.stats().total_clusters(), 2);
        assert_eq!(set.get(2).unwrap()[0], cluster(&["a.jpg", "b.jpg"]));

        let bad = r#"{"2": [["a.jpg"]]}"#;
        assert!(serde_json::from_str::<ClusterSet>(bad).is_err());
    }

    #[test]
    fn test_image_key_file_name() {
        let key = ImageKey::new("photos/2019/a.jpg");
        assert_eq!(key.file_name().unwrap(), "a.jpg");
        assert!(key.absolute().unwrap().is_absolute());
        assert!(ImageKey::new("..").file_name().is_none());
    }

    #[test]
    fn test_absolute_folds_parent_components() {
        let key = ImageKey::new("/data/run/../imgs/./a.jpg");
        assert_eq!(key.absolute().unwrap(), PathBuf::from("/data/imgs/a.jpg"));

        let relative = ImageKey::new("../imgs/a.jpg").absolute().unwrap();
        let cwd = std::env::current_dir().unwrap();
        let expected = normalize_lexically(&cwd.join("..")).join("imgs/a.jpg");
        assert_eq!(relative, expected);
        assert!(!relative.components().any(|c| c == Component::ParentDir));

        assert_eq!(
            normalize_lexically(Path::new("/../a.jpg")),
            PathBuf::from("/a.jpg")
        );
    }
}
