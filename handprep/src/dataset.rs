//! Frame enumeration and train/test partitioning

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

// Fraction of frames held out as the test set
const TEST_FRACTION: f64 = 0.1;

// Frame names carry a fixed-width type tag ("depth_") and extension (".png")
const PREFIX_LEN: usize = 6;
const SUFFIX_LEN: usize = 4;

/// List the frame files in the dataset directory.
///
/// Order is whatever the filesystem returns. It is deliberately not
/// sorted, so the resulting split matches the source dataset's original
/// partitioning on the same machine but is not portable across platforms.
pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read dataset directory {}", dir.display()))?;

    let mut frames = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        frames.push(entry.path());
    }

    Ok(frames)
}

/// Partition frames into train and test subsets.
///
/// The last `floor(0.1 * n)` frames in listing order form the test set;
/// everything before them is the training set. The split is positional,
/// not randomized, so reruns over the same listing reproduce it exactly.
pub fn split<T>(frames: &[T]) -> (&[T], &[T]) {
    let test_size = (frames.len() as f64 * TEST_FRACTION) as usize;
    frames.split_at(frames.len() - test_size)
}

/// Derive the output file stem from a frame's file name by stripping the
/// dataset's type tag and extension: `depth_1_0000001.png` -> `1_0000001`.
pub fn output_stem(file_name: &str) -> Result<&str> {
    file_name
        .get(PREFIX_LEN..file_name.len().saturating_sub(SUFFIX_LEN))
        .filter(|stem| !stem.is_empty())
        .with_context(|| format!("Frame name doesn't follow the dataset naming scheme: {file_name}"))
}

#[test]
fn test_split_is_the_last_tenth() {
    let frames: Vec<u32> = (0..20).collect();
    let (train, test) = split(&frames);
    assert_eq!(train, (0..18).collect::<Vec<u32>>());
    assert_eq!(test, [18, 19]);
}

#[test]
fn split_size_rounds_down() {
    let frames: Vec<u32> = (0..29).collect();
    let (train, test) = split(&frames);
    assert_eq!(train.len(), 27);
    assert_eq!(test.len(), 2);
}

#[test]
fn tiny_datasets_are_all_training_data() {
    let frames: Vec<u32> = (0..9).collect();
    let (train, test) = split(&frames);
    assert_eq!(train.len(), 9);
    assert!(test.is_empty());

    let empty: Vec<u32> = Vec::new();
    let (train, test) = split(&empty);
    assert!(train.is_empty());
    assert!(test.is_empty());
}

#[test]
fn splits_reconstruct_the_listing() {
    let frames: Vec<u32> = (0..47).collect();
    let (train, test) = split(&frames);
    let rejoined: Vec<u32> = train.iter().chain(test).copied().collect();
    assert_eq!(rejoined, frames);
}

#[test]
fn stem_strips_type_tag_and_extension() {
    assert_eq!(output_stem("depth_1_0000001.png").unwrap(), "1_0000001");
    assert_eq!(output_stem("synthd_2_0000314.png").unwrap(), "2_0000314");
}

#[test]
fn short_names_are_rejected() {
    assert!(output_stem("a.png").is_err());
    assert!(output_stem("").is_err());
    // exactly prefix + suffix leaves nothing to name the outputs with
    assert!(output_stem("depth_.png").is_err());
}
