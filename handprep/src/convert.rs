//! Batch conversion: enumerate frames, split, decode, write PNGs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use imageproc::image;

use crate::dataset;
use crate::decode::decode;

/// Number of frames written to each split directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitCounts {
    pub train: usize,
    pub test: usize,
}

/// Convert every frame in `dataset_dir`, writing a depth map and a label
/// image per frame into `out_dir/train` and `out_dir/test`.
///
/// Frames are processed one at a time in listing order, training split
/// first. The first failure aborts the run; there is no per-frame
/// recovery.
pub fn convert_dataset(dataset_dir: &Path, out_dir: &Path) -> Result<SplitCounts> {
    let frames = dataset::list_frames(dataset_dir)?;
    let (train, test) = dataset::split(&frames);

    log::info!(
        "Found {} frames: {} train, {} test",
        frames.len(),
        train.len(),
        test.len()
    );

    let train_dir = out_dir.join("train");
    let test_dir = out_dir.join("test");
    for dir in [&train_dir, &test_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    for frame in train {
        convert_frame(frame, &train_dir)?;
    }
    for frame in test {
        convert_frame(frame, &test_dir)?;
    }

    Ok(SplitCounts {
        train: train.len(),
        test: test.len(),
    })
}

fn convert_frame(frame: &Path, split_dir: &Path) -> Result<()> {
    let file_name = frame
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Frame has no usable file name: {}", frame.display()))?;
    let stem = dataset::output_stem(file_name)?;

    let encoded = image::open(frame)
        .with_context(|| format!("Failed to open frame {}", frame.display()))?
        .into_rgb8();
    let (depth, labels) = decode(&encoded);

    let labels_path = split_dir.join(format!("{stem}_labels.png"));
    labels
        .save(&labels_path)
        .with_context(|| format!("Failed to write labels to {}", labels_path.display()))?;

    let depth_path = split_dir.join(format!("{stem}_depth.png"));
    depth
        .save(&depth_path)
        .with_context(|| format!("Failed to write depth map to {}", depth_path.display()))?;

    log::debug!("Converted {}", frame.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::image::{Rgb, RgbImage};

    fn write_frame(dir: &Path, name: &str, hand: u8, high: u8, low: u8) {
        RgbImage::from_pixel(2, 2, Rgb([hand, high, low]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn writes_depth_and_labels_for_every_frame() {
        let dataset = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        write_frame(dataset.path(), "depth_1_0000001.png", 0, 3, 100);
        write_frame(dataset.path(), "depth_1_0000002.png", 7, 0, 0);

        let counts = convert_dataset(dataset.path(), out.path()).unwrap();
        assert_eq!(counts, SplitCounts { train: 2, test: 0 });

        let depth = image::open(out.path().join("train/1_0000001_depth.png"))
            .unwrap()
            .into_luma16();
        assert_eq!(depth.dimensions(), (2, 2));
        assert_eq!(depth.get_pixel(0, 0)[0], 868);

        let labels = image::open(out.path().join("train/1_0000001_labels.png"))
            .unwrap()
            .into_rgb8();
        assert_eq!(*labels.get_pixel(0, 0), Rgb([0, 0, 255]));

        let labels = image::open(out.path().join("train/1_0000002_labels.png"))
            .unwrap()
            .into_rgb8();
        assert_eq!(*labels.get_pixel(1, 1), Rgb([255, 0, 0]));

        // test split is empty but its directory still exists
        assert!(out.path().join("test").is_dir());
    }

    #[test]
    fn one_in_ten_frames_lands_in_the_test_split() {
        let dataset = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        for i in 0..10 {
            write_frame(dataset.path(), &format!("depth_1_{i:07}.png"), 0, 1, i);
        }

        let counts = convert_dataset(dataset.path(), out.path()).unwrap();
        assert_eq!(counts, SplitCounts { train: 9, test: 1 });

        // two files per frame in each split directory
        assert_eq!(fs::read_dir(out.path().join("train")).unwrap().count(), 18);
        assert_eq!(fs::read_dir(out.path().join("test")).unwrap().count(), 2);
    }

    #[test]
    fn reruns_produce_identical_bytes() {
        let dataset = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        write_frame(dataset.path(), "depth_1_0000001.png", 2, 4, 200);

        convert_dataset(dataset.path(), out.path()).unwrap();
        let depth_path = out.path().join("train/1_0000001_depth.png");
        let labels_path = out.path().join("train/1_0000001_labels.png");
        let depth = fs::read(&depth_path).unwrap();
        let labels = fs::read(&labels_path).unwrap();

        convert_dataset(dataset.path(), out.path()).unwrap();
        assert_eq!(fs::read(&depth_path).unwrap(), depth);
        assert_eq!(fs::read(&labels_path).unwrap(), labels);
    }

    #[test]
    fn missing_dataset_directory_is_an_error() {
        let out = tempfile::tempdir().unwrap();
        assert!(convert_dataset(Path::new("/nonexistent/dataset"), out.path()).is_err());
    }

    #[test]
    fn undecodable_frame_aborts_the_run() {
        let dataset = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        fs::write(dataset.path().join("depth_1_0000001.png"), b"not a png").unwrap();

        assert!(convert_dataset(dataset.path(), out.path()).is_err());
    }

    #[test]
    fn misnamed_frame_aborts_the_run() {
        let dataset = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        write_frame(dataset.path(), "x.png", 0, 0, 1);

        assert!(convert_dataset(dataset.path(), out.path()).is_err());
    }
}
