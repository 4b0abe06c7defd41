//! Decoding of encoded hand-pose frames into depth maps and label images

use imageproc::definitions::Image;
use imageproc::image::{Luma, Rgb, RgbImage};
use imageproc::map::map_colors;

// Depth readings above this are beyond the sensor's reliable range
pub const MAX_DEPTH: u16 = 2000;

/// Label color for hand pixels
pub const HAND_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
/// Label color for background pixels with a depth reading
pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
/// Label color for pixels with neither hand nor depth
pub const UNLABELED_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Single-channel 16-bit depth map, 0 meaning "no reading"
pub type DepthImage = Image<Luma<u16>>;

/// Decode an encoded frame into its depth map and per-pixel label image.
///
/// Encoded frames pack a 16-bit depth value across two color channels
/// (blue holds the low byte, green the high byte) and flag hand pixels
/// with a nonzero red channel. Both outputs have the input's dimensions.
pub fn decode(encoded: &RgbImage) -> (DepthImage, RgbImage) {
    let depth = map_colors(encoded, |Rgb([_, high, low])| {
        Luma([depth_from_bytes(low, high)])
    });

    let labels = map_colors(encoded, |Rgb([hand, high, low])| {
        if hand > 0 {
            HAND_COLOR
        } else if depth_from_bytes(low, high) > 0 {
            BACKGROUND_COLOR
        } else {
            UNLABELED_COLOR
        }
    });

    (depth, labels)
}

/// Reconstruct a depth reading from its two bytes, zeroing anything past
/// the sensor range.
#[inline]
fn depth_from_bytes(low: u8, high: u8) -> u16 {
    let depth = u16::from(low) | u16::from(high) << 8;
    if depth > MAX_DEPTH {
        0
    } else {
        depth
    }
}

#[cfg(test)]
fn decode_pixel(hand: u8, high: u8, low: u8) -> (u16, Rgb<u8>) {
    let (depth, labels) = decode(&RgbImage::from_pixel(1, 1, Rgb([hand, high, low])));
    (depth.get_pixel(0, 0)[0], *labels.get_pixel(0, 0))
}

#[test]
fn depth_is_reconstructed_from_both_bytes() {
    let (depth, label) = decode_pixel(0, 3, 100);
    assert_eq!(depth, 100 + 3 * 256);
    assert_eq!(label, BACKGROUND_COLOR);
}

#[test]
fn depth_past_sensor_range_is_zeroed() {
    let (depth, label) = decode_pixel(5, 255, 255);
    assert_eq!(depth, 0);
    // hand pixels keep their label even when the reading is discarded
    assert_eq!(label, HAND_COLOR);
}

#[test]
fn threshold_replaces_rather_than_caps() {
    let (depth, label) = decode_pixel(0, 7, 209);
    assert_eq!(depth, 0);
    assert_eq!(label, UNLABELED_COLOR);

    // 2000 itself is still a valid reading
    let (depth, label) = decode_pixel(0, 7, 208);
    assert_eq!(depth, 2000);
    assert_eq!(label, BACKGROUND_COLOR);
}

#[test]
fn hand_takes_priority_over_background() {
    let (depth, label) = decode_pixel(1, 0, 50);
    assert_eq!(depth, 50);
    assert_eq!(label, HAND_COLOR);
}

#[test]
fn empty_pixels_stay_unlabeled() {
    let (depth, label) = decode_pixel(0, 0, 0);
    assert_eq!(depth, 0);
    assert_eq!(label, UNLABELED_COLOR);
}

#[test]
fn every_pixel_gets_exactly_one_label() {
    for hand in [0u8, 1, 128, 255] {
        for high in [0u8, 3, 8, 255] {
            for low in [0u8, 100, 255] {
                let (depth, label) = decode_pixel(hand, high, low);
                let expected = if hand > 0 {
                    HAND_COLOR
                } else if depth > 0 {
                    BACKGROUND_COLOR
                } else {
                    UNLABELED_COLOR
                };
                assert_eq!(label, expected, "hand={hand} high={high} low={low}");
            }
        }
    }
}

#[test]
fn outputs_match_input_dimensions() {
    let encoded = RgbImage::from_fn(7, 5, |x, y| Rgb([0, 0, (x + y) as u8]));
    let (depth, labels) = decode(&encoded);
    assert_eq!(depth.dimensions(), (7, 5));
    assert_eq!(labels.dimensions(), (7, 5));
}
