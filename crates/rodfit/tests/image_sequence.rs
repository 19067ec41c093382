#![cfg(feature = "image")]

use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage};
use rodfit::io::{format_pattern, ImageSequence, IoError, ReadMode};
use rodfit::{FrameError, FrameSource};

fn write_gray(dir: &Path, name: &str, value: u8) {
    GrayImage::from_pixel(6, 4, Luma([value]))
        .save(dir.join(name))
        .expect("write png");
}

#[test]
fn discovers_consecutive_files_from_start() {
    let dir = tempfile::tempdir().expect("tempdir");
    for (i, v) in [(1, 10), (2, 20), (3, 30), (5, 50)] {
        write_gray(dir.path(), &format!("img{i:03}.png"), v);
    }
    let pattern = format!("{}/img%03d.png", dir.path().display());

    let seq = ImageSequence::open(&pattern, 1, ReadMode::Gray).expect("open");
    assert_eq!(seq.len(), 3, "stops at the first gap");
    assert_eq!(seq.start(), 1);
    let frame = seq.get(2).expect("frame 2");
    assert_eq!(frame.shape(), (6, 4, 1));
    assert!(frame.data().iter().all(|&v| v == 30));
    assert!(matches!(
        seq.get(3),
        Err(FrameError::IndexOutOfRange { index: 3, len: 3 })
    ));

    let tail = ImageSequence::open(&pattern, 5, ReadMode::Gray).expect("open");
    assert_eq!(tail.len(), 1);
    assert_eq!(
        tail.path(0),
        Some(Path::new(&format_pattern(&pattern, 5).expect("fmt")))
    );
}

#[test]
fn missing_first_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_gray(dir.path(), "f2.png", 1);
    let pattern = format!("{}/f%d.png", dir.path().display());
    match ImageSequence::open(&pattern, 1, ReadMode::Gray) {
        Err(IoError::NoFrames { path }) => assert!(path.ends_with("f1.png")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn invalid_pattern_is_rejected_before_probing() {
    assert!(matches!(
        ImageSequence::open("frames/img.png", 0, ReadMode::Gray),
        Err(IoError::InvalidPattern { .. })
    ));
}

#[test]
fn color_mode_decodes_three_channels() {
    let dir = tempfile::tempdir().expect("tempdir");
    RgbImage::from_pixel(3, 2, Rgb([200, 100, 50]))
        .save(dir.path().join("c0.png"))
        .expect("write png");
    let pattern = format!("{}/c%d.png", dir.path().display());

    let color = ImageSequence::open(&pattern, 0, ReadMode::Color).expect("open");
    let frame = color.get(0).expect("frame");
    assert_eq!(frame.shape(), (3, 2, 3));
    assert_eq!(&frame.data()[..3], &[200, 100, 50]);

    let gray = ImageSequence::open(&pattern, 0, ReadMode::Gray).expect("open");
    assert_eq!(gray.get(0).expect("frame").channels(), 1);
}

#[test]
fn undecodable_file_surfaces_as_source_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("bad0.png"), b"not a png").expect("write");
    let pattern = format!("{}/bad%d.png", dir.path().display());
    let seq = ImageSequence::open(&pattern, 0, ReadMode::Gray).expect("open");
    assert!(matches!(seq.get(0), Err(FrameError::Source { index: 0, .. })));
}
