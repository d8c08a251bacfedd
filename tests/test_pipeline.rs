mod common;

use common::*;
use corroscan::analysis::{classification, contours, percentages};

fn assert_bounds(result: &AnalysisResult) {
    for value in [result.total_affected, result.red, result.black, result.white] {
        assert!((0.0..=100.0).contains(&value), "out of range: {}", value);
    }
    let max = result.red.max(result.black).max(result.white);
    assert!(result.total_affected >= max);
    // each share is rounded on its own, allow for that
    assert!(result.total_affected <= result.red + result.black + result.white + 0.015);
}

#[test]
fn test_all_background_has_no_object() {
    let analyzer = CorrosionAnalyzer::default();
    let err = analyzer.analyze_rgb(backdrop(64, 64)).unwrap_err();

    assert!(matches!(err, AnalysisError::NoObjectDetected));
    assert!(err.is_client_error());
}

#[test]
fn test_rust_disk_is_fully_affected() -> anyhow::Result<()> {
    let mut img = backdrop(100, 100);
    fill_disk(&mut img, 50, 50, 25, RUST);

    let result = CorrosionAnalyzer::default().analyze_rgb(img)?;

    assert!(result.red > 99.0, "red was {}", result.red);
    assert_eq!(result.total_affected, result.red);
    assert_eq!(result.black, 0.0);
    assert_eq!(result.white, 0.0);
    assert_bounds(&result);

    Ok(())
}

#[test]
fn test_corroded_plate_percentages() -> anyhow::Result<()> {
    let result = CorrosionAnalyzer::default().analyze_rgb(corroded_plate())?;

    assert_eq!(result.object_pixels, 1600);
    assert_eq!(result.red, 6.25);
    assert_eq!(result.black, 6.25);
    assert_eq!(result.white, 12.5);
    assert_eq!(result.total_affected, 25.0);
    assert_bounds(&result);

    Ok(())
}

#[test]
fn test_clean_object_reports_zero() -> anyhow::Result<()> {
    let mut img = backdrop(60, 60);
    fill_rect(&mut img, 10, 10, 30, 20, STEEL);

    let result = CorrosionAnalyzer::default().analyze_rgb(img)?;

    assert_eq!(result.object_pixels, 600);
    assert_eq!(result.total_affected, 0.0);
    assert_eq!(result.red, 0.0);
    assert_eq!(result.black, 0.0);
    assert_eq!(result.white, 0.0);

    Ok(())
}

#[test]
fn test_only_larger_blob_survives() -> anyhow::Result<()> {
    let mut img = backdrop(120, 80);
    fill_rect(&mut img, 10, 20, 40, 40, STEEL);
    fill_rect(&mut img, 80, 30, 10, 10, RUST);

    let analyzer = CorrosionAnalyzer::default();
    let data = analyzer.run_stages(img.clone())?;

    let expected = Mask::from_fn(120, 80, |x, y| (10..50).contains(&x) && (20..60).contains(&y));
    assert_eq!(data.object_mask.as_ref(), Some(&expected));
    assert_eq!(data.get_count("contour_count"), Some(2));

    // the small rust blob was zeroed out of the working image
    assert_eq!(*data.image.get_pixel(85, 35), image::Rgb([0, 0, 0]));

    let result = analyzer.analyze_rgb(img)?;
    assert_eq!(result.object_pixels, 1600);
    assert_eq!(result.red, 0.0);
    assert_eq!(result.total_affected, 0.0);

    Ok(())
}

#[test]
fn test_hole_inside_object_is_filled() -> anyhow::Result<()> {
    let mut img = backdrop(60, 60);
    fill_rect(&mut img, 15, 15, 30, 30, STEEL);
    fill_rect(&mut img, 25, 25, 10, 10, BACKDROP);

    let result = CorrosionAnalyzer::default().analyze_rgb(img)?;

    // the enclosed backdrop counts as object but is not corrosion
    assert_eq!(result.object_pixels, 900);
    assert_eq!(result.total_affected, 0.0);

    Ok(())
}

#[test]
fn test_specks_are_removed() -> anyhow::Result<()> {
    let mut img = backdrop(80, 80);
    fill_rect(&mut img, 10, 10, 30, 30, STEEL);
    fill_rect(&mut img, 60, 60, 2, 2, DARK);

    let data = CorrosionAnalyzer::default().run_stages(img)?;

    assert_eq!(data.get_count("foreground_pixels"), Some(900));
    assert_eq!(data.get_count("contour_count"), Some(1));

    Ok(())
}

#[test]
fn test_overlapping_classes_count_once_in_total() -> anyhow::Result<()> {
    let mut config = AnalyzerConfig::default();
    // every object pixel is now "black" as well as its own class
    config.corrosion.black.upper = [179, 255, 255];

    let analyzer = CorrosionAnalyzer::new(config)?;
    let result = analyzer.analyze_rgb(corroded_plate())?;

    assert_eq!(result.black, 100.0);
    assert_eq!(result.red, 6.25);
    assert_eq!(result.white, 12.5);
    assert_eq!(result.total_affected, 100.0);
    assert_bounds(&result);

    Ok(())
}

#[test]
fn test_single_black_pixel_object() -> anyhow::Result<()> {
    let mut img = backdrop(9, 9);
    img.put_pixel(4, 4, DARK);
    let foreground = Mask::from_fn(9, 9, |x, y| x == 4 && y == 4);

    let isolated = contours::isolate_object(&foreground, &img)?;
    assert_eq!(isolated.mask.count(), 1);

    let thresholds = AnalyzerConfig::default().corrosion;
    let masks = classification::classify(&isolated.image, &isolated.mask, &thresholds);
    let result = percentages::calculate(&isolated.mask, &masks)?;

    assert_eq!(result.black, 100.0);
    assert_eq!(result.total_affected, 100.0);
    assert_eq!(result.red, 0.0);
    assert_eq!(result.white, 0.0);

    Ok(())
}

#[test]
fn test_zeroed_pixels_never_count() {
    // isolated image is all black but only one pixel belongs to the object
    let isolated = image::RgbImage::new(10, 10);
    let object = Mask::from_fn(10, 10, |x, y| x == 0 && y == 0);

    let masks =
        classification::classify(&isolated, &object, &AnalyzerConfig::default().corrosion);

    assert_eq!(masks.black.count(), 1);
    assert_eq!(masks.affected.count(), 1);
}

#[test]
fn test_empty_foreground_is_no_object() {
    let img = backdrop(10, 10);
    let err = contours::isolate_object(&Mask::new(10, 10), &img).unwrap_err();
    assert!(matches!(err, AnalysisError::NoObjectDetected));
}

#[test]
fn test_object_touching_left_edge() -> anyhow::Result<()> {
    let mut img = backdrop(40, 40);
    fill_rect(&mut img, 0, 0, 20, 40, RUST);

    let result = CorrosionAnalyzer::default().analyze_rgb(img)?;

    assert_eq!(result.object_pixels, 800);
    assert_eq!(result.red, 100.0);
    assert_eq!(result.total_affected, 100.0);

    Ok(())
}

#[test]
fn test_edge_object_beats_smaller_interior_blob() -> anyhow::Result<()> {
    let mut img = backdrop(80, 60);
    fill_rect(&mut img, 0, 10, 30, 40, STEEL);
    fill_rect(&mut img, 55, 20, 10, 10, RUST);

    let data = CorrosionAnalyzer::default().run_stages(img)?;

    let expected = Mask::from_fn(80, 60, |x, y| x < 30 && (10..50).contains(&y));
    assert_eq!(data.object_mask.as_ref(), Some(&expected));
    assert_eq!(data.get_count("contour_count"), Some(2));

    Ok(())
}

#[test]
fn test_frame_without_backdrop_is_one_object() -> anyhow::Result<()> {
    let img = image::RgbImage::from_pixel(20, 20, STEEL);
    let result = CorrosionAnalyzer::default().analyze_rgb(img)?;

    assert_eq!(result.object_pixels, 400);
    assert_eq!(result.total_affected, 0.0);

    Ok(())
}

#[test]
fn test_repeated_runs_are_identical() -> anyhow::Result<()> {
    let bytes = encode_png(&corroded_plate());
    let analyzer = CorrosionAnalyzer::default();

    let first = analyzer.analyze_bytes(&bytes)?;
    let second = analyzer.analyze_bytes(&bytes)?;
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_concurrent_runs_agree() -> anyhow::Result<()> {
    let analyzer = CorrosionAnalyzer::default();
    let expected = analyzer.analyze_rgb(corroded_plate())?;
    let analyzer = &analyzer;

    let results: Vec<AnalysisResult> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(move || analyzer.analyze_rgb(corroded_plate())))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("analysis thread panicked"))
            .collect::<Result<_, _>>()
    })?;

    assert!(results.iter().all(|r| *r == expected));

    Ok(())
}

#[test]
fn test_malformed_bytes_fail_to_decode() {
    let analyzer = CorrosionAnalyzer::default();

    let err = analyzer.analyze_bytes(b"definitely not an image").unwrap_err();
    assert!(matches!(err, AnalysisError::Decode(_)));
    assert!(err.is_client_error());

    let err = analyzer.analyze_bytes(&[]).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyInput));
}

#[test]
fn test_analyze_path_matches_in_memory() -> anyhow::Result<()> {
    let img = corroded_plate();
    let file = write_temp_png(&img);
    let analyzer = CorrosionAnalyzer::default();

    let from_path = analyzer.analyze_path(file.path())?;
    let in_memory = analyzer.analyze_rgb(img)?;
    assert_eq!(from_path, in_memory);

    let missing = analyzer.analyze_path(file.path().with_extension("missing"));
    assert!(matches!(missing, Err(AnalysisError::Io(_))));

    Ok(())
}
