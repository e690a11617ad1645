use super::*;

#[test]
fn test_pattern_draws_seven_bars() {
    let size = PixelSize::new(70, 2).unwrap();
    let frame = TestPatternDevice::pattern(size).unwrap();
    let px = |x: usize| &frame.data()[x * 4..x * 4 + 4];
    assert_eq!(px(0), &[235, 235, 235, 255]);
    assert_eq!(px(10), &[235, 235, 16, 255]);
    assert_eq!(px(69), &[16, 16, 235, 255]);
}

#[test]
fn mirrored_pattern_starts_with_last_bar() {
    let size = PixelSize::new(70, 1).unwrap();
    let mut dev = TestPatternDevice::new(size).mirrored(true);
    let mut stream = dev.open().unwrap();
    let frame = stream.latest_frame().unwrap();
    assert_eq!(&frame.data()[..4], &[16, 16, 235, 255]);
}

#[test]
fn stopped_stream_yields_no_frames() {
    let mut dev = TestPatternDevice::new(PixelSize::new(8, 8).unwrap());
    let mut stream = dev.open().unwrap();
    assert!(stream.latest_frame().is_some());
    stream.stop();
    stream.stop();
    assert!(stream.latest_frame().is_none());
}

#[test]
fn missing_image_file_is_media_unavailable() {
    let mut dev = ImageFileDevice::new("target/definitely-missing-photobooth-source.png");
    let err = dev.open().err().unwrap();
    assert!(matches!(err, BoothError::MediaUnavailable(_)));
}

#[test]
fn no_device_always_fails() {
    let mut dev = NoDevice::new("permission denied");
    let err = dev.open().err().unwrap();
    assert_eq!(err.to_string(), "media unavailable: permission denied");
}

#[test]
fn zero_width_pattern_fails_to_open_instead_of_panicking() {
    let mut dev = TestPatternDevice::new(PixelSize {
        width: 0,
        height: 4,
    })
    .mirrored(true);
    assert!(matches!(dev.open(), Err(BoothError::Validation(_))));
}
