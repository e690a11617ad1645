use super::*;

fn sample() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(5, 3, image::Rgba([10, 20, 30, 255]));
    img.put_pixel(4, 2, image::Rgba([200, 100, 0, 128]));
    img
}

#[test]
fn encode_keeps_size_and_filter_tag() {
    let still = StillImage::encode(&sample(), "sepia(100%)").unwrap();
    assert_eq!(still.size(), PixelSize::new(5, 3).unwrap());
    assert_eq!(still.filter_expression(), "sepia(100%)");
    assert_eq!(&still.png_bytes()[1..4], b"PNG");
    assert_eq!(still.decode().unwrap(), sample());
}

#[test]
fn with_pixels_preserves_the_filter_tag() {
    let still = StillImage::encode(&sample(), "blur(2px)").unwrap();
    let other = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
    let next = still.with_pixels(&other).unwrap();
    assert_eq!(next.filter_expression(), "blur(2px)");
    assert_eq!(next.size(), PixelSize::new(2, 2).unwrap());
    assert_ne!(next, still);
}

#[test]
fn from_encoded_rejects_garbage() {
    let err = StillImage::from_encoded(vec![1, 2, 3], "none").unwrap_err();
    assert!(matches!(err, BoothError::Encode(_)));
}
