use super::*;

#[test]
fn new_checks_buffer_length() {
    let size = PixelSize::new(2, 2).unwrap();
    assert!(VideoFrame::new(size, vec![0; 16]).is_ok());
    assert!(VideoFrame::new(size, vec![0; 15]).is_err());
}

#[test]
fn new_rejects_zero_sized_frames() {
    let empty = PixelSize {
        width: 0,
        height: 4,
    };
    assert!(matches!(
        VideoFrame::new(empty, Vec::new()),
        Err(BoothError::Validation(_))
    ));
}

#[test]
fn mirrored_swaps_columns_per_row() {
    let size = PixelSize::new(3, 2).unwrap();
    let data: Vec<u8> = (0..6u8).flat_map(|i| [i, i, i, 255]).collect();
    let frame = VideoFrame::new(size, data).unwrap();
    let m = frame.mirrored();
    let firsts: Vec<u8> = m.data().chunks_exact(4).map(|p| p[0]).collect();
    assert_eq!(firsts, [2, 1, 0, 5, 4, 3]);
    assert_eq!(m.mirrored(), frame);
}

#[test]
fn image_round_trip_keeps_pixels() {
    let img = RgbaImage::from_pixel(4, 3, image::Rgba([9, 8, 7, 255]));
    let frame = VideoFrame::from_image(img.clone()).unwrap();
    assert_eq!(frame.size(), PixelSize::new(4, 3).unwrap());
    assert_eq!(frame.to_image().unwrap(), img);
}
