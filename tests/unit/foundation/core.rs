use super::*;

#[test]
fn pixel_size_rejects_zero_axes() {
    assert!(PixelSize::new(0, 10).is_err());
    assert!(PixelSize::new(10, 0).is_err());
    assert_eq!(PixelSize::new(4, 3).unwrap().rgba_len(), 48);
}

#[test]
fn scale_to_is_per_axis() {
    let display = PixelSize::new(400, 300).unwrap();
    let native = PixelSize::new(1280, 720).unwrap();
    let s = display.scale_to(native);
    assert_eq!(s.x, 3.2);
    assert_eq!(s.y, 2.4);
}

#[test]
fn hex_roundtrip_and_errors() {
    let c = Rgba8::from_hex("#64748B").unwrap();
    assert_eq!(c, Rgba8::opaque(0x64, 0x74, 0x8b));
    assert_eq!(c.to_hex(), "#64748b");
    assert_eq!(Rgba8::from_hex("ff000080").unwrap().a, 0x80);
    assert!(Rgba8::from_hex("#fff").is_err());
    assert!(Rgba8::from_hex("#gg0000").is_err());
}

#[test]
fn rgba8_serializes_as_hex_string() {
    let json = serde_json::to_string(&Rgba8::WHITE).unwrap();
    assert_eq!(json, "\"#ffffff\"");
    let back: Rgba8 = serde_json::from_str("\"#00ff0080\"").unwrap();
    assert_eq!(back, Rgba8 { r: 0, g: 255, b: 0, a: 128 });
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_pixels() {
    let mut px = vec![10u8, 20, 30, 255, 200, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
}

#[test]
fn over_opaque_source_replaces_destination() {
    let mut dst = vec![1u8, 2, 3, 255];
    premul_over_in_place(&mut dst, &[9, 8, 7, 255]).unwrap();
    assert_eq!(dst, vec![9, 8, 7, 255]);

    let mut dst = vec![1u8, 2, 3, 255];
    premul_over_in_place(&mut dst, &[0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255]);

    assert!(premul_over_in_place(&mut dst, &[0, 0, 0]).is_err());
}
