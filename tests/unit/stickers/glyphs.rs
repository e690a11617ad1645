use super::*;

#[test]
fn svg_document_positions_and_escapes_text() {
    let size = PixelSize::new(400, 60).unwrap();
    let items = [
        TextItem::title("Fish & <Chips>", 200.0, 35.0, 20.0, Rgba8::opaque(0x64, 0x74, 0x8b)),
        TextItem::glyph("🌸", 12.5, 40.0, 24.0),
    ];
    let doc = svg_document(size, &items);
    assert!(doc.starts_with("<svg"));
    assert!(doc.contains(r#"viewBox="0 0 400 60""#));
    assert!(doc.contains("Fish &amp; &lt;Chips&gt;"));
    assert!(doc.contains(r#"x="200" y="35" font-size="20""#));
    assert!(doc.contains(r#"text-anchor="middle""#));
    assert!(doc.contains(r#"font-weight="bold""#));
    assert!(doc.contains("#64748b"));
    assert!(doc.contains(r#"x="12.5" y="40" font-size="24""#));
    assert!(doc.ends_with("</svg>"));
}

#[test]
fn empty_layer_is_transparent() {
    let r = GlyphRasterizer::without_fonts();
    let layer = r.render_layer(PixelSize::new(3, 2).unwrap(), &[]).unwrap();
    assert_eq!(layer.len(), 24);
    assert!(layer.iter().all(|&b| b == 0));
}

#[test]
fn missing_fonts_degrade_to_no_ink() {
    let r = GlyphRasterizer::without_fonts();
    assert_eq!(r.face_count(), 0);
    let mut img = RgbaImage::from_pixel(40, 40, image::Rgba([10, 200, 30, 255]));
    let before = img.clone();
    r.draw_onto(&mut img, &[TextItem::glyph("⭐", 5.0, 30.0, 24.0)])
        .unwrap();
    assert_eq!(img, before);
}

#[test]
fn system_fonts_put_ink_on_the_layer() {
    let r = GlyphRasterizer::system();
    if r.face_count() == 0 {
        return;
    }
    let layer = r
        .render_layer(
            PixelSize::new(80, 60).unwrap(),
            &[TextItem::glyph("M", 10.0, 45.0, 40.0)],
        )
        .unwrap();
    assert!(has_ink(&layer));
}

#[test]
fn later_items_paint_over_earlier_ones() {
    let r = GlyphRasterizer::system();
    if r.face_count() == 0 {
        return;
    }
    let mut red = TextItem::glyph("M", 10.0, 50.0, 48.0);
    red.fill = Rgba8::opaque(255, 0, 0);
    let mut blue = red.clone();
    blue.fill = Rgba8::opaque(0, 0, 255);

    let mut img = RgbaImage::from_pixel(80, 64, image::Rgba([255, 255, 255, 255]));
    r.draw_onto(&mut img, &[red, blue]).unwrap();

    let solid_blue = img.pixels().filter(|p| p[2] > 200 && p[0] < 60).count();
    let red_showing = img.pixels().filter(|p| i32::from(p[0]) > i32::from(p[2]) + 2).count();
    assert!(solid_blue > 0);
    assert_eq!(red_showing, 0);
}
