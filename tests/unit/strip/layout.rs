use super::*;

#[test]
fn canvas_height_follows_the_formula() {
    let l = StripLayout::default();
    assert_eq!(l.canvas_height(0), 80);
    assert_eq!(l.canvas_height(1), 400);
    assert_eq!(l.canvas_height(3), 60 + 320 * 3 + 20);
    assert_eq!(l.canvas_size(3).unwrap(), PixelSize::new(400, 1040).unwrap());
}

#[test]
fn photos_stack_top_to_bottom() {
    let l = StripLayout::default();
    assert_eq!(l.photo_rect(0), Rect::new(20.0, 80.0, 380.0, 380.0));
    assert_eq!(l.photo_rect(1), Rect::new(20.0, 400.0, 380.0, 700.0));
    assert_eq!(l.photo_rect(2).y0, 720.0);
    assert!(l.photo_rect(2).y1 < l.canvas_height(3) as f64);
}

#[test]
fn decorations_are_relative_to_each_photo() {
    let l = StripLayout {
        decorations: vec![Decoration {
            x: -5.0,
            y: 10.0,
            width: 30.0,
            height: 8.0,
            color: Rgba8::opaque(255, 0, 0),
        }],
        ..StripLayout::default()
    };
    let rects: Vec<_> = l.decoration_rects(1).collect();
    assert_eq!(rects.len(), 1);
    assert_eq!(rects[0].0, Rect::new(15.0, 410.0, 45.0, 418.0));
}

#[test]
fn validate_rejects_degenerate_geometry() {
    assert!(StripLayout::default().validate().is_ok());
    let narrow = StripLayout {
        width: 40,
        ..StripLayout::default()
    };
    assert!(narrow.validate().is_err());
    let flat = StripLayout {
        photo_height: 0,
        ..StripLayout::default()
    };
    assert!(flat.validate().is_err());
}

#[test]
fn layout_deserializes_with_defaults() {
    let l: StripLayout =
        serde_json::from_str(r##"{"title":"Party","title_color":"#ff0000"}"##).unwrap();
    assert_eq!(l.title, "Party");
    assert_eq!(l.title_color, Rgba8::opaque(255, 0, 0));
    assert_eq!(l.width, 400);
    assert!(serde_json::from_str::<StripLayout>(r#"{"colour":"x"}"#).is_err());
}
