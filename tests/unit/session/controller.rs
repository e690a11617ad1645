use image::RgbaImage;

use super::*;

const DELAY: Duration = Duration::from_millis(1000);

fn still(shade: u8) -> StillImage {
    let img = RgbaImage::from_pixel(4, 3, image::Rgba([shade, shade, shade, 255]));
    StillImage::encode(&img, "none").unwrap()
}

fn capturing() -> SessionController {
    let mut c = SessionController::new(3, DELAY).unwrap();
    assert_eq!(c.screen(), Screen::Intro);
    assert!(c.start());
    c
}

#[test]
fn third_photo_schedules_one_transition() {
    let mut c = capturing();
    let t0 = Duration::from_secs(10);
    assert!(c.on_photo_captured(still(1), t0));
    assert!(c.on_photo_captured(still(2), t0));
    assert_eq!(c.transition_due(), None);
    assert!(c.on_photo_captured(still(3), t0));
    assert_eq!(c.transition_due(), Some(t0 + DELAY));

    assert_eq!(c.poll(t0 + Duration::from_millis(999)), None);
    assert_eq!(c.screen(), Screen::Capture);
    assert_eq!(c.poll(t0 + DELAY), Some(Screen::Strip));
    assert_eq!(c.poll(t0 + DELAY * 5), None);
    assert_eq!(c.screen(), Screen::Strip);
}

#[test]
fn photos_past_the_target_are_ignored() {
    let mut c = capturing();
    for i in 0..3 {
        c.on_photo_captured(still(i), Duration::ZERO);
    }
    assert!(!c.on_photo_captured(still(9), Duration::from_millis(10)));
    assert_eq!(c.photos().len(), 3);
    assert_eq!(c.transition_due(), Some(DELAY));
}

#[test]
fn photos_keep_capture_order() {
    let mut c = capturing();
    let shots = [still(10), still(20), still(30)];
    for s in &shots {
        c.on_photo_captured(s.clone(), Duration::ZERO);
    }
    assert_eq!(c.photos(), &shots);
}

#[test]
fn retake_clears_and_cancels_pending_transition() {
    let mut c = capturing();
    for i in 0..3 {
        c.on_photo_captured(still(i), Duration::ZERO);
    }
    c.on_retake();
    assert!(c.photos().is_empty());
    assert_eq!(c.screen(), Screen::Capture);
    assert_eq!(c.poll(Duration::from_secs(60)), None);
    assert_eq!(c.screen(), Screen::Capture);
}

#[test]
fn retake_from_strip_returns_to_capture() {
    let mut c = capturing();
    for i in 0..3 {
        c.on_photo_captured(still(i), Duration::ZERO);
    }
    c.poll(DELAY);
    assert_eq!(c.screen(), Screen::Strip);
    assert!(!c.on_photo_captured(still(7), DELAY));
    c.on_retake();
    assert_eq!(c.screen(), Screen::Capture);
    assert!(c.on_photo_captured(still(7), DELAY));
}

#[test]
fn sticker_step_returns_to_capture_on_append() {
    let mut c = capturing();
    assert!(c.begin_stickers());
    assert_eq!(c.screen(), Screen::Stickers);
    c.on_photo_captured(still(1), Duration::ZERO);
    assert_eq!(c.screen(), Screen::Capture);
    assert!(c.begin_stickers());
    c.cancel_stickers();
    assert_eq!(c.screen(), Screen::Capture);
}

#[test]
fn start_only_leaves_the_intro() {
    let mut c = capturing();
    assert!(!c.start());
    let before_start = SessionController::new(3, DELAY).unwrap();
    assert_eq!(before_start.screen(), Screen::Intro);
    assert!(SessionController::new(0, DELAY).is_err());
}

#[test]
fn intro_ignores_photos() {
    let mut c = SessionController::new(3, DELAY).unwrap();
    assert!(!c.on_photo_captured(still(1), Duration::ZERO));
    assert!(c.photos().is_empty());
}
