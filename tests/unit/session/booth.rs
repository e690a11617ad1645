use super::*;
use crate::foundation::clock::ManualClock;
use crate::foundation::core::PixelSize;
use crate::media::device::{NoDevice, TestPatternDevice};

fn booth(stickers: bool) -> PhotoBooth<ManualClock> {
    let config = BoothConfig {
        stickers_enabled: stickers,
        ..BoothConfig::default()
    };
    PhotoBooth::new(config, ManualClock::new(), GlyphRasterizer::without_fonts()).unwrap()
}

fn camera() -> TestPatternDevice {
    TestPatternDevice::new(PixelSize::new(80, 60).unwrap())
}

#[test]
fn countdown_ticks_once_per_second() {
    let mut b = booth(false);
    b.start();
    b.open_camera(&mut camera()).unwrap();
    assert!(b.trigger_capture());
    assert!(!b.trigger_capture());
    assert!(b.poll().unwrap().is_empty());
    assert_eq!(b.wait_next().unwrap(), [BoothEvent::Countdown(2)]);
    assert_eq!(b.clock().now(), Duration::from_secs(1));
    assert_eq!(b.wait_next().unwrap(), [BoothEvent::Countdown(1)]);
    assert_eq!(b.wait_next().unwrap(), [BoothEvent::PhotoAdded(1)]);
    assert_eq!(b.clock().now(), Duration::from_secs(3));
    assert_eq!(b.next_deadline(), None);
}

#[test]
fn closing_the_camera_cancels_a_pending_capture() {
    let mut b = booth(false);
    b.start();
    b.open_camera(&mut camera()).unwrap();
    b.trigger_capture();
    b.close_camera();
    assert!(!b.has_camera());
    assert_eq!(b.next_deadline(), None);
    b.clock().advance(Duration::from_secs(10));
    assert!(b.poll().unwrap().is_empty());
    assert!(b.photos().is_empty());
}

#[test]
fn missing_camera_aborts_the_capture() {
    let mut b = booth(false);
    b.start();
    assert!(b.open_camera(&mut NoDevice::default()).is_err());
    assert!(b.trigger_capture());
    let mut events = Vec::new();
    while b.next_deadline().is_some() {
        events.extend(b.wait_next().unwrap());
    }
    assert_eq!(events.last(), Some(&BoothEvent::CaptureAborted));
    assert!(b.photos().is_empty());
    assert_eq!(b.screen(), Screen::Capture);
}

#[test]
fn sticker_step_bakes_before_collecting() {
    let mut b = booth(true);
    b.start();
    b.open_camera(&mut camera()).unwrap();
    b.trigger_capture();
    let mut events = Vec::new();
    while b.next_deadline().is_some() {
        events.extend(b.wait_next().unwrap());
    }
    assert_eq!(events.last(), Some(&BoothEvent::EditingStickers));
    assert_eq!(b.screen(), Screen::Stickers);
    assert!(!b.trigger_capture());
    b.editor_mut().unwrap().place("🌸", 20.0, 20.0).unwrap();
    assert_eq!(b.finish_stickers().unwrap(), Some(BoothEvent::PhotoAdded(1)));
    assert_eq!(b.screen(), Screen::Capture);
    assert_eq!(b.photos()[0].size(), PixelSize::new(80, 60).unwrap());
}

#[test]
fn headless_run_reaches_the_strip_and_releases_the_camera() {
    let mut b = booth(true);
    let mut placed = 0;
    let strip = run_headless(&mut b, &mut camera(), |ed| {
        ed.place("⭐", 10.0, 10.0)?;
        placed += 1;
        Ok(())
    })
    .unwrap();
    assert_eq!(placed, 3);
    assert_eq!(b.screen(), Screen::Strip);
    assert!(!b.has_camera());
    assert_eq!(strip.photo_count(), 3);
    assert_eq!(strip.size(), PixelSize::new(400, 1040).unwrap());
    // three 3-second countdowns plus the transition delay
    assert_eq!(b.clock().now(), Duration::from_secs(10));
}

#[test]
fn retake_clears_photos() {
    let mut b = booth(false);
    run_headless(&mut b, &mut camera(), |_| Ok(())).unwrap();
    assert_eq!(b.photos().len(), 3);
    assert_eq!(b.retake(), BoothEvent::ScreenChanged(Screen::Capture));
    assert!(b.photos().is_empty());
    assert_eq!(b.screen(), Screen::Capture);
}

#[test]
fn selected_filter_reaches_every_photo() {
    let mut b = booth(false);
    b.select_filter(2).unwrap();
    assert_eq!(b.preview_expression(), "sepia(100%)");
    run_headless(&mut b, &mut camera(), |_| Ok(())).unwrap();
    assert!(b.photos().iter().all(|p| p.filter_expression() == "sepia(100%)"));
}
