use super::*;
use crate::foundation::core::PixelSize;
use crate::media::device::{NoDevice, TestPatternDevice};
use crate::media::stream::MediaSourceAdapter;

fn engine() -> CaptureEngine {
    CaptureEngine::new(FilterRegistry::default(), 3).unwrap()
}

fn stream() -> LiveStream {
    let mut dev = TestPatternDevice::new(PixelSize::new(64, 48).unwrap());
    MediaSourceAdapter::acquire(&mut dev).unwrap()
}

#[test]
fn full_countdown_captures_at_native_resolution() {
    let mut eng = engine();
    let mut live = stream();
    assert!(eng.start_capture());
    assert_eq!(eng.state(), CaptureState::CountingDown(3));
    assert_eq!(eng.tick(Some(&mut live)), TickOutcome::Counting(2));
    assert_eq!(eng.tick(Some(&mut live)), TickOutcome::Counting(1));
    let TickOutcome::Captured(still) = eng.tick(Some(&mut live)) else {
        panic!("expected a capture");
    };
    assert_eq!(still.size(), PixelSize::new(64, 48).unwrap());
    assert_eq!(eng.state(), CaptureState::Idle);
    assert_eq!(eng.session().countdown_remaining, 0);
    assert_eq!(eng.tick(Some(&mut live)), TickOutcome::Idle);
}

#[test]
fn start_while_counting_does_not_reset() {
    let mut eng = engine();
    assert!(eng.start_capture());
    eng.tick(None);
    assert!(!eng.start_capture());
    assert_eq!(eng.session().countdown_remaining, 2);
}

#[test]
fn captured_still_carries_the_preview_expression() {
    let mut eng = engine();
    let mut live = stream();
    for i in 0..eng.registry().len() {
        eng.select_filter(i).unwrap();
        let preview = eng.preview_expression().to_owned();
        eng.start_capture();
        let outcome = (0..3).map(|_| eng.tick(Some(&mut live))).last().unwrap();
        let TickOutcome::Captured(still) = outcome else {
            panic!("expected a capture for filter {i}");
        };
        assert_eq!(still.filter_expression(), preview);
        assert_eq!(preview, eng.registry().get(i).unwrap().expression);
    }
}

#[test]
fn filter_is_baked_into_pixels() {
    let mut eng = engine();
    let mut live = stream();
    eng.select_filter(eng.registry().position("Mono").unwrap())
        .unwrap();
    let still = eng.capture_frame(live.latest_frame()).unwrap();
    let img = still.decode().unwrap();
    for px in img.pixels() {
        assert!(px.0[0].abs_diff(px.0[1]) <= 1 && px.0[1].abs_diff(px.0[2]) <= 1);
    }
}

#[test]
fn select_filter_out_of_range_keeps_selection() {
    let mut eng = engine();
    eng.select_filter(2).unwrap();
    let err = eng.select_filter(7).unwrap_err();
    assert!(matches!(err, BoothError::IndexOutOfRange { index: 7, len: 7 }));
    assert_eq!(eng.session().active_filter_index, 2);
    assert_eq!(eng.active_filter().unwrap().name, "Sepia");
}

#[test]
fn missing_frame_aborts_back_to_idle() {
    let mut eng = engine();
    eng.start_capture();
    eng.tick(None);
    eng.tick(None);
    assert_eq!(eng.tick(None), TickOutcome::Aborted);
    assert_eq!(eng.state(), CaptureState::Idle);

    let mut dev = NoDevice::default();
    assert!(MediaSourceAdapter::acquire(&mut dev).is_err());
    let err = eng.capture_frame(None).unwrap_err();
    assert!(matches!(err, BoothError::CaptureAborted(_)));
}

#[test]
fn teardown_cancels_a_pending_tick() {
    let mut eng = engine();
    let mut live = stream();
    eng.start_capture();
    let token = eng.countdown_token().unwrap();
    eng.teardown();
    assert!(token.is_cancelled());
    assert_eq!(eng.state(), CaptureState::Idle);
    assert_eq!(eng.tick(Some(&mut live)), TickOutcome::Idle);
    assert!(eng.countdown_token().is_none());
}

#[test]
fn zero_second_countdown_is_rejected() {
    assert!(CaptureEngine::new(FilterRegistry::default(), 0).is_err());
}
