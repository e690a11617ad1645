use super::*;

#[test]
fn counts_down_then_fires_once() {
    let mut cd = Countdown::start(3);
    assert_eq!(cd.remaining(), 3);
    assert_eq!(cd.tick(), CountdownStep::Remaining(2));
    assert_eq!(cd.tick(), CountdownStep::Remaining(1));
    assert_eq!(cd.tick(), CountdownStep::Fire);
    assert_eq!(cd.remaining(), 0);
    assert_eq!(cd.tick(), CountdownStep::Cancelled);
}

#[test]
fn cancel_is_visible_through_clones() {
    let mut cd = Countdown::start(3);
    let token = cd.token();
    assert!(!token.is_cancelled());
    cd.cancel();
    assert!(token.is_cancelled());
    assert_eq!(cd.tick(), CountdownStep::Cancelled);
}

#[test]
fn dropping_releases_the_token() {
    let token = {
        let cd = Countdown::start(2);
        cd.token()
    };
    assert!(token.is_cancelled());
}

#[test]
fn zero_start_fires_on_first_tick() {
    let mut cd = Countdown::start(0);
    assert_eq!(cd.tick(), CountdownStep::Fire);
}
