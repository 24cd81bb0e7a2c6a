use super::*;
use std::time::Duration;

#[test]
fn format_clock_pads_and_switches_to_hours() {
    assert_eq!(format_clock(None), "00:00");
    assert_eq!(format_clock(Some(Duration::ZERO)), "00:00");
    assert_eq!(format_clock(Some(Duration::from_millis(65_900))), "01:05");
    assert_eq!(format_clock(Some(Duration::from_secs(3600 + 62))), "01:01:02");
}

#[test]
fn volume_icon_has_three_tiers() {
    assert_eq!(Icon::for_volume(1.0), Icon::VolumeUp);
    assert_eq!(Icon::for_volume(0.95), Icon::VolumeUp);
    assert_eq!(Icon::for_volume(0.94), Icon::VolumeDown);
    assert_eq!(Icon::for_volume(0.01), Icon::VolumeDown);
    assert_eq!(Icon::for_volume(0.0), Icon::VolumeOff);
}

#[test]
fn renderer_forwards_only_real_changes() {
    let rec = RecordingSurface::new();
    let mut r = Renderer::new(Box::new(rec.clone()));

    assert!(r.set(Change::Elapsed("00:01".into())));
    assert!(!r.set(Change::Elapsed("00:01".into())));
    assert!(r.set(Change::Elapsed("00:02".into())));
    assert!(r.set(Change::Button(ButtonState::Pause)));
    assert!(!r.set(Change::Button(ButtonState::Pause)));

    assert_eq!(rec.changes().len(), 3);
    assert_eq!(r.view().elapsed.as_deref(), Some("00:02"));
}

#[test]
fn renderer_clamps_bar_ratios() {
    let rec = RecordingSurface::new();
    let mut r = Renderer::new(Box::new(rec.clone()));

    r.set(Change::Bar(Bar::Played, 1.7));
    assert_eq!(r.view().bar(Bar::Played), Some(1.0));
    r.set(Change::Bar(Bar::Played, f64::NAN));
    assert_eq!(r.view().bar(Bar::Played), Some(0.0));
    assert!(!r.set(Change::Bar(Bar::Played, -3.0)));
}

#[test]
fn list_accents_are_tracked_per_index() {
    let mut r = Renderer::new(Box::new(RecordingSurface::new()));
    assert!(r.set(Change::ListAccent {
        index: 2,
        color: "#fff".into()
    }));
    assert!(!r.set(Change::ListAccent {
        index: 2,
        color: "#fff".into()
    }));
    r.truncate_list(2);
    assert!(r.view().list_accents.is_empty());
}
