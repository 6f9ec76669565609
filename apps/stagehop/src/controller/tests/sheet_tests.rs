use super::*;

const CLOSED: f32 = 420.0;

fn settled_open() -> SheetController {
    let (mut sheet, intro) = SheetController::mount(CLOSED, SheetThresholds::default());
    assert!(sheet.complete(intro.id));
    sheet
}

#[test]
fn transition_table() {
    let thresholds = SheetThresholds::default();
    let table = [
        (SheetEvent::BackgroundTap { has_selection: true }, Some(SheetPosition::Open)),
        (SheetEvent::BackgroundTap { has_selection: false }, None),
        (SheetEvent::EventSelected, Some(SheetPosition::Closed)),
        (
            SheetEvent::HandlebarReleased(DragRelease::new(150.0, 300.0)),
            Some(SheetPosition::Closed),
        ),
        (
            SheetEvent::HandlebarReleased(DragRelease::new(101.0, 150.0)),
            Some(SheetPosition::Open),
        ),
        (
            SheetEvent::PopupReleased(DragRelease::new(60.0, 250.0)),
            Some(SheetPosition::Open),
        ),
        (SheetEvent::PopupReleased(DragRelease::new(40.0, 250.0)), None),
    ];
    for (event, expected) in table {
        assert_eq!(next_position(event, &thresholds), expected, "{event:?}");
    }
}

#[test]
fn closed_offset_tracks_viewport() {
    assert!((closed_offset_for_viewport(800.0) - 420.0).abs() < 1e-3);
    assert!((closed_offset_for_viewport(1000.0) - 500.0).abs() < 1e-3);
}

#[test]
fn mount_starts_hidden_with_intro() {
    let (sheet, intro) = SheetController::mount(CLOSED, SheetThresholds::default());
    assert_eq!(sheet.position(), SheetPosition::Closed);
    assert_eq!(sheet.offset(), CLOSED);
    assert_eq!(intro.target, SheetPosition::Open);
    assert_eq!(intro.from, CLOSED);
    assert_eq!(intro.to, 0.0);
    assert_eq!(intro.duration, SHEET_INTRO);
    assert!(sheet.is_animating());
}

#[test]
fn position_only_changes_on_completion() {
    let mut sheet = settled_open();
    let closing = sheet.handle(SheetEvent::EventSelected).expect("transition");
    assert_eq!(closing.duration, SHEET_TRANSITION);

    sheet.set_offset(closing.sample(Duration::from_millis(150)));
    assert_eq!(sheet.position(), SheetPosition::Open);

    assert!(sheet.complete(closing.id));
    assert_eq!(sheet.position(), SheetPosition::Closed);
    assert_eq!(sheet.offset(), CLOSED);
    assert!(!sheet.is_animating());
}

#[test]
fn new_transition_preempts_the_running_one() {
    let mut sheet = settled_open();
    let closing = sheet.handle(SheetEvent::EventSelected).expect("close");
    sheet.set_offset(closing.sample(Duration::from_millis(150)));
    let midway = sheet.offset();

    let reopening = sheet
        .handle(SheetEvent::BackgroundTap { has_selection: true })
        .expect("open");
    assert_eq!(reopening.from, midway);
    assert_eq!(reopening.target, SheetPosition::Open);

    assert!(!sheet.complete(closing.id));
    assert_eq!(sheet.position(), SheetPosition::Open);
    assert!(sheet.complete(reopening.id));
    assert_eq!(sheet.position(), SheetPosition::Open);
    assert_eq!(sheet.offset(), 0.0);
}

#[test]
fn ignored_event_keeps_the_animation() {
    let mut sheet = settled_open();
    let closing = sheet.handle(SheetEvent::EventSelected).expect("close");
    assert!(sheet
        .handle(SheetEvent::PopupReleased(DragRelease::new(10.0, 10.0)))
        .is_none());
    assert_eq!(sheet.in_flight().map(|a| a.id), Some(closing.id));
}

#[test]
fn samples_stay_on_the_segment() {
    let animation = SheetAnimation {
        id: AnimationId(1),
        from: CLOSED,
        to: 0.0,
        target: SheetPosition::Open,
        duration: SHEET_TRANSITION,
    };
    assert_eq!(animation.sample(Duration::ZERO), CLOSED);
    assert_eq!(animation.sample(Duration::from_secs(5)), 0.0);
    let mut previous = CLOSED;
    for ms in (0..=300).step_by(25) {
        let offset = animation.sample(Duration::from_millis(ms));
        assert!((0.0..=CLOSED).contains(&offset));
        assert!(offset <= previous);
        previous = offset;
    }
}

#[test]
fn driver_offsets_are_clamped() {
    let mut sheet = settled_open();
    sheet.set_offset(-40.0);
    assert_eq!(sheet.offset(), 0.0);
    sheet.set_offset(CLOSED + 40.0);
    assert_eq!(sheet.offset(), CLOSED);
}

#[test]
fn degenerate_closed_offset_collapses_to_zero() {
    for offset in [closed_offset_for_viewport(-500.0), f32::NAN] {
        let (mut sheet, intro) = SheetController::mount(offset, SheetThresholds::default());
        assert_eq!(sheet.offset_of(SheetPosition::Closed), 0.0);
        sheet.set_offset(intro.sample(Duration::from_millis(100)));
        assert_eq!(sheet.offset(), 0.0);
        assert!(sheet.complete(intro.id));
        assert_eq!(sheet.position(), SheetPosition::Open);
    }
}
