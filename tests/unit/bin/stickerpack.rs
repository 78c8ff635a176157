use super::*;

#[test]
fn percent_survives_untrusted_progress() {
    assert_eq!(percent(1, 4), 25);
    assert_eq!(percent(3, 3), 100);
    assert_eq!(percent(u64::MAX, u64::MAX), 100);
    assert_eq!(percent(u64::MAX, 3), 100);
    assert_eq!(percent(u64::MAX / 2, u64::MAX), 49);
    assert_eq!(percent(5, 0), 0);
}

#[test]
fn terminal_observer_accepts_extreme_progress() {
    TerminalObserver.on_event(&PipelineEvent::RemovalProgress {
        name: "a.png".to_string(),
        stage: "fetch:model".to_string(),
        current: u64::MAX,
        total: 7,
    });
}
