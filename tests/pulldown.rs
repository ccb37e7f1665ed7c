//! Pulldown detection integration tests.

use untelecine::{FrameFlags, PulldownPattern, detect_pulldown, detect_pulldown_cycle};

fn soft_telecined(len: usize, gap: usize) -> Vec<FrameFlags> {
    (0..len)
        .map(|index| {
            let marker = index % gap == 0;
            FrameFlags::progressive(marker, marker)
        })
        .collect()
}

// ── Detection ──────────────────────────────────────────────────────

#[test]
fn no_markers_means_no_pulldown() {
    let mut flags = vec![FrameFlags::progressive(true, false); 10];
    flags.extend(vec![FrameFlags::progressive(false, true); 10]);
    flags.extend(vec![FrameFlags::interlaced(true); 10]);
    assert_eq!(detect_pulldown_cycle(&flags), (0, None));
    assert!(detect_pulldown(&flags).is_none());
}

#[test]
fn classic_three_two_pulldown() {
    let flags = soft_telecined(40, 4);
    assert_eq!(detect_pulldown_cycle(&flags), (5, Some("2:3".to_string())));
}

#[test]
fn single_marker_runs_do_not_count() {
    // Each progressive run holds only one marker.
    let mut flags = Vec::new();
    for _ in 0..5 {
        flags.push(FrameFlags::progressive(true, true));
        flags.push(FrameFlags::progressive(false, false));
        flags.push(FrameFlags::interlaced(true));
    }
    assert_eq!(detect_pulldown_cycle(&flags), (0, None));
}

#[test]
fn markers_on_interlaced_frames_are_ignored() {
    let marked_interlaced = FrameFlags {
        rff: true,
        ..FrameFlags::interlaced(true)
    };
    let flags = vec![marked_interlaced; 20];
    assert!(detect_pulldown(&flags).is_none());
}

#[test]
fn interlaced_frames_split_runs() {
    // Markers at 0 and 4 in the first run, 10 and 14 in the second; the
    // interlaced frames between them must not produce a gap of 6.
    let mut flags = soft_telecined(8, 4);
    flags.extend(vec![FrameFlags::interlaced(true); 2]);
    flags.extend(soft_telecined(8, 4));
    let pattern = detect_pulldown(&flags).expect("pulldown");
    assert_eq!(pattern.cycle(), 5);
}

#[test]
fn most_common_gap_wins_across_runs() {
    let mut flags = soft_telecined(8, 4);
    flags.push(FrameFlags::interlaced(true));
    flags.extend(soft_telecined(8, 4));
    flags.push(FrameFlags::interlaced(true));
    flags.extend(soft_telecined(12, 6));
    assert_eq!(detect_pulldown(&flags).map(|pattern| pattern.cycle()), Some(5));
}

#[test]
fn ties_go_to_the_first_seen_gap() {
    let mut flags = soft_telecined(12, 6);
    flags.push(FrameFlags::interlaced(true));
    flags.extend(soft_telecined(8, 4));
    assert_eq!(detect_pulldown(&flags).map(|pattern| pattern.cycle()), Some(7));
}

// ── Pattern labels ─────────────────────────────────────────────────

#[test]
fn pattern_labels() {
    let label = |cycle| PulldownPattern::from_cycle(cycle).map(|pattern| pattern.to_string());
    assert_eq!(label(2).as_deref(), Some("2"));
    assert_eq!(label(3).as_deref(), Some("3"));
    assert_eq!(label(4).as_deref(), Some("2:2"));
    assert_eq!(label(5).as_deref(), Some("2:3"));
    assert_eq!(label(7).as_deref(), Some("2:2:3"));
    assert_eq!(label(1), None);
}
