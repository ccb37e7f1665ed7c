//! Error handling integration tests.
//!
//! These tests verify that meaningful errors are returned for various
//! failure conditions, and that a failed operation leaves nothing half-done.

use untelecine::{
    Clip, DecimationOptions, ErrorKind, FrameFlags, FrameRate, UntelecineError, convert_decimation,
    select_every,
};

#[test]
fn invalid_offsets_are_invalid_arguments() {
    let error = select_every(&[1, 2, 3], 2, &[2], false).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidArgument);

    let error_message = error.to_string();
    assert!(
        error_message.contains("out of range"),
        "Error message should mention the range: {error_message}",
    );
}

#[test]
fn too_many_offsets_message() {
    let flags = vec![FrameFlags::interlaced(true); 10];
    let frames: Vec<usize> = (0..10).collect();
    let mut clip = Clip::new(frames, flags, FrameRate::NTSC).expect("aligned");
    let options = DecimationOptions::new().with_cycle(4).with_offsets(vec![0, 1, 2, 3]);

    let error = clip.floor(&options).unwrap_err();
    assert!(error.is_invalid_argument());
    assert_eq!(
        error.to_string(),
        "Invalid offsets: 4 offsets cannot be used with a cycle of 4"
    );
    assert_eq!(clip.len(), 10, "A rejected floor must not change the clip");
}

#[test]
fn misaligned_frames_message() {
    let error = Clip::new(vec![0usize; 2], vec![FrameFlags::default(); 3], FrameRate::PAL)
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "Length mismatch for frames: expected 3 entries, got 2"
    );
}

#[test]
fn invalid_frame_rates() {
    assert!(FrameRate::new(0, 1).is_err());
    assert!(FrameRate::new(1, 0).is_err());
    assert!("30000/0".parse::<FrameRate>().is_err());
    assert!("fast".parse::<FrameRate>().is_err());
    assert_eq!("25".parse::<FrameRate>().expect("rate"), FrameRate::PAL);
    assert_eq!("60000/2002".parse::<FrameRate>().expect("rate"), FrameRate::NTSC);
}

#[test]
fn decimating_by_one_cycle_is_rejected() {
    let error = FrameRate::NTSC.decimated(1).unwrap_err();
    assert!(matches!(error, UntelecineError::InvalidFrameRate(_)));
    let error = FrameRate::NTSC.decimated(0).unwrap_err();
    assert!(matches!(error, UntelecineError::InvalidCycle(0)));
}

#[test]
fn errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<UntelecineError>();
}

#[test]
fn oversized_cycle_is_rejected_without_panicking() {
    let flags = vec![FrameFlags::interlaced(true); 10];
    let frames: Vec<usize> = (0..10).collect();

    let error = convert_decimation(&flags, &frames, FrameRate::NTSC, Some(usize::MAX / 1000), Some(&[0]))
        .unwrap_err();
    assert!(error.is_invalid_argument());
    assert!(
        error.to_string().contains("longer than the 10 frames"),
        "Error message should mention the frame count: {error}",
    );

    let mut clip = Clip::new(frames, flags, FrameRate::NTSC).expect("aligned");
    let error = clip
        .floor(&DecimationOptions::new().with_cycle(usize::MAX))
        .unwrap_err();
    assert!(matches!(error, UntelecineError::CycleTooLong { cycle: usize::MAX, frames: 10 }));
    assert_eq!(clip.len(), 10, "A rejected floor must not change the clip");
}

#[test]
fn retimed_rate_overflow_is_an_error() {
    let huge = FrameRate::new(u64::MAX, 1).expect("rate");
    assert!(matches!(huge.decimated(7), Err(UntelecineError::InvalidFrameRate(_))));
    assert!(matches!(huge.multiplied(2), Err(UntelecineError::InvalidFrameRate(_))));

    let mut flags = vec![FrameFlags::progressive(true, true)];
    flags.extend(vec![FrameFlags::progressive(false, false); 5]);
    flags.extend(vec![FrameFlags::interlaced(true); 14]);
    let frames: Vec<usize> = (0..flags.len()).collect();
    let mut clip = Clip::new(frames, flags, huge).expect("aligned");
    let error = clip
        .floor(&DecimationOptions::new().with_cycle(7))
        .unwrap_err();
    assert!(matches!(error, UntelecineError::InvalidFrameRate(_)));
    assert_eq!(clip.len(), 20);
    assert_eq!(clip.frame_rate(), huge);
}
