//! D2V index integration tests.

use untelecine::{Clip, D2vIndex, DecimationOptions, FrameRate, UntelecineError};

/// Two VOBs: a soft-telecined film GOP pair, then a hard-telecined GOP.
const PROJECT: &str = "DGIndexProjectFile16
2
D:\\VIDEO_TS\\VTS_01_1.VOB
D:\\VIDEO_TS\\VTS_01_2.VOB

Stream_Type=1
MPEG_Type=2
iDCT_Algorithm=6 (1:MMX 2:SSEMMX 3:SSE2MMX 4:FPU 5:REF 6:Skal SSE 7:Simple MMX)
YUVRGB_Scale=1
Luminance_Filter=0,0
Clipping=0,0,0,0
Aspect_Ratio=16:9
Picture_Size=720x480
Field_Operation=0
Frame_Rate=29970 (30000/1001)
Location=0,0,1,3a2

900 5 0 0 0 1 1 d3 f0 e2 f1 e3 f0 e2 f1
900 5 0 4096 0 1 1 d3 f0 e2 f1
900 5 0 8192 0 2 1 92 b2 a2 b2 a2 b2 a2 b2 a2 b2 ff

FINISHED  100.00% VIDEO
";

fn write_project(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("VTS_01.d2v");
    std::fs::write(&path, contents).expect("Failed to write project");
    (directory, path)
}

#[test]
fn open_reads_header_settings_and_entries() {
    let (_directory, path) = write_project(PROJECT);
    let index = D2vIndex::open(&path).expect("valid project");

    assert_eq!(index.version, 16);
    assert_eq!(index.videos.len(), 2);
    assert_eq!(index.entries.len(), 3);
    assert_eq!(index.frame_count(), 22);
    assert_eq!(index.path.as_deref(), Some(path.as_path()));
    assert_eq!(index.setting("Field_Operation"), Some("0"));
    assert_eq!(index.setting("iDCT_Algorithm"), Some("6"));
    assert_eq!(index.frame_rate().expect("rate"), FrameRate::NTSC);
    assert_eq!(index.aspect_ratio(), Some("16:9"));
    assert_eq!(index.picture_size(), Some((720, 480)));
}

#[test]
fn flags_follow_vob_and_cell() {
    let index = D2vIndex::parse(PROJECT).expect("valid project");
    let flags = index.flags();
    assert_eq!(flags.len(), 22);
    assert!(flags[..12].iter().all(|flag| flag.progressive && flag.vob == 1));
    assert!(flags[12..].iter().all(|flag| !flag.progressive && flag.vob == 2 && flag.tff));
    assert!(flags[0].rff && flags[0].tff);
    assert!(flags[4].rff && flags[4].tff);
    assert!(flags[3].rff && !flags[3].tff);
}

#[test]
fn clip_from_index() {
    let index = D2vIndex::parse(PROJECT).expect("valid project");
    let frames: Vec<usize> = (0..index.frame_count()).collect();
    let mut clip = Clip::from_d2v(&index, frames).expect("aligned");

    assert!(clip.is_variable_frame_rate());
    assert_eq!(clip.pulldown().map(|pattern| pattern.cycle()), Some(5));

    let summary = clip.summary();
    assert_eq!(summary.dar.as_deref(), Some("16:9"));
    assert_eq!(summary.sar.as_deref(), Some("3:2"));
    assert_eq!(summary.vob_ranges.len(), 2);
    assert_eq!(summary.vob_ranges[1].frames, 12..22);

    clip.floor(&DecimationOptions::default()).expect("valid options");
    assert_eq!(clip.len(), 20);
    assert_eq!(clip.frame_rate(), FrameRate::NTSC_FILM);
}

#[test]
fn missing_file_reports_path() {
    let error = D2vIndex::open("does_not_exist.d2v").unwrap_err();
    assert!(matches!(error, UntelecineError::IndexOpen { .. }));
    assert!(error.to_string().contains("does_not_exist.d2v"));
}

#[test]
fn truncated_file_list_is_a_parse_error() {
    let error = D2vIndex::parse("DGIndexProjectFile16\n3\na.vob\n").unwrap_err();
    assert!(matches!(error, UntelecineError::IndexParse { line: 2, .. }));
}

#[test]
fn short_data_line_is_a_parse_error() {
    let text = PROJECT.replace("900 5 0 4096 0 1 1 d3 f0 e2 f1", "900 5 0 4096");
    let error = D2vIndex::parse(&text).unwrap_err();
    assert!(matches!(error, UntelecineError::IndexParse { line: 19, .. }));
}

#[test]
fn missing_frame_rate() {
    let text = PROJECT.replace("Frame_Rate=29970 (30000/1001)\n", "");
    let index = D2vIndex::parse(&text).expect("valid project");
    assert!(matches!(
        index.frame_rate().unwrap_err(),
        UntelecineError::InvalidFrameRate(_)
    ));
}

#[test]
fn finished_line_is_optional() {
    let text = PROJECT.replace("\nFINISHED  100.00% VIDEO\n", "");
    let index = D2vIndex::parse(&text).expect("valid project");
    assert_eq!(index.frame_count(), 22);
}
