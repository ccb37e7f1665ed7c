//! Benchmarks for pulldown detection, conversion, and candidate selection.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features
//!
//! Streams are synthesized in memory; no fixtures are needed.

use std::hint::black_box;

use criterion::Criterion;
use untelecine::{
    Clip, ClipOptions, CombingReport, DecimationOptions, FieldOrder, FrameFlags, FrameRate,
    SelectionMode, convert_decimation, convert_duplication, decide_all, detect_pulldown,
    select_every,
};

/// 2:3 soft-pulldown film where every fourth block of a thousand frames is
/// hard-telecined.
fn synthetic_stream(len: usize) -> Vec<FrameFlags> {
    (0..len)
        .map(|index| {
            if (index / 1000) % 4 == 3 {
                FrameFlags::interlaced(true)
            } else {
                let marker = index % 4 == 0;
                FrameFlags::progressive(marker, marker)
            }
        })
        .collect()
}

const STREAM_LEN: usize = 108_000;

fn benchmark_detection(criterion: &mut Criterion) {
    let flags = synthetic_stream(STREAM_LEN);

    criterion.bench_function("detect pulldown (108k frames)", |bencher| {
        bencher.iter(|| detect_pulldown(black_box(&flags)));
    });
}

fn benchmark_conversion(criterion: &mut Criterion) {
    let flags = synthetic_stream(STREAM_LEN);
    let frames: Vec<usize> = (0..flags.len()).collect();

    criterion.bench_function("ceil (108k frames)", |bencher| {
        bencher.iter(|| convert_duplication(black_box(&flags), black_box(&frames)).unwrap());
    });

    criterion.bench_function("floor (108k frames)", |bencher| {
        bencher.iter(|| {
            convert_decimation(
                black_box(&flags),
                black_box(&frames),
                FrameRate::NTSC,
                Some(5),
                None,
            )
            .unwrap()
        });
    });

    criterion.bench_function("clip floor session (108k frames)", |bencher| {
        bencher.iter(|| {
            let options = ClipOptions::new().with_retime_progressive_pulldown(false);
            let mut clip =
                Clip::with_options(frames.clone(), flags.clone(), FrameRate::NTSC, &options)
                    .unwrap();
            clip.floor(&DecimationOptions::default()).unwrap();
            clip.len()
        });
    });
}

fn benchmark_selection(criterion: &mut Criterion) {
    let data: Vec<usize> = (0..STREAM_LEN).collect();

    criterion.bench_function("select_every 4 of 5 (108k)", |bencher| {
        bencher.iter(|| select_every(black_box(&data), 5, &[0, 1, 2, 3], false).unwrap());
    });

    let flags = synthetic_stream(STREAM_LEN);
    let reports: Vec<CombingReport> = flags
        .iter()
        .enumerate()
        .map(|(index, flag)| {
            CombingReport::new(Some(!flag.progressive && index % 5 == 0), FieldOrder::TopFirst)
        })
        .collect();

    criterion.bench_function("decide candidates (108k)", |bencher| {
        bencher.iter(|| {
            decide_all(black_box(&flags), black_box(&reports), SelectionMode::Recovery).unwrap()
        });
    });
}

criterion::criterion_group!(
    benches,
    benchmark_detection,
    benchmark_conversion,
    benchmark_selection,
);

criterion::criterion_main!(benches);
