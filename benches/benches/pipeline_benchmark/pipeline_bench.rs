use std::{hint::black_box, io};

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use gpstel_core::{
    FileStitcher, FourCc, KeyedRecord, PayloadWindow, RecordValues, StitchConfig, TelemetryDump,
    ValueType,
};

/// Час записи: 3600 payload по 18 выборок `GPS5`.
fn hour_of_telemetry() -> TelemetryDump {
    let mut dump = TelemetryDump::new(3600.0);

    for p in 0..3600u32 {
        let values = (0..18)
            .flat_map(|i| {
                [
                    475_000_000.0 + i as f64,
                    85_000_000.0 + i as f64,
                    512_000.0,
                    1_500.0,
                    1_600.0,
                ]
            })
            .collect();
        let gps5 = KeyedRecord::new(FourCc::GPS5, ValueType::Int32, RecordValues::Numbers(values))
            .with_elements(5)
            .with_scale(vec![10_000_000.0, 10_000_000.0, 1_000.0, 1_000.0, 100.0]);

        let utc = format!("210615{:02}{:02}{:02}.000", p / 3600, (p / 60) % 60, p % 60);

        dump.push_payload(
            PayloadWindow::new(p as f64, p as f64 + 1.0),
            &[
                KeyedRecord::utc(&utc),
                KeyedRecord::fix(3),
                KeyedRecord::precision(156),
                gps5,
            ],
        );
    }

    dump
}

fn bench_process_file(c: &mut Criterion) {
    let dump = hour_of_telemetry();

    let mut group = c.benchmark_group("stitcher");
    group.throughput(Throughput::Elements(3600 * 18));
    group.sample_size(20);

    group.bench_function("process_file_1h", |b| {
        b.iter(|| {
            let mut stitcher = FileStitcher::new(io::sink(), StitchConfig::default());
            black_box(stitcher.process_file(black_box(&dump)).unwrap());
        })
    });

    group.finish();
}

criterion_group!(benches, bench_process_file);
criterion_main!(benches);
