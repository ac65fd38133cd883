use buoydata::dataset::merger::merge_unlocated;
use buoydata::records::normalizer::RecordNormalizer;
use buoydata::records::raw_table::RawTable;
use buoydata::{Cadence, StationSeries, YearObservationBatch};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::BTreeMap;
use std::fmt::Write;

/// A year of ten-minute readings in the modern two-header-row layout.
fn synthetic_archive(year: i32) -> String {
    let mut text = String::from(
        "#YY  MM DD hh mm WDIR WSPD GST  PRES  ATMP  WTMP\n#yr  mo dy hr mn degT m/s  m/s  hPa   degC  degC\n",
    );
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    for step in 0..(365 * 24 * 6) {
        let t = start + Duration::minutes(10 * step);
        let wtmp = if step % 97 == 0 { 999.0 } else { 10.0 + (step % 50) as f64 / 10.0 };
        let _ = writeln!(
            text,
            "{} 180 4.2 5.1 1013.2 12.5 {:.1}",
            t.format("%Y %m %d %H %M"),
            wtmp
        );
    }
    text
}

fn synthetic_series(station: usize, days: i64) -> StationSeries {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    // Stations start on staggered days so the union axis is wider than any one series.
    let timestamps: Vec<_> = (0..days)
        .map(|d| start + Duration::days(d + station as i64 * 3))
        .collect();
    let values = (0..days).map(|d| (d % 11 != 0).then_some(d as f64)).collect();
    let station_id = format!("st{}", station);
    let batch = YearObservationBatch {
        station_id: station_id.clone(),
        year: 2015,
        timestamps,
        variables: BTreeMap::from([("WTMP".to_string(), values)]),
    };
    StationSeries::concat(&station_id, vec![batch]).unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let text = synthetic_archive(2019);
    let normalizer = RecordNormalizer::new(Some("WTMP".to_string()));

    c.bench_function("parse_year", |b| {
        b.iter(|| RawTable::parse("bench", 2019, black_box(&text)).unwrap())
    });
    c.bench_function("normalize_year_daily", |b| {
        b.iter_batched(
            || RawTable::parse("bench", 2019, &text).unwrap(),
            |raw| normalizer.normalize(raw, black_box(Cadence::Daily)).unwrap(),
            criterion::BatchSize::LargeInput,
        )
    });

    let series: Vec<StationSeries> = (0..50).map(|s| synthetic_series(s, 5 * 365)).collect();
    c.bench_function("merge_50_stations", |b| {
        b.iter_batched(
            || series.clone(),
            |series| merge_unlocated(black_box(series)),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
