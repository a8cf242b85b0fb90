use acmiview_acmi::attributes::{Attributes, TransformUpdate};
use acmiview_acmi::AcmiImporter;
use acmiview_track::{offset_by, Timestamp};
use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const ENTITY_LINE: &str = "A0102,T=120.0123|60.0456|8123.5|1.2|270.5|-3.4,Name=AIM-120C,Type=Weapon+Missile,Color=Blue,Coalition=Allies";

/// A recording with `entities` objects updated once per second for `frames` seconds.
fn synthetic_recording(entities: usize, frames: usize) -> String {
    let mut text = String::from(
        "FileType=text/acmi/tacview\nFileVersion=2.1\n0,ReferenceTime=2020-01-01T00:00:00Z\n",
    );
    for frame in 0..frames {
        text.push_str(&format!("#{frame}\n"));
        for id in 0..entities {
            let lon = 120.0 + id as f64 * 0.01 + frame as f64 * 0.0005;
            let lat = 60.0 + id as f64 * 0.005;
            if frame == 0 {
                text.push_str(&format!(
                    "{id:x},Name=Unit {id},Type=Air+FixedWing,Color=Red,T={lon}|{lat}|9000|0|90|0\n"
                ));
            } else {
                text.push_str(&format!("{id:x},T={lon}|{lat}|9000\n"));
            }
        }
    }
    text
}

fn bench_attributes(c: &mut Criterion) {
    let mut group = c.benchmark_group("attributes");

    let (_, list) = ENTITY_LINE.split_once(',').unwrap();
    group.bench_function("split_list", |b| {
        b.iter(|| Attributes::parse(black_box(list)))
    });

    group.bench_function("transform", |b| {
        b.iter(|| TransformUpdate::parse(black_box("120.0123|60.0456|8123.5|1.2|270.5|-3.4")))
    });

    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");
    let importer = AcmiImporter::default();

    for (entities, frames) in [(10, 60), (50, 600)] {
        let text = synthetic_recording(entities, frames);
        group.bench_with_input(
            BenchmarkId::new("recording", format!("{entities}x{frames}")),
            &text,
            |b, text| b.iter(|| importer.import(black_box(text))),
        );
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    let replay = AcmiImporter::default()
        .import(&synthetic_recording(50, 600))
        .unwrap();
    let t0: Timestamp = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let mid = offset_by(t0, 300.5).unwrap();

    group.bench_function("entities_at", |b| {
        b.iter(|| replay.registry.entities_at(black_box(mid)).len())
    });

    group.bench_function("trail_30s", |b| {
        let trajectory = replay.registry.get("0").unwrap().trajectory();
        b.iter(|| trajectory.trail(black_box(mid), 30.0))
    });

    group.finish();
}

criterion_group!(benches, bench_attributes, bench_import, bench_queries);
criterion_main!(benches);
