use {
    criterion::{BenchmarkId, Criterion, criterion_group, criterion_main},
    std::{hint::black_box, time::Duration},
    themecap::{
        ThemeCapture,
        capture::merge::merge,
        color::{ColorValue, NativeColor},
        export::{
            json::{ExportDocument, render_json},
            table::SheetTable,
            workbook::render_workbook,
        },
        host::memory::MemoryHost,
        models::{
            ResourceDescriptor, ResourceKey, Snapshot, SnapshotEntry, SourceCategory, ThemeName,
        },
    },
};

const THEMES: [&str; 3] = ["light", "dark", "blue"];
const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn descriptor(source: SourceCategory, i: usize) -> ResourceDescriptor {
    let name = format!("Resource{}", i);

    if source.has_stable_key() {
        ResourceDescriptor::keyed(source, &name, ResourceKey::new(format!("Env.{}", name)))
    } else {
        ResourceDescriptor::named(source, name)
    }
}

/// one snapshot per theme, named sources missing every tenth resource under every other theme
fn snapshots(source: SourceCategory, size: usize) -> Vec<Snapshot> {
    THEMES
        .iter()
        .enumerate()
        .map(|(t, theme)| {
            let entries = (0..size)
                .filter(|i| source.has_stable_key() || t % 2 == 0 || i % 10 != 0)
                .map(|i| {
                    let rgb = (i as u32).wrapping_mul(2_654_435_761) >> 8;

                    SnapshotEntry {
                        descriptor: descriptor(source, i),
                        color: ColorValue::from_packed_argb(0xFF00_0000 | rgb),
                    }
                })
                .collect();

            Snapshot::new(ThemeName::from(*theme), source, entries)
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in SIZES {
        let positional = snapshots(SourceCategory::EnvironmentColor, size);
        let keyed = snapshots(SourceCategory::Brush, size);

        group.bench_with_input(BenchmarkId::new("positional", size), &positional, |b, s| {
            b.iter(|| merge(SourceCategory::EnvironmentColor, black_box(s)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("keyed", size), &keyed, |b, s| {
            b.iter(|| merge(SourceCategory::Brush, black_box(s)).unwrap())
        });
    }

    group.finish();
}

fn memory_host(size: usize) -> MemoryHost {
    let mut host = MemoryHost::new("user");

    for source in SourceCategory::ALL {
        for i in 0..size {
            let descriptor = descriptor(source, i);

            for theme in THEMES {
                host = host.with_color(
                    theme,
                    source,
                    descriptor.identity(),
                    NativeColor::Packed(0xFF00_0000 | i as u32),
                );
            }

            host = host.with_resource(descriptor);
        }
    }

    host
}

fn bench_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture");
    let rt = tokio::runtime::Runtime::new().unwrap();

    for size in [100, 1_000] {
        let mut capture = ThemeCapture::new(memory_host(size), THEMES);

        group.bench_function(BenchmarkId::new("memory_host", size), |b| {
            b.iter(|| rt.block_on(capture.run()).unwrap())
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dataset = rt
        .block_on(ThemeCapture::new(memory_host(1_000), THEMES).run())
        .unwrap();

    group.bench_function("workbook", |b| {
        b.iter(|| {
            let tables: Vec<SheetTable> = dataset
                .sources
                .iter()
                .map(|s| SheetTable::build(s.source, &dataset.themes, &s.records))
                .collect();

            render_workbook(black_box(&tables)).unwrap()
        })
    });

    group.bench_function("json", |b| {
        b.iter(|| render_json(&ExportDocument::from_dataset(black_box(&dataset)), false).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_merge, bench_capture);

criterion_group! {
    name = export_bench;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(20);
    targets = bench_export
}

criterion_main!(benches, export_bench);
