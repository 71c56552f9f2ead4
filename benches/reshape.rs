use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use metrics_visualiser::dashboard::{self, PlotMode, RenderRequest};
use metrics_visualiser::metrics::{MetricTable, SourceKind, melt, parse_metric_log};

const EPOCH_COUNT: usize = 2_000;
const METRICS: [&str; 4] = ["loss", "accuracy", "precision", "recall"];

fn metric_log(offset: f64) -> Vec<u8> {
    let mut doc = serde_json::Map::new();
    for epoch in 0..EPOCH_COUNT {
        let values: serde_json::Map<String, serde_json::Value> = METRICS
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let value = offset + 1.0 / (epoch as f64 + idx as f64 + 1.0);
                (name.to_string(), serde_json::json!(value))
            })
            .collect();
        doc.insert(epoch.to_string(), serde_json::Value::Object(values));
    }
    serde_json::to_vec(&doc).expect("serialize log")
}

fn bench_melt(c: &mut Criterion) {
    let training = parse_metric_log(&metric_log(0.0)).expect("parse training");
    let testing = parse_metric_log(&metric_log(0.1)).expect("parse testing");
    let table = MetricTable::union([
        MetricTable::from_log(training, SourceKind::Training).expect("training table"),
        MetricTable::from_log(testing, SourceKind::Testing).expect("testing table"),
    ]);
    let metrics: Vec<String> = METRICS.iter().map(|name| name.to_string()).collect();
    c.bench_with_input(
        BenchmarkId::new("melt", EPOCH_COUNT),
        &metrics,
        |b, metrics| {
            b.iter(|| melt(black_box(&table), black_box(metrics)).expect("melt"));
        },
    );
}

fn bench_render(c: &mut Criterion) {
    let training = metric_log(0.0);
    let testing = metric_log(0.1);
    for mode in PlotMode::ALL {
        c.bench_function(&format!("render_{}", mode.label().to_lowercase()), |b| {
            b.iter(|| {
                let request = RenderRequest::new(mode)
                    .with_source(SourceKind::Training, black_box(&training))
                    .with_source(SourceKind::Testing, black_box(&testing));
                dashboard::render(&request)
            });
        });
    }
}

criterion_group!(benches, bench_melt, bench_render);
criterion_main!(benches);
