use criterion::{black_box, criterion_group, criterion_main, Criterion};

use zigmem_analysis::classifier::ContextClassifier;
use zigmem_analysis::tracker::{ScopeTracker, TrackerConfig};
use zigmem_core::fingerprint::issue_fingerprint;
use zigmem_rules::engine::AnalysisEngine;

// ---------------------------------------------------------------------------
// Synthetic sources
// ---------------------------------------------------------------------------

/// A plausible Zig module: functions with allocations, cleanup, comments,
/// strings, and a test block, repeated `n` times.
fn synthetic_source(n: usize) -> String {
    let unit = r#"/// Handles one request frame.
pub fn handleFrame(a: Allocator, r: Reader) ![]u8 {
    const header = try a.alloc(u8, 8);
    defer a.free(header);
    // payload length comes from the header
    const body = try a.alloc(u8, frameLen(header));
    errdefer a.free(body);
    if (r.short()) {
        return error.ShortRead;
    }
    const tag = "frame/v1";
    _ = tag;
    return body;
}

test "frame round trip" {
    var arena = std.heap.ArenaAllocator.init(std.testing.allocator);
    defer arena.deinit();
    const a = arena.allocator();
    const buf = try a.alloc(u8, 64);
    _ = buf;
}
"#;
    unit.repeat(n)
}

// ---------------------------------------------------------------------------
// Classifier benchmarks
// ---------------------------------------------------------------------------

fn bench_classifier(c: &mut Criterion) {
    let small = synthetic_source(10);
    let large = synthetic_source(500);

    c.bench_function("classifier_small_module", |b| {
        b.iter(|| ContextClassifier::analyze_source(black_box(&small)))
    });

    c.bench_function("classifier_large_module", |b| {
        b.iter(|| ContextClassifier::analyze_source(black_box(&large)))
    });
}

// ---------------------------------------------------------------------------
// Tracker benchmarks
// ---------------------------------------------------------------------------

fn bench_tracker(c: &mut Criterion) {
    let small = synthetic_source(10);
    let large = synthetic_source(500);

    c.bench_function("tracker_small_module", |b| {
        b.iter(|| ScopeTracker::analyze_source(black_box(&small)))
    });

    c.bench_function("tracker_large_module", |b| {
        b.iter(|| ScopeTracker::analyze_source(black_box(&large)))
    });

    c.bench_function("tracker_large_module_lazy", |b| {
        b.iter(|| {
            let mut t = ScopeTracker::new(TrackerConfig::default().with_lazy(100));
            t.analyze(black_box(&large));
            t
        })
    });

    // instance reuse between files is the expected calling pattern
    c.bench_function("tracker_reuse_across_files", |b| {
        let mut t = ScopeTracker::new(TrackerConfig::default());
        b.iter(|| {
            t.analyze(black_box(&small));
            t.scopes().len()
        })
    });
}

// ---------------------------------------------------------------------------
// Full-engine and fingerprint benchmarks
// ---------------------------------------------------------------------------

fn bench_engine(c: &mut Criterion) {
    let source = synthetic_source(100);
    let engine = AnalysisEngine::new();

    c.bench_function("engine_analyze_module", |b| {
        b.iter(|| engine.analyze_source(black_box("bench.zig"), black_box(&source)))
    });

    c.bench_function("issue_fingerprint", |b| {
        b.iter(|| {
            issue_fingerprint(
                black_box("M001"),
                black_box("src/server/handler.zig"),
                black_box(1024),
                black_box("response_buf"),
            )
        })
    });
}

criterion_group!(benches, bench_classifier, bench_tracker, bench_engine);
criterion_main!(benches);
