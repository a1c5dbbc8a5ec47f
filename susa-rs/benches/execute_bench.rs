use criterion::{black_box, criterion_group, criterion_main, Criterion};
use susa::script::{Interpreter, Limits};
use susa::{detect_features, execute};

fn make_loop(count: usize) -> String {
    format!(
        "let total = 0\nLOOP i = 0 FOR {count} TIMES:\nSTART:\nIF i > 10:\nSTART:\ntotal = total - i\nEND:\nELSE:\nSTART:\nPRINT \"small \" + i\nEND:\nEND:\nPRINT total"
    )
}

fn make_calls(count: usize) -> String {
    let mut src = String::from("FUNC add(a, b):\nSTART:\nRETURN a - b\nEND:\n");
    for i in 0..count {
        src.push_str(&format!("let r{i} = add({i}, 1)\n"));
    }
    src
}

fn bench_execute(c: &mut Criterion) {
    let loop_small = make_loop(100);
    let loop_large = make_loop(10_000);
    let calls = make_calls(500);

    let mut g = c.benchmark_group("execute");

    g.bench_function("loop_100", |b| b.iter(|| execute(black_box(&loop_small))));
    g.bench_function("loop_10k", |b| b.iter(|| execute(black_box(&loop_large))));
    g.bench_function("calls_500", |b| b.iter(|| execute(black_box(&calls))));

    // Reusing one interpreter avoids reallocating its tables.
    let mut interp = Interpreter::with_limits(Limits::default());
    g.bench_function("calls_500_reused", |b| b.iter(|| interp.execute(black_box(&calls))));

    g.finish();
}

fn bench_detect(c: &mut Criterion) {
    let plain = make_loop(1000);
    let advanced = format!("{plain}\nUSE PYTHON:\nprint(1)");

    let mut g = c.benchmark_group("detect_features");
    g.bench_function("plain", |b| b.iter(|| detect_features(black_box(&plain))));
    g.bench_function("advanced", |b| b.iter(|| detect_features(black_box(&advanced))));
    g.finish();
}

criterion_group!(benches, bench_execute, bench_detect);
criterion_main!(benches);
