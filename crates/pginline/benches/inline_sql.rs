use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pginline::{ParamValue, SqlInliner, format_literal, params};

fn template(complexity: &str) -> &'static str {
    match complexity {
        "simple" => "SELECT $1",
        "medium" => {
            "SELECT id, name, email FROM users WHERE status = $1 AND created_at > $2 ORDER BY name LIMIT 100"
        }
        "complex" => {
            "SELECT u.id, u.name, o.total, p.name AS product FROM users u JOIN orders o ON o.user_id = u.id JOIN order_items oi ON oi.order_id = o.id JOIN products p ON p.id = oi.product_id WHERE u.status = $1 AND o.created_at > $2 GROUP BY u.id, u.name, o.total, p.name HAVING o.total > $3 ORDER BY o.total DESC LIMIT 50"
        }
        _ => unreachable!(),
    }
}

fn bench_inline(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline_sql/inline");
    let inliner = SqlInliner::new();
    let values = params!["active", "2024-01-01", 100.5];

    for complexity in ["simple", "medium", "complex"] {
        let sql = template(complexity);
        group.bench_with_input(BenchmarkId::from_parameter(complexity), sql, |b, sql| {
            b.iter(|| black_box(inliner.inline(sql, &values)));
        });
    }

    group.finish();
}

fn bench_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline_sql/phase");
    let inliner = SqlInliner::new();
    let values = params!["active", "2024-01-01", 100.5];
    let sql = template("complex");

    group.bench_function("validate", |b| {
        b.iter(|| black_box(inliner.validate(sql)));
    });
    group.bench_function("rewrite", |b| {
        b.iter(|| black_box(inliner.rewrite(sql, &values)));
    });

    group.finish();
}

fn bench_format_literal(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline_sql/format_literal");

    let long_text = "it's a long value with 'quotes' ".repeat(32);
    let cases = [
        ("int", ParamValue::Int(-1_234_567)),
        ("float", ParamValue::Float(1234.5678)),
        ("text", ParamValue::from("O'Brien")),
        ("long_text", ParamValue::from(long_text)),
    ];

    for (name, value) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), value, |b, value| {
            b.iter(|| black_box(format_literal(value)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_inline, bench_phases, bench_format_literal);
criterion_main!(benches);
