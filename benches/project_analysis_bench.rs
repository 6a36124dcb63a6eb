//! Benchmarks for project analysis.
//!
//! Compares a full syntax-tree run against a text-only run over a
//! generated project where every class references its neighbor.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use smellmap::config::AnalyzerConfig;
use smellmap::{Analyzer, SourceUnit};
use std::hint::black_box;

fn create_project(num_files: usize) -> Vec<SourceUnit> {
    (0..num_files)
        .map(|i| {
            let next = (i + 1) % num_files;
            let content = format!(
                r#"
import java.util.List;

public class Service{i} {{
    private final Service{next} next = new Service{next}();
    private int count;

    public int process(List<Integer> items) {{
        int total = 0;
        for (int item : items) {{
            if (item > 0 && item < 100) {{
                total += item;
            }} else {{
                total -= next.adjust(item);
            }}
        }}
        return total;
    }}

    public int adjust(int value) {{
        switch (value % 3) {{
            case 0: return value;
            case 1: return value * 2;
            default: return count;
        }}
    }}

    public int getCount() {{ return count; }}
    public void setCount(int count) {{ this.count = count; }}
}}
"#
            );
            SourceUnit::new(format!("src/Service{i}.java"), content)
        })
        .collect()
}

fn bench_project_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_analysis");

    for size in [10, 50, 200] {
        let units = create_project(size);
        group.throughput(Throughput::Elements(size as u64));

        let tree = Analyzer::default();
        group.bench_with_input(BenchmarkId::new("syntax_tree", size), &units, |b, units| {
            b.iter(|| black_box(tree.analyze_project(units)))
        });

        let text = Analyzer::new(AnalyzerConfig {
            structural_strategy: false,
            ..AnalyzerConfig::default()
        })
        .expect("default thresholds are valid");
        group.bench_with_input(BenchmarkId::new("text_pattern", size), &units, |b, units| {
            b.iter(|| black_box(text.analyze_project(units)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_project_analysis);
criterion_main!(benches);
