use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use latex_language_server::build::parse_log;
use tower_lsp::lsp_types::Url;

/// Generate TeX log content of different shapes for benchmarking
fn generate_log_content(lines: usize, pattern: &str) -> String {
    let mut content = String::new();

    match pattern {
        "clean" => {
            for i in 0..lines {
                content.push_str(&format!("[{}] chunk of ordinary engine chatter\n", i));
            }
        }
        "error_heavy" => {
            for i in 0..lines / 2 {
                content.push_str("! Undefined control sequence.\n");
                content.push_str(&format!("l.{} \\foo\n", i + 1));
            }
        }
        "warning_heavy" => {
            for i in 0..lines {
                content.push_str(&format!(
                    "LaTeX Warning: Reference `fig:{}' undefined on input line {}.\n",
                    i,
                    i + 1
                ));
            }
        }
        "file_stack_heavy" => {
            for i in 0..lines / 3 {
                content.push_str(&format!("(./chapter{}.tex [{}]\n", i, i));
                content.push_str("! Missing $ inserted.\n");
                content.push_str(")\n");
            }
        }
        _ => unreachable!(),
    }

    content
}

fn bench_log_parsing(c: &mut Criterion) {
    let root = Url::parse("file:///project/main.tex").expect("valid URI");
    let mut group = c.benchmark_group("log_parsing");

    for pattern in ["clean", "error_heavy", "warning_heavy", "file_stack_heavy"] {
        for lines in [100, 1_000, 10_000] {
            let content = generate_log_content(lines, pattern);
            group.throughput(Throughput::Bytes(content.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(pattern, lines),
                &content,
                |b, content| {
                    b.iter(|| parse_log(black_box(&root), black_box(content)));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_log_parsing);
criterion_main!(benches);
