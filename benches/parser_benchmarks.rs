use std::hint::black_box;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use go_check::core::{OutputSink, Severity};
use go_check::parse_tool_output;
use go_check::parser::{package_name, parse_diagnostic_line};

/// Sink that drops everything, so only parsing is measured
struct NullOutput;

impl OutputSink for NullOutput {
    fn append_line(&self, _: &str) {}
}

/// Generate tool output of different shapes for benchmarking
fn generate_tool_output(lines: usize, pattern: &str) -> String {
    let mut content = String::new();

    match pattern {
        "compiler" => {
            for i in 0..lines {
                content.push_str(&format!(
                    "pkg/file{}.go:{}:{}: undefined: name{}\n",
                    i % 20,
                    i + 1,
                    i % 80,
                    i
                ));
            }
        }
        "continuations" => {
            for i in 0..lines {
                if i % 3 == 0 {
                    content.push_str(&format!(
                        "main.go:{}:2: cannot use x (type int) as type string\n",
                        i + 1
                    ));
                } else {
                    content.push_str("\thave int\n");
                }
            }
        }
        "noisy" => {
            for i in 0..lines {
                match i % 4 {
                    0 => content.push_str("# example.com/proj/pkg\n"),
                    1 => content.push_str(&format!("vet: main.go:{}: unreachable code\n", i)),
                    2 => content.push_str("exit status 2\n"),
                    3 => content.push_str(&format!(
                        "a.go:{}:1:warning: exported func F{} should have comment\n",
                        i, i
                    )),
                    _ => unreachable!(),
                }
            }
        }
        _ => {
            for i in 0..lines {
                content.push_str(&format!("main.go:{}: problem\n", i + 1));
            }
        }
    }

    content
}

/// Benchmark matching single lines against the diagnostic pattern
fn bench_single_line(c: &mut Criterion) {
    let test_lines = vec![
        ("plain", "main.go:10: missing return"),
        ("with_column", "main.go:10:5: undefined: foo"),
        ("labelled", "vet: util/strings.go:3:1: unreachable code"),
        ("tagged", "pkg/a.go:12:2:warning: exported func A should have comment"),
        ("no_match", "# example.com/proj"),
    ];

    let mut group = c.benchmark_group("single_line");

    for (name, line) in test_lines {
        group.bench_with_input(
            BenchmarkId::new("parse_diagnostic_line", name),
            &line,
            |b, line| b.iter(|| black_box(parse_diagnostic_line(black_box(line)))),
        );
    }

    group.finish();
}

/// Benchmark parsing whole outputs of different sizes
fn bench_tool_output(c: &mut Criterion) {
    let sizes = vec![100, 1_000, 10_000];
    let patterns = vec!["compiler", "continuations", "noisy"];

    let mut group = c.benchmark_group("tool_output");

    for &size in &sizes {
        for pattern in &patterns {
            let content = generate_tool_output(size, pattern);

            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{}_{}", pattern, size), size),
                &content,
                |b, content| {
                    b.iter(|| {
                        black_box(parse_tool_output(
                            black_box(content),
                            Path::new("/proj"),
                            Severity::Error,
                            &NullOutput,
                        ))
                    })
                },
            );
        }
    }

    group.finish();
}

/// Benchmark the package clause scan
fn bench_prelude(c: &mut Criterion) {
    let mut header = String::new();
    for i in 0..200 {
        header.push_str(&format!("// Copyright line {} of a long license header.\n", i));
    }
    header.push_str("/* Package doc comment */\npackage main\n\nimport \"fmt\"\n");

    c.bench_function("package_name_long_header", |b| {
        b.iter(|| black_box(package_name(black_box(&header))))
    });
}

criterion_group!(parser_benches, bench_single_line, bench_tool_output, bench_prelude);

criterion_main!(parser_benches);
