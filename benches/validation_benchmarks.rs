use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use editorconfig_validator::{validate_document, RuleCatalog};
use std::hint::black_box;

/// Generate a document with a specific mix of lines
fn generate_document(sections: usize, scenario: &str) -> String {
    let mut content = String::from("# generated\nroot = true\n");

    for i in 0..sections {
        content.push_str(&format!("\n[*.ext{}]\n", i));
        match scenario {
            "all_valid" => {
                content.push_str("indent_style = space\nindent_size = 4\n");
                content.push_str("end_of_line = lf\ncharset = utf-8\n");
                content.push_str("trim_trailing_whitespace = true\ninsert_final_newline = true\n");
            }
            "mixed_errors" => {
                content.push_str("indent_style = tabs\n");
                content.push_str("unknown_key = 1\n");
                content.push_str("charset = utf-8 ; trailing\n");
                content.push_str("no equals sign\n");
                content.push_str("tab_width = 8\n");
            }
            _ => {}
        }
    }

    content
}

fn bench_validate_document(c: &mut Criterion) {
    let catalog = RuleCatalog::with_builtin_rules().expect("built-in rules");
    let mut group = c.benchmark_group("validate_document");

    for sections in [10, 100, 1000] {
        for scenario in ["all_valid", "mixed_errors"] {
            let content = generate_document(sections, scenario);
            group.throughput(Throughput::Bytes(content.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(scenario, sections),
                &content,
                |b, content| b.iter(|| validate_document(black_box(content), &catalog)),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_validate_document);
criterion_main!(benches);
