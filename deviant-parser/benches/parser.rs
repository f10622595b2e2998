use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use deviant_parser::parser::Parser;

fn parse(source: &str) {
    let source = source.into();
    let _ast = Parser::new(&source).parse_program();
    assert!(source.has_no_errors());
}

fn long_function(c: &mut Criterion) {
    let mut group = c.benchmark_group("long-function");

    let mut source = String::from("fn main() -> int {\n    var x0 = 0;\n");
    for i in 1..500 {
        source.push_str(&format!("    var x{} = x{};\n", i, i - 1));
    }
    source.push_str("    return x499;\n}\n");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("long-function", |b| b.iter(|| parse(&source)));
}

fn many_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("many-functions");

    let mut source = String::new();
    for i in 0..200 {
        source.push_str(&format!(
            "fn f{i}() -> int {{\n    var x = {i};\n    if (x < 100) {{\n        return 1;\n    }} else {{\n        return 0;\n    }}\n}}\n",
            i = i
        ));
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("many-functions", |b| b.iter(|| parse(&source)));
}

criterion_group!(benches, long_function, many_functions);
criterion_main!(benches);
