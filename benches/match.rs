use criterion::{criterion_group, criterion_main, Criterion};
use regdfa::Regex;
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("match", |b| {
        let re = Regex::new("ab*c(d|ef)*").unwrap();
        b.iter(|| re.matches(black_box("abbbbcefdefd")))
    });

    c.bench_function("compile and match", |b| {
        b.iter(|| {
            let re = Regex::new("(a|b)*abb(a|b)*").unwrap();
            re.greedy(black_box("babababbababba"))
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
