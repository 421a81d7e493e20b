use std::env;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use sort_test_tools::patterns;

fn should_run_benchmark(name: &str) -> bool {
    // Plain substring filter; criterion's own filter only sees group names.
    match env::var("BENCH_FILTER") {
        Ok(filter) => name.contains(&filter),
        Err(_) => true,
    }
}

fn bench_pattern(
    c: &mut Criterion,
    test_len: usize,
    pattern_name: &str,
    pattern_provider: fn(usize) -> Vec<i32>,
) {
    for (sort_name, sort_fn) in [
        ("rust_imsort_stable", imsort::sort::<i32> as fn(&mut [i32])),
        ("rust_std_stable", <[i32]>::sort as fn(&mut [i32])),
    ] {
        let name = format!("{sort_name}-{pattern_name}-{test_len}");
        if !should_run_benchmark(&name) {
            continue;
        }

        c.bench_function(&name, |b| {
            b.iter_batched(
                || pattern_provider(test_len),
                |mut test_data| sort_fn(black_box(test_data.as_mut_slice())),
                BatchSize::LargeInput,
            )
        });
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let pattern_providers: [(&str, fn(usize) -> Vec<i32>); 6] = [
        ("random", patterns::random),
        ("random_d20", |len| patterns::random_uniform(len, 0..20)),
        ("random_z1", |len| patterns::random_zipf(len, 1.0)),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("saw_mixed", |len| patterns::saw_mixed(len, 32)),
    ];

    for test_len in [1_000usize, 100_000, 1_500_000] {
        for (pattern_name, pattern_provider) in pattern_providers {
            bench_pattern(c, test_len, pattern_name, pattern_provider);
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
