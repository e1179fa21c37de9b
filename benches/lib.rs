use std::array;

use bigdec::{Context, Decimal, Encoding};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

fn values(rng: &mut StdRng) -> [Decimal; 1 << 10] {
    array::from_fn(|_| Decimal::new(rng.gen::<i64>(), rng.gen_range(-40..40)))
}

fn bench_arith(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xbd_b0);
    let lhs = values(&mut rng);
    let rhs = values(&mut rng);

    let mut group = c.benchmark_group("arith");
    group.bench_function("add", |b| {
        let mut i = 0;
        b.iter(|| {
            let x = &lhs[i % lhs.len()];
            let y = &rhs[i % rhs.len()];
            black_box(black_box(x) + black_box(y));
            i += 1;
        });
    });
    group.bench_function("mul", |b| {
        let mut i = 0;
        b.iter(|| {
            let x = &lhs[i % lhs.len()];
            let y = &rhs[i % rhs.len()];
            black_box(black_box(x) * black_box(y));
            i += 1;
        });
    });
    group.bench_function("div", |b| {
        let ctx = Context::DECIMAL64;
        let mut i = 0;
        b.iter(|| {
            let x = &lhs[i % lhs.len()];
            let y = &rhs[i % rhs.len()];
            black_box(black_box(x).divide(black_box(y), Some(&ctx)));
            i += 1;
        });
    });
    group.bench_function("cmp", |b| {
        let mut i = 0;
        b.iter(|| {
            let x = &lhs[i % lhs.len()];
            let y = &rhs[i % rhs.len()];
            black_box(black_box(x).compare(black_box(y)));
            i += 1;
        });
    });
    group.finish();
}

fn bench_round(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xbd_b1);
    let vals = values(&mut rng);
    let ctx = Context::DECIMAL32;

    c.bench_function("round/7", |b| {
        let mut i = 0;
        b.iter(|| {
            black_box(black_box(&vals[i % vals.len()]).round(&ctx));
            i += 1;
        });
    });
}

fn bench_interchange(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xbd_b2);
    let vals = values(&mut rng);
    let bits: [u64; 1 << 10] =
        array::from_fn(|i| vals[i].to_decimal64(Encoding::Dpd));

    let mut group = c.benchmark_group("decimal64");
    for enc in [Encoding::Bid, Encoding::Dpd] {
        group.bench_function(format!("pack/{enc:?}"), |b| {
            let mut i = 0;
            b.iter(|| {
                black_box(black_box(&vals[i % vals.len()]).to_decimal64(enc));
                i += 1;
            });
        });
    }
    group.bench_function("unpack/Dpd", |b| {
        let mut i = 0;
        b.iter(|| {
            black_box(Decimal::from_decimal64(
                black_box(bits[i % bits.len()]),
                Encoding::Dpd,
            ));
            i += 1;
        });
    });
    group.finish();
}

fn bench_text(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xbd_b3);
    let vals = values(&mut rng);
    let strs: [String; 1 << 10] = array::from_fn(|i| vals[i].to_string());

    let mut group = c.benchmark_group("text");
    group.bench_function("parse", |b| {
        let mut i = 0;
        b.iter(|| {
            black_box(Decimal::parse(black_box(&strs[i % strs.len()])));
            i += 1;
        });
    });
    group.bench_function("format", |b| {
        let mut i = 0;
        b.iter(|| {
            black_box(black_box(&vals[i % vals.len()]).to_string());
            i += 1;
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_arith,
    bench_round,
    bench_interchange,
    bench_text,
);
criterion_main!(benches);
