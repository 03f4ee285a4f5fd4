use chain_core::constants::POW_DIFFICULTY;
use chain_core::pow::proof_of_work;
use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::atomic::AtomicBool;

fn bench_pow(c: &mut Criterion) {
    c.bench_function("proof_of_work_difficulty_4", |b| {
        let cancel = AtomicBool::new(false);
        b.iter(|| {
            let _proof = proof_of_work(100, POW_DIFFICULTY, &cancel);
        });
    });
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);
