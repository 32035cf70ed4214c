//! Pedersen hash benchmarks
//!
//! Two operations are measured:
//! 1. hash() - the 2-to-1 hash of two field elements
//! 2. hash_elements() - the chained hash of a sequence of field elements

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use vote_crypto::{FieldElement, Pedersen, rand::draw};

/// Number of elements hashed by the sequential benchmarks.
const HASH_ELEMENT_COUNTS: &[usize] = &[1, 10, 100];

fn random_elements(count: usize) -> Vec<FieldElement> {
    let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
    (0..count).map(|_| draw(&mut rng)).collect()
}

fn pedersen_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("pedersen_hash");

    let inputs = random_elements(2);
    group.bench_function("random_pair", |b| {
        b.iter(|| Pedersen::hash(black_box(inputs[0]), black_box(inputs[1])))
    });

    // small inputs have an all-zero high part
    group.bench_function("vote_message", |b| {
        b.iter(|| Pedersen::hash_u64(black_box(10018), black_box(1)))
    });

    group.finish();
}

fn pedersen_hash_elements(c: &mut Criterion) {
    let mut group = c.benchmark_group("pedersen_hash_elements");

    for &count in HASH_ELEMENT_COUNTS {
        let elements = random_elements(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &elements, |b, elements| {
            b.iter(|| Pedersen::hash_elements(black_box(elements)))
        });
    }

    group.finish();
}

criterion_group!(hash_group, pedersen_hash, pedersen_hash_elements);
criterion_main!(hash_group);
