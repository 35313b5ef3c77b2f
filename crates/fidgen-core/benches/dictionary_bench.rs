#![allow(clippy::unwrap_used)]
//! Benchmarks for marker table construction and code ranking.
//!
//! Run with `cargo bench --bench dictionary_bench`.

use divan::Bencher;
use fidgen_core::MarkerTable;
use fidgen_core::dictionary::MarkerCode;
use fidgen_core::permutation::{rank, unrank};

fn main() {
    divan::main();
}

#[divan::bench]
fn bench_table_build() -> MarkerTable {
    MarkerTable::build()
}

#[divan::bench]
fn bench_rank(bencher: Bencher) {
    let input = [3u8, 0, 4, 1, 2];
    bencher.bench_local(move || divan::black_box(rank(divan::black_box(&input))));
}

#[divan::bench]
fn bench_unrank_all(bencher: Bencher) {
    bencher.bench_local(|| {
        for id in 0..120u8 {
            divan::black_box(unrank(divan::black_box(id)));
        }
    });
}

#[divan::bench]
fn bench_code_id(bencher: Bencher) {
    let code = MarkerCode::new([1, 4, 2, 6, 3, 5]).unwrap();
    bencher.bench_local(move || divan::black_box(divan::black_box(&code).id()));
}
