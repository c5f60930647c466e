use criterion::{black_box, criterion_group, criterion_main, Criterion};
use movegen::{generate_moves, perft, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_perft_startpos(c: &mut Criterion) {
    movegen::movegen::init();
    let mut position = Position::startpos();
    c.bench_function("perft startpos depth 4", |b| {
        b.iter(|| black_box(perft(&mut position, 4)))
    });
}

fn bench_perft_kiwipete(c: &mut Criterion) {
    let mut position = Position::from_fen(KIWIPETE).unwrap();
    c.bench_function("perft kiwipete depth 3", |b| {
        b.iter(|| black_box(perft(&mut position, 3)))
    });
}

fn bench_generate_moves(c: &mut Criterion) {
    let position = Position::from_fen(KIWIPETE).unwrap();
    c.bench_function("generate_moves kiwipete", |b| {
        b.iter(|| black_box(generate_moves(black_box(&position))))
    });
}

criterion_group!(
    benches,
    bench_perft_startpos,
    bench_perft_kiwipete,
    bench_generate_moves
);
criterion_main!(benches);
