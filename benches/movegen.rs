use checkers_core::{Board, Color};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn count_moves(board: &Board, color: Color) -> usize {
    board
        .active_pieces(color)
        .map(|piece| piece.available_moves(board).len())
        .sum()
}

fn crowded_board() -> Board {
    let mut board = Board::new();
    for y in 0..8u8 {
        for x in 0..8u8 {
            if (x + y) % 2 == 1 && y != 4 {
                let color = if y < 4 { Color::White } else { Color::Black };
                board
                    .place(x, y, color)
                    .expect("dark squares of a fresh board are free");
            }
        }
    }
    board
}

fn movegen_benchmark(c: &mut Criterion) {
    c.bench_function("movegen starting layout", |b| {
        b.iter(|| count_moves(black_box(&Board::default()), Color::White))
    });
    c.bench_function("movegen crowded", |b| {
        let board = crowded_board();
        b.iter(|| count_moves(black_box(&board), Color::Black))
    });
    c.bench_function("has_moves starting layout", |b| {
        b.iter(|| black_box(&Board::default()).has_moves(Color::Black))
    });
}

fn snapshot_benchmark(c: &mut Criterion) {
    let board = Board::default();
    c.bench_function("snapshot encode", |b| {
        b.iter(|| black_box(&board).to_bytes())
    });
    let bytes = board.to_bytes().expect("default board encodes");
    c.bench_function("snapshot decode", |b| {
        b.iter(|| Board::from_bytes(black_box(&bytes)))
    });
}

criterion_group!(benches, movegen_benchmark, snapshot_benchmark);
criterion_main!(benches);
