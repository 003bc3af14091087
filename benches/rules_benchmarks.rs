//! Benchmarks for move generation, notation and PGN handling.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_core::board::Board;
use chess_core::options::PgnOptions;
use chess_core::pgn::{load_pgn, write_pgn};
use chess_core::polyglot::{book_from_tree, key_from_board};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

const GAME: &str = r#"[Event "London"]
[White "Adolf Anderssen"]
[Black "Lionel Kieseritzky"]
[Result "1-0"]

1. e4 e5 2. f4 exf4 3. Bc4 Qh4+ 4. Kf1 b5 5. Bxb5 Nf6 6. Nf3 Qh6 7. d3 Nh5
8. Nh4 Qg5 9. Nf5 c6 10. g4 Nf6 11. Rg1 cxb5 12. h4 Qg6 13. h5 Qg5 14. Qf3 Ng8
15. Bxf4 Qf6 16. Nc3 Bc5 17. Nd5 Qxb2 18. Bd6 Bxg1 19. e5 Qxa1+ 20. Ke2 Na6
21. Nxg7+ Kd8 22. Qf6+ Nxf6 23. Be7# 1-0
"#;

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let board = Board::new();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| board.perft(black_box(depth)))
        });
    }

    let kiwipete = Board::from_fen(KIWIPETE).unwrap();
    for depth in 1..=2 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = Board::new();
    group.bench_function("startpos", |b| b.iter(|| black_box(startpos.legal_moves())));

    let middlegame =
        Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4")
            .unwrap();
    group.bench_function("middlegame", |b| {
        b.iter(|| black_box(middlegame.legal_moves()))
    });

    let kiwipete = Board::from_fen(KIWIPETE).unwrap();
    group.bench_function("kiwipete", |b| b.iter(|| black_box(kiwipete.legal_moves())));

    group.finish();
}

fn bench_notation(c: &mut Criterion) {
    let mut group = c.benchmark_group("notation");

    let kiwipete = Board::from_fen(KIWIPETE).unwrap();
    group.bench_function("fen_parse", |b| {
        b.iter(|| Board::from_fen(black_box(KIWIPETE)))
    });
    group.bench_function("san_all_moves", |b| {
        b.iter(|| {
            kiwipete
                .legal_moves()
                .iter()
                .map(|&mv| kiwipete.move_to_san(mv))
                .collect::<Vec<_>>()
        })
    });
    group.bench_function("polyglot_key", |b| {
        b.iter(|| key_from_board(black_box(&kiwipete)))
    });

    group.finish();
}

fn bench_pgn(c: &mut Criterion) {
    let mut group = c.benchmark_group("pgn");

    group.bench_function("load", |b| b.iter(|| load_pgn(black_box(GAME))));

    let options = PgnOptions::default();
    let tree = load_pgn(GAME).unwrap();
    group.bench_function("write", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            write_pgn(&mut tree, &options)
        })
    });
    group.bench_function("book", |b| b.iter(|| book_from_tree(black_box(&tree))));

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_notation, bench_pgn);
criterion_main!(benches);
