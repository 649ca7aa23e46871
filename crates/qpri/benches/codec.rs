//! Frame codec benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use qpri::q921::frame::{self, Address, FCS_LEN};

fn bench_codec(c: &mut Criterion) {
    let addr = Address::call_ctrl(true);
    let payload = [0x55u8; 64];

    c.bench_function("build_i_64b", |b| {
        b.iter(|| frame::build_i(black_box(addr), 5, 3, false, black_box(&payload)))
    });

    let built = frame::build_i(addr, 5, 3, false, &payload);
    let stripped = &built[..built.len() - FCS_LEN];
    c.bench_function("parse_i_64b", |b| {
        b.iter(|| frame::parse(black_box(stripped)).unwrap())
    });

    let rr = frame::build_s(addr, frame::S_RR, 17, true);
    let rr_stripped = &rr[..rr.len() - FCS_LEN];
    c.bench_function("parse_s", |b| {
        b.iter(|| frame::parse(black_box(rr_stripped)).unwrap())
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
