use criterion::criterion_main;

mod common;
mod formatting;

criterion_main!(
    core::core_benches,
    formatting::formatting_benches,
    codec::codec_benches,
);
