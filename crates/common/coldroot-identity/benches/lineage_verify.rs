use coldroot_identity::{build_lineage_event, derive_epoch_seed, verify_lineage, RootSeed, LINEAGE_KIND};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_lineage(c: &mut Criterion) {
    let seed = RootSeed::from([1u8; 32]);
    let root = seed.keypair();
    let epoch = seed.derive_epoch("2025-Q1");
    let event = build_lineage_event(&root, &epoch.public_key_bytes(), "2025-Q1", LINEAGE_KIND, Some(0));
    let root_hex = root.public_key_hex();

    c.bench_function("epoch_derive", |b| {
        b.iter(|| derive_epoch_seed(seed.as_bytes(), "2025-Q1").unwrap());
    });
    c.bench_function("lineage_verify", |b| {
        b.iter(|| assert!(verify_lineage(&root_hex, &event)));
    });
}
criterion_group!(benches, bench_lineage);
criterion_main!(benches);
