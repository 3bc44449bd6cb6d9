use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use huffpack::{FrequencyTable, HuffmanCodec, HuffmanTree};

fn sample(len: usize) -> Vec<u8> {
    // skewed distribution so codes have mixed lengths
    (0..len as u64)
        .map(|i| {
            let x = i.wrapping_mul(2654435761) >> 7;
            (x % 7 * (x % 5) + x % 3) as u8
        })
        .collect()
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman");
    let input = sample(256 * 1024);
    group.throughput(Throughput::Bytes(input.len() as u64));
    let codec = HuffmanCodec::default();

    group.bench_function("build_tree", |b| {
        let table = FrequencyTable::from_bytes(&input).unwrap();
        b.iter(|| HuffmanTree::build(&table).unwrap())
    });

    group.bench_function("encode", |b| b.iter(|| codec.encode_bytes(&input).unwrap()));

    let encoded = codec.encode_bytes(&input).unwrap();
    group.bench_function("decode", |b| b.iter(|| codec.decode_bytes(&encoded).unwrap()));

    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
