use std::path::Path;

use huffpack::HuffmanCodec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    let dir = std::env::temp_dir();
    let original = dir.join("huffpack_sample.txt");
    let compressed = dir.join("huffpack_sample.huff");
    let restored = dir.join("huffpack_sample.out");

    std::fs::write(&original, sample_text)?;
    println!("Created sample file: {} bytes", sample_text.len());

    let codec = HuffmanCodec::default();
    let report = codec.encode_file(&original, &compressed)?;
    println!(
        "Compressed to: {} bytes ({:.1}% of original, {} distinct bytes)",
        report.compressed_length(),
        report.ratio() * 100.0,
        report.distinct
    );
    // the 1 KiB header dominates inputs this small

    codec.decode_file(&compressed, &restored)?;
    let restored_text = std::fs::read_to_string(&restored)?;
    if sample_text != restored_text {
        return Err("Decompression verification failed".into());
    }
    println!("Decompression successful! Data matches exactly.");

    for path in [&original, &compressed, &restored] {
        remove(path)?;
    }
    Ok(())
}

fn remove(path: &Path) -> std::io::Result<()> {
    std::fs::remove_file(path)
}
