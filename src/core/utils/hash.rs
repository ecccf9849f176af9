//! Integer hashing for per-read random seeds.

/// Thomas Wang's 64-bit integer mix.
pub fn hash_64(key: u64) -> u64 {
    let mut key = key;
    key = key.wrapping_add(!key.wrapping_shl(32));
    key ^= key.wrapping_shr(22);
    key = key.wrapping_add(!key.wrapping_shl(13));
    key ^= key.wrapping_shr(8);
    key = key.wrapping_add(key.wrapping_shl(3));
    key ^= key.wrapping_shr(15);
    key = key.wrapping_add(!key.wrapping_shl(27));
    key ^= key.wrapping_shr(31);
    key
}

/// Seed for a read's random source: depends only on `base` and the name,
/// never on which worker or in what order the read is processed.
pub fn read_seed(base: u64, name: &str) -> u64 {
    name.as_bytes().chunks(8).fold(hash_64(base), |h, chunk| {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        hash_64(h ^ u64::from_le_bytes(word))
    })
}
