//! Hashing utilities

/// Jenkins one-at-a-time hash over the lower-cased input.
///
/// This is the hash baked into placement records and texture name tables at
/// authoring time, so archetype references compare by this value only.
pub fn hash_name(s: &str) -> u32 {
    let mut hash: u32 = 0;
    for byte in s.bytes() {
        hash = hash.wrapping_add(u32::from(byte.to_ascii_lowercase()));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash.wrapping_add(hash << 15)
}
