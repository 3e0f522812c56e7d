//! Keystream cipher used by the gateway's legacy envelope format.
//!
//! Drop-in replacement for the provider-native stream cipher: byte-for-byte
//! identical output for a given `(data, key)` pair. Pure computation, no
//! I/O, no internal randomness.

/// Applies the keystream to `data`.
///
/// The cipher is self-inverse: applying it twice with the same key returns
/// the original bytes, so this single function both encrypts and decrypts.
/// Any key length >= 1 is accepted; key bytes are cycled during scheduling.
/// Output length always equals input length.
pub fn apply(data: &[u8], key: &[u8]) -> Vec<u8> {
    debug_assert!(!key.is_empty(), "keystream key must be non-empty");

    // Key-scheduling: seed the 256-entry permutation table.
    let mut s: [u8; 256] = core::array::from_fn(|i| i as u8);
    let mut j: u8 = 0;
    for i in 0..256 {
        j = j
            .wrapping_add(s[i])
            .wrapping_add(key[i % key.len()]);
        s.swap(i, j as usize);
    }

    // Pseudo-random generation: advance two indices, swap, XOR with the
    // table entry selected by their sum.
    let mut i: u8 = 0;
    let mut j: u8 = 0;
    let mut out = Vec::with_capacity(data.len());
    for &byte in data {
        i = i.wrapping_add(1);
        j = j.wrapping_add(s[i as usize]);
        s.swap(i as usize, j as usize);
        let k = s[s[i as usize].wrapping_add(s[j as usize]) as usize];
        out.push(byte ^ k);
    }
    out
}
