const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// Deterministically permutes `source` with a linear-congruential sequence.
///
/// Each step advances `s = (s * 9301 + 49297) % 233280` and moves the element
/// at `s * remaining / 233280` from the source to the output. The seed is
/// reduced modulo 233280 first, which leaves the sequence unchanged and keeps
/// the arithmetic inside `u64` for any seed.
pub(crate) fn shuffle(mut source: Vec<char>, seed: u64) -> Vec<char> {
    let mut out = Vec::with_capacity(source.len());
    let mut s = seed % MODULUS;
    while !source.is_empty() {
        s = (s * MULTIPLIER + INCREMENT) % MODULUS;
        let index = (s * source.len() as u64 / MODULUS) as usize;
        out.push(source.remove(index));
    }
    out
}
