use core::fmt;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, RandSource, Result, alphabet::shuffle::shuffle};

/// The default, URL-friendly alphabet.
///
/// Digits, lowercase, uppercase, underscore and hyphen. IDs generated by other
/// shortid implementations with the same seed share this layout.
pub const DEFAULT_ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_-";

/// Number of symbols in every alphabet.
pub const ALPHABET_SIZE: usize = 64;

/// Every symbol index is 6 bits wide.
const BITS_PER_SYMBOL: u32 = 6;
const SYMBOL_MASK: u64 = 0x3F;
/// Random bits are taken 6 at a time from one `u64` draw.
const SYMBOLS_PER_DRAW: u32 = u64::BITS / BITS_PER_SYMBOL;
const NO_VALUE: u8 = 255;

/// A seed-shuffled table of 64 distinct symbols.
///
/// The table maps 6-bit indices to characters. Of those 6 bits, the low
/// `digits` (4, 5 or 6) carry data and the remaining high bits are filled with
/// randomness, so the same value can render as several different strings that
/// all decode back to it.
///
/// An `Alphabet` is immutable once built and can be shared across threads
/// freely.
///
/// # Example
/// ```
/// use shortid::{Alphabet, DEFAULT_ALPHABET, ThreadRandom};
///
/// let abc = Alphabet::new(DEFAULT_ALPHABET, 1).unwrap();
/// let encoded = abc.encode(1234, 0, 5, &ThreadRandom).unwrap();
/// assert_eq!(abc.decode(&encoded, 5).unwrap(), 1234);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Alphabet {
    symbols: [char; ALPHABET_SIZE],
    /// Index of each ASCII symbol, `NO_VALUE` elsewhere.
    ascii: [u8; 128],
}

impl Alphabet {
    /// Builds the alphabet by shuffling the 64 characters of `base` with
    /// `seed`.
    ///
    /// The shuffle is deterministic: the same base and seed always produce the
    /// same table, in this and every other shortid implementation.
    ///
    /// # Errors
    /// - [`Error::InvalidAlphabetLength`] if `base` is not 64 characters long.
    /// - [`Error::DuplicateSymbol`] if a character appears more than once.
    pub fn new(base: &str, seed: u64) -> Result<Self> {
        let chars: Vec<char> = base.chars().collect();
        if chars.len() != ALPHABET_SIZE {
            return Err(Error::InvalidAlphabetLength { len: chars.len() });
        }
        if let Some(symbol) = first_duplicate(&chars) {
            return Err(Error::DuplicateSymbol { symbol });
        }

        let symbols: [char; ALPHABET_SIZE] = shuffle(chars, seed)
            .try_into()
            .map_err(|v: Vec<char>| Error::InvalidAlphabetLength { len: v.len() })?;

        let mut ascii = [NO_VALUE; 128];
        for (index, &symbol) in symbols.iter().enumerate() {
            if symbol.is_ascii() {
                ascii[symbol as usize] = index as u8;
            }
        }

        Ok(Self { symbols, ascii })
    }

    /// The shuffled symbol table, index 0 first.
    pub const fn symbols(&self) -> &[char; ALPHABET_SIZE] {
        &self.symbols
    }

    /// Returns the table index of `symbol`, if it belongs to the alphabet.
    pub fn position(&self, symbol: char) -> Option<usize> {
        if symbol.is_ascii() {
            match self.ascii[symbol as usize] {
                NO_VALUE => None,
                index => Some(index as usize),
            }
        } else {
            self.symbols.iter().position(|&c| c == symbol)
        }
    }

    /// Encodes `value` into a new string of `symbols` characters.
    ///
    /// See [`Alphabet::encode_into`].
    ///
    /// # Errors
    /// Same as [`Alphabet::encode_into`].
    pub fn encode<R>(&self, value: u64, symbols: usize, digits: u32, rng: &R) -> Result<String>
    where
        R: RandSource<u64> + ?Sized,
    {
        let mut out = String::with_capacity(symbols.max(1));
        self.encode_into(value, symbols, digits, rng, &mut out)?;
        Ok(out)
    }

    /// Encodes `value` and appends the characters to `out`,
    /// least-significant symbol first.
    ///
    /// `digits` is the number of data bits per symbol. With `symbols == 0`
    /// the output uses as few symbols as `value` needs; a larger count pads
    /// with encoded zeros so fields appended later stay positional.
    ///
    /// Below 6 digits, the high `6 - digits` bits of every symbol index are
    /// drawn from `rng`. At 6 digits the output is fully deterministic.
    ///
    /// # Errors
    /// - [`Error::InvalidDigits`] unless `digits` is 4, 5 or 6.
    /// - [`Error::InsufficientSymbols`] if `symbols` is non-zero but too small
    ///   to hold `value`.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, rng, out)))]
    pub fn encode_into<R>(
        &self,
        value: u64,
        symbols: usize,
        digits: u32,
        rng: &R,
        out: &mut String,
    ) -> Result<()>
    where
        R: RandSource<u64> + ?Sized,
    {
        check_digits(digits)?;

        let needed = needed_symbols(value, digits);
        let count = match symbols {
            0 => needed,
            requested if requested < needed => {
                return Err(Error::InsufficientSymbols { needed, requested });
            }
            requested => requested,
        };

        let mask = data_mask(digits);
        let random_mask = SYMBOL_MASK ^ mask;
        let mut pool = 0_u64;
        let mut left = 0_u32;

        out.reserve(count);
        for i in 0..count {
            let data = value.checked_shr(shift_for(i, digits)).unwrap_or(0) & mask;
            let noise = if digits < BITS_PER_SYMBOL {
                if left == 0 {
                    pool = rng.rand();
                    left = SYMBOLS_PER_DRAW;
                }
                let bits = pool & random_mask;
                pool >>= BITS_PER_SYMBOL;
                left -= 1;
                bits
            } else {
                0
            };
            out.push(self.symbols[(data | noise) as usize]);
        }
        Ok(())
    }

    /// Reverses [`Alphabet::encode`], discarding the random bits.
    ///
    /// # Errors
    /// - [`Error::InvalidDigits`] unless `digits` is 4, 5 or 6.
    /// - [`Error::UnknownSymbol`] if a character is not in the alphabet.
    /// - [`Error::DecodeOverflow`] if the data bits do not fit in a `u64`.
    pub fn decode(&self, encoded: &str, digits: u32) -> Result<u64> {
        check_digits(digits)?;

        let mask = data_mask(digits);
        let mut value = 0_u64;
        for (index, symbol) in encoded.chars().enumerate() {
            let position = self
                .position(symbol)
                .ok_or(Error::UnknownSymbol { symbol, index })?;
            let data = position as u64 & mask;
            if data == 0 {
                continue;
            }
            let shift = shift_for(index, digits);
            let shifted = data
                .checked_shl(shift)
                .filter(|shifted| shifted >> shift == data)
                .ok_or(Error::DecodeOverflow)?;
            value |= shifted;
        }
        Ok(value)
    }
}

impl Default for Alphabet {
    /// [`DEFAULT_ALPHABET`] shuffled with seed 1.
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET, 1)
            .unwrap_or_else(|e| unreachable!("the default alphabet is valid: {e}"))
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Abc(alphabet=\"")?;
        for symbol in &self.symbols {
            fmt::Write::write_char(f, *symbol)?;
        }
        f.write_str("\")")
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: String = self.symbols.iter().collect();
        f.debug_struct("Alphabet").field("symbols", &symbols).finish()
    }
}

fn check_digits(digits: u32) -> Result<()> {
    if digits < 4 || digits > BITS_PER_SYMBOL {
        return Err(Error::InvalidDigits { digits });
    }
    Ok(())
}

const fn data_mask(digits: u32) -> u64 {
    (1 << digits) - 1
}

/// Bit offset of symbol `i`, saturating far past the end of a `u64`.
fn shift_for(i: usize, digits: u32) -> u32 {
    u32::try_from(i).map_or(u32::MAX, |i| i.saturating_mul(digits))
}

/// Minimum number of symbols able to hold `value` at `digits` bits each.
pub(crate) const fn needed_symbols(value: u64, digits: u32) -> usize {
    if value == 0 {
        return 1;
    }
    let highest_bit = u64::BITS - 1 - value.leading_zeros();
    (highest_bit / digits + 1) as usize
}

fn first_duplicate(chars: &[char]) -> Option<char> {
    chars
        .iter()
        .enumerate()
        .find(|&(i, c)| chars[..i].contains(c))
        .map(|(_, &c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThreadRandom;
    use core::cell::Cell;

    struct FixedRand(u64);

    impl RandSource<u64> for FixedRand {
        fn rand(&self) -> u64 {
            self.0
        }
    }

    /// Counts draws so tests can see how often the encoder asks for entropy.
    struct CountingRand {
        draws: Cell<usize>,
    }

    impl RandSource<u64> for CountingRand {
        fn rand(&self) -> u64 {
            self.draws.set(self.draws.get() + 1);
            u64::MAX
        }
    }

    fn default_abc() -> Alphabet {
        Alphabet::new(DEFAULT_ALPHABET, 1).unwrap()
    }

    #[test]
    fn seed_one_shuffles_to_known_layout() {
        let abc = default_abc();
        let symbols: String = abc.symbols().iter().collect();
        assert_eq!(
            symbols,
            "gzmZM7VINvOFcpho01x-fYPs8Q_urjq6RkiWGn4SHDdK5t2TAJbaBLEyUwlX9C3e"
        );
        assert_eq!(abc, Alphabet::default());
    }

    #[test]
    fn seed_two_shuffles_to_known_layout() {
        let abc = Alphabet::new(DEFAULT_ALPHABET, 2).unwrap();
        assert_eq!(
            abc.to_string(),
            "Abc(alphabet=\"ip8bKduCDxnMQy-JrVHAN5h1s396jBvmFZOL0Pg2WTqwIE7f4ackXzoUSYlGt_eR\")"
        );
    }

    #[test]
    fn rejects_wrong_length() {
        let short = &DEFAULT_ALPHABET[..63];
        let long = format!("{DEFAULT_ALPHABET}+");
        assert_eq!(
            Alphabet::new(short, 1).unwrap_err(),
            Error::InvalidAlphabetLength { len: 63 }
        );
        assert_eq!(
            Alphabet::new(&long, 1).unwrap_err(),
            Error::InvalidAlphabetLength { len: 65 }
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 64 characters, some of them multi-byte.
        let base: String = DEFAULT_ALPHABET
            .chars()
            .take(60)
            .chain(['ä', 'ö', 'ü', 'ß'])
            .collect();
        let abc = Alphabet::new(&base, 3).unwrap();
        let encoded = abc.encode(u64::MAX, 0, 6, &ThreadRandom).unwrap();
        assert_eq!(abc.decode(&encoded, 6).unwrap(), u64::MAX);
    }

    #[test]
    fn rejects_duplicate_symbol() {
        let base = format!("{}a", &DEFAULT_ALPHABET[..63]);
        assert_eq!(
            Alphabet::new(&base, 1).unwrap_err(),
            Error::DuplicateSymbol { symbol: 'a' }
        );
    }

    #[test]
    fn rejects_digits_outside_four_to_six() {
        let abc = default_abc();
        for digits in [0, 3, 7, 64] {
            assert_eq!(
                abc.encode(1, 0, digits, &ThreadRandom).unwrap_err(),
                Error::InvalidDigits { digits }
            );
            assert_eq!(
                abc.decode("g", digits).unwrap_err(),
                Error::InvalidDigits { digits }
            );
        }
    }

    #[test]
    fn computes_minimal_symbol_count() {
        assert_eq!(needed_symbols(0, 5), 1);
        assert_eq!(needed_symbols(1, 5), 1);
        assert_eq!(needed_symbols(31, 5), 1);
        assert_eq!(needed_symbols(32, 5), 2);
        assert_eq!(needed_symbols(63, 6), 1);
        assert_eq!(needed_symbols(64, 6), 2);
        assert_eq!(needed_symbols(15, 4), 1);
        assert_eq!(needed_symbols(16, 4), 2);
        assert_eq!(needed_symbols(u64::MAX, 6), 11);
        assert_eq!(needed_symbols(u64::MAX, 5), 13);
        assert_eq!(needed_symbols(u64::MAX, 4), 16);
    }

    #[test]
    fn six_digits_is_deterministic_and_reversible() {
        let abc = default_abc();
        for value in [0, 1, 63, 64, 4095, 4096, 0xDEAD_BEEF, u64::MAX] {
            let a = abc.encode(value, 0, 6, &ThreadRandom).unwrap();
            let b = abc.encode(value, 0, 6, &FixedRand(u64::MAX)).unwrap();
            assert_eq!(a, b, "value {value}");
            assert_eq!(a.chars().count(), needed_symbols(value, 6));
            assert_eq!(abc.decode(&a, 6).unwrap(), value);
        }
    }

    #[test]
    fn six_digits_maps_small_values_to_table_entries() {
        let abc = default_abc();
        for value in 0..64_u64 {
            let encoded = abc.encode(value, 0, 6, &ThreadRandom).unwrap();
            assert_eq!(encoded, abc.symbols()[value as usize].to_string());
        }
    }

    #[test]
    fn random_padding_never_changes_decoded_value() {
        let abc = default_abc();
        for digits in [4, 5] {
            for value in [0, 1, 17, 1 << 20, 0x00FF_FFFF_FFFF, u64::MAX] {
                for _ in 0..16 {
                    let encoded = abc.encode(value, 0, digits, &ThreadRandom).unwrap();
                    assert_eq!(abc.decode(&encoded, digits).unwrap(), value);
                }
            }
        }
    }

    #[test]
    fn random_padding_varies_output() {
        let abc = default_abc();
        let first = abc.encode(0, 8, 5, &ThreadRandom).unwrap();
        let varied = (0..32).any(|_| abc.encode(0, 8, 5, &ThreadRandom).unwrap() != first);
        assert!(varied);
    }

    #[test]
    fn random_bits_stay_out_of_data_bits() {
        let abc = default_abc();
        // All-ones randomness sets every padding bit; data must still be 0.
        let encoded = abc.encode(0, 8, 5, &FixedRand(u64::MAX)).unwrap();
        for symbol in encoded.chars() {
            assert_eq!(abc.position(symbol), Some(0x20));
        }
        let encoded = abc.encode(0, 4, 4, &FixedRand(u64::MAX)).unwrap();
        for symbol in encoded.chars() {
            assert_eq!(abc.position(symbol), Some(0x30));
        }
    }

    #[test]
    fn draws_once_per_ten_symbols() {
        let abc = default_abc();
        let rng = CountingRand { draws: Cell::new(0) };
        abc.encode(0, 10, 5, &rng).unwrap();
        assert_eq!(rng.draws.get(), 1);
        abc.encode(0, 11, 5, &rng).unwrap();
        assert_eq!(rng.draws.get(), 3);
        abc.encode(u64::MAX, 0, 6, &rng).unwrap();
        assert_eq!(rng.draws.get(), 3);
    }

    #[test]
    fn pads_to_requested_symbol_count() {
        let abc = default_abc();
        let encoded = abc.encode(3, 8, 5, &ThreadRandom).unwrap();
        assert_eq!(encoded.chars().count(), 8);
        assert_eq!(abc.decode(&encoded, 5).unwrap(), 3);

        // Padding past 64 bits encodes zeros instead of overflowing the shift.
        let encoded = abc.encode(u64::MAX, 20, 6, &ThreadRandom).unwrap();
        assert_eq!(encoded.chars().count(), 20);
        assert_eq!(abc.decode(&encoded, 6).unwrap(), u64::MAX);
    }

    #[test]
    fn fails_when_symbols_would_truncate() {
        let abc = default_abc();
        assert_eq!(
            abc.encode(32, 1, 5, &ThreadRandom).unwrap_err(),
            Error::InsufficientSymbols {
                needed: 2,
                requested: 1
            }
        );
        assert_eq!(
            abc.encode(1 << 40, 8, 5, &ThreadRandom).unwrap_err(),
            Error::InsufficientSymbols {
                needed: 9,
                requested: 8
            }
        );
        assert!(abc.encode((1 << 40) - 1, 8, 5, &ThreadRandom).is_ok());
    }

    #[test]
    fn encode_into_appends() {
        let abc = default_abc();
        let mut out = String::from("x");
        abc.encode_into(5, 0, 6, &ThreadRandom, &mut out).unwrap();
        assert_eq!(out, format!("x{}", abc.symbols()[5]));
    }

    #[test]
    fn decode_reports_unknown_symbol() {
        let abc = default_abc();
        assert_eq!(
            abc.decode("gz!", 6).unwrap_err(),
            Error::UnknownSymbol {
                symbol: '!',
                index: 2
            }
        );
        assert_eq!(abc.position('!'), None);
        assert_eq!(abc.position('é'), None);
    }

    #[test]
    fn decode_reports_overflow() {
        let abc = default_abc();
        let top = abc.symbols()[63].to_string();
        assert_eq!(
            abc.decode(&top.repeat(12), 6).unwrap_err(),
            Error::DecodeOverflow
        );
        // The 11th symbol only has room for 4 bits.
        let mut eleven = top.repeat(10);
        eleven.push(abc.symbols()[0x1F]);
        assert_eq!(abc.decode(&eleven, 6).unwrap_err(), Error::DecodeOverflow);
    }

    #[test]
    fn decode_ignores_zero_padding_beyond_64_bits() {
        let abc = default_abc();
        let zero = abc.symbols()[0].to_string();
        assert_eq!(abc.decode(&zero.repeat(30), 6).unwrap(), 0);
    }

    #[test]
    fn debug_shows_symbols() {
        let debug = format!("{:?}", default_abc());
        assert_eq!(
            debug,
            "Alphabet { symbols: \"gzmZM7VINvOFcpho01x-fYPs8Q_urjq6RkiWGn4SHDdK5t2TAJbaBLEyUwlX9C3e\" }"
        );
    }
}
