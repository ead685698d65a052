/// Default and random sample payloads for each symbology
use crate::symbology::Symbology;
use crate::validate::{PHARMACODE_MAX, PHARMACODE_MIN};

const DIGITS: &[u8] = b"0123456789";
const CODE39_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";
/// Code39 characters allowed at either end, where a space would be trimmed away
const CODE39_EDGES: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-.$/+%";
const CODABAR_ALPHABET: &[u8] = b"0123456789-$:/.+";
const CODABAR_GUARDS: &[u8] = b"ABCD";
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of uniformly distributed integers. Samples are for demos only,
/// so no cryptographic quality is expected.
pub trait RandomSource {
    /// A value in `0..bound`; `bound` is never zero
    fn below(&mut self, bound: u32) -> u32;

    /// A value in `low..=high`
    fn between(&mut self, low: u32, high: u32) -> u32 {
        low + self.below(high - low + 1)
    }
}

/// Randomness from the platform (`crypto.getRandomValues` in the browser)
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn below(&mut self, bound: u32) -> u32 {
        let mut buf = [0u8; 4];
        if let Err(e) = getrandom::getrandom(&mut buf) {
            log::warn!("random source unavailable: {}", e);
            return 0;
        }
        u32::from_le_bytes(buf) % bound
    }
}

/// What the text input should hold right after switching symbology
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Fixed(String),
    /// Read from the active tab; empty string if that fails
    ActiveTabUrl,
}

pub fn default_value<R: RandomSource>(symbology: &Symbology, rng: &mut R) -> DefaultValue {
    let fixed = match symbology {
        Symbology::QrCode => return DefaultValue::ActiveTabUrl,
        Symbology::Ean13 => random_string(rng, DIGITS, 12),
        Symbology::Pharmacode => "12345".to_string(),
        Symbology::RationalizedCodabar => "A1234567890B".to_string(),
        Symbology::Code39 => "CODE39".to_string(),
        Symbology::Code93 => "CODE93".to_string(),
        Symbology::Code11 => "12345".to_string(),
        Symbology::Interleaved2of5 => "123456".to_string(),
        Symbology::Msi => "123456".to_string(),
        Symbology::Ean8 => "1234567".to_string(),
        Symbology::UpcA => "01234567890".to_string(),
        Symbology::UpcE => "012345".to_string(),
        _ => "123456789012".to_string(),
    };
    DefaultValue::Fixed(fixed)
}

/// A syntactically valid random payload for "try a random value"
pub fn random_sample<R: RandomSource>(symbology: &Symbology, rng: &mut R) -> String {
    match symbology {
        Symbology::Ean13 => random_string(rng, DIGITS, 12),
        Symbology::Ean8 => "1234567".to_string(),
        Symbology::UpcA => "01234567890".to_string(),
        Symbology::UpcE => "012345".to_string(),
        Symbology::Code11 => "12345".to_string(),
        Symbology::Code39 => {
            let len = rng.between(4, 10) as usize;
            let first = pick(rng, CODE39_EDGES);
            let middle = random_string(rng, CODE39_ALPHABET, len - 2);
            let last = pick(rng, CODE39_EDGES);
            format!("{}{}{}", first, middle, last)
        }
        Symbology::Code93 => format!("CODE93-{}", random_string(rng, BASE36, 4)),
        Symbology::Interleaved2of5 => {
            let len = rng.between(4, 10) as usize;
            random_string(rng, DIGITS, len + len % 2)
        }
        Symbology::Msi => {
            let len = rng.between(4, 10) as usize;
            random_string(rng, DIGITS, len)
        }
        Symbology::Pharmacode => rng
            .between(PHARMACODE_MIN as u32, PHARMACODE_MAX as u32)
            .to_string(),
        Symbology::RationalizedCodabar => {
            let start = pick(rng, CODABAR_GUARDS);
            let stop = pick(rng, CODABAR_GUARDS);
            let len = rng.between(4, 16) as usize;
            let middle = random_string(rng, CODABAR_ALPHABET, len);
            format!("{}{}{}", start, middle, stop)
        }
        Symbology::Code128 => format!("SAMPLE{}", rng.below(1000)),
        _ => format!("Sample {}", random_string(rng, BASE36, 7)),
    }
}

fn pick<R: RandomSource>(rng: &mut R, alphabet: &[u8]) -> char {
    alphabet[rng.below(alphabet.len() as u32) as usize] as char
}

fn random_string<R: RandomSource>(rng: &mut R, alphabet: &[u8], len: usize) -> String {
    (0..len).map(|_| pick(rng, alphabet)).collect()
}
