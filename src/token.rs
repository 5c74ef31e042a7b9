//! Random replacement identifiers.
//!
//! Tokens are drawn from `[a-zA-Z_]` without the letter `d`, the alphabet the
//! tool has always used. There is no uniqueness guarantee: two calls may
//! return the same token, and a token may coincide with a name already in the
//! source. Only reserved words are rejected, since those would not parse.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const ALPHABET: &[u8] = b"abcefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";

/// Keywords, literals and strict-mode restricted names, the ES3 future
/// reserved words older JScript engines still reject, and the non-writable
/// global values.
const RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
    // ES3
    "abstract", "boolean", "byte", "char", "double", "final", "float", "goto", "int", "long",
    "native", "short", "synchronized", "throws", "transient", "volatile",
    // globals
    "Infinity", "NaN", "undefined",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

pub struct TokenGenerator<R = StdRng> {
    rng: R,
}

impl TokenGenerator<StdRng> {
    /// Seeded generators produce the same tokens on every run.
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> TokenGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// A token of exactly `len` characters.
    pub fn generate(&mut self, len: usize) -> String {
        loop {
            let token: String = (0..len)
                .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
                .collect();
            if !is_reserved(&token) {
                return token;
            }
        }
    }
}
