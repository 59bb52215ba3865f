//! Branch name generation.
//!
//! Names are `<prefix><suffix>` where the suffix is five characters drawn
//! from an alphabet without vowels or look-alike digits.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[u8] = b"bcdfghjklmnpqrstvwxz2456789";
const SUFFIX_LEN: usize = 5;

/// Produces branch names from a caller-supplied prefix.
///
/// Injected into the updater so tests can pin generated names.
pub trait NameGenerator {
    fn prefixed_name(&self, prefix: &str) -> String;
}

/// Random-suffix [`NameGenerator`].
#[derive(Debug)]
pub struct RandomNames {
    rng: Mutex<StdRng>,
}

impl RandomNames {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence of names for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomNames {
    fn default() -> Self {
        Self::new()
    }
}

impl NameGenerator for RandomNames {
    fn prefixed_name(&self, prefix: &str) -> String {
        // Poisoning leaves the RNG state intact.
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        format!("{prefix}{suffix}")
    }
}

impl<F> NameGenerator for F
where
    F: Fn(&str) -> String,
{
    fn prefixed_name(&self, prefix: &str) -> String {
        self(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_prefix_and_appends_suffix() {
        let names = RandomNames::from_seed(7);
        let name = names.prefixed_name("gitpatch-");
        assert!(name.starts_with("gitpatch-"));
        assert_eq!(name.len(), "gitpatch-".len() + SUFFIX_LEN);
    }

    #[test]
    fn empty_prefix_yields_suffix_only() {
        let names = RandomNames::from_seed(7);
        let name = names.prefixed_name("");
        assert_eq!(name.len(), SUFFIX_LEN);
        assert!(name.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = RandomNames::from_seed(42);
        let b = RandomNames::from_seed(42);
        for _ in 0..5 {
            assert_eq!(a.prefixed_name("pr-"), b.prefixed_name("pr-"));
        }
    }

    #[test]
    fn successive_names_differ() {
        let names = RandomNames::from_seed(1);
        let first = names.prefixed_name("pr-");
        let distinct = (0..20).any(|_| names.prefixed_name("pr-") != first);
        assert!(distinct);
    }

    #[test]
    fn closures_are_generators() {
        let fixed = |p: &str| format!("{p}x");
        assert_eq!(fixed.prefixed_name("pr-"), "pr-x");
    }
}
