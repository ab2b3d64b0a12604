//! Module: fingerprint
//! Responsibility: deterministic structural identity for command and result
//! configurations.
//! Does not own: cache storage or processor construction.

mod hash_parts;

#[cfg(test)]
mod tests;

use crate::{command::CommandSpec, metadata::TypeDescriptor};
use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use std::fmt;

const COMBINE_FACTOR: u32 = 31;

///
/// Fingerprint
///
/// Arbitrary-precision identity of one builder configuration. Equal
/// configurations produce equal fingerprints within one process; the
/// encoding of type identities is not stable across builds.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fingerprint(BigUint);

impl Fingerprint {
    fn from_hasher(hasher: Sha256) -> Self {
        Self(BigUint::from_bytes_be(&hasher.finalize()))
    }

    /// Hash a command description.
    #[must_use]
    pub fn of_command(spec: &CommandSpec) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"cmdfp:v1");
        hash_parts::hash_command(&mut hasher, spec);

        Self::from_hasher(hasher)
    }

    /// Hash a bare type identity.
    #[must_use]
    pub fn of_type<T: ?Sized + 'static>() -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"typefp:v1");
        hash_parts::hash_type::<T>(&mut hasher);

        Self::from_hasher(hasher)
    }

    /// Hash the result-shape header (declared result-set count).
    #[must_use]
    pub(crate) fn of_result_arity(arity: usize) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"shapefp:v1");
        hash_parts::write_tag(&mut hasher, 0x30);
        hash_parts::write_u32(&mut hasher, u32::try_from(arity).unwrap_or(u32::MAX));

        Self::from_hasher(hasher)
    }

    /// Hash one result type with its mapping override keys.
    #[must_use]
    pub(crate) fn of_result_type<'a>(
        descriptor: &TypeDescriptor,
        cleared: bool,
        overrides: impl ExactSizeIterator<Item = &'a str>,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"resultfp:v1");
        hash_parts::hash_result_type(&mut hasher, descriptor, cleared, overrides);

        Self::from_hasher(hasher)
    }

    /// Fold another fingerprint into this one: `acc * 31 XOR next`.
    #[must_use]
    pub fn combine(&self, next: &Self) -> Self {
        Self((&self.0 * COMBINE_FACTOR) ^ &next.0)
    }

    /// Cache key for a processor type built from this configuration.
    #[must_use]
    pub fn for_processor<P: ?Sized + 'static>(&self) -> Self {
        self.combine(&Self::of_type::<P>())
    }

    #[must_use]
    pub const fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        self.0.to_str_radix(16)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}
