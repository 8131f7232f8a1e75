//! Safe-prime group generation and validation.
//!
//! Groups are of the "maximum security" safe-prime shape: `p = 2q + 1` with
//! both `p` and `q` prime, and a generator of the order-`q` subgroup of
//! quadratic residues. No prime-subgroup security-level tuning is applied;
//! the cost is extra modular multiplications, the gain is that subgroup
//! confinement attacks are off the table.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};

use crate::{Error, Result};

/// Smallest bit width for which the safe-prime construction is meaningful.
pub const MIN_GROUP_BITS: u64 = 6;

/// Miller-Rabin rounds applied to candidates during generation.
const GENERATION_ROUNDS: usize = 40;

/// A Diffie-Hellman group over a safe prime.
///
/// Immutable once created; a transaction that generated a group owns it and
/// shares it only through its serialized hex form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupParams {
    modulus: BigUint,
    order: BigUint,
    generator: BigUint,
}

impl GroupParams {
    /// Draws a fresh safe-prime group of exactly `bits` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSize`] when `bits` is below
    /// [`MIN_GROUP_BITS`]. Generation itself cannot fail; it retries until a
    /// safe prime is found.
    pub fn generate<R>(bits: u64, rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng,
    {
        if bits < MIN_GROUP_BITS {
            return Err(Error::InvalidSize(bits));
        }

        loop {
            // Pin the top and low bits so the order is odd and p = 2q + 1
            // lands on exactly `bits` bits.
            let mut order = rng.gen_biguint(bits - 1);
            order.set_bit(bits - 2, true);
            order.set_bit(0, true);
            if !miller_rabin(&order, GENERATION_ROUNDS, rng) {
                continue;
            }

            let modulus = &order * 2u32 + 1u32;
            if !miller_rabin(&modulus, GENERATION_ROUNDS, rng) {
                continue;
            }

            let generator = quadratic_residue(&modulus, rng);
            return Ok(Self {
                modulus,
                order,
                generator,
            });
        }
    }

    /// Reassembles a group from its three raw values, without validation.
    ///
    /// Callers that did not produce the values themselves must follow up
    /// with [`GroupParams::validate`].
    pub fn from_parts(modulus: BigUint, order: BigUint, generator: BigUint) -> Self {
        Self {
            modulus,
            order,
            generator,
        }
    }

    /// Probabilistic group-validity check.
    ///
    /// Runs `certainty` Miller-Rabin rounds on both primes, checks the
    /// `p = 2q + 1` structure, the generator's range, and `g^q ≡ 1 (mod p)`.
    /// Returns `false` rather than erroring; a `false` result is fatal to the
    /// generation attempt that produced the group.
    pub fn validate<R>(&self, certainty: usize, rng: &mut R) -> bool
    where
        R: RngCore + CryptoRng,
    {
        let one = BigUint::one();

        if self.modulus != &self.order * 2u32 + 1u32 {
            return false;
        }
        if self.generator <= one || self.generator >= &self.modulus - &one {
            return false;
        }
        if !miller_rabin(&self.order, certainty, rng) {
            return false;
        }
        if !miller_rabin(&self.modulus, certainty, rng) {
            return false;
        }

        self.generator.modpow(&self.order, &self.modulus).is_one()
    }

    /// The safe prime `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The subgroup order `q = (p - 1) / 2`.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// The generator of the order-`q` subgroup.
    pub fn generator(&self) -> &BigUint {
        &self.generator
    }
}

/// Draws a random generator of the order-`q` subgroup.
///
/// Squares of units form exactly that subgroup, so any square other than 1
/// generates it; candidates are drawn from `[2, p - 1)`, which excludes both
/// square roots of 1.
fn quadratic_residue<R>(modulus: &BigUint, rng: &mut R) -> BigUint
where
    R: RngCore + CryptoRng,
{
    let two = BigUint::from(2u32);
    loop {
        let h = rng.gen_biguint_range(&two, &(modulus - 1u32));
        let g = h.modpow(&two, modulus);
        if !g.is_one() {
            return g;
        }
    }
}

/// Miller-Rabin primality test with `rounds` independent witnesses.
fn miller_rabin<R>(n: &BigUint, rounds: usize, rng: &mut R) -> bool
where
    R: RngCore + CryptoRng,
{
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n < &two {
        return false;
    }
    if *n == two || *n == three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n - 1 as d * 2^s with d odd.
    let n_minus_1 = n - 1u32;
    let mut d = n_minus_1.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rng::SecureRng;

    #[test]
    fn generates_safe_prime_of_requested_width() {
        let mut rng = SecureRng::new();
        let group = GroupParams::generate(64, &mut rng).unwrap();

        assert_eq!(group.modulus().bits(), 64);
        assert_eq!(group.modulus(), &(group.order() * 2u32 + 1u32));
        assert!(miller_rabin(group.order(), 40, &mut rng));
        assert!(group
            .generator()
            .modpow(group.order(), group.modulus())
            .is_one());
    }

    #[test]
    fn generated_group_validates() {
        let mut rng = SecureRng::new();
        let group = GroupParams::generate(64, &mut rng).unwrap();
        assert!(group.validate(10, &mut rng));
    }

    #[test]
    fn minimum_width_is_supported() {
        let mut rng = SecureRng::new();
        let group = GroupParams::generate(MIN_GROUP_BITS, &mut rng).unwrap();
        assert_eq!(group.modulus().bits(), MIN_GROUP_BITS);
        assert!(group.validate(10, &mut rng));
    }

    #[test]
    fn rejects_undersized_request() {
        let mut rng = SecureRng::new();
        assert!(matches!(
            GroupParams::generate(5, &mut rng),
            Err(Error::InvalidSize(5))
        ));
    }

    #[test]
    fn validate_rejects_tampering() {
        let mut rng = SecureRng::new();
        let group = GroupParams::generate(64, &mut rng).unwrap();

        // p - 1 has order 2, not q.
        let bad_generator = GroupParams::from_parts(
            group.modulus().clone(),
            group.order().clone(),
            group.modulus() - 1u32,
        );
        assert!(!bad_generator.validate(10, &mut rng));

        // Broken p = 2q + 1 structure.
        let bad_order = GroupParams::from_parts(
            group.modulus().clone(),
            group.order() + 2u32,
            group.generator().clone(),
        );
        assert!(!bad_order.validate(10, &mut rng));
    }

    #[test]
    fn miller_rabin_knows_small_primes() {
        let mut rng = SecureRng::new();
        for prime in [2u32, 3, 5, 7, 11, 13, 10007] {
            assert!(miller_rabin(&BigUint::from(prime), 40, &mut rng), "{prime}");
        }
        for composite in [0u32, 1, 4, 9, 15, 10005] {
            assert!(
                !miller_rabin(&BigUint::from(composite), 40, &mut rng),
                "{composite}"
            );
        }
    }
}
