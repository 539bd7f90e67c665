//! Big-Integer Scaffolding
//!
//! Number-theoretic helpers shared by the public-key code: the extended
//! Euclidean algorithm, modular inversion, Miller-Rabin primality testing,
//! and random prime generation backed by the operating system CSPRNG.
//!
//! Modular exponentiation is not reimplemented here; `BigUint::modpow`
//! already provides it.

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::rngs::OsRng;

use crate::error::{Error, Result};

// Witness count for Miller-Rabin. Each round has error probability at most
// 1/4, so 32 rounds give >= 64-bit confidence.
const MILLER_RABIN_ROUNDS: usize = 32;

// Candidates examined before a prime search gives up.
const PRIME_SEARCH_ATTEMPTS: usize = 100_000;

/// Small primes used for trial division before the Miller-Rabin rounds.
const SMALL_PRIMES: [u32; 46] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199,
];

/// Extended Euclidean algorithm.
///
/// Returns `(g, x, y)` such that `a*x + b*y = g = gcd(a, b)`.
pub fn egcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    (old_r, old_s, old_t)
}

/// Modular inverse of `a` modulo `modulus`.
///
/// Returns `None` when `gcd(a, modulus) != 1`, in which case no inverse
/// exists.
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    let a = BigInt::from(a.clone());
    let m = BigInt::from(modulus.clone());

    let (g, x, _) = egcd(&a, &m);
    if !g.is_one() {
        return None;
    }

    let x = ((x % &m) + &m) % &m;
    x.to_biguint()
}

/// Miller-Rabin primality test with random witnesses.
///
/// Trial-divides by a fixed list of small primes first, then runs `rounds`
/// Miller-Rabin rounds with bases drawn uniformly from `[2, n - 2]`. A
/// composite survives with probability at most `4^-rounds`.
pub fn is_probable_prime(candidate: &BigUint, rounds: usize) -> bool {
    let two = BigUint::from(2u32);

    if candidate < &two {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if candidate == &p {
            return true;
        }
        if (candidate % &p).is_zero() {
            return false;
        }
    }

    // Write candidate - 1 = d * 2^s with d odd.
    let n_minus_1 = candidate - 1u32;
    let s = n_minus_1
        .trailing_zeros()
        .unwrap_or(0);
    let d = &n_minus_1 >> s;

    let mut rng = OsRng;

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, candidate);

        if x.is_one() || x == n_minus_1 {
            continue;
        }

        for _ in 0..s.saturating_sub(1) {
            x = x.modpow(&two, candidate);
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Generate a random probable prime of exactly `bits` bits.
///
/// Candidates are drawn from the OS CSPRNG with the top and bottom bits
/// forced so the result has the requested bit length and is odd. Each
/// candidate is screened with [`is_probable_prime`].
///
/// # Returns
///
/// * `Ok(BigUint)` - A probable prime of the requested bit length.
/// * `Err(Error::KeyGenerationFailed)` - If the bit length is unusable or
///   the attempt budget runs out (practically unreachable for realistic
///   sizes).
pub fn generate_prime(bits: u64) -> Result<BigUint> {
    if bits < 2 {
        return Err(Error::KeyGenerationFailed);
    }

    let mut rng = OsRng;

    for _ in 0..PRIME_SEARCH_ATTEMPTS {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);

        if is_probable_prime(&candidate, MILLER_RABIN_ROUNDS) {
            return Ok(candidate);
        }
    }

    Err(Error::KeyGenerationFailed)
}
