use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use super::super::bigint::*;

#[test]
fn test_egcd_satisfies_bezout_identity() {
    let a = BigInt::from(240);
    let b = BigInt::from(46);

    let (g, x, y) = egcd(&a, &b);

    assert_eq!(g, BigInt::from(2), "gcd(240, 46) must be 2");
    assert_eq!(&a * &x + &b * &y, g, "Bezout coefficients must recombine");
}

#[test]
fn test_egcd_with_zero_operand() {
    let a = BigInt::zero();
    let b = BigInt::from(17);

    let (g, x, y) = egcd(&a, &b);

    assert_eq!(g, BigInt::from(17));
    assert_eq!(&a * &x + &b * &y, g);
}

#[test]
fn test_mod_inverse_small_values() {
    let inv = mod_inverse(&BigUint::from(3u32), &BigUint::from(11u32))
        .expect("3 is invertible mod 11");
    assert_eq!(inv, BigUint::from(4u32), "3 * 4 = 12 = 1 (mod 11)");

    let inv = mod_inverse(&BigUint::from(65537u32), &BigUint::from(1_000_003u32))
        .expect("e is invertible mod the prime");
    assert!(
        ((inv * 65537u32) % 1_000_003u32).is_one(),
        "Inverse must recombine to 1"
    );
}

#[test]
fn test_mod_inverse_fails_for_common_factor() {
    assert_eq!(
        mod_inverse(&BigUint::from(6u32), &BigUint::from(9u32)),
        None,
        "gcd(6, 9) = 3, no inverse exists"
    );
}

#[test]
fn test_is_probable_prime_known_values() {
    for p in [2u32, 3, 5, 17, 101, 7919, 65537] {
        assert!(
            is_probable_prime(&BigUint::from(p), 32),
            "{p} is prime"
        );
    }

    for n in [0u32, 1, 4, 100, 561, 6601, 65536] {
        assert!(
            !is_probable_prime(&BigUint::from(n), 32),
            "{n} is not prime (561 and 6601 are Carmichael numbers)"
        );
    }
}

#[test]
fn test_is_probable_prime_large_known_prime() {
    // 2^127 - 1, a Mersenne prime.
    let p = (BigUint::one() << 127u32) - 1u32;
    assert!(is_probable_prime(&p, 32));

    // Its square is composite yet has no small factors.
    assert!(!is_probable_prime(&(&p * &p), 32));
}

#[test]
fn test_generate_prime_bit_length_and_primality() {
    for bits in [64u64, 128] {
        let p = generate_prime(bits).expect("Prime generation failed");
        assert_eq!(p.bits(), bits, "Prime must have the requested bit length");
        assert!(is_probable_prime(&p, 32));
    }
}

#[test]
fn test_generate_prime_draws_fresh_entropy() {
    let p = generate_prime(64).expect("Prime generation failed");
    let q = generate_prime(64).expect("Prime generation failed");
    assert_ne!(p, q, "Two 64-bit draws colliding is vanishingly unlikely");
}

#[test]
fn test_generate_prime_rejects_degenerate_bit_length() {
    assert!(generate_prime(0).is_err());
    assert!(generate_prime(1).is_err());
}
