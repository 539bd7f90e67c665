//! Twofish Core Implementation
//!
//! This module provides the core functionality of the Twofish block cipher:
//! the Galois-field helpers, the fixed Q permutations, the key schedule,
//! and single-block encryption and decryption.
//!
//! Twofish is a 16-round Feistel network over 128-bit blocks with
//! key-dependent S-boxes. The key schedule derives 40 round subkeys and a
//! set of S-box words from a 128-, 192-, or 256-bit key; the round function
//! combines the key-dependent `g` function with a pseudo-Hadamard transform
//! and one-bit rotations. Input and output whitening XOR the first and last
//! four subkeys into the block.
//!
//! # Features
//!
//! - Supports Twofish-128, Twofish-192, and Twofish-256 key sizes.
//! - Expands the key once per [`Twofish`] instance; the schedule is
//!   immutable afterwards and wiped from memory when the instance drops.
//! - Precomputes the Q0/Q1 byte permutations as 256-entry tables at
//!   compile time.
//! - Provides `derive_key` to build a valid key from arbitrary material by
//!   SHA-256 truncation.
//!
//! # Usage
//!
//! This module handles single 16-byte blocks only. Modes of operation
//! (ECB, CBC) and padding are layered on top by the sibling modules.
//!
//! # Examples
//!
//! Basic usage for encrypting and decrypting a single block:
//!
//! ```
//! use soft_twofish::twofish::Twofish;
//!
//! let cipher = Twofish::new(b"0123456789abcdef").expect("Cipher init failed");
//!
//! let plaintext = *b"ABCDEFGHIJKLMNOP";
//! let ciphertext = cipher.encrypt_block(&plaintext).expect("Encryption failed");
//! let decrypted = cipher.decrypt_block(&ciphertext).expect("Decryption failed");
//!
//! assert_eq!(decrypted, plaintext);
//! ```
//!
//! # Notes
//!
//! - The implementation follows "Twofish: A 128-Bit Block Cipher" by
//!   Schneier, Kelsey, Whiting, Wagner, Hall and Ferguson, 1998.
//! - Blocks are mapped to 32-bit words little-endian; the schedule maps key
//!   bytes to words big-endian. The matrix helpers return their output in
//!   reversed byte order. Both conventions are load-bearing: the known
//!   answer vectors only reproduce with this exact byte ordering.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

// Twofish block size is fixed at 16 bytes.
pub const TWOFISH_BLOCK_SIZE: usize = 16;

/// Twofish key size constants define the key sizes used by the cipher for
/// the three standard variations of Twofish.
pub const TWOFISH_128_KEY_SIZE: usize = 16;
pub const TWOFISH_192_KEY_SIZE: usize = 24;
pub const TWOFISH_256_KEY_SIZE: usize = 32;

// Number of Feistel rounds.
const ROUNDS: usize = 16;

// Round subkeys: 8 whitening words plus 2 per round.
const SUBKEY_COUNT: usize = 2 * (ROUNDS + 4);

/// Primitive polynomial for the MDS matrix field, x^8 + x^6 + x^5 + x^3 + 1.
pub const GF_MOD: u32 = 0x169;

/// Primitive polynomial for the RS matrix field, x^8 + x^6 + x^3 + x^2 + 1.
pub const RS_MOD: u32 = 0x14D;

/// The MDS (Maximum Distance Separable) matrix diffuses the four output
/// bytes of the S-box stage across the 32-bit result of `h`.
const MDS: [[u8; 4]; 4] = [
    [0x01, 0xEF, 0x5B, 0x5B],
    [0x5B, 0xEF, 0xEF, 0x01],
    [0xEF, 0x5B, 0x01, 0xEF],
    [0xEF, 0x01, 0xEF, 0x5B],
];

/// The RS (Reed-Solomon) matrix condenses eight key bytes into the four
/// bytes of one S-box word during the key schedule.
const RS: [[u8; 8]; 4] = [
    [0x01, 0xA4, 0x55, 0x87, 0x5A, 0x58, 0xDB, 0x9E],
    [0xA4, 0x56, 0x82, 0xF3, 0x1E, 0xC6, 0x68, 0xE5],
    [0x02, 0xA1, 0xFC, 0xC1, 0x47, 0xAE, 0x3D, 0x19],
    [0xA4, 0x55, 0x87, 0x5A, 0x58, 0xDB, 0x9E, 0x03],
];

/// 4-bit sub-permutations from which the Q0 byte permutation is built.
const Q0_NIBBLES: [[u8; 16]; 4] = [
    [0x8, 0x1, 0x7, 0xD, 0x6, 0xF, 0x3, 0x2, 0x0, 0xB, 0x5, 0x9, 0xE, 0xC, 0xA, 0x4],
    [0xE, 0xC, 0xB, 0x8, 0x1, 0x2, 0x3, 0x5, 0xF, 0x4, 0xA, 0x6, 0x7, 0x0, 0x9, 0xD],
    [0xB, 0xA, 0x5, 0xE, 0x6, 0xD, 0x9, 0x0, 0xC, 0x8, 0xF, 0x3, 0x2, 0x4, 0x7, 0x1],
    [0xD, 0x7, 0xF, 0x4, 0x1, 0x2, 0x6, 0xE, 0x9, 0xB, 0x3, 0x0, 0x8, 0x5, 0xC, 0xA],
];

/// 4-bit sub-permutations from which the Q1 byte permutation is built.
const Q1_NIBBLES: [[u8; 16]; 4] = [
    [0x2, 0x8, 0xB, 0xD, 0xF, 0x7, 0x6, 0xE, 0x3, 0x1, 0x9, 0x4, 0x0, 0xA, 0xC, 0x5],
    [0x1, 0xE, 0x2, 0xB, 0x4, 0xC, 0x3, 0x7, 0x6, 0xD, 0xA, 0x5, 0xF, 0x9, 0x0, 0x8],
    [0x4, 0xC, 0x7, 0x5, 0x1, 0x6, 0x9, 0xA, 0x0, 0xE, 0xD, 0x8, 0x2, 0xB, 0x3, 0xF],
    [0xB, 0x9, 0x5, 0x1, 0xC, 0x3, 0xD, 0xE, 0x6, 0x4, 0x7, 0xF, 0x2, 0x0, 0x8, 0xA],
];

/// Rotate a 4-bit value right by `n` bits.
const fn ror4(x: u8, n: u32) -> u8 {
    ((x >> n) | (x << (4 - n))) & 0x0F
}

/// Map one byte through the 4-round nibble mixing that defines a Q
/// permutation.
///
/// The byte is split into nibbles, mixed (XOR, a one-bit nibble rotation,
/// and a multiply-by-8), passed through the first pair of 4-bit tables,
/// mixed again, and passed through the second pair. The output nibbles are
/// recombined with the second table output as the high nibble.
const fn q_permute(x: u8, q: &[[u8; 16]; 4]) -> u8 {
    let a0 = x >> 4;
    let b0 = x & 0x0F;
    let a1 = a0 ^ b0;
    let b1 = (a0 ^ ror4(b0, 1) ^ (a0 << 3)) & 0x0F;
    let a2 = q[0][a1 as usize];
    let b2 = q[1][b1 as usize];
    let a3 = a2 ^ b2;
    let b3 = (a2 ^ ror4(b2, 1) ^ (a2 << 3)) & 0x0F;
    let a4 = q[2][a3 as usize];
    let b4 = q[3][b3 as usize];
    (b4 << 4) | a4
}

/// Expand a set of 4-bit sub-permutations into a full 256-entry table.
const fn build_q_table(q: &[[u8; 16]; 4]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x = 0;
    while x < 256 {
        table[x] = q_permute(x as u8, q);
        x += 1;
    }
    table
}

/// The Q0 byte permutation, precomputed at compile time.
const Q0: [u8; 256] = build_q_table(&Q0_NIBBLES);

/// The Q1 byte permutation, precomputed at compile time.
const Q1: [u8; 256] = build_q_table(&Q1_NIBBLES);

/// Fixed pattern selecting which Q permutation applies to each byte lane at
/// each stage of `h`. Stage `i + 1` is used when XORing the word `L[i]`;
/// stage 0 is the final permutation pass before the MDS multiply.
const QDONE: [[&[u8; 256]; 4]; 5] = [
    [&Q1, &Q0, &Q1, &Q0],
    [&Q0, &Q0, &Q1, &Q1],
    [&Q0, &Q1, &Q0, &Q1],
    [&Q1, &Q1, &Q0, &Q0],
    [&Q1, &Q0, &Q0, &Q1],
];

/// Carry-less (polynomial) multiplication of two field elements.
fn poly_mult(a: u8, b: u8) -> u32 {
    let mut a = a as u32;
    let mut b = b as u32;
    let mut t = 0;
    while a != 0 {
        if a & 1 != 0 {
            t ^= b;
        }
        b <<= 1;
        a >>= 1;
    }
    t
}

/// Reduce a polynomial product modulo the given irreducible polynomial.
fn gf_mod(mut t: u32, modulus: u32) -> u8 {
    let mut modulus = modulus << 7;
    for _ in 0..8 {
        let tt = t ^ modulus;
        if tt < t {
            t = tt;
        }
        modulus >>= 1;
    }
    t as u8
}

/// Multiply two elements of GF(2^8).
///
/// # Parameters
///
/// * `a`, `b`: The elements to multiply, represented as bytes.
/// * `modulus`: The irreducible polynomial of the field, [`GF_MOD`] for the
///   MDS matrix or [`RS_MOD`] for the RS matrix.
///
/// # Returns
///
/// The product of the two elements in GF(2^8).
pub fn gf_mult(a: u8, b: u8, modulus: u32) -> u8 {
    gf_mod(poly_mult(a, b), modulus)
}

/// Multiply a matrix by a column vector over GF(2^8).
///
/// # Parameters
///
/// * `matrix`: The matrix, one row per output byte.
/// * `vector`: The input vector; its length must equal the row width.
/// * `modulus`: The irreducible polynomial of the field.
///
/// # Returns
///
/// The product vector in **reversed** order: the first row's dot product
/// lands in the last output byte. The cipher's byte ordering depends on
/// this reversal; callers that want the natural order reverse the result.
pub fn matrix_multiply<const R: usize, const C: usize>(
    matrix: &[[u8; C]; R],
    vector: &[u8; C],
    modulus: u32,
) -> [u8; R] {
    let mut result = [0u8; R];
    for j in 0..R {
        let mut t = 0;
        for k in 0..C {
            t ^= gf_mult(matrix[j][k], vector[k], modulus);
        }
        result[R - 1 - j] = t;
    }
    result
}

/// The keyed `h` function at the heart of the schedule and round function.
///
/// The input word is decomposed into bytes with index 0 holding the least
/// significant byte. For each word of `list`, from last to first, every
/// byte lane is passed through its Q permutation for that stage and XORed
/// with the corresponding byte of the word taken in big-endian order. After
/// a final permutation pass the four bytes are diffused through the MDS
/// matrix and repacked big-endian.
fn h(x: u32, list: &[u32]) -> u32 {
    let mut y = x.to_le_bytes();

    for i in (0..list.len()).rev() {
        let l = list[i].to_be_bytes();
        let stage = &QDONE[i + 1];
        for j in 0..4 {
            y[j] = stage[j][y[j] as usize] ^ l[j];
        }
    }

    for j in 0..4 {
        y[j] = QDONE[0][j][y[j] as usize];
    }

    let z = matrix_multiply(&MDS, &y, GF_MOD);
    u32::from_be_bytes(z)
}

/// Validate the key length for Twofish encryption or decryption.
///
/// The length must be one of the standard Twofish key sizes: 128 bits
/// (16 bytes), 192 bits (24 bytes), or 256 bits (32 bytes).
fn validate_key_len(key_len: usize) -> Result<()> {
    match key_len {
        TWOFISH_128_KEY_SIZE | TWOFISH_192_KEY_SIZE | TWOFISH_256_KEY_SIZE => Ok(()),
        _ => Err(Error::BadKeyLength(key_len)),
    }
}

/// Derive a valid Twofish key of the requested size from arbitrary input.
///
/// The material is hashed with SHA-256 and the digest truncated to the
/// requested size, so any byte string (a passphrase, for example) maps
/// deterministically to a usable key.
///
/// # Parameters
///
/// * `material`: Arbitrary bytes to derive the key from.
/// * `size`: The desired key size in bytes; must be 16, 24, or 32.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The derived key of exactly `size` bytes.
/// * `Err(Error::BadKeyLength)` - If `size` is not a valid key size.
pub fn derive_key(material: &[u8], size: usize) -> Result<Vec<u8>> {
    validate_key_len(size)?;
    let digest = Sha256::digest(material);
    Ok(digest[..size].to_vec())
}

/// A Twofish cipher instance holding the expanded key schedule.
///
/// The schedule (40 round subkeys plus the S-box words) is computed once in
/// the constructor and never changes. Key-derived state is zeroized when
/// the instance is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Twofish {
    subkeys: [u32; SUBKEY_COUNT],
    sbox_key: Vec<u32>,
}

impl Twofish {
    /// Create a cipher instance from a 16-, 24-, or 32-byte key.
    ///
    /// # Parameters
    ///
    /// * `key`: The cipher key; its length selects Twofish-128, -192, or
    ///   -256.
    ///
    /// # Returns
    ///
    /// * `Ok(Twofish)` - A ready-to-use cipher instance.
    /// * `Err(Error::BadKeyLength)` - If the key length is invalid.
    pub fn new(key: &[u8]) -> Result<Self> {
        validate_key_len(key.len())?;
        Ok(Self::expand(key))
    }

    /// Create a cipher instance from arbitrary key material.
    ///
    /// The material is reduced with [`derive_key`] to the closest valid key
    /// size: up to 16 bytes of input derive a 128-bit key, up to 24 bytes a
    /// 192-bit key, and anything longer a 256-bit key.
    pub fn new_derived(material: &[u8]) -> Self {
        let size = if material.len() <= TWOFISH_128_KEY_SIZE {
            TWOFISH_128_KEY_SIZE
        } else if material.len() <= TWOFISH_192_KEY_SIZE {
            TWOFISH_192_KEY_SIZE
        } else {
            TWOFISH_256_KEY_SIZE
        };
        let digest = Sha256::digest(material);
        Self::expand(&digest[..size])
    }

    /// Run the key schedule. `key` must already be validated.
    fn expand(key: &[u8]) -> Self {
        let k = key.len() / 8;

        // Big-endian key words, split into even and odd halves.
        let words: Vec<u32> = key
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        let me: Vec<u32> = words.iter().copied().step_by(2).collect();
        let mo: Vec<u32> = words.iter().skip(1).copied().step_by(2).collect();

        // S-box words: each pair of key words is condensed through the RS
        // matrix. The result list is reversed relative to the pair index.
        let mut sbox_key = vec![0u32; k];
        for i in 0..k {
            let mut v = [0u8; 8];
            v[..4].copy_from_slice(&me[i].to_be_bytes());
            v[4..].copy_from_slice(&mo[i].to_be_bytes());
            let mut prod = matrix_multiply(&RS, &v, RS_MOD);
            prod.reverse();
            sbox_key[k - 1 - i] = u32::from_be_bytes(prod);
        }

        // Round subkeys via h over the even/odd halves and a PHT.
        const RHO: u32 = 0x01010101;
        let mut subkeys = [0u32; SUBKEY_COUNT];
        for i in 0..(ROUNDS + 4) {
            let a = h((2 * i as u32).wrapping_mul(RHO), &me);
            let b = h((2 * i as u32 + 1).wrapping_mul(RHO), &mo).rotate_left(8);
            subkeys[2 * i] = a.wrapping_add(b);
            subkeys[2 * i + 1] = a.wrapping_add(b.wrapping_mul(2)).rotate_left(9);
        }

        Twofish { subkeys, sbox_key }
    }

    /// The key-dependent `g` function: `h` applied over the S-box words.
    fn g(&self, x: u32) -> u32 {
        h(x, &self.sbox_key)
    }

    /// The round function `F`: two `g` evaluations combined by a
    /// pseudo-Hadamard transform with the round subkeys.
    fn round_f(&self, r0: u32, r1: u32, round: usize) -> (u32, u32) {
        let t0 = self.g(r0);
        let t1 = self.g(r1.rotate_left(8));
        let f0 = t0.wrapping_add(t1).wrapping_add(self.subkeys[2 * round + 8]);
        let f1 = t0
            .wrapping_add(t1.wrapping_mul(2))
            .wrapping_add(self.subkeys[2 * round + 9]);
        (f0, f1)
    }

    /// Encrypt a single block.
    ///
    /// # Parameters
    ///
    /// * `block`: The plaintext block; must be exactly 16 bytes.
    ///
    /// # Returns
    ///
    /// * `Ok([u8; TWOFISH_BLOCK_SIZE])` - The ciphertext block.
    /// * `Err(Error::BadBlockSize)` - If the input is not exactly 16 bytes.
    pub fn encrypt_block(&self, block: &[u8]) -> Result<[u8; TWOFISH_BLOCK_SIZE]> {
        let mut r = self.load_block(block, 0)?;

        for round in 0..ROUNDS {
            let (f0, f1) = self.round_f(r[0], r[1], round);
            let nr2 = (r[2] ^ f0).rotate_right(1);
            let nr3 = r[3].rotate_left(1) ^ f1;
            r = if round < ROUNDS - 1 {
                // Swap the halves between rounds.
                [nr2, nr3, r[0], r[1]]
            } else {
                [r[0], r[1], nr2, nr3]
            };
        }

        Ok(self.store_block(&r, 4))
    }

    /// Decrypt a single block.
    ///
    /// The exact inverse of [`Twofish::encrypt_block`]: output whitening
    /// keys on entry, rounds in reverse order with the rotations undone,
    /// input whitening keys on exit.
    ///
    /// # Parameters
    ///
    /// * `block`: The ciphertext block; must be exactly 16 bytes.
    ///
    /// # Returns
    ///
    /// * `Ok([u8; TWOFISH_BLOCK_SIZE])` - The plaintext block.
    /// * `Err(Error::BadBlockSize)` - If the input is not exactly 16 bytes.
    pub fn decrypt_block(&self, block: &[u8]) -> Result<[u8; TWOFISH_BLOCK_SIZE]> {
        let mut r = self.load_block(block, 4)?;

        for round in (0..ROUNDS).rev() {
            let (f0, f1) = self.round_f(r[0], r[1], round);
            let nr2 = r[2].rotate_left(1) ^ f0;
            let nr3 = (r[3] ^ f1).rotate_right(1);
            r = if round > 0 {
                [nr2, nr3, r[0], r[1]]
            } else {
                [r[0], r[1], nr2, nr3]
            };
        }

        Ok(self.store_block(&r, 0))
    }

    /// Load a block into four little-endian words and apply whitening with
    /// the four subkeys starting at `subkey_offset`.
    fn load_block(&self, block: &[u8], subkey_offset: usize) -> Result<[u32; 4]> {
        if block.len() != TWOFISH_BLOCK_SIZE {
            return Err(Error::BadBlockSize(block.len()));
        }

        let mut r = [0u32; 4];
        for (i, chunk) in block.chunks_exact(4).enumerate() {
            let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            r[i] = word ^ self.subkeys[subkey_offset + i];
        }
        Ok(r)
    }

    /// Apply whitening with the four subkeys starting at `subkey_offset`
    /// and store the words back as little-endian bytes.
    fn store_block(&self, r: &[u32; 4], subkey_offset: usize) -> [u8; TWOFISH_BLOCK_SIZE] {
        let mut block = [0u8; TWOFISH_BLOCK_SIZE];
        for i in 0..4 {
            let word = r[i] ^ self.subkeys[subkey_offset + i];
            block[i * 4..(i + 1) * 4].copy_from_slice(&word.to_le_bytes());
        }
        block
    }
}
