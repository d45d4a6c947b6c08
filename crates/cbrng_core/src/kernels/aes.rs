//! AES-based generators: AES-128/192/256 and ARS.
//!
//! Blocks are four `u32` words. The AES state is the 16 little-endian bytes
//! of those words, so the counter word `0x03020100` holds state bytes
//! `00 01 02 03`. Keys are converted the same way before the FIPS-197 key
//! expansion.
//!
//! ARS (AES Random Stream) replaces the key expansion with a Weyl sequence
//! on the two 64-bit halves of the key and runs a reduced number of rounds.
//!
//! The scalar round function here is byte-oriented; it is the reference
//! for the AES-NI backend, which consumes the same [`RoundKeys`].

use super::{Cbrng, Family};
use crate::types::WordArray;

/// Largest number of round keys a schedule can hold (AES-256: 14 rounds).
pub const MAX_ROUND_KEYS: usize = 15;

const ARS_WEYL: [u64; 2] = [0x9E37_79B9_7F4A_7C15, 0xBB67_AE85_84CA_A73B];

const fn xtime(x: u8) -> u8 {
    (x << 1) ^ if x & 0x80 != 0 { 0x1B } else { 0 }
}

const fn build_sbox() -> [u8; 256] {
    let mut sbox = [0u8; 256];
    let mut p: u8 = 1;
    let mut q: u8 = 1;
    loop {
        // p walks the multiplicative group by powers of 3; q tracks p^-1.
        p = p ^ (p << 1) ^ if p & 0x80 != 0 { 0x1B } else { 0 };
        q ^= q << 1;
        q ^= q << 2;
        q ^= q << 4;
        if q & 0x80 != 0 {
            q ^= 0x09;
        }
        let affine =
            q ^ q.rotate_left(1) ^ q.rotate_left(2) ^ q.rotate_left(3) ^ q.rotate_left(4);
        sbox[p as usize] = affine ^ 0x63;
        if p == 1 {
            break;
        }
    }
    sbox[0] = 0x63;
    sbox
}

/// The AES S-box.
pub const SBOX: [u8; 256] = build_sbox();

/// Expanded round keys, each the 16-byte AddRoundKey operand.
///
/// Key `0` is XORed before the first round and key `rounds` is used by the
/// final round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoundKeys {
    keys: [[u8; 16]; MAX_ROUND_KEYS],
    rounds: usize,
}

impl RoundKeys {
    /// Number of rounds the schedule drives.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The `rounds + 1` round keys in use.
    #[inline]
    pub fn as_slice(&self) -> &[[u8; 16]] {
        &self.keys[..=self.rounds]
    }

    /// FIPS-197 key expansion for a 16, 24 or 32 byte key.
    fn expand(key: &[u8], rounds: usize) -> Self {
        let nk = key.len() / 4;
        let total = 4 * (rounds + 1);
        let mut w = [[0u8; 4]; 4 * MAX_ROUND_KEYS];
        for (i, word) in w.iter_mut().take(nk).enumerate() {
            word.copy_from_slice(&key[4 * i..4 * i + 4]);
        }
        let mut rcon = 1u8;
        for i in nk..total {
            let mut temp = w[i - 1];
            if i % nk == 0 {
                temp = [
                    SBOX[temp[1] as usize] ^ rcon,
                    SBOX[temp[2] as usize],
                    SBOX[temp[3] as usize],
                    SBOX[temp[0] as usize],
                ];
                rcon = xtime(rcon);
            } else if nk > 6 && i % nk == 4 {
                temp = temp.map(|b| SBOX[b as usize]);
            }
            for (j, byte) in temp.iter().enumerate() {
                w[i][j] = w[i - nk][j] ^ byte;
            }
        }

        let mut keys = [[0u8; 16]; MAX_ROUND_KEYS];
        for (r, round_key) in keys.iter_mut().take(rounds + 1).enumerate() {
            for c in 0..4 {
                round_key[4 * c..4 * c + 4].copy_from_slice(&w[4 * r + c]);
            }
        }
        Self { keys, rounds }
    }

    /// ARS Weyl schedule: each 64-bit half of the key advances by its own
    /// constant per round.
    fn weyl(key: &[u32; 4], rounds: usize) -> Self {
        let mut halves = [
            key[0] as u64 | (key[1] as u64) << 32,
            key[2] as u64 | (key[3] as u64) << 32,
        ];
        let mut keys = [[0u8; 16]; MAX_ROUND_KEYS];
        for round_key in keys.iter_mut().take(rounds + 1) {
            round_key[..8].copy_from_slice(&halves[0].to_le_bytes());
            round_key[8..].copy_from_slice(&halves[1].to_le_bytes());
            halves[0] = halves[0].wrapping_add(ARS_WEYL[0]);
            halves[1] = halves[1].wrapping_add(ARS_WEYL[1]);
        }
        Self { keys, rounds }
    }
}

#[inline(always)]
fn add_round_key(state: &mut [u8; 16], key: &[u8; 16]) {
    for (s, k) in state.iter_mut().zip(key) {
        *s ^= k;
    }
}

#[inline(always)]
fn sub_shift(state: &[u8; 16]) -> [u8; 16] {
    // Byte 4c + r is row r of column c; row r rotates left by r columns.
    let mut out = [0u8; 16];
    for c in 0..4 {
        for r in 0..4 {
            out[4 * c + r] = SBOX[state[4 * ((c + r) % 4) + r] as usize];
        }
    }
    out
}

#[inline(always)]
fn mix_columns(state: &mut [u8; 16]) {
    for column in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [column[0], column[1], column[2], column[3]];
        let all = a0 ^ a1 ^ a2 ^ a3;
        column[0] = a0 ^ all ^ xtime(a0 ^ a1);
        column[1] = a1 ^ all ^ xtime(a1 ^ a2);
        column[2] = a2 ^ all ^ xtime(a2 ^ a3);
        column[3] = a3 ^ all ^ xtime(a3 ^ a0);
    }
}

/// One full AES round: SubBytes, ShiftRows, MixColumns, AddRoundKey.
///
/// Matches the semantics of the `AESENC` instruction.
#[inline]
pub fn aes_round(state: &mut [u8; 16], key: &[u8; 16]) {
    *state = sub_shift(state);
    mix_columns(state);
    add_round_key(state, key);
}

/// Final AES round without MixColumns, as `AESENCLAST`.
#[inline]
pub fn aes_last_round(state: &mut [u8; 16], key: &[u8; 16]) {
    *state = sub_shift(state);
    add_round_key(state, key);
}

/// Encrypts one 4x32 block with the given schedule.
pub fn encrypt_block(keys: &RoundKeys, block: &mut [u32; 4]) {
    let mut state = [0u8; 16];
    block.write_le_bytes(&mut state);
    let round_keys = keys.as_slice();
    add_round_key(&mut state, &round_keys[0]);
    for key in &round_keys[1..keys.rounds] {
        aes_round(&mut state, key);
    }
    aes_last_round(&mut state, &round_keys[keys.rounds]);
    for (word, chunk) in block.iter_mut().zip(state.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

/// Marker for generators that run the AES round function on 4x32 blocks
/// with a [`RoundKeys`] schedule.
pub trait AesFamily: Cbrng<Word = u32, Block = [u32; 4], Schedule = RoundKeys> {}

/// AES-128 in counter mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aes128;

/// AES-192 in counter mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aes192;

/// AES-256 in counter mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aes256;

/// ARS with `R` rounds (default 5).
///
/// # Examples
/// ```
/// use cbrng_core::kernels::{Ars, Cbrng};
///
/// let out = <Ars>::generate(&[0; 4], &[0; 4]);
/// assert_eq!(out, [0x7ecce06f, 0x7cdc3bca, 0x15513c87, 0x29d24c9b]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ars<const R: usize = 5>;

macro_rules! aes {
    ($ty:ident, $key_words:literal, $rounds:literal, $name:literal) => {
        impl Cbrng for $ty {
            type Word = u32;
            type Key = [u32; $key_words];
            type Block = [u32; 4];
            type Schedule = RoundKeys;

            const NAME: &'static str = $name;
            const FAMILY: Family = Family::Aes;
            const ROUNDS: usize = $rounds;

            fn schedule(key: &[u32; $key_words]) -> RoundKeys {
                RoundKeys::expand(&key.to_le_bytes(), $rounds)
            }

            #[inline]
            fn encrypt(schedule: &RoundKeys, block: &mut [u32; 4]) {
                encrypt_block(schedule, block);
            }
        }

        impl AesFamily for $ty {}
    };
}

aes!(Aes128, 4, 10, "aes128");
aes!(Aes192, 6, 12, "aes192");
aes!(Aes256, 8, 14, "aes256");

impl<const R: usize> Cbrng for Ars<R> {
    type Word = u32;
    type Key = [u32; 4];
    type Block = [u32; 4];
    type Schedule = RoundKeys;

    const NAME: &'static str = "ars";
    const FAMILY: Family = Family::Ars;
    const ROUNDS: usize = {
        assert!(
            R > 0 && R < MAX_ROUND_KEYS,
            "ARS round count must be between 1 and 14"
        );
        R
    };

    fn schedule(key: &[u32; 4]) -> RoundKeys {
        RoundKeys::weyl(key, Self::ROUNDS)
    }

    #[inline]
    fn encrypt(schedule: &RoundKeys, block: &mut [u32; 4]) {
        encrypt_block(schedule, block);
    }
}

impl<const R: usize> AesFamily for Ars<R> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sbox_spot_values() {
        assert_eq!(SBOX[0x00], 0x63);
        assert_eq!(SBOX[0x01], 0x7C);
        assert_eq!(SBOX[0x53], 0xED);
        assert_eq!(SBOX[0xFF], 0x16);
    }

    #[test]
    fn test_sbox_is_permutation() {
        let mut seen = [false; 256];
        for &b in SBOX.iter() {
            seen[b as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_aes128_expansion_last_round_key() {
        // FIPS-197 appendix A.1 key 2b7e1516 28aed2a6 abf71588 09cf4f3c.
        let key = [
            0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf,
            0x4f, 0x3c,
        ];
        let keys = RoundKeys::expand(&key, 10);
        assert_eq!(
            keys.as_slice()[10],
            [
                0xd0, 0x14, 0xf9, 0xa8, 0xc9, 0xee, 0x25, 0x89, 0xe1, 0x3f, 0x0c, 0xc8, 0xb6, 0x63,
                0x0c, 0xa6
            ]
        );
    }

    #[test]
    fn test_ars_schedule_first_keys() {
        let keys = RoundKeys::weyl(&[0; 4], 5);
        assert_eq!(keys.as_slice().len(), 6);
        assert_eq!(keys.as_slice()[0], [0u8; 16]);
        assert_eq!(&keys.as_slice()[1][..8], &ARS_WEYL[0].to_le_bytes());
        assert_eq!(&keys.as_slice()[1][8..], &ARS_WEYL[1].to_le_bytes());
    }

    #[test]
    fn test_fips197_aes128() {
        let key = [0x03020100, 0x07060504, 0x0b0a0908, 0x0f0e0d0c];
        let plaintext = [0x33221100, 0x77665544, 0xbbaa9988, 0xffeeddcc];
        assert_eq!(
            Aes128::generate(&key, &plaintext),
            [0xd8e0c469, 0x30047b6a, 0x80b7cdd8, 0x5ac5b470]
        );
    }
}
