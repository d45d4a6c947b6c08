//! Known-answer vectors.
//!
//! Published Random123, Skein and FIPS-197 vectors for every algorithm at
//! its default round count. The tables drive the scalar tests in this crate
//! and the per-backend checks in the engine's conformance harness.

use crate::kernels::{
    Aes128, Aes192, Aes256, Ars, Cbrng, Philox2x32, Philox2x64, Philox4x32, Philox4x64,
    Threefish1024, Threefish256, Threefish512, Threefry16x64, Threefry2x32, Threefry2x64,
    Threefry4x32, Threefry4x64, Threefry8x64,
};

/// One `(key, counter) -> block` triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnownAnswer<A: Cbrng> {
    /// Key words.
    pub key: A::Key,
    /// Counter words.
    pub counter: A::Block,
    /// Expected output block.
    pub expected: A::Block,
}

impl<A: Cbrng> KnownAnswer<A> {
    /// Builds a triple.
    pub const fn new(key: A::Key, counter: A::Block, expected: A::Block) -> Self {
        Self {
            key,
            counter,
            expected,
        }
    }

    /// Returns `true` when the scalar kernel reproduces the expected block.
    pub fn holds(&self) -> bool {
        A::generate(&self.key, &self.counter) == self.expected
    }
}

/// Algorithms with a known-answer table.
pub trait KnownAnswers: Cbrng {
    /// Reference triples for this algorithm.
    fn known_answers() -> Vec<KnownAnswer<Self>>;
}

const PI32: [u32; 8] = [
    0x243f6a88, 0x85a308d3, 0x13198a2e, 0x03707344, 0xa4093822, 0x299f31d0, 0x082efa98,
    0xec4e6c89,
];
const PI64: [u64; 8] = [
    0x243f6a8885a308d3,
    0x13198a2e03707344,
    0xa4093822299f31d0,
    0x082efa98ec4e6c89,
    0x452821e638d01377,
    0xbe5466cf34e90c6c,
    0xc0ac29b7c97c50dd,
    0x3f84d5b5b5470917,
];

impl KnownAnswers for Philox2x32 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new([0], [0, 0], [0xff1dae59, 0x6cd10df2]),
            KnownAnswer::new([u32::MAX], [u32::MAX; 2], [0x2c3f628b, 0xab4fd7ad]),
            KnownAnswer::new([PI32[2]], [PI32[0], PI32[1]], [0xdd7ce038, 0xf62a4c12]),
        ]
    }
}

impl KnownAnswers for Philox4x32 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new(
                [0, 0],
                [0; 4],
                [0x6627e8d5, 0xe169c58d, 0xbc57ac4c, 0x9b00dbd8],
            ),
            KnownAnswer::new(
                [u32::MAX; 2],
                [u32::MAX; 4],
                [0x408f276d, 0x41c83b0e, 0xa20bc7c6, 0x6d5451fd],
            ),
            KnownAnswer::new(
                [PI32[4], PI32[5]],
                [PI32[0], PI32[1], PI32[2], PI32[3]],
                [0xd16cfe09, 0x94fdcceb, 0x5001e420, 0x24126ea1],
            ),
        ]
    }
}

impl KnownAnswers for Philox2x64 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new([0], [0, 0], [0xca00a0459843d731, 0x66c24222c9a845b5]),
            KnownAnswer::new(
                [u64::MAX],
                [u64::MAX; 2],
                [0x65b021d60cd8310f, 0x4d02f3222f86df20],
            ),
            KnownAnswer::new(
                [PI64[2]],
                [PI64[0], PI64[1]],
                [0x0a5e742c2997341c, 0xb0f883d38000de5d],
            ),
        ]
    }
}

impl KnownAnswers for Philox4x64 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new(
                [0, 0],
                [0; 4],
                [
                    0x16554d9eca36314c,
                    0xdb20fe9d672d0fdc,
                    0xd7e772cee186176b,
                    0x7e68b68aec7ba23b,
                ],
            ),
            KnownAnswer::new(
                [u64::MAX; 2],
                [u64::MAX; 4],
                [
                    0x87b092c3013fe90b,
                    0x438c3c67be8d0224,
                    0x9cc7d7c69cd777b6,
                    0xa09caebf594f0ba0,
                ],
            ),
            KnownAnswer::new(
                [PI64[4], PI64[5]],
                [PI64[0], PI64[1], PI64[2], PI64[3]],
                [
                    0xa528f45403e61d95,
                    0x38c72dbd566e9788,
                    0xa5a1610e72fd18b5,
                    0x57bd43b5e52b7fe6,
                ],
            ),
        ]
    }
}

impl KnownAnswers for Threefry2x32 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new([0, 0], [0, 0], [0x6b200159, 0x99ba4efe]),
            KnownAnswer::new([u32::MAX; 2], [u32::MAX; 2], [0x1cb996fc, 0xbb002be7]),
            KnownAnswer::new(
                [PI32[2], PI32[3]],
                [PI32[0], PI32[1]],
                [0xc4923a9c, 0x483df7a0],
            ),
        ]
    }
}

impl KnownAnswers for Threefry4x32 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new(
                [0; 4],
                [0; 4],
                [0x9c6ca96a, 0xe17eae66, 0xfc10ecd4, 0x5256a7d8],
            ),
            KnownAnswer::new(
                [u32::MAX; 4],
                [u32::MAX; 4],
                [0x2a881696, 0x57012287, 0xf6c7446e, 0xa16a6732],
            ),
            KnownAnswer::new(
                [PI32[4], PI32[5], PI32[6], PI32[7]],
                [PI32[0], PI32[1], PI32[2], PI32[3]],
                [0x59cd1dbb, 0xb8879579, 0x86b5d00c, 0xac8b6d84],
            ),
        ]
    }
}

impl KnownAnswers for Threefry2x64 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new([0, 0], [0, 0], [0xc2b6e3a8c2c69865, 0x6f81ed42f350084d]),
            KnownAnswer::new(
                [u64::MAX; 2],
                [u64::MAX; 2],
                [0xe02cb7c4d95d277a, 0xd06633d0893b8b68],
            ),
            KnownAnswer::new(
                [PI64[2], PI64[3]],
                [PI64[0], PI64[1]],
                [0x263c7d30bb0f0af1, 0x56be8361d3311526],
            ),
        ]
    }
}

impl KnownAnswers for Threefry4x64 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new(
                [0; 4],
                [0; 4],
                [
                    0x09218ebde6c85537,
                    0x55941f5266d86105,
                    0x4bd25e16282434dc,
                    0xee29ec846bd2e40b,
                ],
            ),
            KnownAnswer::new(
                [u64::MAX; 4],
                [u64::MAX; 4],
                [
                    0x29c24097942bba1b,
                    0x0371bbfb0f6f4e11,
                    0x3c231ffa33f83a1c,
                    0xcd29113fde32d168,
                ],
            ),
            KnownAnswer::new(
                [PI64[4], PI64[5], PI64[6], PI64[7]],
                [PI64[0], PI64[1], PI64[2], PI64[3]],
                [
                    0xbb893fd42eac50eb,
                    0x7ca8b22905f3443a,
                    0xe204b8dcb4daace7,
                    0x3e1070a2327bfc09,
                ],
            ),
        ]
    }
}

impl KnownAnswers for Threefry8x64 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![KnownAnswer::new(
            [0; 8],
            [0; 8],
            [
                0x31441949ce3e6c14,
                0x2ffd4c6137bc6980,
                0x3b5ec7b6ad7f9408,
                0x14e9f2cb0648b5ae,
                0x45940bfbe1a1d90d,
                0x7f78593045b1b2d0,
                0x16da6c005de7f9b4,
                0x785a4e49ad828252,
            ],
        )]
    }
}

impl KnownAnswers for Threefry16x64 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![KnownAnswer::new(
            [0; 16],
            [0; 16],
            [
                0x0494d3e984c25ef8,
                0x2df99727cf4d85dc,
                0x2968a7d710c2cc05,
                0x911124eb61a6268a,
                0x43e16e40755301f4,
                0x96caa1ef9ca41b28,
                0x45d53380d7a617f5,
                0x154cebb6030352ff,
                0xeef9dee689ad9c47,
                0x907d7d8ce2996642,
                0x941eb355bdfd2e60,
                0xf9e637a10758648e,
                0xf7a8a798ead5e99e,
                0xee5b141f9961f529,
                0x315bbf5a6e0e78b3,
                0xf65f3ae3e742a14f,
            ],
        )]
    }
}

impl KnownAnswers for Threefish256 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![KnownAnswer::new(
            [0; 4],
            [0; 4],
            [
                0x94eeea8b1f2ada84,
                0xadf103313eae6670,
                0x952419a1f4b16d53,
                0xd83f13e63c9f6b11,
            ],
        )]
    }
}

impl KnownAnswers for Threefish512 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![KnownAnswer::new(
            [0; 8],
            [0; 8],
            [
                0xbc2560efc6bba2b1,
                0xe3361f162238eb40,
                0xfb8631ee0abbd175,
                0x7b9479d4c5479ed1,
                0xcff0356e58f8c27b,
                0xb1b7b08430f0e7f7,
                0xe9a380a56139abf1,
                0xbe7b6d4aa11eb47e,
            ],
        )]
    }
}

impl KnownAnswers for Threefish1024 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![KnownAnswer::new(
            [0; 16],
            [0; 16],
            [
                0x04b3053d0a3d5cf0,
                0x0136e0d1c7dd85f7,
                0x067b212f6ea78a5c,
                0x0da9c10b4c54e1c6,
                0x0f4ec27394cbacf0,
                0x32437f0568ea4fd5,
                0xcff56d1d7654b49c,
                0xa2d5fb14369b2e7b,
                0x540306b460472e0b,
                0x71c18254bcea820d,
                0xc36b4068beaf32c8,
                0xfa4329597a360095,
                0xc4a36c28434a5b9a,
                0xd54331444b1046cf,
                0xdf11834830b2a460,
                0x1e39e8dfe1f7ee4f,
            ],
        )]
    }
}

/// FIPS-197 appendix C plaintext `00112233...eeff` as little-endian words.
const FIPS_PLAINTEXT: [u32; 4] = [0x33221100, 0x77665544, 0xbbaa9988, 0xffeeddcc];

/// FIPS-197 appendix C key bytes `00 01 02 ...` as little-endian words.
const FIPS_KEY: [u32; 8] = [
    0x03020100, 0x07060504, 0x0b0a0908, 0x0f0e0d0c, 0x13121110, 0x17161514, 0x1b1a1918,
    0x1f1e1d1c,
];

impl KnownAnswers for Aes128 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new(
                [FIPS_KEY[0], FIPS_KEY[1], FIPS_KEY[2], FIPS_KEY[3]],
                FIPS_PLAINTEXT,
                [0xd8e0c469, 0x30047b6a, 0x80b7cdd8, 0x5ac5b470],
            ),
            KnownAnswer::new(
                [0; 4],
                [0; 4],
                [0xd44be966, 0x3b2c8aef, 0x59fa4c88, 0x2e2b34ca],
            ),
        ]
    }
}

impl KnownAnswers for Aes192 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new(
                [
                    FIPS_KEY[0],
                    FIPS_KEY[1],
                    FIPS_KEY[2],
                    FIPS_KEY[3],
                    FIPS_KEY[4],
                    FIPS_KEY[5],
                ],
                FIPS_PLAINTEXT,
                [0xa47ca9dd, 0xe0df4c86, 0xa070af6e, 0x91710dec],
            ),
            KnownAnswer::new(
                [0; 6],
                [0; 4],
                [0x9269e0aa, 0xa352bfac, 0x6ea9f4e8, 0xd70b30c9],
            ),
        ]
    }
}

impl KnownAnswers for Aes256 {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new(
                FIPS_KEY,
                FIPS_PLAINTEXT,
                [0xcab7a28e, 0xbf456751, 0x9049fcea, 0x8960494b],
            ),
            KnownAnswer::new(
                [0; 8],
                [0; 4],
                [0x78c095dc, 0x898940a2, 0x14a248ad, 0x87208492],
            ),
        ]
    }
}

impl KnownAnswers for Ars {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new(
                [0; 4],
                [0; 4],
                [0x7ecce06f, 0x7cdc3bca, 0x15513c87, 0x29d24c9b],
            ),
            KnownAnswer::new(
                [u32::MAX; 4],
                [u32::MAX; 4],
                [0x524f3d4c, 0x870acd82, 0x835b5954, 0x915b1320],
            ),
            KnownAnswer::new(
                [PI32[0], PI32[1], PI32[2], PI32[3]],
                [PI32[4], PI32[5], PI32[6], PI32[7]],
                [0x764028cd, 0xd58186ca, 0x073a61df, 0xcb4827da],
            ),
        ]
    }
}

impl KnownAnswers for Ars<7> {
    fn known_answers() -> Vec<KnownAnswer<Self>> {
        vec![
            KnownAnswer::new(
                [0; 4],
                [0; 4],
                [0xdacf61ff, 0xc45798f3, 0x113c7eeb, 0x101e27f3],
            ),
            KnownAnswer::new(
                [PI32[0], PI32[1], PI32[2], PI32[3]],
                [PI32[4], PI32[5], PI32[6], PI32[7]],
                [0x39c0328b, 0x16a8148a, 0x5eb9acc9, 0xe2ff0d53],
            ),
        ]
    }
}
