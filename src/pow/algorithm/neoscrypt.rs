// src/pow/algorithm/neoscrypt.rs
//! NeoScrypt algorithm implementation
//!
//! NeoScrypt is the memory-hard proof-of-work function used by Feathercoin.
//! The flow is:
//! 1. FastKDF (BLAKE2s keyed PRF over 256-byte ring buffers) expands the
//!    input into an `r * 128` byte block `X`
//! 2. A copy `Z` is run through SMix with ChaCha20/20, and `X` through SMix
//!    with Salsa20/20
//! 3. `X ^= Z`, then FastKDF with the input as password and `X` as salt
//!    yields the 32-byte digest
//!
//! Profile bits select a scrypt mode (Salsa20/8 only, N=1024, r=1), a PBKDF2
//! key derivation instead of FastKDF, and explicit N/r values.
//!
//! FastKDF reads at most 256 bytes of the input; PBKDF2 reads all of it.

use crate::pow::algorithm::{Algorithm, KnownAnswer};
use crate::types::{DIGEST_LEN, Digest, Profile};
use crate::utils::error::AlgorithmError;
use blake2::Blake2sMac256;
use blake2::digest::Mac;
use hex_literal::hex;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

const KDF_BUFFER_SIZE: usize = 256;
const PRF_INPUT_SIZE: usize = 64;
const PRF_KEY_SIZE: usize = 32;
const PRF_OUTPUT_SIZE: usize = 32;
const KDF_ITERATIONS: usize = 32;

/// 64-byte blocks processed by the Salsa/ChaCha cores, in 32-bit words
const CORE_WORDS: usize = 16;

/// Upper bound on the per-call scratch area (`V`)
const MAX_SCRATCH_BYTES: usize = 1 << 30;

const PROFILE_SCRYPT_MODE: u32 = 0x1;
const PROFILE_EXTENDED: u32 = 0x8000_0000;

static KAT_INPUT: [u8; 80] = ascending_bytes();

/// NeoScrypt(bytes 0..=79) with N=128, r=2
const KAT_DIGEST: [u8; DIGEST_LEN] =
    hex!("7258961afb33fd12d00cacb8d63f4f4f52bb6917043865dd24a08f578853122d");

const fn ascending_bytes() -> [u8; 80] {
    let mut bytes = [0u8; 80];
    let mut i = 0;
    while i < bytes.len() {
        bytes[i] = i as u8;
        i += 1;
    }
    bytes
}

/// Key derivation used before and after mixing
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kdf {
    /// FastKDF with a keyed BLAKE2s PRF
    FastKdf,
    /// PBKDF2-HMAC-SHA256 with a single iteration
    Pbkdf2Sha256,
}

/// Tunable NeoScrypt parameters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NeoScryptParams {
    /// Memory cost N, a power of two
    pub n: usize,
    /// Block size factor
    pub r: usize,
    /// Run the extra ChaCha SMix and fold it into the Salsa result
    pub double_mix: bool,
    /// Rounds of the Salsa/ChaCha cores
    pub rounds: u32,
    /// Key derivation function
    pub kdf: Kdf,
}

impl NeoScryptParams {
    /// Feathercoin NeoScrypt: N=128, r=2, ChaCha20/20 + Salsa20/20, FastKDF
    pub const DEFAULT: NeoScryptParams = NeoScryptParams {
        n: 128,
        r: 2,
        double_mix: true,
        rounds: 20,
        kdf: Kdf::FastKdf,
    };

    /// Decodes the parameters a profile selects
    ///
    /// Bit 0 selects scrypt mode, bits 1..=4 the KDF, and bit 31 enables the
    /// explicit r (bits 5..=7, as a power of two) and N (bits 8..=12, as
    /// `2^(value + 1)`).
    ///
    /// # Errors
    /// `AlgorithmError::Backend` for unsupported KDFs, scratch areas above
    /// 1 GiB, or FastKDF paired with blocks larger than its 256-byte buffer.
    pub fn from_profile(profile: Profile) -> Result<Self, AlgorithmError> {
        let raw = profile.value();

        let mut params = if raw & PROFILE_SCRYPT_MODE != 0 {
            NeoScryptParams {
                n: 1024,
                r: 1,
                double_mix: false,
                rounds: 8,
                kdf: Kdf::FastKdf,
            }
        } else {
            Self::DEFAULT
        };

        params.kdf = match (raw >> 1) & 0xF {
            0 => Kdf::FastKdf,
            1 => Kdf::Pbkdf2Sha256,
            other => {
                return Err(AlgorithmError::Backend(format!(
                    "profile {} selects unsupported KDF {}",
                    profile, other
                )));
            }
        };

        if raw & PROFILE_EXTENDED != 0 {
            params.r = 1 << ((raw >> 5) & 0x7);
            params.n = 1usize
                .checked_shl(((raw >> 8) & 0x1F) + 1)
                .ok_or_else(|| {
                    AlgorithmError::Backend(format!("profile {} selects an oversized N", profile))
                })?;
        }

        params.validate()?;
        Ok(params)
    }

    fn block_bytes(&self) -> usize {
        self.r * 128
    }

    fn validate(&self) -> Result<(), AlgorithmError> {
        if !self.n.is_power_of_two() || self.n < 2 || self.r == 0 {
            return Err(AlgorithmError::Backend(format!(
                "N={} r={} are not valid NeoScrypt parameters",
                self.n, self.r
            )));
        }
        let scratch = self
            .n
            .checked_mul(self.block_bytes())
            .filter(|&bytes| bytes <= MAX_SCRATCH_BYTES);
        if scratch.is_none() {
            return Err(AlgorithmError::Backend(format!(
                "N={} r={} exceed the scratch memory limit",
                self.n, self.r
            )));
        }
        if self.kdf == Kdf::FastKdf && self.block_bytes() > KDF_BUFFER_SIZE {
            return Err(AlgorithmError::Backend(format!(
                "FastKDF cannot fill {}-byte blocks",
                self.block_bytes()
            )));
        }
        Ok(())
    }
}

impl Default for NeoScryptParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// NeoScrypt algorithm implementation
///
/// Stateless apart from its parameters. The `V` scratch area and the working
/// blocks are allocated inside every [`Algorithm::compute`] call.
#[derive(Clone, Debug)]
pub struct NeoScrypt {
    params: NeoScryptParams,
}

impl NeoScrypt {
    /// Creates an instance with explicit parameters
    pub fn new(params: NeoScryptParams) -> Result<Self, AlgorithmError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Creates an instance for the parameters a profile selects
    pub fn from_profile(profile: Profile) -> Result<Self, AlgorithmError> {
        NeoScryptParams::from_profile(profile).map(|params| Self { params })
    }

    /// Parameters in use
    pub fn params(&self) -> &NeoScryptParams {
        &self.params
    }

    fn derive(&self, password: &[u8], salt: &[u8], output: &mut [u8]) -> Result<(), AlgorithmError> {
        match self.params.kdf {
            Kdf::FastKdf => fast_kdf(password, salt, output),
            Kdf::Pbkdf2Sha256 => {
                pbkdf2_hmac::<Sha256>(password, salt, 1, output);
                Ok(())
            }
        }
    }
}

impl Default for NeoScrypt {
    fn default() -> Self {
        Self {
            params: NeoScryptParams::DEFAULT,
        }
    }
}

impl Algorithm for NeoScrypt {
    fn name(&self) -> &'static str {
        if self.params.double_mix {
            "neoscrypt"
        } else {
            "neoscrypt-scrypt-mode"
        }
    }

    fn compute(&self, input: &[u8]) -> Result<Digest, AlgorithmError> {
        if input.is_empty() {
            return Err(AlgorithmError::InvalidInput(
                "NeoScrypt needs a non-empty input".into(),
            ));
        }

        let NeoScryptParams {
            n,
            r,
            double_mix,
            rounds,
            ..
        } = self.params;
        let block_words = 32 * r;

        let mut block = vec![0u8; self.params.block_bytes()];
        self.derive(input, input, &mut block)?;
        let mut x = words_le(&block);

        let mut v = vec![0u32; n * block_words];
        let mut y = vec![0u32; block_words];

        if double_mix {
            let mut z = x.clone();
            smix(&mut z, &mut v, &mut y, r, n, Mixer::ChaCha(rounds));
            smix(&mut x, &mut v, &mut y, r, n, Mixer::Salsa(rounds));
            xor_words(&mut x, &z);
        } else {
            smix(&mut x, &mut v, &mut y, r, n, Mixer::Salsa(rounds));
        }

        let mixed = bytes_le(&x);
        let mut output = [0u8; DIGEST_LEN];
        self.derive(input, &mixed, &mut output)?;
        Ok(Digest::from_bytes(output))
    }

    fn known_answer(&self) -> Option<KnownAnswer> {
        (self.params == NeoScryptParams::DEFAULT).then_some(KnownAnswer {
            input: &KAT_INPUT,
            expected: KAT_DIGEST,
        })
    }
}

/// Tiles `src` (at most 256 bytes of it) over the KDF buffer, followed by a
/// copy of the buffer head so PRF windows never wrap
fn ring_buffer(src: &[u8], tail: usize) -> Vec<u8> {
    let used = &src[..src.len().min(KDF_BUFFER_SIZE)];
    let mut buf: Vec<u8> = used.iter().copied().cycle().take(KDF_BUFFER_SIZE).collect();
    buf.extend_from_within(..tail);
    buf
}

fn blake2s_prf(input: &[u8], key: &[u8]) -> Result<[u8; PRF_OUTPUT_SIZE], AlgorithmError> {
    let mut mac = Blake2sMac256::new_from_slice(key)
        .map_err(|e| AlgorithmError::Backend(format!("BLAKE2s key rejected: {}", e)))?;
    mac.update(input);
    let mut out = [0u8; PRF_OUTPUT_SIZE];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// FastKDF as defined for NeoScrypt; fills at most 256 bytes of `output`
fn fast_kdf(password: &[u8], salt: &[u8], output: &mut [u8]) -> Result<(), AlgorithmError> {
    let a = ring_buffer(password, PRF_INPUT_SIZE);
    let mut b = ring_buffer(salt, PRF_KEY_SIZE);
    let mut ptr = 0usize;

    for _ in 0..KDF_ITERATIONS {
        let prf = blake2s_prf(
            &a[ptr..ptr + PRF_INPUT_SIZE],
            &b[ptr..ptr + PRF_KEY_SIZE],
        )?;

        ptr = prf.iter().map(|&byte| byte as usize).sum::<usize>() & (KDF_BUFFER_SIZE - 1);

        for (dst, src) in b[ptr..ptr + PRF_OUTPUT_SIZE].iter_mut().zip(prf.iter()) {
            *dst ^= src;
        }

        // Keep head and tail of the salt buffer in sync
        if ptr < PRF_KEY_SIZE {
            b.copy_within(ptr..PRF_KEY_SIZE, KDF_BUFFER_SIZE + ptr);
        }
        if KDF_BUFFER_SIZE - ptr < PRF_OUTPUT_SIZE {
            let spill = PRF_OUTPUT_SIZE - (KDF_BUFFER_SIZE - ptr);
            b.copy_within(KDF_BUFFER_SIZE..KDF_BUFFER_SIZE + spill, 0);
        }
    }

    let len = output.len().min(KDF_BUFFER_SIZE);
    for (i, out) in output[..len].iter_mut().enumerate() {
        *out = b[(ptr + i) % KDF_BUFFER_SIZE] ^ a[i];
    }
    Ok(())
}

#[derive(Copy, Clone)]
enum Mixer {
    Salsa(u32),
    ChaCha(u32),
}

impl Mixer {
    fn apply(self, block: &mut [u32]) {
        match self {
            Mixer::Salsa(rounds) => salsa_core(block, rounds),
            Mixer::ChaCha(rounds) => chacha_core(block, rounds),
        }
    }
}

fn salsa_core(block: &mut [u32], rounds: u32) {
    let mut x = [0u32; CORE_WORDS];
    x.copy_from_slice(block);

    fn quarter(x: &mut [u32; CORE_WORDS], a: usize, b: usize, c: usize, d: usize) {
        x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
        x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
        x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
        x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
    }

    for _ in 0..rounds / 2 {
        quarter(&mut x, 0, 4, 8, 12);
        quarter(&mut x, 5, 9, 13, 1);
        quarter(&mut x, 10, 14, 2, 6);
        quarter(&mut x, 15, 3, 7, 11);
        quarter(&mut x, 0, 1, 2, 3);
        quarter(&mut x, 5, 6, 7, 4);
        quarter(&mut x, 10, 11, 8, 9);
        quarter(&mut x, 15, 12, 13, 14);
    }

    for (word, mixed) in block.iter_mut().zip(x.iter()) {
        *word = word.wrapping_add(*mixed);
    }
}

fn chacha_core(block: &mut [u32], rounds: u32) {
    let mut x = [0u32; CORE_WORDS];
    x.copy_from_slice(block);

    fn quarter(x: &mut [u32; CORE_WORDS], a: usize, b: usize, c: usize, d: usize) {
        x[a] = x[a].wrapping_add(x[b]);
        x[d] = (x[d] ^ x[a]).rotate_left(16);
        x[c] = x[c].wrapping_add(x[d]);
        x[b] = (x[b] ^ x[c]).rotate_left(12);
        x[a] = x[a].wrapping_add(x[b]);
        x[d] = (x[d] ^ x[a]).rotate_left(8);
        x[c] = x[c].wrapping_add(x[d]);
        x[b] = (x[b] ^ x[c]).rotate_left(7);
    }

    for _ in 0..rounds / 2 {
        quarter(&mut x, 0, 4, 8, 12);
        quarter(&mut x, 1, 5, 9, 13);
        quarter(&mut x, 2, 6, 10, 14);
        quarter(&mut x, 3, 7, 11, 15);
        quarter(&mut x, 0, 5, 10, 15);
        quarter(&mut x, 1, 6, 11, 12);
        quarter(&mut x, 2, 7, 8, 13);
        quarter(&mut x, 3, 4, 9, 14);
    }

    for (word, mixed) in block.iter_mut().zip(x.iter()) {
        *word = word.wrapping_add(*mixed);
    }
}

/// BlockMix over `2r` 64-byte blocks; even outputs land in the first half,
/// odd outputs in the second
fn block_mix(x: &mut [u32], y: &mut [u32], r: usize, mixer: Mixer) {
    let blocks = 2 * r;
    let mut prev = [0u32; CORE_WORDS];
    prev.copy_from_slice(&x[CORE_WORDS * (blocks - 1)..]);

    for i in 0..blocks {
        let chunk = &mut x[CORE_WORDS * i..CORE_WORDS * (i + 1)];
        xor_words(chunk, &prev);
        mixer.apply(chunk);
        prev.copy_from_slice(chunk);

        let dst = if i % 2 == 0 { i / 2 } else { r + i / 2 };
        y[CORE_WORDS * dst..CORE_WORDS * (dst + 1)].copy_from_slice(chunk);
    }

    x.copy_from_slice(y);
}

fn smix(x: &mut [u32], v: &mut [u32], y: &mut [u32], r: usize, n: usize, mixer: Mixer) {
    let block_words = 32 * r;

    for i in 0..n {
        v[i * block_words..(i + 1) * block_words].copy_from_slice(x);
        block_mix(x, y, r, mixer);
    }

    for _ in 0..n {
        let j = x[CORE_WORDS * (2 * r - 1)] as usize & (n - 1);
        xor_words(x, &v[j * block_words..(j + 1) * block_words]);
        block_mix(x, y, r, mixer);
    }
}

fn xor_words(dst: &mut [u32], src: &[u32]) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d ^= s;
    }
}

fn words_le(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn bytes_le(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_vector() {
        let digest = NeoScrypt::default().compute(&KAT_INPUT).unwrap();
        assert_eq!(digest.into_bytes(), KAT_DIGEST);
    }

    #[test]
    fn ftc_profile_decodes_to_default_parameters() {
        assert_eq!(
            NeoScryptParams::from_profile(Profile::NEOSCRYPT_FTC).unwrap(),
            NeoScryptParams::DEFAULT
        );
        assert_eq!(
            NeoScryptParams::from_profile(Profile::NEOSCRYPT).unwrap(),
            NeoScryptParams::DEFAULT
        );
    }

    #[test]
    fn scrypt_mode_agrees_with_scrypt_backend() {
        // Profile 0x3: Salsa20/8 only, N=1024, r=1, PBKDF2-SHA256
        let neo = NeoScrypt::from_profile(Profile::SCRYPT).unwrap();
        assert_eq!(neo.params().kdf, Kdf::Pbkdf2Sha256);
        assert!(!neo.params().double_mix);

        let digest = neo.compute(&KAT_INPUT).unwrap();
        assert_eq!(
            digest.into_bytes(),
            hex!("bc540a1a801df96e493005c71e010e2d387607fbf0fec416fd3c2645aa1ba9d2")
        );
    }

    #[test]
    fn short_inputs_are_tiled_by_the_kdf() {
        let digest = NeoScrypt::default().compute(b"abc").unwrap();
        assert_eq!(
            digest.into_bytes(),
            hex!("43980d853268088b677d7d31418835fe58b6fd66dc887fd956bb10b20458c571")
        );
    }

    #[test]
    fn fast_kdf_ignores_input_beyond_its_buffer() {
        let long: Vec<u8> = (0..300u32).map(|i| i as u8).collect();
        let mut altered = long.clone();
        altered[299] ^= 0xFF;

        let neo = NeoScrypt::default();
        assert_eq!(neo.compute(&long).unwrap(), neo.compute(&altered).unwrap());
        assert_eq!(neo.compute(&long).unwrap(), neo.compute(&long[..256]).unwrap());
    }

    #[test]
    fn pbkdf2_mode_reads_the_whole_input() {
        let long: Vec<u8> = (0..300u32).map(|i| i as u8).collect();
        let mut altered = long.clone();
        altered[299] ^= 0xFF;

        let neo = NeoScrypt::from_profile(Profile::SCRYPT).unwrap();
        assert_ne!(neo.compute(&long).unwrap(), neo.compute(&altered).unwrap());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            NeoScrypt::default().compute(&[]),
            Err(AlgorithmError::InvalidInput(_))
        ));
    }

    #[test]
    fn unsupported_profiles_are_rejected() {
        // KDF 2 (BLAKE-256) is not implemented
        assert!(NeoScryptParams::from_profile(Profile::new(0x4)).is_err());
        // Extended r=4 overflows the FastKDF buffer
        assert!(NeoScryptParams::from_profile(Profile::new(0x8000_0640)).is_err());
        // Extended N=2^32 is far above the scratch limit
        assert!(NeoScryptParams::from_profile(Profile::new(0x8000_1F20)).is_err());
    }

    #[test]
    fn extended_profile_with_pbkdf2_allows_larger_blocks() {
        // r=4, N=16, PBKDF2
        let params = NeoScryptParams::from_profile(Profile::new(0x8000_0342)).unwrap();
        assert_eq!(params.r, 4);
        assert_eq!(params.n, 16);
        let neo = NeoScrypt::new(params).unwrap();
        assert!(neo.known_answer().is_none());
        assert!(neo.self_test().is_ok());
    }

    #[test]
    fn self_test_passes_for_default() {
        assert!(NeoScrypt::default().self_test().is_ok());
    }

    #[test]
    fn fast_kdf_output_is_capped_at_buffer_size() {
        let mut out = vec![0u8; 300];
        fast_kdf(b"password", b"salt", &mut out).unwrap();
        assert!(out[256..].iter().all(|&b| b == 0));
        assert!(out[..256].iter().any(|&b| b != 0));
    }
}
