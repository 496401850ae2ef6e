use core::{error, fmt};

use midori64::Midori64;
use subtle::ConstantTimeEq;

use crate::gf::{MaskOp, MaskState};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// The size in bytes of a Midori-COFB key.
pub const KEY_SIZE: usize = 16;

/// The size in bytes of a Midori-COFB nonce.
pub const NONCE_SIZE: usize = 8;

/// The size in bytes of a message block.
pub const BLOCK_SIZE: usize = 8;

/// The size in bytes of a Midori-COFB authentication tag.
pub const TAG_SIZE: usize = 8;

/// A Midori-COFB authentication tag.
pub type Tag = u64;

/// An error returned by [`MidoriCofb`].
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Error;

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Midori-COFB error")
    }
}

/// The COFB AEAD over Midori-64.
///
/// The mode chains the cipher block by block:
///
/// ```text
/// Y₀ ← E(N)                 β ← mid32(Y₀)
/// X₀ ← (3β ‖ 0) ⊕ G(Y₀)     Y₁ ← E(X₀)        empty AD block
/// for each payload block Bᵢ do
///     Cᵢ ← Yᵢ ⊕ Bᵢ
///     Xᵢ ← (mskᵢ ‖ 0) ⊕ Bᵢ ⊕ G(Yᵢ)
///     Yᵢ₊₁ ← E(Xᵢ)
/// T ← final Y
/// ```
///
/// where `G` folds the top 16 bits into the bottom while rotating
/// (see [`mul_g`]) and `mskᵢ` walks the GF(2^32) mask sequence:
/// `3·2ⁱ·β` for non-final blocks and `9·2ⁱ·β` for the final one.
#[derive(Clone)]
pub struct MidoriCofb {
    cipher: Midori64,
}

impl MidoriCofb {
    /// Creates an instance of Midori-COFB.
    ///
    /// The key bytes are split into two big-endian 64-bit halves.
    #[inline]
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        Self {
            cipher: Midori64::new(key),
        }
    }

    /// Creates an instance of Midori-COFB from the two key words.
    #[inline]
    pub fn from_words(k0: u64, k1: u64) -> Self {
        Self {
            cipher: Midori64::from_words(k0, k1),
        }
    }

    /// Derives the chaining state and mask sequence from `nonce`
    /// and runs the chaining step for the empty associated-data
    /// block.
    fn init(&self, nonce: u64) -> (u64, MaskState) {
        let y = self.cipher.encrypt_block(nonce);
        let mut masks = MaskState::new(mask_gen(y));

        // No ciphertext is emitted for this step.
        let msk = masks.advance(MaskOp::Triple);
        let y = self.cipher.encrypt_block((u64::from(msk) << 32) ^ mul_g(y));
        (y, masks)
    }

    /// Encrypts and authenticates `blocks` in place, returning
    /// the authentication tag.
    pub fn seal_in_place(&self, nonce: u64, blocks: &mut [u64]) -> Tag {
        let (mut y, mut masks) = self.init(nonce);

        let last = blocks.len().wrapping_sub(1);
        for (i, block) in blocks.iter_mut().enumerate() {
            let op = if i == last {
                MaskOp::TripleTriple
            } else {
                MaskOp::DoubleTriple
            };
            let msk = masks.advance(op);

            let b = *block;
            let gy = mul_g(y);
            *block = y ^ b;
            y = self.cipher.encrypt_block((u64::from(msk) << 32) ^ (b ^ gy));
        }

        y
    }

    /// Decrypts `blocks` in place, returning the computed tag.
    ///
    /// The computation always runs to completion; comparing the
    /// returned tag against the expected one is the caller's job
    /// (see [`verify_tag`]), so a mismatch cannot leak its
    /// position through timing.
    pub fn open_in_place(&self, nonce: u64, blocks: &mut [u64]) -> Tag {
        let (mut y, mut masks) = self.init(nonce);

        let last = blocks.len().wrapping_sub(1);
        for (i, block) in blocks.iter_mut().enumerate() {
            let op = if i == last {
                MaskOp::TripleTriple
            } else {
                MaskOp::DoubleTriple
            };
            let msk = masks.advance(op);

            let c = *block;
            let gy = mul_g(y);
            let mut bgy = c ^ gy;
            *block = y ^ c;
            // Undo the ciphertext feedback so the chain matches
            // the seal side.
            bgy = y ^ bgy;
            y = self.cipher.encrypt_block((u64::from(msk) << 32) ^ bgy);
        }

        y
    }

    /// Encrypts and authenticates `plaintext`, returning the
    /// ciphertext blocks and the authentication tag.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    pub fn seal(&self, nonce: u64, plaintext: &[u64]) -> (Vec<u64>, Tag) {
        let mut blocks = plaintext.to_vec();
        let tag = self.seal_in_place(nonce, &mut blocks);
        (blocks, tag)
    }

    /// Decrypts `ciphertext`, returning the plaintext blocks and
    /// the computed tag without verifying it.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    pub fn open(&self, nonce: u64, ciphertext: &[u64]) -> (Vec<u64>, Tag) {
        let mut blocks = ciphertext.to_vec();
        let tag = self.open_in_place(nonce, &mut blocks);
        (blocks, tag)
    }

    /// Decrypts `ciphertext` and verifies its tag in constant
    /// time, returning the plaintext blocks.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    pub fn open_verified(
        &self,
        nonce: u64,
        ciphertext: &[u64],
        tag: Tag,
    ) -> Result<Vec<u64>, Error> {
        let (plaintext, computed) = self.open(nonce, ciphertext);
        if verify_tag(computed, tag) {
            return Ok(plaintext);
        }
        #[cfg(feature = "zeroize")]
        {
            use zeroize::Zeroize;

            let mut plaintext = plaintext;
            plaintext.zeroize();
        }
        Err(Error)
    }
}

impl fmt::Debug for MidoriCofb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidoriCofb").finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize")]
#[cfg_attr(docsrs, doc(cfg(feature = "zeroize")))]
impl zeroize::ZeroizeOnDrop for MidoriCofb {}

/// Extracts the base mask β: the middle 32 bits of the first
/// cipher output.
#[inline(always)]
pub const fn mask_gen(y: u64) -> u32 {
    ((y >> 16) & 0xFFFF_FFFF) as u32
}

/// The COFB feedback function `G`.
///
/// Rotates `y` left by 16 and overwrites the low 16 bits with the
/// fold `(y >> 48) ^ (y & 0xFFFF)`.
#[inline(always)]
pub const fn mul_g(y: u64) -> u64 {
    (y << 16) | ((y >> 48) ^ (y & 0xFFFF))
}

/// Compares two tags in constant time.
#[inline]
pub fn verify_tag(computed: Tag, expected: Tag) -> bool {
    computed.ct_eq(&expected).into()
}
