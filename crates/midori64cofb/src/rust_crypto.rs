//! RustCrypto bindings.
//!
//! [RustCrypto]: https://github.com/rustcrypto

#![cfg(feature = "rust-crypto")]
#![cfg_attr(docsrs, doc(cfg(feature = "rust-crypto")))]

use core::fmt;

use aead::{
    consts::{U0, U16, U8},
    AeadCore, AeadInPlace, Key, KeyInit, KeySizeUser,
};
use alloc::vec::Vec;
use cipher::AlgorithmName;

use crate::{verify_tag, MidoriCofb, BLOCK_SIZE};

impl AlgorithmName for MidoriCofb {
    fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Midori-64-COFB")
    }
}

impl KeySizeUser for MidoriCofb {
    type KeySize = U16;
}

impl KeyInit for MidoriCofb {
    #[inline]
    fn new(key: &Key<Self>) -> Self {
        Self::new(key.as_ref())
    }
}

impl AeadCore for MidoriCofb {
    type NonceSize = U8;
    type TagSize = U8;
    type CiphertextOverhead = U0;
}

impl AeadInPlace for MidoriCofb {
    /// Encrypts `buffer` in place.
    ///
    /// The mode has no partial-block padding and no
    /// associated-data formatting, so `buffer` must be a whole
    /// number of 8-byte blocks and `associated_data` must be
    /// empty; anything else is an error.
    fn encrypt_in_place_detached(
        &self,
        nonce: &aead::Nonce<Self>,
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> aead::Result<aead::Tag<Self>> {
        if !associated_data.is_empty() || buffer.len() % BLOCK_SIZE != 0 {
            return Err(aead::Error);
        }

        let mut blocks = to_blocks(buffer);
        let tag = self.seal_in_place(u64::from_be_bytes((*nonce).into()), &mut blocks);
        store_blocks(buffer, &blocks);
        Ok(tag.to_be_bytes().into())
    }

    fn decrypt_in_place_detached(
        &self,
        nonce: &aead::Nonce<Self>,
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &aead::Tag<Self>,
    ) -> aead::Result<()> {
        if !associated_data.is_empty() || buffer.len() % BLOCK_SIZE != 0 {
            return Err(aead::Error);
        }

        let mut blocks = to_blocks(buffer);
        let computed = self.open_in_place(u64::from_be_bytes((*nonce).into()), &mut blocks);
        if !verify_tag(computed, u64::from_be_bytes((*tag).into())) {
            // The plaintext never reaches `buffer` on a mismatch.
            return Err(aead::Error);
        }
        store_blocks(buffer, &blocks);
        Ok(())
    }
}

/// Gathers `buf` into big-endian 64-bit blocks.
#[allow(
    clippy::unwrap_used,
    reason = "`chunks_exact` guarantees the length of each chunk."
)]
fn to_blocks(buf: &[u8]) -> Vec<u64> {
    buf.chunks_exact(BLOCK_SIZE)
        .map(|chunk| u64::from_be_bytes(chunk.try_into().unwrap()))
        .collect()
}

/// Scatters `blocks` back over `buf`.
fn store_blocks(buf: &mut [u8], blocks: &[u64]) {
    for (chunk, block) in buf.chunks_exact_mut(BLOCK_SIZE).zip(blocks) {
        chunk.copy_from_slice(&block.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use aead::{AeadInPlace, KeyInit};

    use crate::MidoriCofb;

    #[test]
    fn test_matches_native_api() {
        let key = [
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, //
            0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54, 0x32, 0x10,
        ];
        let aead = <MidoriCofb as KeyInit>::new(&key.into());
        let nonce = 0x0123_4567_89AB_CDEF_u64.to_be_bytes();

        let mut buffer = 0xAAAA_BBBB_CCCC_DDDD_u64.to_be_bytes();
        let tag = aead
            .encrypt_in_place_detached(&nonce.into(), &[], &mut buffer)
            .unwrap();
        assert_eq!(u64::from_be_bytes(buffer), 0xAC16_F92B_8762_26C5);
        assert_eq!(u64::from_be_bytes(tag.into()), 0xF08E_F990_009D_CFC7);

        aead.decrypt_in_place_detached(&nonce.into(), &[], &mut buffer, &tag)
            .unwrap();
        assert_eq!(u64::from_be_bytes(buffer), 0xAAAA_BBBB_CCCC_DDDD);
    }

    #[test]
    fn test_rejects_awkward_shapes() {
        let aead = <MidoriCofb as KeyInit>::new(&[0; 16].into());
        let nonce = [0; 8];

        let mut short = [0; 7];
        assert!(aead
            .encrypt_in_place_detached(&nonce.into(), &[], &mut short)
            .is_err());

        let mut block = [0; 8];
        assert!(aead
            .encrypt_in_place_detached(&nonce.into(), b"ad", &mut block)
            .is_err());
    }

    #[test]
    fn test_mismatched_tag_leaves_buffer_alone() {
        let aead = <MidoriCofb as KeyInit>::new(&[0; 16].into());
        let nonce = [0; 8];

        let mut buffer = [0; 8];
        let mut tag = aead
            .encrypt_in_place_detached(&nonce.into(), &[], &mut buffer)
            .unwrap();
        let ciphertext = buffer;

        tag[0] ^= 1;
        assert!(aead
            .decrypt_in_place_detached(&nonce.into(), &[], &mut buffer, &tag)
            .is_err());
        assert_eq!(buffer, ciphertext);
    }
}
