//! RustCrypto bindings.
//!
//! [RustCrypto]: https://github.com/rustcrypto

#![cfg(feature = "rust-crypto")]
#![cfg_attr(docsrs, doc(cfg(feature = "rust-crypto")))]

use core::fmt;

use cipher::{
    consts::{U1, U16, U8},
    inout::InOut,
    AlgorithmName, Block, BlockBackend, BlockCipher, BlockClosure, BlockDecrypt, BlockEncrypt,
    BlockSizeUser, Key, KeyInit, KeySizeUser, ParBlocksSizeUser,
};

use crate::Midori64;

impl AlgorithmName for Midori64 {
    fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Midori-64")
    }
}

impl BlockCipher for Midori64 {}

impl KeySizeUser for Midori64 {
    type KeySize = U16;
}

impl KeyInit for Midori64 {
    #[inline]
    fn new(key: &Key<Self>) -> Self {
        Self::new(key.as_ref())
    }
}

impl BlockSizeUser for Midori64 {
    type BlockSize = U8;
}

impl BlockEncrypt for Midori64 {
    #[inline(always)]
    fn encrypt_with_backend(&self, f: impl BlockClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut EncBackend { cipher: self })
    }
}

impl BlockDecrypt for Midori64 {
    #[inline(always)]
    fn decrypt_with_backend(&self, f: impl BlockClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut DecBackend { cipher: self })
    }
}

struct EncBackend<'a> {
    cipher: &'a Midori64,
}

impl BlockSizeUser for EncBackend<'_> {
    type BlockSize = U8;
}

impl ParBlocksSizeUser for EncBackend<'_> {
    // The scalar implementation handles one block at a time.
    type ParBlocksSize = U1;
}

impl BlockBackend for EncBackend<'_> {
    #[inline(always)]
    fn proc_block(&mut self, mut block: InOut<'_, '_, Block<Self>>) {
        let pt = u64::from_be_bytes((*block.get_in()).into());
        let ct = self.cipher.encrypt_block(pt);
        block.get_out().copy_from_slice(&ct.to_be_bytes());
    }
}

struct DecBackend<'a> {
    cipher: &'a Midori64,
}

impl BlockSizeUser for DecBackend<'_> {
    type BlockSize = U8;
}

impl ParBlocksSizeUser for DecBackend<'_> {
    type ParBlocksSize = U1;
}

impl BlockBackend for DecBackend<'_> {
    #[inline(always)]
    fn proc_block(&mut self, mut block: InOut<'_, '_, Block<Self>>) {
        let ct = u64::from_be_bytes((*block.get_in()).into());
        let pt = self.cipher.decrypt_block(ct);
        block.get_out().copy_from_slice(&pt.to_be_bytes());
    }
}
