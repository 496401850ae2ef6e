//! The [Midori-64] block cipher.
//!
//! [Midori-64]: https://eprint.iacr.org/2015/1142
//!
//! Midori-64 is a 64-bit block, 128-bit key SPN designed for low
//! energy. This crate implements the cipher over plain `u64`
//! blocks; the word's most significant nibble is cell 0 of the
//! 4x4 state.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(test, doctest, feature = "std")), no_std)]

mod block;
pub mod rust_crypto;

pub use block::*;
