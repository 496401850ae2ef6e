use core::fmt;

/// The size in bytes of a Midori-64 key.
pub const KEY_SIZE: usize = 16;

/// The size in bytes of a Midori-64 block.
pub const BLOCK_SIZE: usize = 8;

/// The number of rounds, counting the final substitution.
pub const ROUNDS: usize = 16;

/// The S-box packed as sixteen nibbles; the nibble at cell `v` is
/// the substitution of `v`. It is an involution.
const SBOX: u64 = 0xCAD3_EBF7_8915_0246;

/// The forward cell permutation: the nibble at cell `i` is the
/// source cell for output cell `i`.
const SHUFFLE: u64 = 0x0A5F_E4B1_93C6_7D28;

/// The inverse cell permutation.
const SHUFFLE_INV: u64 = 0x07E9_52BC_F816_AD43;

/// The round constants. Constant `i` contributes one bit to the
/// low bit of each cell of round key `i`; the last constant is
/// carried in the table but not consumed by the schedule.
const ROUND_CONSTS: [u16; ROUNDS] = [
    0x15B3, 0x78C0, 0xA435, 0x6213, 0x104F, 0xD170, 0x0266, 0x0BCC,
    0x9481, 0x40B8, 0x7197, 0x228E, 0x5130, 0xF8CA, 0xDF90, 0x7C81,
];

/// Returns cell `pos` of `block`.
///
/// Cell 0 is the most significant nibble: cell `pos` occupies
/// bits `63-4*pos` down to `60-4*pos`.
#[inline(always)]
const fn cell(block: u64, pos: usize) -> u64 {
    debug_assert!(pos < 16);
    (block >> ((15 - pos) * 4)) & 0xF
}

/// Returns `block` with cell `pos` replaced by `val`.
#[inline(always)]
const fn with_cell(block: u64, pos: usize, val: u64) -> u64 {
    debug_assert!(pos < 16);
    let shift = (15 - pos) * 4;
    (block & !(0xF << shift)) | ((val & 0xF) << shift)
}

/// Substitutes every cell through the S-box.
#[inline]
fn sub_cells(s: u64) -> u64 {
    let mut out = 0;
    for pos in 0..16 {
        out = with_cell(out, pos, cell(SBOX, cell(s, pos) as usize));
    }
    out
}

/// Permutes the cells; `table` is one of [`SHUFFLE`] or
/// [`SHUFFLE_INV`].
#[inline]
fn shuffle_cells(s: u64, table: u64) -> u64 {
    let mut out = 0;
    for pos in 0..16 {
        out = with_cell(out, pos, cell(s, cell(table, pos) as usize));
    }
    out
}

/// Mixes each column of the state.
///
/// Each column is four consecutive cells. Every cell becomes the
/// XOR of the other three in its column, i.e. the column parity
/// XOR the cell itself. The binary column matrix squares to the
/// identity, so this transform is an involution.
#[inline]
fn mix_columns(s: u64) -> u64 {
    let mut out = 0;
    for col in (0..16).step_by(4) {
        let mut parity = 0;
        for j in 0..4 {
            parity ^= cell(s, col + j);
        }
        for j in 0..4 {
            out = with_cell(out, col + j, parity ^ cell(s, col + j));
        }
    }
    out
}

/// The Midori-64 block cipher with an expanded key schedule.
#[derive(Clone)]
pub struct Midori64 {
    /// Whitening key, `k0 ^ k1`.
    wk: u64,
    /// Forward round keys.
    rk: [u64; ROUNDS - 1],
    /// Decryption round keys, `ShuffleCellInv(MixColumn(rk))` in
    /// reverse round order.
    rk_inv: [u64; ROUNDS - 1],
}

impl Midori64 {
    /// Creates an instance of the Midori-64 cipher.
    ///
    /// The key bytes are split into two big-endian 64-bit halves,
    /// `key = k0 || k1`.
    #[inline]
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        let (k0, k1) = key.split_at(KEY_SIZE / 2);
        #[allow(
            clippy::unwrap_used,
            reason = "The compiler can prove the lengths of `k0` and `k1`."
        )]
        let (k0, k1) = (
            u64::from_be_bytes(k0.try_into().unwrap()),
            u64::from_be_bytes(k1.try_into().unwrap()),
        );
        Self::from_words(k0, k1)
    }

    /// Creates an instance of the Midori-64 cipher from the two
    /// key words.
    ///
    /// ```text
    /// WK ← K0 ⊕ K1
    /// for i = 0..15 do
    ///     for each cell j do
    ///         RK[i][j] ← K{i mod 2}[j] ⊕ β[i][j]
    /// ```
    pub fn from_words(k0: u64, k1: u64) -> Self {
        let mut rk = [0; ROUNDS - 1];
        for (i, rk) in rk.iter_mut().enumerate() {
            let src = if i % 2 == 0 { k0 } else { k1 };
            let mut x = 0;
            for j in 0..16 {
                let bit = u64::from((ROUND_CONSTS[i] >> (15 - j)) & 1);
                x = with_cell(x, j, cell(src, j) ^ bit);
            }
            *rk = x;
        }

        // The linear layers commute with the key additions, so
        // decryption reuses the forward round structure with
        // transformed keys in reverse order.
        let mut rk_inv = [0; ROUNDS - 1];
        for (i, rk_inv) in rk_inv.iter_mut().enumerate() {
            *rk_inv = shuffle_cells(mix_columns(rk[ROUNDS - 2 - i]), SHUFFLE_INV);
        }

        Self {
            wk: k0 ^ k1,
            rk,
            rk_inv,
        }
    }

    /// Encrypts `block`.
    ///
    /// ```text
    /// S ← S ⊕ WK
    /// for i = 0..15 do
    ///     S ← SubCell(S)
    ///     S ← ShuffleCell(S)
    ///     S ← MixColumn(S)
    ///     S ← S ⊕ RK[i]
    /// S ← SubCell(S)
    /// output S ⊕ WK
    /// ```
    #[inline]
    pub fn encrypt_block(&self, block: u64) -> u64 {
        let mut s = block ^ self.wk;
        for &rk in &self.rk {
            s = sub_cells(s);
            s = shuffle_cells(s, SHUFFLE);
            s = mix_columns(s);
            s ^= rk;
        }
        s = sub_cells(s);
        s ^ self.wk
    }

    /// Decrypts `block`.
    ///
    /// The S-box and MixColumn are involutions, so decryption is
    /// the forward structure with the linear layers swapped and
    /// the transformed round keys.
    #[inline]
    pub fn decrypt_block(&self, block: u64) -> u64 {
        let mut s = block ^ self.wk;
        for &rk in &self.rk_inv {
            s = sub_cells(s);
            s = mix_columns(s);
            s = shuffle_cells(s, SHUFFLE_INV);
            s ^= rk;
        }
        s = sub_cells(s);
        s ^ self.wk
    }
}

impl fmt::Debug for Midori64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Midori64").finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize")]
#[cfg_attr(docsrs, doc(cfg(feature = "zeroize")))]
impl Drop for Midori64 {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        self.wk.zeroize();
        self.rk.zeroize();
        self.rk_inv.zeroize();
    }
}

#[cfg(feature = "zeroize")]
#[cfg_attr(docsrs, doc(cfg(feature = "zeroize")))]
impl zeroize::ZeroizeOnDrop for Midori64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors() {
        // From the Midori paper, appendix A.
        let cipher = Midori64::from_words(0, 0);
        assert_eq!(cipher.encrypt_block(0), 0x3C9C_CEDA_2BBD_449A);

        let cipher = Midori64::from_words(0x687D_ED3B_3C85_B3F3, 0x5B10_0986_3E2A_8CBF);
        assert_eq!(
            cipher.encrypt_block(0x42C2_0FD3_B586_879E),
            0x66BC_DC62_70D9_01CD
        );
    }

    #[test]
    fn test_decrypt_inverts_encrypt() {
        let cipher = Midori64::from_words(0x0123_4567_89AB_CDEF, 0xFEDC_BA98_7654_3210);
        let mut block = 0x42C2_0FD3_B586_879E;
        for _ in 0..256 {
            let ct = cipher.encrypt_block(block);
            assert_eq!(cipher.decrypt_block(ct), block);
            block = ct;
        }
    }

    #[test]
    fn test_key_byte_order() {
        let key = [
            0x68, 0x7D, 0xED, 0x3B, 0x3C, 0x85, 0xB3, 0xF3, //
            0x5B, 0x10, 0x09, 0x86, 0x3E, 0x2A, 0x8C, 0xBF,
        ];
        let cipher = Midori64::new(&key);
        assert_eq!(
            cipher.encrypt_block(0x42C2_0FD3_B586_879E),
            0x66BC_DC62_70D9_01CD
        );
    }

    #[test]
    fn test_sbox_is_an_involution() {
        let mut seen = [false; 16];
        for v in 0..16 {
            let s = cell(SBOX, v) as usize;
            seen[s] = true;
            assert_eq!(cell(SBOX, s), v as u64, "Sb0[Sb0[{v}]] != {v}");
        }
        assert!(seen.iter().all(|&b| b), "S-box is not a permutation");
    }

    #[test]
    fn test_shuffle_tables_are_mutually_inverse() {
        for pos in 0..16 {
            let fwd = cell(SHUFFLE, pos) as usize;
            assert_eq!(cell(SHUFFLE_INV, fwd), pos as u64);
            let inv = cell(SHUFFLE_INV, pos) as usize;
            assert_eq!(cell(SHUFFLE, inv), pos as u64);
        }
    }

    #[test]
    fn test_shuffle_round_trip() {
        let mut block = 0x0123_4567_89AB_CDEF_u64;
        for _ in 0..64 {
            let shuffled = shuffle_cells(block, SHUFFLE);
            assert_eq!(shuffle_cells(shuffled, SHUFFLE_INV), block);
            block = block.rotate_left(13).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        }
    }

    #[test]
    fn test_mix_columns_is_an_involution() {
        let mut block = 0xFEDC_BA98_7654_3210_u64;
        for _ in 0..64 {
            assert_eq!(mix_columns(mix_columns(block)), block);
            block = block.rotate_left(7).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        }
    }

    #[test]
    fn test_cell_round_trip() {
        let block = 0x0123_4567_89AB_CDEF_u64;
        for pos in 0..16 {
            assert_eq!(with_cell(block, pos, cell(block, pos)), block);
            for val in 0..16 {
                assert_eq!(cell(with_cell(block, pos, val), pos), val);
            }
        }
    }

    #[test]
    fn test_zero_key_schedule_collapses_to_round_constants() {
        // With k0 = k1 = 0 the whitening key vanishes and each
        // round key is just the constant's bits spread across the
        // cells' low bits.
        let cipher = Midori64::from_words(0, 0);
        assert_eq!(cipher.wk, 0);
        for (i, &rk) in cipher.rk.iter().enumerate() {
            let mut want = 0;
            for j in 0..16 {
                want = with_cell(want, j, u64::from((ROUND_CONSTS[i] >> (15 - j)) & 1));
            }
            assert_eq!(rk, want, "round {i}");
        }
    }
}
