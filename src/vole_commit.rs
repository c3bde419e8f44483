use crate::arithmetic::bits_to_byte_masks;
use crate::error::{check_length, Result};
use crate::params::{Parameters, IV_BYTES};
use crate::primitives::{Domain, Transcript};
use crate::small_vole;
use crate::traits::TweakablePrg;
use crate::veccom::{self, GgmForest};
use log::trace;
use ndarray::{s, Array2};

/// Sender side of the forest-wide VOLE.
pub struct VoleCommitment {
    pub forest: GgmForest,
    /// The random vector `u` of tree 0, `vole_col_bytes` long.
    pub u: Vec<u8>,
    /// One row per Δ bit, shape `(λ, vole_col_bytes)`.
    pub v: Array2<u8>,
    /// Corrections of trees `1..τ`, each truncated to `vole_row_bytes`.
    pub commitment: Vec<u8>,
    pub check: Vec<u8>,
}

/// `H(H(hashed_leaves_0) ‖ ... ‖ H(hashed_leaves_{τ-1}))`.
fn commit_check(params: &Parameters, hashed_leaves: &[Vec<u8>]) -> Vec<u8> {
    let mut outer = Transcript::new(params);
    for leaves in hashed_leaves {
        let mut inner = Transcript::new(params);
        inner.absorb(leaves);
        outer.absorb(inner.squeeze(Domain::Commit, params.digest_bytes()));
    }
    outer.squeeze(Domain::Commit, params.digest_bytes())
}

pub fn commit<P: TweakablePrg, const LANES: usize>(
    params: &Parameters,
    seed: &[u8],
    iv: &[u8; IV_BYTES],
) -> VoleCommitment {
    let (forest, keys) = veccom::commit::<P, LANES>(params, seed, iv);
    let mut v = Array2::<u8>::zeros((params.secpar_bits, params.vole_col_bytes));
    let mut u = Vec::new();
    let mut commitment = Vec::with_capacity(params.commitment_bytes());

    for (t, keys_t) in keys.iter().enumerate() {
        let offset = params.tree_offset(t);
        let rows = v.slice_mut(s![offset..params.tree_offset(t + 1), ..]);
        if t == 0 {
            u = small_vole::sender::<P, LANES>(params, t, keys_t, iv, None, rows);
        } else {
            let correction =
                small_vole::sender::<P, LANES>(params, t, keys_t, iv, Some(&u[..]), rows);
            commitment.extend_from_slice(&correction[..params.vole_row_bytes]);
        }
        trace!("sender VOLE for tree {t} at column {offset}");
    }

    let check = commit_check(params, forest.hashed_leaves());
    VoleCommitment {
        forest,
        u,
        v,
        commitment,
        check,
    }
}

/// Receiver side: rebuild `q = u·Δ + v` (on the first `vole_row_bytes` of every row) and the
/// commitment check from an opening.
pub fn reconstruct<P: TweakablePrg, const LANES: usize>(
    params: &Parameters,
    iv: &[u8; IV_BYTES],
    opening: &[u8],
    delta: &[u8],
    commitment: &[u8],
) -> Result<(Array2<u8>, Vec<u8>)> {
    check_length("VOLE commitment", commitment, params.commitment_bytes())?;
    check_length("Δ", delta, params.secpar_bytes)?;
    let leaves = veccom::reconstruct::<P, LANES>(params, iv, opening, delta)?;
    let masks = bits_to_byte_masks(delta, params.secpar_bits);

    let mut q = Array2::<u8>::zeros((params.secpar_bits, params.vole_col_bytes));
    for (t, keys_t) in leaves.keys.iter().enumerate() {
        let (start, end) = (params.tree_offset(t), params.tree_offset(t + 1));
        let correction = (t > 0)
            .then(|| &commitment[(t - 1) * params.vole_row_bytes..t * params.vole_row_bytes]);
        small_vole::receiver::<P, LANES>(
            params,
            t,
            keys_t,
            iv,
            correction,
            &masks[start..end],
            q.slice_mut(s![start..end, ..]),
        );
        trace!("receiver VOLE for tree {t} at column {start}");
    }

    Ok((q, commit_check(params, &leaves.hashed_leaves)))
}
