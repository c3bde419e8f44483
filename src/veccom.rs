use crate::arithmetic::get_bit;
use crate::common::{lane_shift, permute_leaf, prefix_decompose, unpermute_leaf};
use crate::error::{check_length, Result};
use crate::params::{Parameters, IV_BYTES};
use crate::primitives::{node_tweak, Domain, Transcript, TWEAK_LEAF, TWEAK_ROOTS};
use crate::traits::TweakablePrg;
use log::trace;

/// The part of Δ selecting the hidden leaf of tree `t`: `Σ_b Δ[off_t + b]·2^b`.
pub fn tree_delta(params: &Parameters, delta: &[u8], t: usize) -> usize {
    let offset = params.tree_offset(t);
    (0..params.tree_depth(t) as usize).fold(0, |acc, b| {
        acc | (get_bit(delta, offset + b) as usize) << b
    })
}

/// The τ GGM trees of a vector commitment.
pub struct GgmForest {
    /// Per tree, the 1-based heap of `2^(k+1)` node seeds; index 0 is unused.
    nodes: Vec<Vec<u8>>,
    /// Per tree, the digests of the leaves in leaf order.
    hashed_leaves: Vec<Vec<u8>>,
}

/// Everything a SmallVOLE instance and the commitment check need from a forest.
pub struct ForestLeaves {
    /// Per tree, `2^k` leaf keys in slot order (see [`unpermute_leaf`]).
    pub keys: Vec<Vec<u8>>,
    /// Per tree, `2^k` leaf digests in leaf order.
    pub hashed_leaves: Vec<Vec<u8>>,
}

#[inline(always)]
fn node(heap: &[u8], n: usize, seed_bytes: usize) -> &[u8] {
    &heap[n * seed_bytes..(n + 1) * seed_bytes]
}

/// Expand node `n` into its children `2n` and `2n + 1`.
#[inline(always)]
fn expand_node<P: TweakablePrg>(
    heap: &mut [u8],
    n: usize,
    seed_bytes: usize,
    iv: &[u8; IV_BYTES],
    tweak: u32,
) {
    let (parents, children) = heap.split_at_mut(2 * n * seed_bytes);
    P::fill(
        &parents[n * seed_bytes..(n + 1) * seed_bytes],
        iv,
        tweak,
        &mut children[..2 * seed_bytes],
    );
}

/// Turn the leaves of one tree into keys (slot order) and digests (leaf order).
///
/// With `hidden = Some(d)` leaf `d` is unknown: its slot is left zero and its digest is left
/// for the caller to fill in.
fn expand_leaves<P: TweakablePrg, const LANES: usize>(
    params: &Parameters,
    t: usize,
    heap: &[u8],
    iv: &[u8; IV_BYTES],
    delta_t: usize,
    hidden: Option<usize>,
    leaf_hasher: &Transcript,
) -> (Vec<u8>, Vec<u8>) {
    let seed_bytes = params.secpar_bytes;
    let digest_bytes = params.digest_bytes();
    let depth = params.tree_depth(t);
    let num_leaves = 1usize << depth;
    let shift = lane_shift(LANES, depth);

    let mut keys = vec![0u8; num_leaves * seed_bytes];
    let mut hashed = vec![0u8; num_leaves * digest_bytes];
    let mut expanded = vec![0u8; 3 * seed_bytes];

    let mut slot = unpermute_leaf(delta_t, shift);
    for j in 0..num_leaves {
        debug_assert_eq!(permute_leaf(slot, shift), j ^ delta_t);
        if hidden != Some(j) {
            P::fill(
                node(heap, num_leaves + j, seed_bytes),
                iv,
                TWEAK_LEAF | t as u32,
                &mut expanded,
            );
            keys[slot * seed_bytes..(slot + 1) * seed_bytes]
                .copy_from_slice(&expanded[..seed_bytes]);
            let mut leaf = leaf_hasher.clone();
            leaf.absorb(&expanded[seed_bytes..]);
            leaf.squeeze_into(
                Domain::Leaf,
                &mut hashed[j * digest_bytes..(j + 1) * digest_bytes],
            );
        }
        slot ^= unpermute_leaf(j ^ (j + 1), shift);
    }
    (keys, hashed)
}

/// Expand `seed` into τ GGM trees and derive every leaf key and digest.
///
/// The keys are laid out for a SmallVOLE sender, i.e. as if Δ were zero.
pub fn commit<P: TweakablePrg, const LANES: usize>(
    params: &Parameters,
    seed: &[u8],
    iv: &[u8; IV_BYTES],
) -> (GgmForest, Vec<Vec<u8>>) {
    let seed_bytes = params.secpar_bytes;
    debug_assert_eq!(seed.len(), seed_bytes);
    let leaf_hasher = Transcript::new(params);

    let mut roots = vec![0u8; params.tau * seed_bytes];
    P::fill(seed, iv, TWEAK_ROOTS, &mut roots);

    let mut nodes = Vec::with_capacity(params.tau);
    let mut keys = Vec::with_capacity(params.tau);
    let mut hashed_leaves = Vec::with_capacity(params.tau);
    for (t, root) in roots.chunks_exact(seed_bytes).enumerate() {
        let depth = params.tree_depth(t);
        let mut heap = vec![0u8; (2usize << depth) * seed_bytes];
        heap[seed_bytes..2 * seed_bytes].copy_from_slice(root);
        for d in 0..depth {
            for n in 1 << d..2 << d {
                expand_node::<P>(&mut heap, n, seed_bytes, iv, node_tweak(t, d));
            }
        }
        let (keys_t, hashed_t) =
            expand_leaves::<P, LANES>(params, t, &heap, iv, 0, None, &leaf_hasher);
        trace!("committed tree {t} of depth {depth}");
        nodes.push(heap);
        keys.push(keys_t);
        hashed_leaves.push(hashed_t);
    }
    (
        GgmForest {
            nodes,
            hashed_leaves,
        },
        keys,
    )
}

impl GgmForest {
    pub fn hashed_leaves(&self) -> &[Vec<u8>] {
        &self.hashed_leaves
    }

    /// For every tree, the sibling seeds along the path to the leaf selected by Δ, followed by
    /// the digest of that leaf.
    pub fn open(&self, params: &Parameters, delta: &[u8]) -> Vec<u8> {
        let seed_bytes = params.secpar_bytes;
        let digest_bytes = params.digest_bytes();
        let mut opening = Vec::with_capacity(params.opening_bytes());
        for (t, (heap, hashed)) in self.nodes.iter().zip(&self.hashed_leaves).enumerate() {
            let depth = params.tree_depth(t);
            let delta_t = tree_delta(params, delta, t);
            for (d, prefix) in prefix_decompose(delta_t, depth).into_iter().enumerate() {
                let sibling = ((1 << (d + 1)) | prefix) ^ 1;
                opening.extend_from_slice(node(heap, sibling, seed_bytes));
            }
            opening.extend_from_slice(&hashed[delta_t * digest_bytes..(delta_t + 1) * digest_bytes]);
        }
        debug_assert_eq!(opening.len(), params.opening_bytes());
        opening
    }
}

/// Rebuild every leaf but the hidden one of each tree from an opening.
///
/// Keys are laid out for a SmallVOLE receiver with this Δ; the hidden leaf's slot is zero.
pub fn reconstruct<P: TweakablePrg, const LANES: usize>(
    params: &Parameters,
    iv: &[u8; IV_BYTES],
    opening: &[u8],
    delta: &[u8],
) -> Result<ForestLeaves> {
    check_length("vector commitment opening", opening, params.opening_bytes())?;
    let seed_bytes = params.secpar_bytes;
    let digest_bytes = params.digest_bytes();
    let leaf_hasher = Transcript::new(params);

    let mut keys = Vec::with_capacity(params.tau);
    let mut hashed_leaves = Vec::with_capacity(params.tau);
    let mut rest = opening;
    for t in 0..params.tau {
        let depth = params.tree_depth(t);
        let (tree_opening, tail) = rest.split_at(params.tree_opening_bytes(t));
        rest = tail;
        let (siblings, hidden_digest) = tree_opening.split_at(depth as usize * seed_bytes);

        let delta_t = tree_delta(params, delta, t);
        let path = prefix_decompose(delta_t, depth);
        let mut heap = vec![0u8; (2usize << depth) * seed_bytes];
        for d in 1..=depth {
            let on_path = (1 << d) | path[d as usize - 1];
            let sibling = on_path ^ 1;
            heap[sibling * seed_bytes..(sibling + 1) * seed_bytes].copy_from_slice(
                &siblings[(d as usize - 1) * seed_bytes..d as usize * seed_bytes],
            );
            if d == depth {
                break;
            }
            for n in 1 << d..2 << d {
                if n != on_path {
                    expand_node::<P>(&mut heap, n, seed_bytes, iv, node_tweak(t, d));
                }
            }
        }

        let (keys_t, mut hashed_t) = expand_leaves::<P, LANES>(
            params,
            t,
            &heap,
            iv,
            delta_t,
            Some(delta_t),
            &leaf_hasher,
        );
        hashed_t[delta_t * digest_bytes..(delta_t + 1) * digest_bytes]
            .copy_from_slice(hidden_digest);
        trace!("reconstructed tree {t} of depth {depth}");
        keys.push(keys_t);
        hashed_leaves.push(hashed_t);
    }
    Ok(ForestLeaves {
        keys,
        hashed_leaves,
    })
}
