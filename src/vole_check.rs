use crate::arithmetic::{bits_to_byte_masks, xor_and_assign, xor_assign};
use crate::error::{check_length, Result};
use crate::field::{BytesRepr, GF2p64, SecParField};
use crate::params::Parameters;
use crate::primitives::{Domain, Transcript};
use crate::universal_hash::PolyHasher;
use ndarray::{ArrayView1, ArrayView2};
use std::borrow::Cow;

/// Keys of the VOLE consistency hash, parsed from `5·λ/8 + 8` challenge bytes.
#[derive(Clone, Debug)]
pub struct VoleCheckChallenge<F> {
    /// Maps `(h_λ, h_64)` to the two output halves: `mapped_j = M[2j]·h_λ + M[2j+1]·h_64`.
    matrix: [F; 4],
    key: F,
    key_64: GF2p64,
}

impl<F: SecParField> VoleCheckChallenge<F> {
    pub fn from_bytes(params: &Parameters, bytes: &[u8]) -> Result<Self> {
        check_length(
            "VOLE check challenge",
            bytes,
            params.vole_check_challenge_bytes,
        )?;
        let mut chunks = bytes.chunks_exact(F::BYTE_LENGTH);
        let mut next = || chunks.next().map(F::from_bytes).unwrap_or(F::ZERO);
        let matrix = [next(), next(), next(), next()];
        let key = next();
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[5 * F::BYTE_LENGTH..]);
        Ok(Self {
            matrix,
            key,
            key_64: GF2p64::from_u64(u64::from_le_bytes(word)),
        })
    }

    /// Hash the first `quicksilver_rows` bits of a column and mask the result with the
    /// column's trailing `vole_check_hash_bytes` bytes.
    pub fn hash_column(&self, params: &Parameters, column: &[u8]) -> Vec<u8> {
        let chunk_bytes = F::BYTE_LENGTH;
        let data_bytes = params.quicksilver_rows / 8;
        let num_chunks = data_bytes.div_ceil(chunk_bytes);
        let mut hasher = PolyHasher::new(self.key, num_chunks);
        let mut hasher_64 = PolyHasher::new(self.key_64, num_chunks * chunk_bytes / 8);

        let mut chunk = vec![0u8; chunk_bytes];
        for data in column[..data_bytes].chunks(chunk_bytes) {
            chunk.fill(0);
            chunk[..data.len()].copy_from_slice(data);
            hasher.update(F::from_bytes(&chunk));
            for word in chunk.chunks_exact(8) {
                hasher_64.update(GF2p64::from_bytes(word));
            }
        }
        let h = hasher.finalize();
        let h_64 = F::from_gf2p64(hasher_64.finalize());

        let mapped_0 = self.matrix[0] * h + self.matrix[1] * h_64;
        let mapped_1 = self.matrix[2] * h + self.matrix[3] * h_64;
        let mut out = Vec::with_capacity(params.vole_check_hash_bytes);
        out.extend(mapped_0.to_repr());
        out.extend(mapped_1.to_repr().into_iter().take(2));
        xor_assign(&mut out, &column[data_bytes..data_bytes + params.vole_check_hash_bytes]);
        out
    }
}

fn row_bytes(row: ArrayView1<u8>) -> Cow<[u8]> {
    match row.to_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(row.to_vec()),
    }
}

fn check_hash(params: &Parameters, outputs: &[Vec<u8>]) -> Vec<u8> {
    let mut transcript = Transcript::new(params);
    outputs.iter().for_each(|out| {
        transcript.absorb(out);
    });
    transcript.squeeze(Domain::Commit, params.digest_bytes())
}

/// Sender side: the hash of `u` is sent as the proof, the hashes of the `v` columns are folded
/// into the check.
pub fn sender<F: SecParField>(
    params: &Parameters,
    u: &[u8],
    v: ArrayView2<u8>,
    challenge: &VoleCheckChallenge<F>,
) -> (Vec<u8>, Vec<u8>) {
    let proof = challenge.hash_column(params, u);
    let outputs: Vec<Vec<u8>> = v
        .rows()
        .into_iter()
        .map(|row| challenge.hash_column(params, &row_bytes(row)))
        .collect();
    (proof, check_hash(params, &outputs))
}

/// Receiver side: recompute the check from `q` and the sender's proof. The caller compares it
/// through the Fiat–Shamir transcript.
pub fn receiver<F: SecParField>(
    params: &Parameters,
    q: ArrayView2<u8>,
    delta: &[u8],
    challenge: &VoleCheckChallenge<F>,
    proof: &[u8],
) -> Result<Vec<u8>> {
    check_length("VOLE check proof", proof, params.vole_check_hash_bytes)?;
    let masks = bits_to_byte_masks(delta, params.secpar_bits);
    let outputs: Vec<Vec<u8>> = q
        .rows()
        .into_iter()
        .zip(masks)
        .map(|(row, mask)| {
            let mut out = challenge.hash_column(params, &row_bytes(row));
            xor_and_assign(&mut out, proof, mask);
            out
        })
        .collect();
    Ok(check_hash(params, &outputs))
}
