use crate::error::{FaestError, Result};
use crate::gf2psmall::GF2p8;
use crate::params::{OneWayFunction, Parameters};
use ff::Field;
use std::fmt;

/// Enough round constants for Rijndael with 256-bit keys and blocks.
pub const ROUND_CONSTANTS: [GF2p8; 14] = [
    F(0x01),
    F(0x02),
    F(0x04),
    F(0x08),
    F(0x10),
    F(0x20),
    F(0x40),
    F(0x80),
    F(0x1b),
    F(0x36),
    F(0x6c),
    F(0xd8),
    F(0xab),
    F(0x4d),
];

#[allow(non_snake_case)]
const fn F(x: u8) -> GF2p8 {
    GF2p8(x)
}

/// Inverse of the affine map of the S-box, so that `inverse_affine(S(x)) = x⁻¹`.
pub fn inverse_affine(b: GF2p8) -> GF2p8 {
    b.rotate_left(1) + b.rotate_left(3) + b.rotate_left(6) + F(0x05)
}

/// Left rotation of row `r` by ShiftRows in a state of `columns` columns.
#[inline]
pub fn shift_offset(r: usize, columns: usize) -> usize {
    if columns == 8 && r >= 2 {
        r + 1
    } else {
        r
    }
}

/// A Rijndael state, column-major: byte `4·c + r` is row `r` of column `c`. AES states have
/// four columns, Rijndael-192 and -256 six and eight.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct AesState(pub Vec<GF2p8>);

impl AesState {
    pub fn columns(&self) -> usize {
        self.0.len() / 4
    }

    pub fn add_round_key(&self, round_key: &[GF2p8]) -> Self {
        debug_assert_eq!(round_key.len(), self.0.len());
        Self(self.0.iter().zip(round_key).map(|(b, k)| *b + k).collect())
    }

    pub fn shift_rows(&self) -> Self {
        let nb = self.columns();
        Self(
            (0..4 * nb)
                .map(|i| {
                    let (c, r) = (i / 4, i % 4);
                    self.0[4 * ((c + shift_offset(r, nb)) % nb) + r]
                })
                .collect(),
        )
    }

    pub fn mix_columns(&self) -> Self {
        let mut new = Vec::with_capacity(self.0.len());
        for old in self.0.chunks_exact(4) {
            new.push(F(2) * old[0] + F(3) * old[1] + old[2] + old[3]);
            new.push(old[0] + F(2) * old[1] + F(3) * old[2] + old[3]);
            new.push(old[0] + old[1] + F(2) * old[2] + F(3) * old[3]);
            new.push(F(3) * old[0] + old[1] + old[2] + F(2) * old[3]);
        }
        Self(new)
    }

    /// `x⁻¹`, with zero mapped to zero.
    pub fn sbox_invert_single(b: GF2p8) -> GF2p8 {
        b.invert().unwrap_or(GF2p8::ZERO)
    }

    pub fn sbox_rotations_single(b: GF2p8) -> GF2p8 {
        b + b.rotate_left(1) + b.rotate_left(2) + b.rotate_left(3) + b.rotate_left(4)
    }

    pub fn sbox_single(b: GF2p8) -> GF2p8 {
        Self::sbox_rotations_single(Self::sbox_invert_single(b)) + F(0x63)
    }

    pub fn sub_bytes(&self) -> Self {
        Self(self.0.iter().map(|&b| Self::sbox_single(b)).collect())
    }

    pub fn has_zero_byte(&self) -> bool {
        self.0.iter().any(|b| b.0 == 0)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().map(|b| b.0).collect()
    }
}

impl From<&[u8]> for AesState {
    fn from(x: &[u8]) -> Self {
        debug_assert_eq!(x.len() % 4, 0);
        Self(x.iter().copied().map(GF2p8).collect())
    }
}

impl From<u128> for AesState {
    fn from(x: u128) -> Self {
        Self::from(&x.to_be_bytes()[..])
    }
}

impl fmt::Debug for AesState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("[")?;
        for b in self.0.iter() {
            write!(f, "{:02x}", b.0)?;
        }
        f.write_str("]")
    }
}

/// The expanded key: `block_words·(rounds + 1)` words of four bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySchedule {
    pub key_words: usize,
    pub block_words: usize,
    pub rounds: usize,
    pub words: Vec<[GF2p8; 4]>,
}

impl KeySchedule {
    /// Whether word `j` is computed through `SubWord`.
    #[inline]
    pub fn is_sbox_word(j: usize, key_words: usize) -> bool {
        j >= key_words && (j % key_words == 0 || (key_words > 6 && j % key_words == 4))
    }

    /// Input bytes of the S-boxes computing word `j`, in the order of the output bytes.
    pub fn sbox_input(previous: &[GF2p8; 4], j: usize, key_words: usize) -> [GF2p8; 4] {
        if j % key_words == 0 {
            [previous[1], previous[2], previous[3], previous[0]]
        } else {
            *previous
        }
    }

    pub fn expand(key: &[u8], rounds: usize, block_words: usize) -> Self {
        let key_words = key.len() / 4;
        let num_words = block_words * (rounds + 1);
        let mut words = Vec::with_capacity(num_words);
        for chunk in key.chunks_exact(4) {
            words.push([F(chunk[0]), F(chunk[1]), F(chunk[2]), F(chunk[3])]);
        }
        for j in key_words..num_words {
            let mut word = words[j - 1];
            if Self::is_sbox_word(j, key_words) {
                word = Self::sbox_input(&word, j, key_words).map(AesState::sbox_single);
                if j % key_words == 0 {
                    word[0] += ROUND_CONSTANTS[j / key_words - 1];
                }
            }
            for (w, p) in word.iter_mut().zip(words[j - key_words]) {
                *w += p;
            }
            words.push(word);
        }
        Self {
            key_words,
            block_words,
            rounds,
            words,
        }
    }

    pub fn round_key(&self, round: usize) -> Vec<GF2p8> {
        let nb = self.block_words;
        self.words[nb * round..nb * (round + 1)]
            .iter()
            .flatten()
            .copied()
            .collect()
    }

    /// Whether any S-box of the key expansion has a zero input.
    pub fn has_zero_sbox_input(&self) -> bool {
        (self.key_words..self.words.len())
            .filter(|&j| Self::is_sbox_word(j, self.key_words))
            .any(|j| self.words[j - 1].iter().any(|b| b.0 == 0))
    }
}

/// Encrypt one block, returning the output, the states after SubBytes and ShiftRows of rounds
/// `1..rounds`, and whether every S-box input was nonzero.
pub fn encrypt_and_collect_states(
    schedule: &KeySchedule,
    input: &[u8],
) -> (AesState, Vec<AesState>, bool) {
    debug_assert_eq!(input.len(), 4 * schedule.block_words);
    let rounds = schedule.rounds;
    let mut states = Vec::with_capacity(rounds - 1);
    let mut feasible = true;
    let mut state = AesState::from(input).add_round_key(&schedule.round_key(0));
    for round in 1..rounds {
        feasible &= !state.has_zero_byte();
        let shifted = state.sub_bytes().shift_rows();
        state = shifted
            .mix_columns()
            .add_round_key(&schedule.round_key(round));
        states.push(shifted);
    }
    feasible &= !state.has_zero_byte();
    let output = state
        .sub_bytes()
        .shift_rows()
        .add_round_key(&schedule.round_key(rounds));
    (output, states, feasible)
}

/// Input of AES-CTR block `b`: the public input with `b` XORed into its first byte.
pub fn block_input(input: &[u8], b: usize) -> Vec<u8> {
    let mut block = input.to_vec();
    block[0] ^= b as u8;
    block
}

/// Compute the one-way function output and the extended witness for `key` and the public
/// `input`.
///
/// For AES-CTR the witness is the key, then the key schedule words computed through S-boxes,
/// then for every block the states after SubBytes and ShiftRows of all rounds but the last.
/// For Even-Mansour it is the key followed by the inner states of `E_input(key)`; the output
/// is `E_input(key) ⊕ key`.
pub fn extend_witness(
    params: &Parameters,
    key: &[u8],
    input: &[u8],
) -> Result<(Vec<u8>, Vec<u8>)> {
    debug_assert_eq!(key.len(), params.secpar_bytes);
    debug_assert_eq!(input.len(), params.owf_input_bytes);
    let block_words = params.owf_block_bytes / 4;
    let mut witness = Vec::with_capacity(params.witness_bits / 8);
    witness.extend_from_slice(key);
    let mut output = Vec::with_capacity(params.owf_output_bytes);

    match params.owf {
        OneWayFunction::AesCtr => {
            let schedule = KeySchedule::expand(key, params.owf_rounds, block_words);
            if schedule.has_zero_sbox_input() {
                return Err(FaestError::WitnessInfeasible);
            }
            for (j, word) in schedule.words.iter().enumerate() {
                if KeySchedule::is_sbox_word(j, schedule.key_words) {
                    witness.extend(word.iter().map(|b| b.0));
                }
            }
            debug_assert_eq!(witness.len(), params.secpar_bytes + params.owf_key_sboxes);

            for b in 0..params.owf_blocks {
                let (out, states, feasible) =
                    encrypt_and_collect_states(&schedule, &block_input(input, b));
                if !feasible {
                    return Err(FaestError::WitnessInfeasible);
                }
                for state in states {
                    witness.extend(state.to_bytes());
                }
                output.extend(out.to_bytes());
            }
        }
        OneWayFunction::EvenMansour => {
            let schedule = KeySchedule::expand(input, params.owf_rounds, block_words);
            let (out, states, feasible) = encrypt_and_collect_states(&schedule, key);
            if !feasible {
                return Err(FaestError::WitnessInfeasible);
            }
            for state in states {
                witness.extend(state.to_bytes());
            }
            output.extend(out.0.iter().zip(key).map(|(y, k)| y.0 ^ k));
        }
    }
    debug_assert_eq!(witness.len() * 8, params.witness_bits);
    debug_assert_eq!(output.len(), params.owf_output_bytes);
    Ok((witness, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;
    use aes::cipher::{BlockEncrypt, KeyInit};
    use rand::{thread_rng, Rng};

    fn encrypt_block(schedule: &KeySchedule, input: &[u8]) -> Vec<u8> {
        encrypt_and_collect_states(schedule, input).0.to_bytes()
    }

    const FIPS_PLAINTEXT: u128 = 0x00112233445566778899aabbccddeeff;

    #[test]
    fn test_sub_bytes() {
        let input = AesState::from(0x00102030405060708090a0b0c0d0e0f0u128);
        let expected_output = AesState::from(0x63cab7040953d051cd60e0e7ba70e18cu128);
        assert_eq!(input.sub_bytes(), expected_output);
    }

    #[test]
    fn test_mix_columns() {
        let input = AesState::from(0x6353e08c0960e104cd70b751bacad0e7u128);
        let expected_output = AesState::from(0x5f72641557f5bc92f7be3b291db9f91au128);
        assert_eq!(input.mix_columns(), expected_output);
    }

    #[test]
    fn test_shift_rows() {
        let input = AesState::from(0x63cab7040953d051cd60e0e7ba70e18cu128);
        let expected_output = AesState::from(0x6353e08c0960e104cd70b751bacad0e7u128);
        assert_eq!(input.shift_rows(), expected_output);
    }

    #[test]
    fn test_inverse_affine() {
        for x in 1..=255u8 {
            let x = GF2p8(x);
            assert_eq!(inverse_affine(AesState::sbox_single(x)) * x, GF2p8::ONE);
        }
        assert_eq!(inverse_affine(AesState::sbox_single(GF2p8(0))), GF2p8(0));
    }

    #[test]
    fn test_aes128_key_expand() {
        // FIPS-197 appendix A.1
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let schedule = KeySchedule::expand(&key, 10, 4);
        assert_eq!(schedule.words.len(), 44);
        let round_key = |r: usize| hex::encode(AesState(schedule.round_key(r)).to_bytes());
        assert_eq!(round_key(1), "a0fafe1788542cb123a339392a6c7605");
        assert_eq!(round_key(10), "d014f9a8c9ee2589e13f0cc8b6630ca6");
    }

    #[test]
    fn test_aes256_key_expand() {
        // FIPS-197 appendix A.3
        let key =
            hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
                .unwrap();
        let schedule = KeySchedule::expand(&key, 14, 4);
        assert_eq!(schedule.words.len(), 60);
        assert_eq!(hex::encode(schedule.words[59].map(u8::from)), "706c631e");
    }

    #[test]
    fn test_encrypt_fips_vectors() {
        // FIPS-197 appendix C
        let vectors = [
            (
                "000102030405060708090a0b0c0d0e0f",
                10,
                "69c4e0d86a7b0430d8cdb78070b4c55a",
            ),
            (
                "000102030405060708090a0b0c0d0e0f1011121314151617",
                12,
                "dda97ca4864cdfe06eaf70a0ec0d7191",
            ),
            (
                "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
                14,
                "8ea2b7ca516745bfeafc49904b496089",
            ),
        ];
        for (key, rounds, expected) in vectors {
            let schedule = KeySchedule::expand(&hex::decode(key).unwrap(), rounds, 4);
            let output = encrypt_block(&schedule, &FIPS_PLAINTEXT.to_be_bytes());
            assert_eq!(hex::encode(output), expected);
        }
    }

    #[test]
    fn test_encrypt_matches_aes_crate() {
        for _ in 0..10 {
            let input: [u8; 16] = thread_rng().gen();
            let key: [u8; 24] = thread_rng().gen();
            let mut block = aes::Block::from(input);
            aes::Aes192::new_from_slice(&key)
                .unwrap()
                .encrypt_block(&mut block);
            let schedule = KeySchedule::expand(&key, 12, 4);
            assert_eq!(encrypt_block(&schedule, &input), block.to_vec());

            let key: [u8; 32] = thread_rng().gen();
            let mut block = aes::Block::from(input);
            aes::Aes256::new_from_slice(&key)
                .unwrap()
                .encrypt_block(&mut block);
            let schedule = KeySchedule::expand(&key, 14, 4);
            assert_eq!(encrypt_block(&schedule, &input), block.to_vec());
        }
    }

    fn random_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|_| thread_rng().gen()).collect()
    }

    #[test]
    fn test_extend_witness() {
        for set in [ParameterSet::Faest128s, ParameterSet::Faest192f, ParameterSet::Faest256s] {
            let params = set.parameters();
            loop {
                let key = random_bytes(params.secpar_bytes);
                let input = random_bytes(params.owf_input_bytes);
                let Ok((witness, output)) = extend_witness(&params, &key, &input) else {
                    continue;
                };
                assert_eq!(witness.len() * 8, params.witness_bits);
                assert_eq!(&witness[..params.secpar_bytes], &key[..]);
                assert_eq!(output.len(), params.owf_blocks * 16);
                let schedule = KeySchedule::expand(&key, params.owf_rounds, 4);
                for b in 0..params.owf_blocks {
                    assert_eq!(
                        &output[16 * b..16 * (b + 1)],
                        &encrypt_block(&schedule, &block_input(&input, b))[..]
                    );
                }
                break;
            }
        }
    }

    #[test]
    fn test_extend_witness_even_mansour() {
        for set in [
            ParameterSet::FaestEm128f,
            ParameterSet::FaestEm192s,
            ParameterSet::FaestEm256f,
        ] {
            let params = set.parameters();
            let nb = params.secpar_bytes / 4;
            loop {
                let key = random_bytes(params.secpar_bytes);
                let input = random_bytes(params.secpar_bytes);
                let Ok((witness, output)) = extend_witness(&params, &key, &input) else {
                    continue;
                };
                assert_eq!(witness.len() * 8, params.witness_bits, "{set}");
                assert_eq!(&witness[..params.secpar_bytes], &key[..], "{set}");
                let schedule = KeySchedule::expand(&input, params.owf_rounds, nb);
                let expected: Vec<u8> = encrypt_block(&schedule, &key)
                    .iter()
                    .zip(&key)
                    .map(|(y, k)| y ^ k)
                    .collect();
                assert_eq!(output, expected, "{set}");
                break;
            }
        }
    }

    #[test]
    fn test_aes_matches_rijndael_with_four_columns() {
        let key = random_bytes(16);
        let input = random_bytes(16);
        let mut block = aes::Block::clone_from_slice(&input);
        aes::Aes128::new_from_slice(&key)
            .unwrap()
            .encrypt_block(&mut block);
        let schedule = KeySchedule::expand(&key, 10, 4);
        assert_eq!(encrypt_block(&schedule, &input), block.to_vec());
    }

    #[test]
    fn test_shift_rows_wide() {
        let input = AesState((0..32).map(GF2p8).collect());
        let shifted = input.shift_rows();
        // rows move left by 0, 1, 3 and 4 columns
        for c in 0..8 {
            assert_eq!(shifted.0[4 * c].0 as usize, 4 * c);
            assert_eq!(shifted.0[4 * c + 1].0 as usize, 4 * ((c + 1) % 8) + 1);
            assert_eq!(shifted.0[4 * c + 2].0 as usize, 4 * ((c + 3) % 8) + 2);
            assert_eq!(shifted.0[4 * c + 3].0 as usize, 4 * ((c + 4) % 8) + 3);
        }

        let input = AesState((0..24).map(GF2p8).collect());
        let shifted = input.shift_rows();
        for c in 0..6 {
            assert_eq!(shifted.0[4 * c + 3].0 as usize, 4 * ((c + 3) % 6) + 3);
        }
    }

    #[test]
    fn test_rijndael_wide_blocks() {
        // key = plaintext = 00 01 02 ...
        let vectors = [
            (24, 12, "7a5a73c8fbdbb2aa6866cc951b3e059a631cfefc09c424cf"),
            (
                32,
                14,
                "623d2bd4ca3796dc3d02ecf2f37fb637fd3da58509cebb67ab9265b04db51e7d",
            ),
        ];
        for (len, rounds, expected) in vectors {
            let key: Vec<u8> = (0..len as u8).collect();
            let schedule = KeySchedule::expand(&key, rounds, len / 4);
            assert_eq!(hex::encode(encrypt_block(&schedule, &key)), expected);
        }
    }

    #[test]
    fn test_rijndael_key_schedule_lengths() {
        let schedule = KeySchedule::expand(&[0x42; 24], 12, 6);
        assert_eq!(schedule.words.len(), 78);
        assert_eq!(schedule.round_key(12).len(), 24);
        let schedule = KeySchedule::expand(&[0x42; 32], 14, 8);
        assert_eq!(schedule.words.len(), 120);
        assert_eq!(schedule.round_key(14).len(), 32);
    }

    #[test]
    fn test_zero_key_is_infeasible() {
        // the first S-box of the AES-128 key schedule gets the last key word, zero here
        let params = ParameterSet::Faest128f.parameters();
        assert_eq!(
            extend_witness(&params, &[0u8; 16], &[0u8; 16]),
            Err(FaestError::WitnessInfeasible)
        );
    }
}
