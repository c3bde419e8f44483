use crate::aes::{block_input, shift_offset, KeySchedule, ROUND_CONSTANTS};
use crate::field::SecParField;
use crate::gf2psmall::GF2p8;
use crate::params::{OneWayFunction, Parameters};
use crate::quicksilver::{QsWire, QuickSilver};

type Bits<W> = [W; 8];

fn combine<F: SecParField, W: QsWire<F>>(bits: &Bits<W>) -> W {
    W::combine_8_bits(bits)
}

fn add_bits<W: Copy + core::ops::Add<Output = W>>(x: &Bits<W>, y: &Bits<W>) -> Bits<W> {
    core::array::from_fn(|i| x[i] + y[i])
}

/// Bits of a public byte as constant wires.
fn constant_bits<F: SecParField, Q: QuickSilver<F>>(qs: &Q, byte: u8) -> Bits<Q::Wire> {
    core::array::from_fn(|i| qs.constant(if (byte >> i) & 1 == 1 { F::ONE } else { F::ZERO }))
}

fn constant_byte<F: SecParField, Q: QuickSilver<F>>(qs: &Q, byte: u8) -> Q::Wire {
    qs.constant(F::embed_gf2p8(GF2p8(byte)))
}

/// The inverse of the S-box's affine map, as a field wire: `S⁻¹-affine(out) = in⁻¹`.
fn inverse_affine<F: SecParField, Q: QuickSilver<F>>(qs: &Q, out: &Bits<Q::Wire>) -> Q::Wire {
    let linear: Bits<Q::Wire> =
        core::array::from_fn(|k| out[(k + 7) % 8] + out[(k + 5) % 8] + out[(k + 2) % 8]);
    combine::<F, _>(&linear) + constant_byte::<F, Q>(qs, 0x05)
}

/// Constrain one S-box: `input · inverse_affine(output) = 1`.
fn sbox_constraint<F: SecParField, Q: QuickSilver<F>>(
    qs: &mut Q,
    input: &Q::Wire,
    output: &Bits<Q::Wire>,
) {
    let inverse = inverse_affine::<F, Q>(qs, output);
    qs.add_product_constraint(input, &inverse);
}

/// Reads consecutive witness bytes as bit wires.
struct WitnessCursor {
    next_bit: usize,
}

impl WitnessCursor {
    fn byte<F: SecParField, Q: QuickSilver<F>>(&mut self, qs: &Q) -> Bits<Q::Wire> {
        let start = self.next_bit;
        self.next_bit += 8;
        core::array::from_fn(|i| qs.witness_bit(start + i))
    }
}

/// Key schedule words as bit wires; adds one constraint per key schedule S-box.
fn key_schedule<F: SecParField, Q: QuickSilver<F>>(
    params: &Parameters,
    qs: &mut Q,
    cursor: &mut WitnessCursor,
    key: &[Bits<Q::Wire>],
) -> Vec<[Bits<Q::Wire>; 4]> {
    let nk = params.owf_key_words;
    let num_words = params.owf_block_bytes / 4 * (params.owf_rounds + 1);
    let mut words: Vec<[Bits<Q::Wire>; 4]> = Vec::with_capacity(num_words);
    for chunk in key.chunks_exact(4) {
        words.push([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    for j in nk..num_words {
        if KeySchedule::is_sbox_word(j, nk) {
            let word: [Bits<Q::Wire>; 4] = core::array::from_fn(|_| cursor.byte::<F, Q>(qs));
            let previous = &words[j - 1];
            let inputs = if j % nk == 0 {
                [previous[1], previous[2], previous[3], previous[0]]
            } else {
                *previous
            };
            for r in 0..4 {
                let mut output = add_bits(&word[r], &words[j - nk][r]);
                if r == 0 && j % nk == 0 {
                    let rcon = constant_bits::<F, Q>(qs, ROUND_CONSTANTS[j / nk - 1].0);
                    output = add_bits(&output, &rcon);
                }
                let input = combine::<F, _>(&inputs[r]);
                sbox_constraint::<F, Q>(qs, &input, &output);
            }
            words.push(word);
        } else {
            let word = core::array::from_fn(|r| add_bits(&words[j - nk][r], &words[j - 1][r]));
            words.push(word);
        }
    }
    words
}

/// Byte `4·c + r` of round key `round` as bit wires.
fn round_key_bits<W: Copy>(words: &[[Bits<W>; 4]], round: usize, nb: usize) -> Vec<Bits<W>> {
    words[nb * round..nb * (round + 1)]
        .iter()
        .flatten()
        .copied()
        .collect()
}

fn mix_columns<F: SecParField, W: QsWire<F>>(state: &[W]) -> Vec<W> {
    let two = F::embed_gf2p8(GF2p8(2));
    let three = F::embed_gf2p8(GF2p8(3));
    (0..state.len())
        .map(|i| {
            let (c, r) = (i / 4, i % 4);
            let at = |k: usize| state[4 * c + (r + k) % 4];
            at(0).mul_const(two) + at(1).mul_const(three) + at(2) + at(3)
        })
        .collect()
}

/// Constrain the rounds of one cipher evaluation, starting from the state after the initial
/// round key; `last` is the expected state after the final SubBytes and ShiftRows.
fn cipher_rounds<F: SecParField, Q: QuickSilver<F>>(
    params: &Parameters,
    qs: &mut Q,
    cursor: &mut WitnessCursor,
    words: &[[Bits<Q::Wire>; 4]],
    mut state: Vec<Q::Wire>,
    mut last: Vec<Bits<Q::Wire>>,
) {
    let rounds = params.owf_rounds;
    let nb = params.owf_block_bytes / 4;
    for round in 1..=rounds {
        let shifted: Vec<Bits<Q::Wire>> = if round < rounds {
            (0..4 * nb).map(|_| cursor.byte::<F, Q>(qs)).collect()
        } else {
            core::mem::take(&mut last)
        };
        for (i, sbox_input) in state.iter().enumerate() {
            let (c, r) = (i / 4, i % 4);
            let column = (c + nb - shift_offset(r, nb)) % nb;
            sbox_constraint::<F, Q>(qs, sbox_input, &shifted[4 * column + r]);
        }
        if round < rounds {
            let bytes: Vec<Q::Wire> = shifted.iter().map(combine::<F, _>).collect();
            let round_key = round_key_bits(words, round, nb);
            state = mix_columns::<F, _>(&bytes)
                .into_iter()
                .zip(&round_key)
                .map(|(m, k)| m + combine::<F, _>(k))
                .collect();
        }
    }
}

/// Add the constraints of the one-way function mapping the witness key and the public `input`
/// to `output`.
pub fn constraints<F: SecParField, Q: QuickSilver<F>>(
    params: &Parameters,
    qs: &mut Q,
    input: &[u8],
    output: &[u8],
) {
    debug_assert_eq!(input.len(), params.owf_input_bytes);
    debug_assert_eq!(output.len(), params.owf_output_bytes);
    let rounds = params.owf_rounds;
    let nb = params.owf_block_bytes / 4;
    let mut cursor = WitnessCursor { next_bit: 0 };
    let key: Vec<Bits<Q::Wire>> = (0..params.secpar_bytes)
        .map(|_| cursor.byte::<F, Q>(qs))
        .collect();

    match params.owf {
        OneWayFunction::AesCtr => {
            let words = key_schedule::<F, Q>(params, qs, &mut cursor, &key);
            for (b, block_output) in output.chunks_exact(params.owf_block_bytes).enumerate() {
                let block = block_input(input, b);
                let state = round_key_bits(&words, 0, nb)
                    .iter()
                    .zip(&block)
                    .map(|(k, &x)| combine::<F, _>(k) + constant_byte::<F, Q>(qs, x))
                    .collect();
                let last = round_key_bits(&words, rounds, nb)
                    .iter()
                    .zip(block_output)
                    .map(|(k, &y)| add_bits(k, &constant_bits::<F, Q>(qs, y)))
                    .collect();
                cipher_rounds::<F, Q>(params, qs, &mut cursor, &words, state, last);
            }
        }
        OneWayFunction::EvenMansour => {
            let schedule = KeySchedule::expand(input, rounds, nb);
            let words: Vec<[Bits<Q::Wire>; 4]> = schedule
                .words
                .iter()
                .map(|word| word.map(|b| constant_bits::<F, Q>(qs, b.0)))
                .collect();
            let state = round_key_bits(&words, 0, nb)
                .iter()
                .zip(&key)
                .map(|(k, x)| combine::<F, _>(&add_bits(k, x)))
                .collect();
            // E(sk) = output ⊕ sk
            let last = round_key_bits(&words, rounds, nb)
                .iter()
                .zip(output)
                .zip(&key)
                .map(|((k, &y), x)| add_bits(&add_bits(k, &constant_bits::<F, Q>(qs, y)), x))
                .collect();
            cipher_rounds::<F, Q>(params, qs, &mut cursor, &words, state, last);
        }
    }
    debug_assert_eq!(cursor.next_bit, params.witness_bits);
}
