use crate::field::{GF2p128, GF2p192, GF2p256};
use crate::params::{Parameters, SecurityLevel, IV_BYTES};
use crate::traits::{SecurityParameter, TranscriptHasher, TweakablePrg};
use aes::cipher::consts::U16;
use aes::cipher::typenum::Unsigned;
use aes::cipher::{BlockEncrypt, BlockSizeUser, Key, KeyInit, KeySizeUser};
use aes::{Aes128, Aes192, Aes256};
use core::marker::PhantomData;
use digest::{ExtendableOutput, Update, XofReader};

/// Tweak of the forest roots.
pub const TWEAK_ROOTS: u32 = 1 << 29;
/// Tweak of the VOLE column expansion of tree `t` is `TWEAK_VOLE | t`.
pub const TWEAK_VOLE: u32 = 1 << 30;
/// Tweak of the leaf expansion of tree `t` is `TWEAK_LEAF | t`.
pub const TWEAK_LEAF: u32 = 1 << 31;

/// Tweak for expanding the nodes at depth `depth` of tree `tree`.
#[inline(always)]
pub const fn node_tweak(tree: usize, depth: u32) -> u32 {
    ((tree as u32) << 8) | depth
}

/// AES in counter mode: block `j` encrypts the IV with the tweak XORed into bytes 4..8 and
/// `j` added (mod 2^32) to the little-endian word in bytes 0..4.
pub struct AesCtrPrg<C> {
    _phantom_c: PhantomData<C>,
}

impl<C> TweakablePrg for AesCtrPrg<C>
where
    C: BlockEncrypt + BlockSizeUser<BlockSize = U16> + KeyInit,
{
    const SEED_BYTES: usize = <C as KeySizeUser>::KeySize::USIZE;

    fn fill(seed: &[u8], iv: &[u8; IV_BYTES], tweak: u32, out: &mut [u8]) {
        debug_assert_eq!(seed.len(), Self::SEED_BYTES);
        let aes = C::new(Key::<C>::from_slice(seed));

        let mut base = *iv;
        for (b, t) in base[4..8].iter_mut().zip(tweak.to_le_bytes()) {
            *b ^= t;
        }
        let counter = u32::from_le_bytes([base[0], base[1], base[2], base[3]]);

        let mut blocks: Vec<aes::Block> = (0..out.len().div_ceil(16))
            .map(|j| {
                let mut block = aes::Block::from(base);
                block[..4].copy_from_slice(&counter.wrapping_add(j as u32).to_le_bytes());
                block
            })
            .collect();
        aes.encrypt_blocks(&mut blocks);
        for (chunk, block) in out.chunks_mut(16).zip(blocks.iter()) {
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }
}

pub type Aes128CtrPrg = AesCtrPrg<Aes128>;
pub type Aes192CtrPrg = AesCtrPrg<Aes192>;
pub type Aes256CtrPrg = AesCtrPrg<Aes256>;

impl TranscriptHasher for blake3::Hasher {
    fn with_context(context: &str) -> Self {
        blake3::Hasher::new_derive_key(context)
    }
}

/// Trailing byte separating the different uses of the hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Domain {
    Leaf = 0,
    Commit = 1,
    Challenge = 2,
    Seed = 3,
}

/// Absorbs transcript bytes and squeezes a domain-separated digest of any length.
#[derive(Clone)]
pub struct HashTranscript<H: TranscriptHasher> {
    hasher: H,
}

pub type Transcript = HashTranscript<blake3::Hasher>;

impl<H: TranscriptHasher> HashTranscript<H> {
    pub fn new(params: &Parameters) -> Self {
        Self {
            hasher: H::with_context(&params.hash_context),
        }
    }

    pub fn absorb(&mut self, bytes: impl AsRef<[u8]>) -> &mut Self {
        self.hasher.update(bytes.as_ref());
        self
    }

    pub fn squeeze_into(mut self, domain: Domain, out: &mut [u8]) {
        self.hasher.update(&[domain as u8]);
        self.hasher.finalize_xof().read(out);
    }

    pub fn squeeze(self, domain: Domain, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        self.squeeze_into(domain, &mut out);
        out
    }
}

pub struct Sec128;
pub struct Sec192;
pub struct Sec256;

impl SecurityParameter for Sec128 {
    type Field = GF2p128;
    type Prg = Aes128CtrPrg;
    const LEVEL: SecurityLevel = SecurityLevel::L128;
}

impl SecurityParameter for Sec192 {
    type Field = GF2p192;
    type Prg = Aes192CtrPrg;
    const LEVEL: SecurityLevel = SecurityLevel::L192;
}

impl SecurityParameter for Sec256 {
    type Field = GF2p256;
    type Prg = Aes256CtrPrg;
    const LEVEL: SecurityLevel = SecurityLevel::L256;
}
