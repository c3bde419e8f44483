use crate::aes::extend_witness;
use crate::arithmetic::{bits_to_byte_masks, xor_into};
use crate::error::{check_length, FaestError, Result};
use crate::owf;
use crate::params::{OneWayFunction, ParameterSet, Parameters, SecurityLevel, IV_BYTES};
use crate::primitives::{Domain, Sec128, Sec192, Sec256, Transcript};
use crate::quicksilver::{QsChallenge, QsProver, QsVerifier};
use crate::small_vole::{apply_correction, VOLE_LANES};
use crate::traits::SecurityParameter;
use crate::vole_check::{self, VoleCheckChallenge};
use crate::vole_commit;
use bincode::enc::write::Writer;
use core::marker::PhantomData;
use log::debug;
use rand::{thread_rng, CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaChaRng;
use subtle::ConstantTimeEq;

/// One-way function key and input.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    key: Vec<u8>,
    input: Vec<u8>,
}

impl SecretKey {
    pub fn from_bytes(params: &Parameters, bytes: &[u8]) -> Result<Self> {
        check_length("secret key", bytes, params.sk_bytes)?;
        let (key, input) = bytes.split_at(params.secpar_bytes);
        Ok(Self {
            key: key.to_vec(),
            input: input.to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.key.clone();
        bytes.extend_from_slice(&self.input);
        bytes
    }
}

impl core::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// One-way function input and output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub input: Vec<u8>,
    pub output: Vec<u8>,
}

impl PublicKey {
    pub fn from_bytes(params: &Parameters, bytes: &[u8]) -> Result<Self> {
        check_length("public key", bytes, params.pk_bytes)?;
        let (input, output) = bytes.split_at(params.owf_input_bytes);
        Ok(Self {
            input: input.to_vec(),
            output: output.to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.input.clone();
        bytes.extend_from_slice(&self.output);
        bytes
    }
}

impl bincode::Encode for PublicKey {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        encoder.writer().write(&self.input)?;
        encoder.writer().write(&self.output)
    }
}

/// A signature: `commitment ‖ VOLE check proof ‖ witness correction ‖ QuickSilver proof ‖
/// vector commitment opening ‖ Δ ‖ iv`, every field of fixed length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    bytes: Vec<u8>,
}

/// Borrowed view of the fields of a [`Signature`].
#[derive(Clone, Copy, Debug)]
pub struct SignatureParts<'a> {
    pub commitment: &'a [u8],
    pub vole_check_proof: &'a [u8],
    pub witness_correction: &'a [u8],
    pub quicksilver_proof: &'a [u8],
    pub vector_opening: &'a [u8],
    pub delta: &'a [u8],
    pub iv: &'a [u8],
}

impl Signature {
    pub fn from_bytes(params: &Parameters, bytes: &[u8]) -> Result<Self> {
        check_length("signature", bytes, params.signature_bytes)?;
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn parts(&self, params: &Parameters) -> Result<SignatureParts<'_>> {
        check_length("signature", &self.bytes, params.signature_bytes)?;
        let rest = &self.bytes[..];
        let (commitment, rest) = rest.split_at(params.commitment_bytes());
        let (vole_check_proof, rest) = rest.split_at(params.vole_check_hash_bytes);
        let (witness_correction, rest) = rest.split_at(params.witness_bits / 8);
        let (quicksilver_proof, rest) = rest.split_at(params.secpar_bytes);
        let (vector_opening, rest) = rest.split_at(params.opening_bytes());
        let (delta, iv) = rest.split_at(params.secpar_bytes);
        debug_assert_eq!(iv.len(), IV_BYTES);
        Ok(SignatureParts {
            commitment,
            vole_check_proof,
            witness_correction,
            quicksilver_proof,
            vector_opening,
            delta,
            iv,
        })
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl bincode::Encode for Signature {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        encoder.writer().write(&self.bytes)
    }
}

/// The signature scheme at one security level and one-way function, with the lane width of the
/// VOLE batching.
pub struct FaestScheme<S: SecurityParameter, const LANES: usize = VOLE_LANES> {
    params: Parameters,
    _phantom_s: PhantomData<S>,
}

impl<S: SecurityParameter, const LANES: usize> FaestScheme<S, LANES> {
    /// Scheme over `owf` with trees of depth at most `max_tree_depth`.
    pub fn new(owf: OneWayFunction, max_tree_depth: u32) -> Result<Self> {
        Ok(Self {
            params: Parameters::new(S::LEVEL, owf, max_tree_depth)?,
            _phantom_s: PhantomData,
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Sample keys until the witness of the one-way function is expressible.
    pub fn keygen<R: RngCore + CryptoRng>(&self, rng: &mut R) -> (SecretKey, PublicKey) {
        loop {
            let mut key = vec![0u8; self.params.secpar_bytes];
            rng.fill_bytes(&mut key);
            let mut input = vec![0u8; self.params.owf_input_bytes];
            rng.fill_bytes(&mut input);
            if let Ok((_, output)) = extend_witness(&self.params, &key, &input) {
                let public_key = PublicKey {
                    input: input.clone(),
                    output,
                };
                return (SecretKey { key, input }, public_key);
            }
        }
    }

    pub fn keygen_from_seed(&self, seed: [u8; 32]) -> (SecretKey, PublicKey) {
        self.keygen(&mut ChaChaRng::from_seed(seed))
    }

    pub fn pubkey(&self, secret_key: &SecretKey) -> Result<PublicKey> {
        check_length("secret key", &secret_key.key, self.params.secpar_bytes)?;
        check_length("secret key input", &secret_key.input, self.params.owf_input_bytes)?;
        let (_, output) = extend_witness(&self.params, &secret_key.key, &secret_key.input)?;
        Ok(PublicKey {
            input: secret_key.input.clone(),
            output,
        })
    }

    fn message_digest(&self, public_key: &PublicKey, message: &[u8]) -> Vec<u8> {
        let mut transcript = Transcript::new(&self.params);
        transcript.absorb(public_key.to_bytes()).absorb(message);
        transcript.squeeze(Domain::Commit, self.params.digest_bytes())
    }

    fn challenge(&self, parts: &[&[u8]], len: usize) -> Vec<u8> {
        let mut transcript = Transcript::new(&self.params);
        parts.iter().for_each(|part| {
            transcript.absorb(part);
        });
        transcript.squeeze(Domain::Challenge, len)
    }

    /// Sign `message`. Without `randomness` fresh bytes are drawn; with it signing is
    /// deterministic.
    ///
    /// Fails only for secret keys that [`Self::pubkey`] rejects as well, i.e. keys that
    /// [`Self::keygen`] would never produce.
    pub fn sign(
        &self,
        secret_key: &SecretKey,
        message: &[u8],
        randomness: Option<&[u8]>,
    ) -> Result<Signature> {
        let params = &self.params;
        check_length("secret key", &secret_key.key, params.secpar_bytes)?;
        check_length("secret key input", &secret_key.input, params.owf_input_bytes)?;
        let (witness, output) = extend_witness(params, &secret_key.key, &secret_key.input)?;
        let public_key = PublicKey {
            input: secret_key.input.clone(),
            output,
        };
        debug!(
            "signing with {:?}, λ = {}, tree depth {}",
            params.owf, params.secpar_bits, params.max_k
        );

        let mu = self.message_digest(&public_key, message);
        let fresh;
        let randomness = match randomness {
            Some(randomness) => randomness,
            None => {
                let mut bytes = vec![0u8; params.secpar_bytes];
                thread_rng().fill_bytes(&mut bytes);
                fresh = bytes;
                &fresh[..]
            }
        };
        let mut seed_transcript = Transcript::new(params);
        seed_transcript
            .absorb(secret_key.to_bytes())
            .absorb(&mu)
            .absorb(randomness);
        let seed_iv = seed_transcript.squeeze(Domain::Seed, params.secpar_bytes + IV_BYTES);
        let (seed, iv_bytes) = seed_iv.split_at(params.secpar_bytes);
        let mut iv = [0u8; IV_BYTES];
        iv.copy_from_slice(iv_bytes);

        let vole = vole_commit::commit::<S::Prg, LANES>(params, seed, &iv);
        debug!("committed to the VOLE");

        let chal1 = self.challenge(
            &[&mu, &vole.check, &vole.commitment, &iv],
            params.vole_check_challenge_bytes,
        );
        let vole_check_challenge = VoleCheckChallenge::<S::Field>::from_bytes(params, &chal1)?;
        let (vole_check_proof, vole_check_check) =
            vole_check::sender(params, &vole.u, vole.v.view(), &vole_check_challenge);

        let witness_bytes = params.witness_bits / 8;
        let mut correction = vec![0u8; witness_bytes];
        xor_into(&mut correction, &witness, &vole.u[..witness_bytes]);

        let chal2 = self.challenge(
            &[&chal1, &vole_check_proof, &vole_check_check, &correction],
            params.quicksilver_challenge_bytes,
        );
        let mut corrected_u = vole.u.clone();
        corrected_u[..witness_bytes].copy_from_slice(&witness);
        let mut prover = QsProver::<S::Field>::new(
            params.witness_bits,
            params.num_constraints,
            &corrected_u,
            vole.v.view(),
            QsChallenge::from_bytes(&chal2)?,
        );
        owf::constraints(params, &mut prover, &public_key.input, &public_key.output);
        let (qs_proof, qs_check) = prover.prove();
        debug!("proved the one-way function constraints");

        let delta = self.challenge(&[&chal2, &qs_proof, &qs_check], params.secpar_bytes);
        let opening = vole.forest.open(params, &delta);

        let mut bytes = Vec::with_capacity(params.signature_bytes);
        bytes.extend_from_slice(&vole.commitment);
        bytes.extend_from_slice(&vole_check_proof);
        bytes.extend_from_slice(&correction);
        bytes.extend_from_slice(&qs_proof);
        bytes.extend_from_slice(&opening);
        bytes.extend_from_slice(&delta);
        bytes.extend_from_slice(&iv);
        debug_assert_eq!(bytes.len(), params.signature_bytes);
        Ok(Signature { bytes })
    }

    /// Accept or reject; every soundness failure is [`FaestError::VerificationRejected`].
    pub fn verify(&self, signature: &[u8], message: &[u8], public_key: &PublicKey) -> Result<()> {
        let params = &self.params;
        check_length("signature", signature, params.signature_bytes)?;
        check_length("public key input", &public_key.input, params.owf_input_bytes)?;
        check_length("public key output", &public_key.output, params.owf_output_bytes)?;
        let signature = Signature {
            bytes: signature.to_vec(),
        };
        let parts = signature.parts(params)?;
        let mut iv = [0u8; IV_BYTES];
        iv.copy_from_slice(parts.iv);
        debug!(
            "verifying with {:?}, λ = {}, tree depth {}",
            params.owf, params.secpar_bits, params.max_k
        );

        let mu = self.message_digest(public_key, message);
        let (mut q, vole_commit_check) = vole_commit::reconstruct::<S::Prg, LANES>(
            params,
            &iv,
            parts.vector_opening,
            parts.delta,
            parts.commitment,
        )?;

        let chal1 = self.challenge(
            &[&mu, &vole_commit_check, parts.commitment, &iv],
            params.vole_check_challenge_bytes,
        );
        let vole_check_challenge = VoleCheckChallenge::<S::Field>::from_bytes(params, &chal1)?;
        let vole_check_check = vole_check::receiver(
            params,
            q.view(),
            parts.delta,
            &vole_check_challenge,
            parts.vole_check_proof,
        )?;

        let masks = bits_to_byte_masks(parts.delta, params.secpar_bits);
        apply_correction(parts.witness_correction, &masks, q.view_mut());

        let chal2 = self.challenge(
            &[
                &chal1,
                parts.vole_check_proof,
                &vole_check_check,
                parts.witness_correction,
            ],
            params.quicksilver_challenge_bytes,
        );
        let mut verifier = QsVerifier::<S::Field>::new(
            params.witness_bits,
            params.num_constraints,
            q.view(),
            parts.delta,
            QsChallenge::from_bytes(&chal2)?,
        );
        owf::constraints(params, &mut verifier, &public_key.input, &public_key.output);
        let qs_check = verifier.verify(parts.quicksilver_proof)?;

        let delta = self.challenge(
            &[&chal2, parts.quicksilver_proof, &qs_check],
            params.secpar_bytes,
        );
        if bool::from(delta.ct_eq(parts.delta)) {
            debug!("signature accepted");
            Ok(())
        } else {
            debug!("signature rejected");
            Err(FaestError::VerificationRejected)
        }
    }
}

macro_rules! with_scheme {
    ($set:expr, |$scheme:ident| $body:expr) => {
        match $set.security_level() {
            SecurityLevel::L128 => {
                let $scheme = FaestScheme::<Sec128>::new($set.owf(), $set.max_tree_depth())?;
                $body
            }
            SecurityLevel::L192 => {
                let $scheme = FaestScheme::<Sec192>::new($set.owf(), $set.max_tree_depth())?;
                $body
            }
            SecurityLevel::L256 => {
                let $scheme = FaestScheme::<Sec256>::new($set.owf(), $set.max_tree_depth())?;
                $body
            }
        }
    };
}

/// Key generation for a standard parameter set.
pub fn keygen(set: ParameterSet) -> Result<(SecretKey, PublicKey)> {
    Ok(with_scheme!(set, |scheme| scheme.keygen(&mut thread_rng())))
}

pub fn pubkey(set: ParameterSet, secret_key: &SecretKey) -> Result<PublicKey> {
    with_scheme!(set, |scheme| scheme.pubkey(secret_key))
}

pub fn sign(
    set: ParameterSet,
    secret_key: &SecretKey,
    message: &[u8],
    randomness: Option<&[u8]>,
) -> Result<Signature> {
    with_scheme!(set, |scheme| scheme.sign(secret_key, message, randomness))
}

pub fn verify(
    set: ParameterSet,
    signature: &[u8],
    message: &[u8],
    public_key: &PublicKey,
) -> Result<()> {
    with_scheme!(set, |scheme| scheme.verify(signature, message, public_key))
}
