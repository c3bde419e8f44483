mod aes;
pub mod arithmetic;
mod common;
pub mod error;
pub mod faest;
pub mod field;
#[macro_use]
mod field_helpers;
pub mod gf2plarge;
pub mod gf2psmall;
mod owf;
pub mod params;
pub mod primitives;
pub mod quicksilver;
pub mod small_vole;
pub mod traits;
pub mod universal_hash;
pub mod veccom;
pub mod vole_check;
pub mod vole_commit;

pub use error::{FaestError, Result};
pub use faest::{keygen, pubkey, sign, verify, FaestScheme, PublicKey, SecretKey, Signature};
pub use params::{OneWayFunction, ParameterSet, Parameters, SecurityLevel};
pub use primitives::{Sec128, Sec192, Sec256};
