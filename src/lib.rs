#![allow(clippy::result_large_err, clippy::too_many_arguments)]
#![deny(
  clippy::cast_lossless,
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use {
  self::{
    arguments::Arguments,
    settings::Settings,
    subcommand::{Subcommand, SubcommandResult},
  },
  anyhow::{anyhow, bail, ensure, Context, Error},
  bitcoin::{
    blockdata::{
      constants::MAX_SCRIPT_ELEMENT_SIZE,
      locktime::absolute::LockTime,
      opcodes,
      script::{self, Instruction, PushBytesBuf},
    },
    consensus,
    hashes::{sha256, Hash},
    key::{FromWifError, Secp256k1},
    secp256k1::SecretKey,
    transaction::Version,
    Amount, Network, NetworkKind, OutPoint, PrivateKey, PublicKey, Script, ScriptBuf, Sequence,
    Transaction, TxIn, TxOut, Txid, Witness,
  },
  clap::{ArgGroup, Parser},
  serde::{Deserialize, Serialize},
  std::{
    convert::Infallible,
    env,
    fmt::{self, Display, Formatter},
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    process,
    str::FromStr,
  },
};

pub use self::{
  chain::Chain,
  client::{ChainClient, CoreClient},
  consolidator::Consolidator,
  draft::{Draft, Signed, SigningState},
  envelope::{payload_from_transaction, Envelope},
  fee_rate::FeeRate,
  options::Options,
  policy::{Policy, Valuation},
  transaction_builder::TransactionBuilder,
  vault::{Consolidation, Vault},
};


#[cfg(test)]
use self::test::*;

mod arguments;
mod chain;
pub mod client;
pub mod consolidator;
pub mod draft;
pub mod envelope;
mod fee_rate;
mod options;
pub mod payload;
pub mod policy;
mod settings;
mod subcommand;
pub mod transaction_builder;
pub mod vault;

type Result<T = (), E = Error> = std::result::Result<T, E>;

pub fn main() {
  env_logger::init();

  let args = Arguments::parse();

  match args.run() {
    Err(err) => {
      eprintln!("error: {err}");

      for (i, err) in err.chain().skip(1).enumerate() {
        if i == 0 {
          eprintln!();
          eprintln!("because:");
        }

        eprintln!("- {err}");
      }

      if env::var_os("RUST_BACKTRACE")
        .map(|val| val == "1")
        .unwrap_or_default()
      {
        eprintln!("{}", err.backtrace());
      }

      process::exit(1);
    }
    Ok(output) => {
      if let Some(output) = output {
        output.print_json();
      }
    }
  }
}
