//! Data transaction construction.
//!
//! A data transaction spends a single previously-fetched output and embeds a
//! payload across its own outputs. The payload is split into chunks, each
//! chunk wrapped in an envelope script; chunk zero rides in the primary
//! output alongside the change, and every following chunk gets its own
//! output funded at the policy's dust-safe amount.
//!
//! Construction is pure: the builder consumes an outpoint and its value, a
//! public key, and a policy, and produces an unsigned `Draft`. Fetching the
//! outpoint's value and applying unlocking scripts happen elsewhere. All
//! value arithmetic is checked; a payload the input cannot fund fails with
//! `Error::InsufficientFunds` rather than wrapping around.

use super::*;

#[derive(Debug, PartialEq)]
pub enum Error {
  ChunkTooLarge { size: usize, limit: usize },
  InsufficientFunds { input_value: Amount, required: Amount },
  ValueOverflow,
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Error::ChunkTooLarge { size, limit } => {
        write!(f, "payload chunk of {size} bytes exceeds limit of {limit} bytes")
      }
      Error::InsufficientFunds {
        input_value,
        required,
      } => write!(
        f,
        "not enough value on the input: {input_value} < {required}"
      ),
      Error::ValueOverflow => write!(f, "arithmetic overflow calculating value"),
    }
  }
}

impl std::error::Error for Error {}

impl From<envelope::Error> for Error {
  fn from(source: envelope::Error) -> Self {
    match source {
      envelope::Error::ChunkTooLarge { size, limit } => Self::ChunkTooLarge { size, limit },
    }
  }
}

#[derive(Debug, PartialEq)]
pub struct TransactionBuilder {
  input_value: Amount,
  outpoint: OutPoint,
  payload: Vec<u8>,
  policy: Policy,
  public_key: PublicKey,
}

impl TransactionBuilder {
  pub fn new(
    outpoint: OutPoint,
    input_value: Amount,
    payload: Vec<u8>,
    public_key: PublicKey,
    policy: Policy,
  ) -> Self {
    Self {
      input_value,
      outpoint,
      payload,
      policy,
      public_key,
    }
  }

  /// The placeholder unlocking script the original client set on a data
  /// transaction's input.
  pub fn placeholder_script_sig() -> ScriptBuf {
    script::Builder::new()
      .push_opcode(opcodes::all::OP_CHECKSIG)
      .into_script()
  }

  pub fn build_transaction(self) -> Result<Draft, Error> {
    let chunks = payload::chunk(&self.payload, self.policy.max_chunk_size);

    let fee = self
      .policy
      .data_fee(self.payload.len())
      .ok_or(Error::ValueOverflow)?;

    let extra_outputs = u64::try_from(chunks.len() - 1).map_err(|_| Error::ValueOverflow)?;

    let extra_amount = self
      .policy
      .extra_output_amount
      .checked_mul(extra_outputs)
      .ok_or(Error::ValueOverflow)?;

    let required = fee.checked_add(extra_amount).ok_or(Error::ValueOverflow)?;

    let change = self
      .input_value
      .checked_sub(required)
      .ok_or(Error::InsufficientFunds {
        input_value: self.input_value,
        required,
      })?;

    let mut output = Vec::with_capacity(chunks.len());

    for (i, chunk) in chunks.into_iter().enumerate() {
      let envelope = Envelope::new(chunk.to_vec(), self.public_key, self.policy.max_chunk_size)?;

      output.push(TxOut {
        script_pubkey: envelope.script(),
        value: if i == 0 {
          change
        } else {
          self.policy.extra_output_amount
        },
      });
    }

    Ok(Draft::new(Transaction {
      version: Version::TWO,
      lock_time: LockTime::ZERO,
      input: vec![TxIn {
        previous_output: self.outpoint,
        script_sig: ScriptBuf::new(),
        sequence: Sequence::MAX,
        witness: Witness::new(),
      }],
      output,
    }))
  }
}
