use super::*;

/// Signing progress of a transaction under construction.
///
/// The original client shipped transactions whose unlocking scripts were
/// placeholders without tracking that fact anywhere; here a transaction only
/// becomes wire bytes once every input has been given a script, and the
/// progress from untouched draft to fully scripted transaction is explicit.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SigningState {
  Draft,
  PartiallySigned,
  Signed,
}

#[derive(Debug, PartialEq)]
pub enum Error {
  InputIndexOutOfRange { index: usize, inputs: usize },
  UnsignedInputs { unsigned: usize },
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Error::InputIndexOutOfRange { index, inputs } => write!(
        f,
        "input index {index} out of range for transaction with {inputs} inputs"
      ),
      Error::UnsignedInputs { unsigned } => {
        write!(f, "transaction still has {unsigned} unsigned inputs")
      }
    }
  }
}

impl std::error::Error for Error {}

/// A transaction with inputs and outputs populated but unlocking scripts
/// pending.
#[derive(Debug, PartialEq, Clone)]
pub struct Draft {
  signed: Vec<bool>,
  transaction: Transaction,
}

impl Draft {
  pub fn new(transaction: Transaction) -> Self {
    Self {
      signed: vec![false; transaction.input.len()],
      transaction,
    }
  }

  pub fn state(&self) -> SigningState {
    let signed = self.signed.iter().filter(|signed| **signed).count();

    if signed == self.signed.len() {
      SigningState::Signed
    } else if signed == 0 {
      SigningState::Draft
    } else {
      SigningState::PartiallySigned
    }
  }

  pub fn transaction(&self) -> &Transaction {
    &self.transaction
  }

  /// Sets the unlocking script for input `index`. Placeholder scripts stand
  /// in for real signatures until a signer replaces them.
  pub fn sign_input_with_placeholder(
    &mut self,
    index: usize,
    script_sig: ScriptBuf,
  ) -> Result<(), Error> {
    let inputs = self.transaction.input.len();

    let input = self
      .transaction
      .input
      .get_mut(index)
      .ok_or(Error::InputIndexOutOfRange { index, inputs })?;

    input.script_sig = script_sig;
    self.signed[index] = true;

    Ok(())
  }

  pub fn into_signed(self) -> Result<Signed, Error> {
    let unsigned = self.signed.iter().filter(|signed| !**signed).count();

    if unsigned > 0 {
      return Err(Error::UnsignedInputs { unsigned });
    }

    Ok(Signed {
      transaction: self.transaction,
    })
  }
}

/// A finalized transaction ready for wire encoding. Every input carries an
/// unlocking script; with placeholder scripts the transaction decodes
/// anywhere but is not yet spend-valid.
#[derive(Debug, PartialEq, Clone)]
pub struct Signed {
  transaction: Transaction,
}

impl Signed {
  pub fn txid(&self) -> Txid {
    self.transaction.compute_txid()
  }

  /// Standard serialized-transaction layout: version, inputs, outputs,
  /// locktime.
  pub fn to_hex(&self) -> String {
    consensus::encode::serialize_hex(&self.transaction)
  }

  pub fn transaction(&self) -> &Transaction {
    &self.transaction
  }

  pub fn into_transaction(self) -> Transaction {
    self.transaction
  }
}
