//! Consolidation spends every output of a previously-built data transaction
//! back into a single pay-to-public-key output, paying a fee proportional to
//! the number of inputs. Like the builder, it is pure: output values are
//! fetched by the caller.

use super::*;

#[derive(Debug, PartialEq)]
pub enum Error {
  InsufficientFunds { input_value: Amount, required: Amount },
  NoOutputs { txid: Txid },
  ValueOverflow,
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Error::InsufficientFunds {
        input_value,
        required,
      } => write!(
        f,
        "not enough value on the input: {input_value} < {required}"
      ),
      Error::NoOutputs { txid } => {
        write!(f, "transaction {txid} has no outputs to consolidate")
      }
      Error::ValueOverflow => write!(f, "arithmetic overflow calculating value"),
    }
  }
}

impl std::error::Error for Error {}

#[derive(Debug, PartialEq)]
pub struct Consolidator {
  output_values: Vec<Amount>,
  policy: Policy,
  public_key: PublicKey,
  txid: Txid,
}

impl Consolidator {
  pub fn new(txid: Txid, output_values: Vec<Amount>, public_key: PublicKey, policy: Policy) -> Self {
    Self {
      output_values,
      policy,
      public_key,
      txid,
    }
  }

  /// The placeholder unlocking script the original client set on every
  /// consolidation input.
  pub fn placeholder_script_sig() -> ScriptBuf {
    script::Builder::new()
      .push_opcode(opcodes::all::OP_DROP)
      .into_script()
  }

  pub fn consolidate(self) -> Result<Draft, Error> {
    if self.output_values.is_empty() {
      return Err(Error::NoOutputs { txid: self.txid });
    }

    let fee = self
      .policy
      .consolidation_fee(self.output_values.len())
      .ok_or(Error::ValueOverflow)?;

    let input_value = match self.policy.consolidation_valuation {
      Valuation::FirstOutput => self.output_values[0],
      Valuation::SumOfOutputs => {
        let mut sum = Amount::ZERO;

        for value in &self.output_values {
          sum = sum.checked_add(*value).ok_or(Error::ValueOverflow)?;
        }

        sum
      }
    };

    let amount = input_value
      .checked_sub(fee)
      .ok_or(Error::InsufficientFunds {
        input_value,
        required: fee,
      })?;

    let mut input = Vec::with_capacity(self.output_values.len());

    for vout in 0..self.output_values.len() {
      input.push(TxIn {
        previous_output: OutPoint {
          txid: self.txid,
          vout: u32::try_from(vout).map_err(|_| Error::ValueOverflow)?,
        },
        script_sig: ScriptBuf::new(),
        sequence: Sequence::MAX,
        witness: Witness::new(),
      });
    }

    Ok(Draft::new(Transaction {
      version: Version::TWO,
      lock_time: LockTime::ZERO,
      input,
      output: vec![TxOut {
        script_pubkey: script::Builder::new()
          .push_key(&self.public_key)
          .push_opcode(opcodes::all::OP_CHECKSIG)
          .into_script(),
        value: amount,
      }],
    }))
  }
}
