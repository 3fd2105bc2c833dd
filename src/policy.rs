use super::*;

/// How a consolidation prices the value it is spending.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Valuation {
  /// Spendable value is the sum of every consolidated output.
  SumOfOutputs,
  /// Spendable value is read from output zero only, reproducing the original
  /// client, which spends every output but prices the consolidation off the
  /// first.
  FirstOutput,
}

/// Fee and sizing constants injected into every build. The original client
/// kept these in a hard-coded constants table keyed by network; here they are
/// explicit, per-call configuration.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Policy {
  pub consolidation_valuation: Valuation,
  pub empty_tx_size: u64,
  pub extra_output_amount: Amount,
  pub fee_rate: FeeRate,
  pub input_spend_size: u64,
  pub max_chunk_size: usize,
}

impl Default for Policy {
  fn default() -> Self {
    Self {
      consolidation_valuation: Valuation::SumOfOutputs,
      empty_tx_size: Self::EMPTY_TX_SIZE,
      extra_output_amount: Self::EXTRA_OUTPUT_AMOUNT,
      fee_rate: Self::FEE_RATE,
      input_spend_size: Self::INPUT_SPEND_SIZE,
      max_chunk_size: MAX_SCRIPT_ELEMENT_SIZE,
    }
  }
}

impl Policy {
  /// Overhead bytes charged on every transaction: version, locktime, count
  /// prefixes, and one input spending a bare output.
  pub const EMPTY_TX_SIZE: u64 = 192;
  /// Dust-safe value carried by payload outputs past the first.
  pub const EXTRA_OUTPUT_AMOUNT: Amount = Amount::from_sat(1_000);
  pub const FEE_RATE: FeeRate = FeeRate::from_sat_per_byte(2);
  /// Bytes charged per consolidated input.
  pub const INPUT_SPEND_SIZE: u64 = 180;

  /// Fee for a data transaction embedding `payload_size` bytes.
  pub fn data_fee(&self, payload_size: usize) -> Option<Amount> {
    self.fee_rate.fee(
      u64::try_from(payload_size)
        .ok()?
        .checked_add(self.empty_tx_size)?,
    )
  }

  /// Fee for consolidating `input_count` outputs into one.
  pub fn consolidation_fee(&self, input_count: usize) -> Option<Amount> {
    self.fee_rate.fee(
      self
        .input_spend_size
        .checked_mul(u64::try_from(input_count).ok()?)?
        .checked_add(self.empty_tx_size)?,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn data_fee_charges_payload_plus_overhead() {
    let policy = Policy::default();

    assert_eq!(policy.data_fee(0), Some(Amount::from_sat(384)));
    assert_eq!(policy.data_fee(8), Some(Amount::from_sat(400)));
    assert_eq!(policy.data_fee(1000), Some(Amount::from_sat(2384)));
  }

  #[test]
  fn consolidation_fee_charges_per_input() {
    let policy = Policy::default();

    assert_eq!(policy.consolidation_fee(1), Some(Amount::from_sat(744)));
    assert_eq!(policy.consolidation_fee(4), Some(Amount::from_sat(1824)));
  }

  #[test]
  fn fees_overflow_to_none() {
    let policy = Policy {
      fee_rate: FeeRate::from_sat_per_byte(u64::MAX),
      ..Default::default()
    };

    assert_eq!(policy.data_fee(2), None);
    assert_eq!(policy.consolidation_fee(2), None);

    let policy = Policy {
      input_spend_size: u64::MAX,
      ..Default::default()
    };

    assert_eq!(policy.consolidation_fee(2), None);
  }

  #[test]
  fn default_chunk_size_is_the_consensus_push_limit() {
    assert_eq!(Policy::default().max_chunk_size, 520);
  }
}
