use super::*;

/// Satoshis per byte. The original client derived amounts by multiplying
/// floating-point BTC values; fee math here is integer end to end.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(u64);

impl FromStr for FeeRate {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Self(u64::from_str(s)?))
  }
}

impl Display for FeeRate {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FeeRate {
  pub const fn from_sat_per_byte(rate: u64) -> Self {
    Self(rate)
  }

  pub fn n(self) -> u64 {
    self.0
  }

  pub(crate) fn fee(self, size: u64) -> Option<Amount> {
    self.0.checked_mul(size).map(Amount::from_sat)
  }
}
