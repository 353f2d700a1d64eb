use crate::Balance;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// The three denominations an account holds.
///
/// - `Main`: spendable coins.
/// - `Delegated`: coins locked in a delegation and accruing interest.
/// - `Revoking`: coins released from a delegation, waiting for the revoke period.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum Denom {
  Main,
  Delegated,
  Revoking,
}

/// Per-account (and total supply) amounts in each denomination.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct Coins {
  pub main: Balance,
  pub delegated: Balance,
  pub revoking: Balance,
}

impl Coins {
  pub fn get(&self, denom: Denom) -> Balance {
    match denom {
      Denom::Main => self.main,
      Denom::Delegated => self.delegated,
      Denom::Revoking => self.revoking,
    }
  }

  pub fn get_mut(&mut self, denom: Denom) -> &mut Balance {
    match denom {
      Denom::Main => &mut self.main,
      Denom::Delegated => &mut self.delegated,
      Denom::Revoking => &mut self.revoking,
    }
  }

  /// Every denomination together; the amount counted into the referral structure.
  pub fn total(&self) -> Balance {
    self.main.saturating_add(self.delegated).saturating_add(self.revoking)
  }

  pub fn is_zero(&self) -> bool {
    self.main == 0 && self.delegated == 0 && self.revoking == 0
  }
}
