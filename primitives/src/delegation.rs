use crate::{ARTR, Balance, params};
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Monthly accrual percentages by delegated amount.
///
/// The daily rate is the monthly percentage divided by thirty.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct AccruePercentage {
  /// Below 1 000 ARTR
  pub minimal: u32,
  /// From 1 000 ARTR
  pub thousand_plus: u32,
  /// From 10 000 ARTR
  pub ten_k_plus: u32,
  /// From 100 000 ARTR
  pub hundred_k_plus: u32,
}

impl Default for AccruePercentage {
  fn default() -> Self {
    Self {
      minimal: params::ACCRUE_MINIMAL_PERCENT,
      thousand_plus: params::ACCRUE_THOUSAND_PLUS_PERCENT,
      ten_k_plus: params::ACCRUE_TEN_K_PLUS_PERCENT,
      hundred_k_plus: params::ACCRUE_HUNDRED_K_PLUS_PERCENT,
    }
  }
}

impl AccruePercentage {
  /// Monthly percentage applying to `delegated`.
  pub fn monthly_percent(&self, delegated: Balance) -> u32 {
    if delegated < 1_000 * ARTR {
      self.minimal
    } else if delegated < 10_000 * ARTR {
      self.thousand_plus
    } else if delegated < 100_000 * ARTR {
      self.ten_k_plus
    } else {
      self.hundred_k_plus
    }
  }

  pub fn is_valid(&self) -> bool {
    self.minimal > 0
      && self.thousand_plus > 0
      && self.ten_k_plus > 0
      && self.hundred_k_plus > 0
      && self.hundred_k_plus <= 100
  }
}
