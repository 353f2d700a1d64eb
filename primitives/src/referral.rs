use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_arithmetic::{Perbill, traits::Saturating};

/// Depth of the referral structure counted into a node's aggregates.
pub const LEVELS: usize = 10;

/// Rank of an account on the referral ladder.
///
/// The rank gates how many referral levels an account earns fees from ("lines opened") and
/// whether it takes part in the weekly status bonus.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  Hash,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum Status {
  #[default]
  #[codec(index = 1)]
  Lucky,
  #[codec(index = 2)]
  Leader,
  #[codec(index = 3)]
  Master,
  #[codec(index = 4)]
  Champion,
  #[codec(index = 5)]
  Businessman,
  #[codec(index = 6)]
  Professional,
  #[codec(index = 7)]
  TopLeader,
  #[codec(index = 8)]
  Hero,
  #[codec(index = 9)]
  AbsoluteChampion,
}

impl Status {
  pub const ALL: [Status; 9] = [
    Status::Lucky,
    Status::Leader,
    Status::Master,
    Status::Champion,
    Status::Businessman,
    Status::Professional,
    Status::TopLeader,
    Status::Hero,
    Status::AbsoluteChampion,
  ];

  /// Lowest status taking part in the weekly status bonus.
  pub const MIN_BONUS: Status = Status::Businessman;

  /// Number of referral levels this status earns fees from.
  pub fn lines_opened(self) -> usize {
    match self {
      Status::Lucky => 4,
      Status::Leader => 6,
      Status::Master => 8,
      _ => LEVELS,
    }
  }

  pub fn next(self) -> Option<Status> {
    Self::ALL.get(self.index() + 1).copied()
  }

  pub fn previous(self) -> Option<Status> {
    self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
  }

  pub fn has_bonus(self) -> bool {
    self >= Self::MIN_BONUS
  }

  fn index(self) -> usize {
    self as usize
  }
}

/// One beneficiary of a fee split.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
)]
pub struct ReferralFee<AccountId> {
  pub beneficiary: AccountId,
  pub ratio: Perbill,
}

/// Fee split applied to a payment: a company share plus one share per referral level.
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
pub struct NetworkAward {
  pub company: Perbill,
  pub network: [Perbill; LEVELS],
}

impl NetworkAward {
  /// Delegation split: 5% company, 10% spread over ten levels.
  pub const fn delegating() -> Self {
    Self {
      company: Perbill::from_percent(5),
      network: [
        Perbill::from_percent(5),
        Perbill::from_percent(1),
        Perbill::from_percent(1),
        Perbill::from_percent(1),
        Perbill::from_parts(5_000_000),
        Perbill::from_parts(5_000_000),
        Perbill::from_parts(2_500_000),
        Perbill::from_parts(2_500_000),
        Perbill::from_parts(2_500_000),
        Perbill::from_parts(2_500_000),
      ],
    }
  }

  /// Subscription split: 10% company, 60% spread over ten levels.
  pub const fn subscription() -> Self {
    Self {
      company: Perbill::from_percent(10),
      network: [
        Perbill::from_percent(15),
        Perbill::from_percent(10),
        Perbill::from_percent(7),
        Perbill::from_percent(7),
        Perbill::from_percent(7),
        Perbill::from_percent(5),
        Perbill::from_percent(3),
        Perbill::from_percent(2),
        Perbill::from_percent(2),
        Perbill::from_percent(2),
      ],
    }
  }

  pub fn total(&self) -> Perbill {
    self
      .network
      .iter()
      .fold(self.company, |acc, share| acc.saturating_add(*share))
  }
}

/// Reserved company accounts receiving fee shares.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
)]
pub struct CompanyAccounts<AccountId> {
  pub top_referrer: AccountId,
  pub for_subscription: AccountId,
  pub for_delegating: AccountId,
  pub promo_bonuses: AccountId,
  pub status_bonuses: AccountId,
  pub leader_bonuses: AccountId,
}
