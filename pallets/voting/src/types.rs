use alloc::vec::Vec;
use codec::{Decode, DecodeWithMemTracking, Encode};
use polkadot_sdk::sp_runtime::{PerThing, Perbill};
use primitives::{AccruePercentage, Balance, Moment, NetworkAward, Status, VotingPowerDistribution};
use scale_info::TypeInfo;

/// A parameter change, membership change or upgrade put to the government.
#[derive(Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
pub enum Proposal<AccountId, BlockNumber> {
  /// Subscription price in price units
  SubscriptionPrice(u32),
  VpnGbPrice(u32),
  StorageGbPrice(u32),
  TransitionPrice(Balance),
  /// Accrual percentages of the delegation ladder
  DelegationAward(AccruePercentage),
  DelegationNetworkAward(NetworkAward),
  SubscriptionNetworkAward(NetworkAward),
  AddGovernor(AccountId),
  RemoveGovernor(AccountId),
  AddFreeCreator(AccountId),
  RemoveFreeCreator(AccountId),
  SoftwareUpgrade(UpgradePlan<BlockNumber>),
  CancelSoftwareUpgrade,
  AddStaffValidator(AccountId),
  RemoveStaffValidator(AccountId),
  AddEarningSigner(AccountId),
  RemoveEarningSigner(AccountId),
  AddTokenRateSigner(AccountId),
  RemoveTokenRateSigner(AccountId),
  AddVpnSigner(AccountId),
  RemoveVpnSigner(AccountId),
  AddStorageSigner(AccountId),
  RemoveStorageSigner(AccountId),
  MinSend(Balance),
  MinDelegate(Balance),
  MaxValidators(u16),
  LuckyValidators(u16),
  GeneralAmnesty,
  ValidatorMinimalStatus(Status),
  JailAfter(u16),
  /// Revoke period in days
  RevokePeriod(u32),
  DustDelegation(Balance),
  VotingPower(VotingPowerDistribution),
  TransactionFee(Perbill),
  MaxTransactionFee(Balance),
}

impl<AccountId, BlockNumber: PartialOrd> Proposal<AccountId, BlockNumber> {
  /// Checks the arguments that can be judged without looking at other modules.
  pub fn is_well_formed(&self, now: BlockNumber) -> bool {
    match self {
      Self::SubscriptionPrice(x) | Self::VpnGbPrice(x) | Self::StorageGbPrice(x) => *x > 0,
      Self::DelegationAward(x) => x.is_valid(),
      Self::DelegationNetworkAward(x) | Self::SubscriptionNetworkAward(x) =>
        fits_whole(core::iter::once(x.company).chain(x.network)),
      Self::SoftwareUpgrade(plan) => !plan.name.is_empty() && plan.height > now,
      Self::MaxValidators(x) | Self::JailAfter(x) => *x > 0,
      Self::RevokePeriod(days) => *days > 0,
      Self::TransactionFee(x) => *x < Perbill::one(),
      Self::VotingPower(x) => fits_whole(x.slices.iter().map(|s| s.part)),
      _ => true,
    }
  }
}

/// Whether the shares add up to at most 100 %.
fn fits_whole(shares: impl Iterator<Item = Perbill>) -> bool {
  shares.map(|x| u64::from(x.deconstruct())).sum::<u64>() <= u64::from(Perbill::one().deconstruct())
}

/// An approved software upgrade waiting for its height.
#[derive(Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
pub struct UpgradePlan<BlockNumber> {
  pub name: Vec<u8>,
  pub height: BlockNumber,
  pub info: Vec<u8>,
}

/// The proposal under vote.
#[derive(Clone, Debug, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct ProposalInfo<AccountId, BlockNumber> {
  pub name: Vec<u8>,
  pub author: AccountId,
  pub proposal: Proposal<AccountId, BlockNumber>,
  pub end_time: Moment,
  pub started: BlockNumber,
  pub agreed: Vec<AccountId>,
  pub disagreed: Vec<AccountId>,
}

impl<AccountId: PartialEq, BlockNumber> ProposalInfo<AccountId, BlockNumber> {
  pub fn has_voted(&self, who: &AccountId) -> bool {
    self.agreed.contains(who) || self.disagreed.contains(who)
  }

  pub fn votes(&self) -> usize {
    self.agreed.len() + self.disagreed.len()
  }

  /// Two thirds of the government, rounded up, must agree.
  pub fn is_approved(&self, government: usize) -> bool {
    self.agreed.len() * 3 >= government * 2
  }
}

#[derive(Clone, Debug, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct ProposalRecord<AccountId, BlockNumber> {
  pub name: Vec<u8>,
  pub author: AccountId,
  pub proposal: Proposal<AccountId, BlockNumber>,
  /// Government at the moment of finalization
  pub government: Vec<AccountId>,
  pub agreed: Vec<AccountId>,
  pub disagreed: Vec<AccountId>,
  pub started: BlockNumber,
  pub finished: BlockNumber,
  pub approved: bool,
  /// Whether an approved change actually took effect
  pub applied: bool,
}

/// Who may answer a poll.
#[derive(Clone, Copy, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
pub enum PollRequirements {
  MinStatus(Status),
  CanValidate,
}

#[derive(Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
pub struct Poll<AccountId> {
  pub name: Vec<u8>,
  pub author: AccountId,
  /// Share of the answers that must be "yes" for a positive outcome; no quorum means the
  /// poll stays undecided
  pub quorum: Option<Perbill>,
  pub requirements: Option<PollRequirements>,
}

#[derive(
  Clone, Copy, Debug, Decode, DecodeWithMemTracking, Default, Encode, Eq, PartialEq, TypeInfo,
)]
pub enum Decision {
  #[default]
  Undecided,
  Positive,
  Negative,
}

impl Decision {
  pub fn of(quorum: Option<Perbill>, yes: u64, no: u64) -> Self {
    let Some(quorum) = quorum else { return Self::Undecided };
    if yes > 0 && yes >= quorum.mul_ceil(yes.saturating_add(no)) {
      Self::Positive
    } else {
      Self::Negative
    }
  }
}

#[derive(Clone, Debug, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct PollInfo<AccountId> {
  pub poll: Poll<AccountId>,
  pub start: Moment,
  pub end: Moment,
  pub yes: u64,
  pub no: u64,
}

#[derive(Clone, Debug, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct PollRecord<AccountId> {
  pub poll: Poll<AccountId>,
  pub start: Moment,
  pub end: Moment,
  pub yes: u64,
  pub no: u64,
  pub decision: Decision,
}
