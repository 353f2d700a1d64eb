//! Voting Pallet
//!
//! A fixed government of governors decides on parameter changes, membership changes and
//! software upgrades. One proposal runs at a time. Its author agrees implicitly; the vote ends
//! once every governor has voted or when the voting period runs out, and passes with two
//! thirds of the government in favour. A passed proposal is applied through the governance
//! capability of the module owning the parameter; a change that cannot be applied is logged and
//! recorded as not applied without touching the outcome of the vote.
//!
//! Polls are non-binding surveys open to every account meeting the poll requirements. One poll
//! runs at a time, independently of proposals.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod types;
pub use types::*;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::voting";

pub const VOTE_HOOK: &[u8] = b"voting/end";
pub const POLL_HOOK: &[u8] = b"voting/poll-end";

#[frame::pallet]
pub mod pallet {
  use super::{
    Decision, LOG_TARGET, POLL_HOOK, Poll, PollInfo, PollRecord, PollRequirements, Proposal,
    ProposalInfo, ProposalRecord, UpgradePlan, VOTE_HOOK, WeightInfo,
  };
  use alloc::vec::Vec;
  use frame::prelude::*;
  use polkadot_sdk::{frame_support::storage::with_storage_layer, sp_runtime::Perbill};
  use primitives::{
    BankGovernance, DelegationGovernance, Moment, NodingGovernance, ReferralGovernance,
    ReferralNetwork, Scheduler, SignerRegistry, SubscriptionGovernance, TaskHandler,
    ValidatorInspect,
  };

  pub type ProposalOf<T> = Proposal<<T as frame_system::Config>::AccountId, BlockNumberFor<T>>;
  pub type ProposalInfoOf<T> =
    ProposalInfo<<T as frame_system::Config>::AccountId, BlockNumberFor<T>>;
  pub type ProposalRecordOf<T> =
    ProposalRecord<<T as frame_system::Config>::AccountId, BlockNumberFor<T>>;

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    type Scheduler: Scheduler;

    type Bank: BankGovernance;

    type Delegation: DelegationGovernance;

    /// Referral parameters, plus the statuses polls are restricted by
    type Referral: ReferralGovernance + ReferralNetwork<Self::AccountId>;

    type Subscription: SubscriptionGovernance;

    type Noding: NodingGovernance<Self::AccountId>;

    type Validators: ValidatorInspect<Self::AccountId>;

    /// Accounts creating new accounts for free
    type FreeCreators: SignerRegistry<Self::AccountId>;

    /// Signers of storage and VPN earnings
    type EarningSigners: SignerRegistry<Self::AccountId>;

    type TokenRateSigners: SignerRegistry<Self::AccountId>;

    /// Accounts reporting VPN traffic
    type VpnSigners: SignerRegistry<Self::AccountId>;

    /// Accounts reporting used storage
    type StorageSigners: SignerRegistry<Self::AccountId>;

    #[pallet::constant]
    type DefaultVotingPeriod: Get<Moment>;

    #[pallet::constant]
    type DefaultPollPeriod: Get<Moment>;

    /// Longest proposal or poll name
    #[pallet::constant]
    type MaxNameLength: Get<u32>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  #[pallet::without_storage_info]
  pub struct Pallet<T>(_);

  /// Governors, in the order they joined.
  #[pallet::storage]
  #[pallet::getter(fn government)]
  pub type Government<T: Config> = StorageValue<_, Vec<T::AccountId>, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn current_proposal)]
  pub type CurrentProposal<T: Config> = StorageValue<_, ProposalInfoOf<T>>;

  /// Finished proposals, oldest first.
  #[pallet::storage]
  #[pallet::getter(fn history)]
  pub type History<T: Config> = StorageMap<_, Twox64Concat, u32, ProposalRecordOf<T>>;

  #[pallet::storage]
  pub type HistoryLength<T: Config> = StorageValue<_, u32, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn upgrade_plan)]
  pub type PendingUpgrade<T: Config> = StorageValue<_, UpgradePlan<BlockNumberFor<T>>>;

  #[pallet::storage]
  #[pallet::getter(fn current_poll)]
  pub type CurrentPoll<T: Config> = StorageValue<_, PollInfo<T::AccountId>>;

  /// Answers to the current poll.
  #[pallet::storage]
  pub type PollAnswers<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, bool>;

  #[pallet::storage]
  #[pallet::getter(fn poll_history)]
  pub type PollHistory<T: Config> = StorageMap<_, Twox64Concat, u32, PollRecord<T::AccountId>>;

  #[pallet::storage]
  pub type PollHistoryLength<T: Config> = StorageValue<_, u32, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn voting_period)]
  pub type VotingPeriod<T: Config> = StorageValue<_, Moment, ValueQuery, T::DefaultVotingPeriod>;

  #[pallet::storage]
  #[pallet::getter(fn poll_period)]
  pub type PollPeriod<T: Config> = StorageValue<_, Moment, ValueQuery, T::DefaultPollPeriod>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    ProposalCreated { name: Vec<u8>, author: T::AccountId, end_time: Moment },
    Voted { voter: T::AccountId, agree: bool },
    /// The vote ended; `applied` tells whether an approved change took effect
    VotingFinished { name: Vec<u8>, approved: bool, applied: bool },
    GovernorAdded { who: T::AccountId },
    GovernorRemoved { who: T::AccountId },
    UpgradeScheduled { name: Vec<u8>, height: BlockNumberFor<T> },
    UpgradeCancelled { name: Vec<u8> },
    PollStarted { name: Vec<u8>, author: T::AccountId, end: Moment },
    PollAnswered { respondent: T::AccountId, yes: bool },
    PollFinished { name: Vec<u8>, yes: u64, no: u64, decision: Decision },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Only governors may propose, vote and start polls
    NotGovernor,
    /// Another proposal or poll is running
    OtherActive,
    NoActiveProposal,
    AlreadyVoted,
    /// Proposal arguments are out of range
    InvalidProposal,
    EmptyName,
    NameTooLong,
    AlreadyGovernor,
    /// The government cannot be left empty
    LastGovernor,
    NoUpgradePlan,
    NoActivePoll,
    /// The respondent does not meet the poll requirements
    RespondentNotAllowed,
    AlreadyAnswered,
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    pub government: Vec<T::AccountId>,
    pub voting_period: Option<Moment>,
    pub poll_period: Option<Moment>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      assert!(!self.government.is_empty(), "government must not be empty");
      let mut government = Vec::with_capacity(self.government.len());
      for who in &self.government {
        assert!(!government.contains(who), "duplicate governor");
        government.push(who.clone());
      }
      Government::<T>::put(government);
      if let Some(value) = self.voting_period {
        VotingPeriod::<T>::put(value);
      }
      if let Some(value) = self.poll_period {
        PollPeriod::<T>::put(value);
      }
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Put a proposal to the vote. The author agrees with it.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::propose())]
    pub fn propose(origin: OriginFor<T>, name: Vec<u8>, proposal: ProposalOf<T>) -> DispatchResult {
      let author = ensure_signed(origin)?;
      Self::ensure_name(&name)?;
      ensure!(CurrentProposal::<T>::get().is_none(), Error::<T>::OtherActive);
      let government = Government::<T>::get();
      ensure!(government.contains(&author), Error::<T>::NotGovernor);
      Self::validate(&proposal, &government)?;

      let end_time = T::Scheduler::now().saturating_add(VotingPeriod::<T>::get());
      T::Scheduler::schedule(end_time, VOTE_HOOK, &[])?;
      let info = ProposalInfo {
        name: name.clone(),
        author: author.clone(),
        proposal,
        end_time,
        started: frame_system::Pallet::<T>::block_number(),
        agreed: alloc::vec![author.clone()],
        disagreed: Vec::new(),
      };
      Self::deposit_event(Event::ProposalCreated { name, author, end_time });

      if info.votes() == government.len() {
        Self::finish(info, &government);
      } else {
        CurrentProposal::<T>::put(info);
      }
      Ok(())
    }

    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::vote())]
    pub fn vote(origin: OriginFor<T>, agree: bool) -> DispatchResult {
      let voter = ensure_signed(origin)?;
      let mut info = CurrentProposal::<T>::get().ok_or(Error::<T>::NoActiveProposal)?;
      let government = Government::<T>::get();
      ensure!(government.contains(&voter), Error::<T>::NotGovernor);
      ensure!(!info.has_voted(&voter), Error::<T>::AlreadyVoted);

      if agree {
        info.agreed.push(voter.clone());
      } else {
        info.disagreed.push(voter.clone());
      }
      Self::deposit_event(Event::Voted { voter, agree });

      if info.votes() == government.len() {
        Self::finish(info, &government);
      } else {
        CurrentProposal::<T>::put(info);
      }
      Ok(())
    }

    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::start_poll())]
    pub fn start_poll(
      origin: OriginFor<T>,
      name: Vec<u8>,
      quorum: Option<Perbill>,
      requirements: Option<PollRequirements>,
    ) -> DispatchResult {
      let author = ensure_signed(origin)?;
      Self::ensure_name(&name)?;
      ensure!(CurrentPoll::<T>::get().is_none(), Error::<T>::OtherActive);
      ensure!(Government::<T>::get().contains(&author), Error::<T>::NotGovernor);

      let start = T::Scheduler::now();
      let end = start.saturating_add(PollPeriod::<T>::get());
      T::Scheduler::schedule(end, POLL_HOOK, &[])?;
      Self::deposit_event(Event::PollStarted { name: name.clone(), author: author.clone(), end });
      let poll = Poll { name, author, quorum, requirements };
      CurrentPoll::<T>::put(PollInfo { poll, start, end, yes: 0, no: 0 });
      Ok(())
    }

    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::answer_poll())]
    pub fn answer_poll(origin: OriginFor<T>, yes: bool) -> DispatchResult {
      let respondent = ensure_signed(origin)?;
      let mut info = CurrentPoll::<T>::get().ok_or(Error::<T>::NoActivePoll)?;
      let allowed = match info.poll.requirements {
        None => true,
        Some(PollRequirements::CanValidate) => T::Validators::can_validate(&respondent),
        Some(PollRequirements::MinStatus(min)) =>
          T::Referral::status(&respondent).is_some_and(|status| status >= min),
      };
      ensure!(allowed, Error::<T>::RespondentNotAllowed);
      ensure!(!PollAnswers::<T>::contains_key(&respondent), Error::<T>::AlreadyAnswered);

      PollAnswers::<T>::insert(&respondent, yes);
      if yes {
        info.yes = info.yes.saturating_add(1);
      } else {
        info.no = info.no.saturating_add(1);
      }
      CurrentPoll::<T>::put(info);
      Self::deposit_event(Event::PollAnswered { respondent, yes });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    fn ensure_name(name: &[u8]) -> DispatchResult {
      ensure!(!name.is_empty(), Error::<T>::EmptyName);
      ensure!(name.len() <= T::MaxNameLength::get() as usize, Error::<T>::NameTooLong);
      Ok(())
    }

    fn validate(proposal: &ProposalOf<T>, government: &[T::AccountId]) -> DispatchResult {
      let now = frame_system::Pallet::<T>::block_number();
      ensure!(proposal.is_well_formed(now), Error::<T>::InvalidProposal);
      match proposal {
        Proposal::AddGovernor(who) => ensure!(!government.contains(who), Error::<T>::AlreadyGovernor),
        Proposal::RemoveGovernor(who) => {
          ensure!(government.contains(who), Error::<T>::NotGovernor);
          ensure!(government.len() > 1, Error::<T>::LastGovernor);
        },
        Proposal::CancelSoftwareUpgrade =>
          ensure!(PendingUpgrade::<T>::exists(), Error::<T>::NoUpgradePlan),
        _ => {},
      }
      Ok(())
    }

    /// Archives the proposal and applies it when approved.
    fn finish(info: ProposalInfoOf<T>, government: &[T::AccountId]) {
      T::Scheduler::delete_all(info.end_time, VOTE_HOOK);
      CurrentProposal::<T>::kill();

      let approved = info.is_approved(government.len());
      let applied = approved &&
        match with_storage_layer(|| Self::apply(&info.proposal)) {
          Ok(()) => true,
          Err(e) => {
            log::error!(
              target: LOG_TARGET,
              "could not apply voting result {:?}: {:?}",
              core::str::from_utf8(&info.name),
              e,
            );
            false
          },
        };
      log::debug!(target: LOG_TARGET, "proposal finished, approved {}, applied {}", approved, applied);

      let index = HistoryLength::<T>::get();
      History::<T>::insert(
        index,
        ProposalRecord {
          name: info.name.clone(),
          author: info.author,
          proposal: info.proposal,
          government: government.to_vec(),
          agreed: info.agreed,
          disagreed: info.disagreed,
          started: info.started,
          finished: frame_system::Pallet::<T>::block_number(),
          approved,
          applied,
        },
      );
      HistoryLength::<T>::put(index.saturating_add(1));
      Self::deposit_event(Event::VotingFinished { name: info.name, approved, applied });
    }

    fn apply(proposal: &ProposalOf<T>) -> DispatchResult {
      match proposal.clone() {
        Proposal::SubscriptionPrice(x) => T::Subscription::set_subscription_price(x),
        Proposal::VpnGbPrice(x) => T::Subscription::set_vpn_gb_price(x),
        Proposal::StorageGbPrice(x) => T::Subscription::set_storage_gb_price(x),
        Proposal::TransitionPrice(x) => T::Referral::set_transition_price(x),
        Proposal::DelegationAward(x) => T::Delegation::set_accrue_percentage(x),
        Proposal::DelegationNetworkAward(x) => T::Referral::set_delegating_award(x),
        Proposal::SubscriptionNetworkAward(x) => T::Referral::set_subscription_award(x),
        Proposal::AddGovernor(who) => Self::add_governor(who),
        Proposal::RemoveGovernor(who) => Self::remove_governor(who),
        Proposal::AddFreeCreator(who) => T::FreeCreators::add_signer(&who),
        Proposal::RemoveFreeCreator(who) => T::FreeCreators::remove_signer(&who),
        Proposal::SoftwareUpgrade(plan) => {
          Self::deposit_event(Event::UpgradeScheduled {
            name: plan.name.clone(),
            height: plan.height,
          });
          PendingUpgrade::<T>::put(plan);
          Ok(())
        },
        Proposal::CancelSoftwareUpgrade => {
          let plan = PendingUpgrade::<T>::take().ok_or(Error::<T>::NoUpgradePlan)?;
          Self::deposit_event(Event::UpgradeCancelled { name: plan.name });
          Ok(())
        },
        Proposal::AddStaffValidator(who) => T::Noding::add_staff_validator(&who),
        Proposal::RemoveStaffValidator(who) => T::Noding::remove_staff_validator(&who),
        Proposal::AddEarningSigner(who) => T::EarningSigners::add_signer(&who),
        Proposal::RemoveEarningSigner(who) => T::EarningSigners::remove_signer(&who),
        Proposal::AddTokenRateSigner(who) => T::TokenRateSigners::add_signer(&who),
        Proposal::RemoveTokenRateSigner(who) => T::TokenRateSigners::remove_signer(&who),
        Proposal::AddVpnSigner(who) => T::VpnSigners::add_signer(&who),
        Proposal::RemoveVpnSigner(who) => T::VpnSigners::remove_signer(&who),
        Proposal::AddStorageSigner(who) => T::StorageSigners::add_signer(&who),
        Proposal::RemoveStorageSigner(who) => T::StorageSigners::remove_signer(&who),
        Proposal::MinSend(x) => T::Bank::set_min_send(x),
        Proposal::MinDelegate(x) => T::Delegation::set_min_delegate(x),
        Proposal::MaxValidators(x) => T::Noding::set_max_validators(x),
        Proposal::LuckyValidators(x) => T::Noding::set_lucky_validators(x),
        Proposal::GeneralAmnesty => T::Noding::general_amnesty(),
        Proposal::ValidatorMinimalStatus(x) => T::Noding::set_minimal_status(x),
        Proposal::JailAfter(x) => T::Noding::set_jail_after(x),
        Proposal::RevokePeriod(days) => T::Delegation::set_revoke_period(days),
        Proposal::DustDelegation(x) => T::Bank::set_dust_delegation(x),
        Proposal::VotingPower(x) => T::Noding::set_voting_power(x),
        Proposal::TransactionFee(x) => T::Bank::set_transaction_fee(x),
        Proposal::MaxTransactionFee(x) => T::Bank::set_max_transaction_fee(x),
      }
    }

    fn add_governor(who: T::AccountId) -> DispatchResult {
      Government::<T>::try_mutate(|government| {
        ensure!(!government.contains(&who), Error::<T>::AlreadyGovernor);
        government.push(who.clone());
        Ok::<_, DispatchError>(())
      })?;
      Self::deposit_event(Event::GovernorAdded { who });
      Ok(())
    }

    fn remove_governor(who: T::AccountId) -> DispatchResult {
      Government::<T>::try_mutate(|government| {
        let index = government.iter().position(|x| *x == who).ok_or(Error::<T>::NotGovernor)?;
        ensure!(government.len() > 1, Error::<T>::LastGovernor);
        government.remove(index);
        Ok::<_, DispatchError>(())
      })?;
      Self::deposit_event(Event::GovernorRemoved { who });
      Ok(())
    }

    fn end_voting(at: Moment) {
      let Some(info) = CurrentProposal::<T>::get() else {
        log::warn!(target: LOG_TARGET, "voting end at {} without a proposal", at);
        return;
      };
      if info.end_time != at {
        log::warn!(target: LOG_TARGET, "voting end at {} does not match the proposal", at);
        return;
      }
      Self::finish(info, &Government::<T>::get());
    }

    fn end_poll(at: Moment) {
      let Some(info) = CurrentPoll::<T>::take() else {
        log::warn!(target: LOG_TARGET, "poll end at {} without a poll", at);
        return;
      };
      let decision = Decision::of(info.poll.quorum, info.yes, info.no);
      let _ = PollAnswers::<T>::clear(u32::MAX, None);

      let index = PollHistoryLength::<T>::get();
      PollHistory::<T>::insert(
        index,
        PollRecord {
          poll: info.poll.clone(),
          start: info.start,
          end: info.end,
          yes: info.yes,
          no: info.no,
          decision,
        },
      );
      PollHistoryLength::<T>::put(index.saturating_add(1));
      Self::deposit_event(Event::PollFinished {
        name: info.poll.name,
        yes: info.yes,
        no: info.no,
        decision,
      });
    }
  }

  impl<T: Config> TaskHandler for Pallet<T> {
    fn handle(hook: &[u8], _payload: &[u8], at: Moment) -> Option<DispatchResult> {
      if hook == VOTE_HOOK {
        Self::end_voting(at);
      } else if hook == POLL_HOOK {
        Self::end_poll(at);
      } else {
        return None;
      }
      Some(Ok(()))
    }
  }
}
