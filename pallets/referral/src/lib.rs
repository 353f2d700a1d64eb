//! Referral Pallet
//!
//! Ten-level referral structure. Every node caches, per level below it, the coins, delegated
//! coins and active accounts of its descendants, so status requirements and fee splits never
//! walk whole subtrees.
//!
//! ## Lifecycle
//!
//! - A node is appended under an open referrer and starts inactive; it becomes active while its
//!   subscription is paid.
//! - Two months after going inactive the node is compressed: its referrals move up to its own
//!   referrer and it keeps nothing but its own coins.
//! - Two more inactive months banish it: the node leaves the structure until it delegates again.
//!
//! ## Status ladder
//!
//! Statuses are re-checked whenever a node's aggregates or first line change. Promotion is
//! immediate, a failed requirement schedules a downgrade one month ahead that is cancelled if
//! the requirement is restored in time. Holders of Businessman and above share the weekly
//! status bonus.
//!
//! Tree edits go through a [`updater::BunchUpdater`], so an operation either lands completely
//! or not at all, and callbacks to other keepers only see committed state.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

mod status;
pub mod types;
mod updater;
pub use types::*;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::referral";

pub const DOWNGRADE_HOOK: &[u8] = b"referral/downgrade";
pub const COMPRESSION_HOOK: &[u8] = b"referral/compression";
pub const BANISHMENT_HOOK: &[u8] = b"referral/banishment";
pub const TRANSITION_TIMEOUT_HOOK: &[u8] = b"referral/transition-timeout";
pub const STATUS_BONUS_HOOK: &[u8] = b"referral/status-bonus";

/// Inactive months before compression, and again before banishment.
const INACTIVITY_MONTHS: u64 = 2;

#[frame::pallet]
pub mod pallet {
  use super::{
    BANISHMENT_HOOK, COMPRESSION_HOOK, Callback, DOWNGRADE_HOOK, INACTIVITY_MONTHS, LOG_TARGET,
    PendingTransition, ReferralInfo, STATUS_BONUS_HOOK, Subtree, TRANSITION_TIMEOUT_HOOK,
    WeightInfo, updater::BunchUpdater,
  };
  use alloc::{collections::BTreeMap, vec, vec::Vec};
  use frame::prelude::*;
  use polkadot_sdk::sp_runtime::Perbill;
  use primitives::{
    Balance, CompanyAccounts, LEVELS, Ledger, Moment, NetworkAward, OnBalanceChanged, ReferralFee,
    ReferralGovernance, ReferralHooks, ReferralNetwork, Scheduler, Status, TaskHandler,
  };

  pub type ReferralInfoOf<T> = ReferralInfo<<T as frame_system::Config>::AccountId>;

  /// Fixed share of a subscription payment for each of the promo, status and leader bonus pools.
  const BONUS_POOL_SHARE: Perbill = Perbill::from_percent(5);

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    type Ledger: Ledger<Self::AccountId>;

    type Scheduler: Scheduler;

    /// Receivers of committed tree callbacks
    type Hooks: ReferralHooks<Self::AccountId>;

    #[pallet::constant]
    type CompanyAccounts: Get<CompanyAccounts<Self::AccountId>>;

    /// Receiver of transition fees
    #[pallet::constant]
    type FeeCollector: Get<Self::AccountId>;

    #[pallet::constant]
    type DefaultTransitionPrice: Get<Balance>;

    #[pallet::constant]
    type DefaultDelegatingAward: Get<NetworkAward>;

    #[pallet::constant]
    type DefaultSubscriptionAward: Get<NetworkAward>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  #[pallet::without_storage_info]
  pub struct Pallet<T>(_);

  #[pallet::storage]
  #[pallet::getter(fn node)]
  pub type Nodes<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, ReferralInfoOf<T>>;

  /// Holders of the statuses taking part in the status bonus.
  #[pallet::storage]
  pub type StatusIndex<T: Config> =
    StorageDoubleMap<_, Twox64Concat, Status, Blake2_128Concat, T::AccountId, ()>;

  #[pallet::storage]
  #[pallet::getter(fn transition_price)]
  pub type TransitionPrice<T: Config> =
    StorageValue<_, Balance, ValueQuery, T::DefaultTransitionPrice>;

  #[pallet::storage]
  #[pallet::getter(fn delegating_award)]
  pub type DelegatingAward<T: Config> =
    StorageValue<_, NetworkAward, ValueQuery, T::DefaultDelegatingAward>;

  #[pallet::storage]
  #[pallet::getter(fn subscription_award)]
  pub type SubscriptionAward<T: Config> =
    StorageValue<_, NetworkAward, ValueQuery, T::DefaultSubscriptionAward>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A node joined the structure
    Registered { who: T::AccountId, referrer: T::AccountId },
    StatusUpdated { who: T::AccountId, before: Status, after: Status },
    /// The current status requirements are not met any more
    StatusWillBeDowngraded { who: T::AccountId, at: Moment },
    StatusDowngradeCanceled { who: T::AccountId },
    ActivityChanged { who: T::AccountId, active: bool },
    /// An inactive node handed its referrals over to its referrer
    Compressed { who: T::AccountId },
    Banished { who: T::AccountId },
    CameBack { who: T::AccountId, referrer: Option<T::AccountId> },
    TransitionRequested {
      subject: T::AccountId,
      before: Option<T::AccountId>,
      after: T::AccountId,
    },
    TransitionDeclined {
      subject: T::AccountId,
      before: Option<T::AccountId>,
      after: T::AccountId,
    },
    TransitionTimedOut {
      subject: T::AccountId,
      before: Option<T::AccountId>,
      after: T::AccountId,
    },
    TransitionPerformed {
      subject: T::AccountId,
      before: Option<T::AccountId>,
      after: T::AccountId,
    },
    StatusBonusPaid { who: T::AccountId, amount: Balance },
    TransitionPriceUpdated { old_amount: Balance, new_amount: Balance },
    DelegatingAwardUpdated { old_award: NetworkAward, new_award: NetworkAward },
    SubscriptionAwardUpdated { old_award: NetworkAward, new_award: NetworkAward },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// No referral node for the account
    AccountNotFound,
    /// The account already has a referral node
    AccountExists,
    /// The referrer has no referral node
    ParentNotFound,
    /// The referrer does not accept new referrals
    RegistrationClosed,
    /// The account is banished from the structure
    AccountBanished,
    /// An account cannot be its own referrer
    SelfTransition,
    /// A transition is already pending
    TransitionPending,
    /// No transition is pending
    NoPendingTransition,
    /// The destination is already the referrer
    AlreadyReferrer,
    /// The transition destination has no referral node
    DestinationNotFound,
    /// The destination lies inside the subject's own structure
    CycleDetected,
    /// Only the current referrer may resolve a transition
    NotReferrer,
    /// Shares of a network award exceed the whole payment
    InvalidAward,
    /// Scheduled task payload is not an account
    MalformedPayload,
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// `(account, referrer, status, active)`; a referrer precedes its referrals
    pub accounts: Vec<(T::AccountId, Option<T::AccountId>, Status, bool)>,
    pub transition_price: Option<Balance>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      let now = T::Scheduler::now();
      for (who, referrer, status, active) in &self.accounts {
        assert!(!Nodes::<T>::contains_key(who), "duplicate referral genesis account");
        let coins = T::Ledger::coins(who);
        let mut info = ReferralInfo::new(referrer.clone(), coins.total(), coins.delegated);
        info.active = *active;
        info.active_refs[0] = u64::from(*active);
        // Same deadline an account gets when it turns inactive later.
        if !active {
          let at = Pallet::<T>::inactivity_deadline(now);
          T::Scheduler::schedule(at, COMPRESSION_HOOK, &who.encode())
            .expect("compression must be schedulable at genesis");
          info.compression_at = Some(at);
        }
        Pallet::<T>::set_status(who, &mut info, *status);

        let subtree = info.subtree();
        let mut cursor = referrer.clone();
        for distance in 1..=LEVELS {
          let Some(ancestor) = cursor.take() else { break };
          Nodes::<T>::mutate(&ancestor, |node| {
            let node = node.as_mut().expect("referrer must precede its referrals");
            if distance == 1 {
              node.referrals.push(who.clone());
            }
            subtree.add_to(node, distance);
            cursor = node.referrer.clone();
          });
        }
        Nodes::<T>::insert(who, info);
      }

      if let Some(price) = self.transition_price {
        TransitionPrice::<T>::put(price);
      }
      T::Scheduler::schedule(now.saturating_add(Pallet::<T>::week()), STATUS_BONUS_HOOK, &[])
        .expect("status bonus must be schedulable at genesis");
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Ask to be moved under `destination`. The current referrer has one day to answer.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::request_transition())]
    pub fn request_transition(origin: OriginFor<T>, destination: T::AccountId) -> DispatchResult {
      let subject = ensure_signed(origin)?;
      Self::validate_transition(&subject, &destination, None)?;

      let price = TransitionPrice::<T>::get();
      if price > 0 {
        T::Ledger::transfer(&subject, &T::FeeCollector::get(), price)?;
      }

      let deadline = T::Scheduler::now().saturating_add(T::Scheduler::one_day());
      T::Scheduler::schedule(deadline, TRANSITION_TIMEOUT_HOOK, &subject.encode())?;
      let before = Nodes::<T>::try_mutate(&subject, |node| -> Result<_, DispatchError> {
        let node = node.as_mut().ok_or(Error::<T>::AccountNotFound)?;
        node.transition = Some(PendingTransition { destination: destination.clone(), deadline });
        Ok(node.referrer.clone())
      })?;

      Self::deposit_event(Event::TransitionRequested { subject, before, after: destination });
      Ok(())
    }

    /// Approve or decline a transition requested by one of the signer's referrals.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::resolve_transition())]
    pub fn resolve_transition(
      origin: OriginFor<T>,
      subject: T::AccountId,
      decline: bool,
    ) -> DispatchResult {
      let signer = ensure_signed(origin)?;
      let info = Nodes::<T>::get(&subject).ok_or(Error::<T>::AccountNotFound)?;
      let pending = info.transition.ok_or(Error::<T>::NoPendingTransition)?;
      ensure!(info.referrer.as_ref() == Some(&signer), Error::<T>::NotReferrer);

      T::Scheduler::delete(pending.deadline, TRANSITION_TIMEOUT_HOOK, &subject.encode());
      if decline {
        Self::cancel_transition(&subject, false)
      } else {
        Self::affirm_transition(&subject)
      }
    }
  }

  impl<T: Config> Pallet<T> {
    fn week() -> Moment {
      T::Scheduler::one_day().saturating_mul(7)
    }

    fn inactivity_deadline(now: Moment) -> Moment {
      now.saturating_add(T::Scheduler::one_month().saturating_mul(INACTIVITY_MONTHS))
    }

    /// Moves `info` to `status`, keeping the bonus index in step.
    pub(crate) fn set_status(who: &T::AccountId, info: &mut ReferralInfoOf<T>, status: Status) {
      if info.status == status {
        return;
      }
      if info.status.has_bonus() {
        StatusIndex::<T>::remove(info.status, who);
      }
      if status.has_bonus() {
        StatusIndex::<T>::insert(status, who, ());
      }
      Self::deposit_event(Event::StatusUpdated {
        who: who.clone(),
        before: info.status,
        after: status,
      });
      info.status = status;
    }

    /// A node takes no new referrals once it is banished, or while inactive with less than a
    /// month left before compression. Top-level nodes are always open.
    pub fn registration_closed(info: &ReferralInfoOf<T>) -> bool {
      if info.referrer.is_none() {
        return false;
      }
      let cutoff = T::Scheduler::now().saturating_add(T::Scheduler::one_month());
      info.banished || (!info.active && info.compression_at.is_none_or(|at| cutoff > at))
    }

    pub fn status_requirements_met(who: &T::AccountId, status: Status) -> Result<bool, DispatchError> {
      let info = Nodes::<T>::get(who).ok_or(Error::<T>::AccountNotFound)?;
      Ok(BunchUpdater::<T>::new().requirements_met(status, &info))
    }

    pub fn referrals(who: &T::AccountId) -> Vec<T::AccountId> {
      Nodes::<T>::get(who).map(|info| info.referrals).unwrap_or_default()
    }

    pub fn pending_transition(who: &T::AccountId) -> Option<T::AccountId> {
      Nodes::<T>::get(who).and_then(|info| info.transition).map(|t| t.destination)
    }

    /// Applies `f` to the ancestors of a node, starting with its referrer `from`; `f` receives
    /// the distance to the node.
    fn walk_up(
      bu: &mut BunchUpdater<T>,
      from: Option<T::AccountId>,
      stake_changed: bool,
      mut f: impl FnMut(&mut ReferralInfoOf<T>, usize),
    ) -> DispatchResult {
      let mut cursor = from;
      for distance in 1..=LEVELS {
        let Some(ancestor) = cursor.take() else { break };
        cursor = bu
          .update(&ancestor, true, |info| {
            f(info, distance);
            info.referrer.clone()
          })?
          .flatten();
        if stake_changed {
          bu.add_callback(&ancestor, Callback::StakeChanged);
        }
      }
      Ok(())
    }

    fn validate_transition(
      subject: &T::AccountId,
      destination: &T::AccountId,
      expected: Option<&T::AccountId>,
    ) -> DispatchResult {
      ensure!(subject != destination, Error::<T>::SelfTransition);
      let info = Nodes::<T>::get(subject).ok_or(Error::<T>::AccountNotFound)?;
      ensure!(!info.banished, Error::<T>::AccountBanished);
      match expected {
        None => ensure!(info.transition.is_none(), Error::<T>::TransitionPending),
        Some(expected) => ensure!(
          info.transition.as_ref().is_some_and(|t| &t.destination == expected),
          Error::<T>::NoPendingTransition
        ),
      }
      ensure!(info.referrer.as_ref() != Some(destination), Error::<T>::AlreadyReferrer);

      let target = Nodes::<T>::get(destination).ok_or(Error::<T>::DestinationNotFound)?;
      ensure!(!Self::registration_closed(&target), Error::<T>::RegistrationClosed);
      let mut cursor = target.referrer;
      while let Some(ancestor) = cursor {
        ensure!(&ancestor != subject, Error::<T>::CycleDetected);
        cursor = Nodes::<T>::get(&ancestor).and_then(|info| info.referrer);
      }
      Ok(())
    }

    fn cancel_transition(subject: &T::AccountId, timeout: bool) -> DispatchResult {
      let (before, pending) = Nodes::<T>::try_mutate(subject, |node| -> Result<_, DispatchError> {
        let node = node.as_mut().ok_or(Error::<T>::AccountNotFound)?;
        let pending = node.transition.take().ok_or(Error::<T>::NoPendingTransition)?;
        Ok((node.referrer.clone(), pending))
      })?;
      let (subject, after) = (subject.clone(), pending.destination);
      Self::deposit_event(if timeout {
        Event::TransitionTimedOut { subject, before, after }
      } else {
        Event::TransitionDeclined { subject, before, after }
      });
      Ok(())
    }

    /// Moves the subject's whole structure under the requested referrer.
    fn affirm_transition(subject: &T::AccountId) -> DispatchResult {
      let info = Nodes::<T>::get(subject).ok_or(Error::<T>::AccountNotFound)?;
      let destination = info.transition.clone().ok_or(Error::<T>::NoPendingTransition)?.destination;
      Self::validate_transition(subject, &destination, Some(&destination))?;

      let mut bu = BunchUpdater::<T>::new();
      let subtree = info.subtree();
      let stake_changed = subtree.has_delegated();
      let before = info.referrer.clone();
      bu.update(subject, false, |node| {
        node.referrer = Some(destination.clone());
        node.transition = None;
      })?;

      let mut old_ancestor = match &before {
        Some(parent) => bu
          .update(parent, true, |node| {
            node.remove_referral(subject);
            subtree.remove_from(node, 1);
            node.referrer.clone()
          })?
          .flatten(),
        None => None,
      };
      let mut new_ancestor = bu
        .update(&destination, true, |node| {
          node.referrals.push(subject.clone());
          subtree.add_to(node, 1);
          node.referrer.clone()
        })?
        .flatten();
      if stake_changed {
        if let Some(parent) = &before {
          bu.add_callback(parent, Callback::StakeChanged);
        }
        bu.add_callback(&destination, Callback::StakeChanged);
      }

      // Both chains are walked in lockstep until they meet.
      for distance in 2..=LEVELS {
        if old_ancestor == new_ancestor {
          break;
        }
        if let Some(ancestor) = old_ancestor.take() {
          old_ancestor = bu
            .update(&ancestor, true, |node| {
              subtree.remove_from(node, distance);
              node.referrer.clone()
            })?
            .flatten();
          if stake_changed {
            bu.add_callback(&ancestor, Callback::StakeChanged);
          }
        }
        if let Some(ancestor) = new_ancestor.take() {
          new_ancestor = bu
            .update(&ancestor, true, |node| {
              subtree.add_to(node, distance);
              node.referrer.clone()
            })?
            .flatten();
          if stake_changed {
            bu.add_callback(&ancestor, Callback::StakeChanged);
          }
        }
      }
      bu.commit()?;

      Self::deposit_event(Event::TransitionPerformed {
        subject: subject.clone(),
        before,
        after: destination,
      });
      Ok(())
    }

    fn decode_account(payload: &[u8]) -> Result<T::AccountId, DispatchError> {
      T::AccountId::decode(&mut &payload[..]).map_err(|_| Error::<T>::MalformedPayload.into())
    }

    fn perform_downgrade(who: &T::AccountId, at: Moment) -> DispatchResult {
      let mut bu = BunchUpdater::<T>::new();
      let downgraded = bu.update(who, true, |info| {
        if info.status_downgrade_at != Some(at) {
          return false;
        }
        info.status_downgrade_at = None;
        let target = match info.status.previous() {
          Some(Status::Hero) => Status::Hero.previous(),
          other => other,
        };
        match target {
          Some(status) => {
            Self::set_status(who, info, status);
            true
          },
          None => false,
        }
      })?;
      if downgraded == Some(true) {
        bu.add_callback(who, Callback::StatusUpdated);
      } else {
        log::debug!(target: LOG_TARGET, "stale downgrade of {:?} at {}", who, at);
      }
      bu.commit()
    }

    fn perform_compression(who: &T::AccountId, at: Moment) -> DispatchResult {
      let Some(info) = Nodes::<T>::get(who) else {
        log::warn!(target: LOG_TARGET, "compression of unknown node {:?}", who);
        return Ok(());
      };
      if info.compression_at != Some(at) || info.active || info.banished {
        log::debug!(target: LOG_TARGET, "stale compression of {:?} at {}", who, at);
        return Ok(());
      }

      let mut bu = BunchUpdater::<T>::new();
      let removed = info.subtree();
      let lifted = removed.lifted();
      let children = info.referrals.clone();
      let parent = info.referrer.clone();
      let banishment_at = Self::inactivity_deadline(T::Scheduler::now());
      T::Scheduler::schedule(banishment_at, BANISHMENT_HOOK, &who.encode())?;

      bu.update(who, false, |node| {
        node.referrals.clear();
        node.coins[1..].fill(0);
        node.delegated[1..].fill(0);
        node.active_refs[1..].fill(0);
        node.compression_at = None;
        node.banishment_at = Some(banishment_at);
        if let Some(downgrade_at) = node.status_downgrade_at.take() {
          T::Scheduler::delete(downgrade_at, DOWNGRADE_HOOK, &who.encode());
        }
        Self::set_status(who, node, Status::Lucky);
      })?;
      bu.add_callback(who, Callback::StakeChanged);
      bu.add_callback(who, Callback::StatusUpdated);

      for child in &children {
        bu.update(child, false, |node| node.referrer = parent.clone())?;
      }
      Self::walk_up(&mut bu, parent, true, |node, distance| {
        if distance == 1 {
          node.referrals.extend(children.iter().cloned());
        }
        removed.remove_from(node, distance);
        lifted.add_to(node, distance);
      })?;
      bu.commit()?;

      log::debug!(target: LOG_TARGET, "compressed {:?}, {} referrals moved up", who, children.len());
      Self::deposit_event(Event::Compressed { who: who.clone() });
      Ok(())
    }

    fn perform_banishment(who: &T::AccountId, at: Moment) -> DispatchResult {
      let Some(info) = Nodes::<T>::get(who) else {
        log::warn!(target: LOG_TARGET, "banishment of unknown node {:?}", who);
        return Ok(());
      };
      if info.banishment_at != Some(at) || info.active || info.banished {
        log::debug!(target: LOG_TARGET, "stale banishment of {:?} at {}", who, at);
        return Ok(());
      }

      let mut bu = BunchUpdater::<T>::new();
      let subtree = info.subtree();
      bu.update(who, false, |node| {
        node.banished = true;
        node.banishment_at = None;
      })?;
      Self::walk_up(&mut bu, info.referrer, subtree.has_delegated(), |node, distance| {
        if distance == 1 {
          node.remove_referral(who);
        }
        subtree.remove_from(node, distance);
      })?;
      bu.add_callback(who, Callback::Banished);
      bu.commit()?;

      Self::deposit_event(Event::Banished { who: who.clone() });
      Ok(())
    }

    fn perform_transition_timeout(who: &T::AccountId, at: Moment) -> DispatchResult {
      let pending = Nodes::<T>::get(who).and_then(|info| info.transition);
      if pending.is_none_or(|t| t.deadline != at) {
        log::debug!(target: LOG_TARGET, "stale transition timeout of {:?} at {}", who, at);
        return Ok(());
      }
      Self::cancel_transition(who, true)
    }

    /// Splits a fifth of the status bonus pool per tier, from AbsoluteChampion down to
    /// Businessman. A tier is shared by everybody holding that status or a higher one; a tier
    /// nobody reaches goes to the top referrer.
    fn pay_status_bonus(at: Moment) -> DispatchResult {
      T::Scheduler::schedule(at.saturating_add(Self::week()), STATUS_BONUS_HOOK, &[])?;

      let accounts = T::CompanyAccounts::get();
      let tiers: Vec<Status> = Status::ALL.iter().rev().copied().filter(|s| s.has_bonus()).collect();
      let share = T::Ledger::coins(&accounts.status_bonuses).main / tiers.len() as Balance;
      if share == 0 {
        return Ok(());
      }

      let mut receivers: Vec<T::AccountId> = Vec::new();
      let mut outputs: BTreeMap<T::AccountId, Balance> = BTreeMap::new();
      for status in tiers {
        receivers.extend(StatusIndex::<T>::iter_key_prefix(status));
        if receivers.is_empty() {
          let top = outputs.entry(accounts.top_referrer.clone()).or_default();
          *top = top.saturating_add(share);
          continue;
        }
        let each = share / receivers.len() as Balance;
        if each == 0 {
          break;
        }
        for receiver in &receivers {
          let amount = outputs.entry(receiver.clone()).or_default();
          *amount = amount.saturating_add(each);
        }
      }

      let outputs: Vec<(T::AccountId, Balance)> = outputs.into_iter().collect();
      T::Ledger::input_output(&accounts.status_bonuses, &outputs)?;
      for (who, amount) in outputs {
        Self::deposit_event(Event::StatusBonusPaid { who, amount });
      }
      Ok(())
    }

    /// Level `i` of `award.network` goes to the `i`-th active ancestor when its status opens
    /// that line; everything else ends up with the top referrer.
    fn fees_core(
      who: &T::AccountId,
      company_account: T::AccountId,
      award: NetworkAward,
    ) -> Vec<ReferralFee<T::AccountId>> {
      let mut fees = vec![ReferralFee { beneficiary: company_account, ratio: award.company }];
      let mut excess = Perbill::zero();
      let mut cursor = Nodes::<T>::get(who).and_then(|info| info.referrer);

      for (line, share) in award.network.iter().enumerate() {
        let mut found = None;
        while let Some(ancestor) = cursor.take() {
          match Nodes::<T>::get(&ancestor) {
            Some(info) if info.active => {
              found = Some((ancestor, info));
              break;
            },
            Some(info) => cursor = info.referrer,
            None => break,
          }
        }
        match found {
          Some((ancestor, info)) => {
            cursor = info.referrer;
            if line < info.status.lines_opened() {
              fees.push(ReferralFee { beneficiary: ancestor, ratio: *share });
            } else {
              excess = excess.saturating_add(*share);
            }
          },
          None => excess = excess.saturating_add(*share),
        }
      }

      if !excess.is_zero() {
        fees.push(ReferralFee { beneficiary: T::CompanyAccounts::get().top_referrer, ratio: excess });
      }
      fees
    }

    fn validate_award(award: &NetworkAward, reserved: Perbill) -> DispatchResult {
      let parts = award
        .network
        .iter()
        .fold(u64::from(award.company.deconstruct()) + u64::from(reserved.deconstruct()), |acc, x| {
          acc + u64::from(x.deconstruct())
        });
      ensure!(parts <= u64::from(Perbill::ACCURACY), Error::<T>::InvalidAward);
      Ok(())
    }
  }

  impl<T: Config> OnBalanceChanged<T::AccountId> for Pallet<T> {
    fn on_balance_changed(who: &T::AccountId, coins: &primitives::Coins) -> DispatchResult {
      let mut bu = BunchUpdater::<T>::new();
      let (total, delegated) = (coins.total(), coins.delegated);
      let Some((old_total, old_delegated, referrer)) = bu.update(who, true, |info| {
        let old = (info.coins[0], info.delegated[0]);
        info.coins[0] = total;
        info.delegated[0] = delegated;
        let referrer = if info.banished { None } else { info.referrer.clone() };
        (old.0, old.1, referrer)
      })?
      else {
        return Ok(());
      };

      let stake_changed = old_delegated != delegated;
      if stake_changed {
        bu.add_callback(who, Callback::StakeChanged);
      }
      let before = Subtree::single(old_total, old_delegated, false);
      let after = Subtree::single(total, delegated, false);
      Self::walk_up(&mut bu, referrer, stake_changed, |node, distance| {
        after.add_to(node, distance);
        before.remove_from(node, distance);
      })?;
      bu.commit()
    }
  }

  impl<T: Config> ReferralNetwork<T::AccountId> for Pallet<T> {
    fn exists(who: &T::AccountId) -> bool {
      Nodes::<T>::contains_key(who)
    }

    fn status(who: &T::AccountId) -> Option<Status> {
      Nodes::<T>::get(who).map(|info| info.status)
    }

    fn is_banished(who: &T::AccountId) -> bool {
      Nodes::<T>::get(who).is_some_and(|info| info.banished)
    }

    fn append_child(parent: &T::AccountId, child: &T::AccountId) -> DispatchResult {
      ensure!(!Nodes::<T>::contains_key(child), Error::<T>::AccountExists);
      let parent_info = Nodes::<T>::get(parent).ok_or(Error::<T>::ParentNotFound)?;
      ensure!(!Self::registration_closed(&parent_info), Error::<T>::RegistrationClosed);

      let coins = T::Ledger::coins(child);
      let mut info = ReferralInfo::new(Some(parent.clone()), coins.total(), coins.delegated);
      let compression_at = Self::inactivity_deadline(T::Scheduler::now());
      T::Scheduler::schedule(compression_at, COMPRESSION_HOOK, &child.encode())?;
      info.compression_at = Some(compression_at);

      let mut bu = BunchUpdater::<T>::new();
      let subtree = info.subtree();
      bu.set(child, info);
      Self::walk_up(&mut bu, Some(parent.clone()), true, |node, distance| {
        if distance == 1 {
          node.referrals.push(child.clone());
        }
        subtree.add_to(node, distance);
      })?;
      bu.commit()?;

      Self::deposit_event(Event::Registered { who: child.clone(), referrer: parent.clone() });
      Ok(())
    }

    fn set_active(who: &T::AccountId, active: bool) -> DispatchResult {
      let info = Nodes::<T>::get(who).ok_or(Error::<T>::AccountNotFound)?;
      if info.active == active {
        return Ok(());
      }
      let referrer = if info.banished { None } else { info.referrer.clone() };
      let compression_at = (!active && !info.banished)
        .then(|| Self::inactivity_deadline(T::Scheduler::now()));

      let mut bu = BunchUpdater::<T>::new();
      bu.update(who, false, |node| {
        if let Some(at) = node.compression_at.take() {
          T::Scheduler::delete(at, COMPRESSION_HOOK, &who.encode());
        }
        if let Some(at) = node.banishment_at.take() {
          T::Scheduler::delete(at, BANISHMENT_HOOK, &who.encode());
        }
        node.active = active;
        node.active_refs[0] = u64::from(active);
        node.compression_at = compression_at;
      })?;
      if let Some(at) = compression_at {
        T::Scheduler::schedule(at, COMPRESSION_HOOK, &who.encode())?;
      }

      let unit = Subtree::single(0, 0, true);
      Self::walk_up(&mut bu, referrer, false, |node, distance| {
        if active {
          unit.add_to(node, distance);
        } else {
          unit.remove_from(node, distance);
        }
      })?;
      bu.commit()?;

      Self::deposit_event(Event::ActivityChanged { who: who.clone(), active });
      Ok(())
    }

    fn come_back(who: &T::AccountId) -> DispatchResult {
      let info = Nodes::<T>::get(who).ok_or(Error::<T>::AccountNotFound)?;
      if !info.banished {
        return Ok(());
      }

      let mut referrer = info.referrer.clone();
      while let Some(candidate) = referrer.clone() {
        match Nodes::<T>::get(&candidate) {
          Some(node) if !node.banished => break,
          Some(node) => referrer = node.referrer,
          None => referrer = None,
        }
      }

      let compression_at = (!info.active).then(|| Self::inactivity_deadline(T::Scheduler::now()));
      if let Some(at) = compression_at {
        T::Scheduler::schedule(at, COMPRESSION_HOOK, &who.encode())?;
      }

      let mut bu = BunchUpdater::<T>::new();
      let subtree = info.subtree();
      bu.update(who, true, |node| {
        node.banished = false;
        node.referrer = referrer.clone();
        node.compression_at = compression_at;
      })?;
      bu.add_callback(who, Callback::StakeChanged);
      Self::walk_up(&mut bu, referrer.clone(), subtree.has_delegated(), |node, distance| {
        if distance == 1 {
          node.referrals.push(who.clone());
        }
        subtree.add_to(node, distance);
      })?;
      bu.commit()?;

      Self::deposit_event(Event::CameBack { who: who.clone(), referrer });
      Ok(())
    }

    fn delegating_fees(who: &T::AccountId) -> Result<Vec<ReferralFee<T::AccountId>>, DispatchError> {
      let accounts = T::CompanyAccounts::get();
      Ok(Self::fees_core(who, accounts.for_delegating, DelegatingAward::<T>::get()))
    }

    fn subscription_fees(
      who: &T::AccountId,
    ) -> Result<Vec<ReferralFee<T::AccountId>>, DispatchError> {
      let accounts = T::CompanyAccounts::get();
      let mut fees = Self::fees_core(who, accounts.for_subscription, SubscriptionAward::<T>::get());
      for beneficiary in [accounts.promo_bonuses, accounts.status_bonuses, accounts.leader_bonuses] {
        fees.push(ReferralFee { beneficiary, ratio: BONUS_POOL_SHARE });
      }
      Ok(fees)
    }
  }

  impl<T: Config> ReferralGovernance for Pallet<T> {
    fn set_transition_price(new_amount: Balance) -> DispatchResult {
      let old_amount = TransitionPrice::<T>::get();
      TransitionPrice::<T>::put(new_amount);
      Self::deposit_event(Event::TransitionPriceUpdated { old_amount, new_amount });
      Ok(())
    }

    fn set_delegating_award(new_award: NetworkAward) -> DispatchResult {
      Self::validate_award(&new_award, Perbill::zero())?;
      let old_award = DelegatingAward::<T>::get();
      DelegatingAward::<T>::put(new_award);
      Self::deposit_event(Event::DelegatingAwardUpdated { old_award, new_award });
      Ok(())
    }

    fn set_subscription_award(new_award: NetworkAward) -> DispatchResult {
      let pools = Perbill::from_parts(BONUS_POOL_SHARE.deconstruct().saturating_mul(3));
      Self::validate_award(&new_award, pools)?;
      let old_award = SubscriptionAward::<T>::get();
      SubscriptionAward::<T>::put(new_award);
      Self::deposit_event(Event::SubscriptionAwardUpdated { old_award, new_award });
      Ok(())
    }
  }

  impl<T: Config> TaskHandler for Pallet<T> {
    fn handle(hook: &[u8], payload: &[u8], at: Moment) -> Option<DispatchResult> {
      let result = match hook {
        DOWNGRADE_HOOK => {
          Self::decode_account(payload).and_then(|who| Self::perform_downgrade(&who, at))
        },
        COMPRESSION_HOOK => {
          Self::decode_account(payload).and_then(|who| Self::perform_compression(&who, at))
        },
        BANISHMENT_HOOK => {
          Self::decode_account(payload).and_then(|who| Self::perform_banishment(&who, at))
        },
        TRANSITION_TIMEOUT_HOOK => {
          Self::decode_account(payload).and_then(|who| Self::perform_transition_timeout(&who, at))
        },
        STATUS_BONUS_HOOK => Self::pay_status_bonus(at),
        _ => return None,
      };
      Some(result)
    }
  }
}
