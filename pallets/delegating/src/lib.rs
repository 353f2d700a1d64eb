//! Delegating Pallet
//!
//! Accounts lock main coins into `delegated` and earn a daily interest on them. Delegating pays
//! the transaction fee and the referral fees of the delegating award up front; the rest is
//! delegated.
//!
//! ## Accrual
//!
//! Each delegator has its own accrual task one day after its last delegate or revoke, so every
//! account lands in a block-of-day cluster and the daily work is spread over the whole day. The
//! monthly percentage is stepped by the delegated amount (see [`primitives::AccruePercentage`]);
//! active validators get a bonus on top. Delegate and revoke first pay out the part of the day
//! already accumulated.
//!
//! ## Revocation
//!
//! Revoked coins move to `revoking` and return to `main` after the revoke period. A banished
//! account has its whole delegation revoked.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod types;
pub use types::*;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::delegating";

pub const ACCRUE_HOOK: &[u8] = b"delegating/accrue";
pub const REVOKE_HOOK: &[u8] = b"delegating/revoke";

#[frame::pallet]
pub mod pallet {
  use super::{ACCRUE_HOOK, Accumulation, DelegationRecord, LOG_TARGET, REVOKE_HOOK, WeightInfo};
  use alloc::vec::Vec;
  use frame::prelude::*;
  use polkadot_sdk::sp_runtime::{Perbill, SaturatedConversion};
  use primitives::{
    AccruePercentage, Balance, DelegationGovernance, Denom, Ledger, Moment, ReferralNetwork,
    Scheduler, TaskHandler, ValidatorInspect, fee_outputs,
  };
  use sp_arithmetic::{Rounding, helpers_128bit::multiply_by_rational_with_rounding};

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    type Ledger: Ledger<Self::AccountId>;

    type Scheduler: Scheduler;

    type Referral: ReferralNetwork<Self::AccountId>;

    type Validators: ValidatorInspect<Self::AccountId>;

    /// Blocks per day; the modulus of the cluster index
    #[pallet::constant]
    type BlocksPerDay: Get<u32>;

    /// Extra share of the interest paid to active validators
    #[pallet::constant]
    type ValidatorBonus: Get<Perbill>;

    /// Pending revoke total from which a revoke is announced as massive
    #[pallet::constant]
    type MassiveRevoke: Get<Balance>;

    #[pallet::constant]
    type DefaultMinDelegate: Get<Balance>;

    /// Default revoke period, in days
    #[pallet::constant]
    type DefaultRevokePeriod: Get<u32>;

    #[pallet::constant]
    type DefaultAccruePercentage: Get<AccruePercentage>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  #[pallet::without_storage_info]
  pub struct Pallet<T>(_);

  #[pallet::storage]
  #[pallet::getter(fn record)]
  pub type Records<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, DelegationRecord, ValueQuery>;

  /// Delegators by the block-of-day their accrual fires in.
  #[pallet::storage]
  pub type Clusters<T: Config> =
    StorageDoubleMap<_, Twox64Concat, u32, Blake2_128Concat, T::AccountId, ()>;

  #[pallet::storage]
  #[pallet::getter(fn min_delegate)]
  pub type MinDelegate<T: Config> = StorageValue<_, Balance, ValueQuery, T::DefaultMinDelegate>;

  #[pallet::storage]
  #[pallet::getter(fn revoke_period)]
  pub type RevokePeriod<T: Config> = StorageValue<_, u32, ValueQuery, T::DefaultRevokePeriod>;

  #[pallet::storage]
  #[pallet::getter(fn accrue_percentage)]
  pub type Percentage<T: Config> =
    StorageValue<_, AccruePercentage, ValueQuery, T::DefaultAccruePercentage>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// Coins delegated after the referral commission was paid out
    Delegated { who: T::AccountId, amount: Balance, commission: Vec<(T::AccountId, Balance)> },
    Revoked { who: T::AccountId, amount: Balance, due: Moment },
    /// The pending revoke total of an account crossed the massive revoke threshold
    MassiveRevoke { who: T::AccountId, revoking: Balance },
    /// Revoked coins returned to main
    Undelegated { who: T::AccountId, amount: Balance },
    Accrued { who: T::AccountId, amount: Balance },
    MinDelegateUpdated { old_amount: Balance, new_amount: Balance },
    RevokePeriodUpdated { old_days: u32, new_days: u32 },
    AccruePercentageUpdated { old_value: AccruePercentage, new_value: AccruePercentage },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Amount below the minimum delegation
    LessThanMinimum,
    /// Not enough main coins, or revoking more than delegated
    InsufficientFunds,
    ZeroAmount,
    /// No accrual is running for the account
    NothingDelegated,
    /// Revoke period must be at least one day
    InvalidPeriod,
    /// Every percentage must be positive and the top one at most 100
    InvalidPercentage,
    /// Scheduled task payload is not an account
    MalformedPayload,
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// Accounts whose genesis `delegated` coins start accruing
    pub delegators: Vec<T::AccountId>,
    pub min_delegate: Option<Balance>,
    pub revoke_period: Option<u32>,
    pub accrue_percentage: Option<AccruePercentage>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      if let Some(value) = self.min_delegate {
        MinDelegate::<T>::put(value);
      }
      if let Some(days) = self.revoke_period {
        assert!(days > 0, "revoke period must be positive");
        RevokePeriod::<T>::put(days);
      }
      if let Some(value) = self.accrue_percentage {
        assert!(value.is_valid(), "invalid accrue percentage");
        Percentage::<T>::put(value);
      }
      for who in &self.delegators {
        let mut record = Records::<T>::get(who);
        Pallet::<T>::reschedule(who, &mut record).expect("accrual must be schedulable at genesis");
        Pallet::<T>::store(who, record);
      }
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Delegate `amount` main coins. The transaction fee and the referral commission are taken
    /// out of it.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::delegate())]
    pub fn delegate(origin: OriginFor<T>, amount: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_delegate(&who, amount)
    }

    /// Start revoking `amount` delegated coins.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::revoke())]
    pub fn revoke(origin: OriginFor<T>, amount: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_revoke(&who, amount)
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn do_delegate(who: &T::AccountId, amount: Balance) -> DispatchResult {
      ensure!(amount >= MinDelegate::<T>::get(), Error::<T>::LessThanMinimum);
      ensure!(T::Ledger::coins(who).main >= amount, Error::<T>::InsufficientFunds);

      if T::Referral::is_banished(who) {
        T::Referral::come_back(who)?;
      }
      let fee = T::Ledger::pay_transaction_fee(who, amount)?;
      let amount = amount.saturating_sub(fee);

      let fees = T::Referral::delegating_fees(who)?;
      let commission = fee_outputs(&fees, amount);
      let paid = commission.iter().fold(0 as Balance, |acc, (_, x)| acc.saturating_add(*x));
      if !commission.is_empty() {
        T::Ledger::input_output(who, &commission)?;
      }
      log::debug!(target: LOG_TARGET, "{:?} delegates {}, commission {}", who, amount, paid);

      let mut record = Records::<T>::get(who);
      Self::accrue_part(who, &mut record)?;
      let delegation = amount.saturating_sub(paid);
      T::Ledger::move_coins(who, Denom::Main, Denom::Delegated, delegation)?;
      Self::reschedule(who, &mut record)?;
      Self::store(who, record);

      Self::deposit_event(Event::Delegated { who: who.clone(), amount: delegation, commission });
      Ok(())
    }

    pub fn do_revoke(who: &T::AccountId, amount: Balance) -> DispatchResult {
      ensure!(amount > 0, Error::<T>::ZeroAmount);
      let coins = T::Ledger::coins(who);
      ensure!(amount <= coins.delegated, Error::<T>::InsufficientFunds);

      let mut record = Records::<T>::get(who);
      Self::accrue_part(who, &mut record)?;
      T::Ledger::move_coins(who, Denom::Delegated, Denom::Revoking, amount)?;
      Self::reschedule(who, &mut record)?;

      let period = Moment::from(RevokePeriod::<T>::get()).saturating_mul(T::Scheduler::one_day());
      let due = T::Scheduler::now().saturating_add(period);
      if record.push_request(due, amount) {
        T::Scheduler::schedule(due, REVOKE_HOOK, &who.encode())?;
      }
      Self::store(who, record);

      Self::deposit_event(Event::Revoked { who: who.clone(), amount, due });
      let revoking = coins.revoking.saturating_add(amount);
      if revoking >= T::MassiveRevoke::get() {
        log::info!(target: LOG_TARGET, "massive revoke by {:?}: {}", who, revoking);
        Self::deposit_event(Event::MassiveRevoke { who: who.clone(), revoking });
      }
      Ok(())
    }

    /// Withholds `part` of the next full accrual of `who`. Reported by the validator module for
    /// missed blocks.
    pub fn note_missed_part(who: &T::AccountId, part: Perbill) {
      Records::<T>::mutate(who, |record| record.missed_part = Some(part));
    }

    /// Delegators whose daily accrual fires in block-of-day `cluster`, in key order.
    pub fn delegators_in_cluster(cluster: u32) -> Vec<T::AccountId> {
      Clusters::<T>::iter_key_prefix(cluster).collect()
    }

    /// The running accrual period of `who`.
    pub fn accumulation(who: &T::AccountId) -> Result<Accumulation, DispatchError> {
      let end = Records::<T>::get(who).next_accrue.ok_or(Error::<T>::NothingDelegated)?;
      let day = T::Scheduler::one_day();
      let start = end.saturating_sub(day);
      let elapsed = T::Scheduler::now().saturating_sub(start).min(day);
      let (percent, total) = Self::daily_interest(who, T::Ledger::coins(who).delegated);
      Ok(Accumulation { start, end, percent, total, current: Self::part_of(total, elapsed, day) })
    }

    /// Monthly percentage and one day of interest for `delegated` coins of `who`.
    fn daily_interest(who: &T::AccountId, delegated: Balance) -> (u32, Balance) {
      if delegated <= T::Ledger::dust_delegation() {
        return (0, 0);
      }
      let percent = Percentage::<T>::get().monthly_percent(delegated);
      // Monthly percent over thirty days.
      let mut interest = Self::part_of(delegated, u64::from(percent), 3_000);
      if T::Validators::is_active_validator(who) {
        interest = interest.saturating_add(T::ValidatorBonus::get().mul_floor(interest));
      }
      (percent, interest)
    }

    fn part_of(amount: Balance, numerator: u64, denominator: u64) -> Balance {
      multiply_by_rational_with_rounding(
        amount,
        numerator.into(),
        denominator.into(),
        Rounding::Down,
      )
      .unwrap_or_default()
    }

    /// Pays out the part of the running day already accumulated and drops its accrual task.
    fn accrue_part(who: &T::AccountId, record: &mut DelegationRecord) -> DispatchResult {
      let Some(next) = record.next_accrue.take() else { return Ok(()) };
      T::Scheduler::delete(next, ACCRUE_HOOK, &who.encode());

      let day = T::Scheduler::one_day();
      let elapsed = day.saturating_sub(next.saturating_sub(T::Scheduler::now()));
      let (_, daily) = Self::daily_interest(who, T::Ledger::coins(who).delegated);
      Self::accrue(who, Self::part_of(daily, elapsed, day))
    }

    /// Starts a fresh accrual day for whatever is delegated now, or stops accruing dust.
    fn reschedule(who: &T::AccountId, record: &mut DelegationRecord) -> DispatchResult {
      if T::Ledger::coins(who).delegated <= T::Ledger::dust_delegation() {
        record.next_accrue = None;
        Self::leave_cluster(who, record);
        return Ok(());
      }
      let at = T::Scheduler::now().saturating_add(T::Scheduler::one_day());
      T::Scheduler::schedule(at, ACCRUE_HOOK, &who.encode())?;
      record.next_accrue = Some(at);

      let block: u32 = frame_system::Pallet::<T>::block_number().saturated_into();
      let cluster = block % T::BlocksPerDay::get().max(1);
      if record.cluster != Some(cluster) {
        Self::leave_cluster(who, record);
        Clusters::<T>::insert(cluster, who, ());
        record.cluster = Some(cluster);
      }
      Ok(())
    }

    fn leave_cluster(who: &T::AccountId, record: &mut DelegationRecord) {
      if let Some(cluster) = record.cluster.take() {
        Clusters::<T>::remove(cluster, who);
      }
    }

    fn store(who: &T::AccountId, record: DelegationRecord) {
      if record.is_empty() {
        Records::<T>::remove(who);
      } else {
        Records::<T>::insert(who, record);
      }
    }

    fn accrue(who: &T::AccountId, amount: Balance) -> DispatchResult {
      if amount == 0 {
        return Ok(());
      }
      T::Ledger::mint(who, amount)?;
      Self::deposit_event(Event::Accrued { who: who.clone(), amount });
      Ok(())
    }

    fn decode_account(payload: &[u8]) -> Result<T::AccountId, DispatchError> {
      T::AccountId::decode(&mut &payload[..]).map_err(|_| Error::<T>::MalformedPayload.into())
    }

    fn perform_accrue(who: &T::AccountId, at: Moment) -> DispatchResult {
      let mut record = Records::<T>::get(who);
      if record.next_accrue != Some(at) {
        log::warn!(target: LOG_TARGET, "stale accrual of {:?} at {}", who, at);
        return Ok(());
      }

      let (_, mut interest) = Self::daily_interest(who, T::Ledger::coins(who).delegated);
      if interest == 0 {
        record.next_accrue = None;
        Self::leave_cluster(who, &mut record);
        Self::store(who, record);
        return Ok(());
      }
      if let Some(missed) = record.missed_part.take() {
        interest = interest.saturating_sub(missed.mul_floor(interest));
      }
      let next = at.saturating_add(T::Scheduler::one_day());
      T::Scheduler::schedule(next, ACCRUE_HOOK, &who.encode())?;
      record.next_accrue = Some(next);
      Self::store(who, record);
      Self::accrue(who, interest)
    }

    fn perform_revoke(who: &T::AccountId, at: Moment) -> DispatchResult {
      let mut record = Records::<T>::get(who);
      let Some(request) = record.take_request(at) else {
        log::warn!(target: LOG_TARGET, "no revoke of {:?} due at {}", who, at);
        return Ok(());
      };
      Self::store(who, record);
      T::Ledger::move_coins(who, Denom::Revoking, Denom::Main, request.amount)?;
      Self::deposit_event(Event::Undelegated { who: who.clone(), amount: request.amount });
      Ok(())
    }

    /// Revokes the whole delegation of an account leaving the referral structure.
    pub fn on_banished(who: &T::AccountId) -> DispatchResult {
      let delegated = T::Ledger::coins(who).delegated;
      if delegated == 0 {
        return Ok(());
      }
      log::debug!(target: LOG_TARGET, "{:?} banished, revoking {}", who, delegated);
      Self::do_revoke(who, delegated)
    }
  }

  impl<T: Config> DelegationGovernance for Pallet<T> {
    fn set_min_delegate(new_amount: Balance) -> DispatchResult {
      let old_amount = MinDelegate::<T>::get();
      MinDelegate::<T>::put(new_amount);
      Self::deposit_event(Event::MinDelegateUpdated { old_amount, new_amount });
      Ok(())
    }

    fn set_revoke_period(new_days: u32) -> DispatchResult {
      ensure!(new_days > 0, Error::<T>::InvalidPeriod);
      let old_days = RevokePeriod::<T>::get();
      RevokePeriod::<T>::put(new_days);
      Self::deposit_event(Event::RevokePeriodUpdated { old_days, new_days });
      Ok(())
    }

    fn set_accrue_percentage(new_value: AccruePercentage) -> DispatchResult {
      ensure!(new_value.is_valid(), Error::<T>::InvalidPercentage);
      let old_value = Percentage::<T>::get();
      Percentage::<T>::put(new_value);
      Self::deposit_event(Event::AccruePercentageUpdated { old_value, new_value });
      Ok(())
    }
  }

  impl<T: Config> TaskHandler for Pallet<T> {
    fn handle(hook: &[u8], payload: &[u8], at: Moment) -> Option<DispatchResult> {
      let result = match hook {
        ACCRUE_HOOK => Self::decode_account(payload).and_then(|who| Self::perform_accrue(&who, at)),
        REVOKE_HOOK => Self::decode_account(payload).and_then(|who| Self::perform_revoke(&who, at)),
        _ => return None,
      };
      Some(result)
    }
  }
}
