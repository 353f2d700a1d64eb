//! Subscription Pallet
//!
//! A paid subscription keeps an account active in the referral structure for a month and
//! grants the base VPN traffic and storage space. Prices are set in internal price units and
//! converted to ARTR by the token rate, which a list of rate signers keeps up to date.
//!
//! A subscription payment is split like this: the transaction fee goes to the fee collector,
//! the referral network gets its shares of the rest, and whatever remains is split one third
//! to the VPN module account and two thirds to the storage module account.
//!
//! Each active account has a renewal task. It resets the monthly quotas while the subscription
//! runs and, once it has expired, either renews it from the account's coins (when the profile
//! asks for auto-pay) or deactivates the account.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::subscription";

pub const RENEW_HOOK: &[u8] = b"subscription/renew";

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, RENEW_HOOK, WeightInfo};
  use alloc::vec::Vec;
  use frame::prelude::*;
  use polkadot_sdk::frame_support::storage::with_storage_layer;
  use primitives::{
    Balance, Ledger, Moment, ProfileInspect, ReferralNetwork, ResourceQuota, Scheduler,
    SignerRegistry, SubscriptionGovernance, TaskHandler, fee_outputs, params::GB,
  };

  #[derive(
    Clone, Copy, Debug, Decode, Default, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
  )]
  pub struct ActivityInfo {
    pub active: bool,
    pub expire_at: Moment,
  }

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    type Ledger: Ledger<Self::AccountId>;

    type Scheduler: Scheduler;

    type Referral: ReferralNetwork<Self::AccountId>;

    type Profiles: ProfileInspect<Self::AccountId>;

    type Vpn: ResourceQuota<Self::AccountId>;

    type Storage: ResourceQuota<Self::AccountId>;

    /// Module account receiving VPN revenue
    #[pallet::constant]
    type VpnAccount: Get<Self::AccountId>;

    /// Module account receiving storage revenue
    #[pallet::constant]
    type StorageAccount: Get<Self::AccountId>;

    /// VPN traffic included in a subscription, in GB
    #[pallet::constant]
    type BaseVpnGb: Get<u64>;

    /// Storage included in a subscription, in GB
    #[pallet::constant]
    type BaseStorageGb: Get<u64>;

    #[pallet::constant]
    type DefaultSubscriptionPrice: Get<u32>;

    /// Default uARTR per price unit
    #[pallet::constant]
    type DefaultTokenRate: Get<u32>;

    #[pallet::constant]
    type DefaultVpnGbPrice: Get<u32>;

    #[pallet::constant]
    type DefaultStorageGbPrice: Get<u32>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  #[pallet::storage]
  #[pallet::getter(fn activity)]
  pub type Activity<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, ActivityInfo, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn subscription_price)]
  pub type SubscriptionPrice<T: Config> =
    StorageValue<_, u32, ValueQuery, T::DefaultSubscriptionPrice>;

  #[pallet::storage]
  #[pallet::getter(fn token_rate)]
  pub type TokenRate<T: Config> = StorageValue<_, u32, ValueQuery, T::DefaultTokenRate>;

  #[pallet::storage]
  #[pallet::getter(fn vpn_gb_price)]
  pub type VpnGbPrice<T: Config> = StorageValue<_, u32, ValueQuery, T::DefaultVpnGbPrice>;

  #[pallet::storage]
  #[pallet::getter(fn storage_gb_price)]
  pub type StorageGbPrice<T: Config> = StorageValue<_, u32, ValueQuery, T::DefaultStorageGbPrice>;

  /// Accounts allowed to update the token rate.
  #[pallet::storage]
  pub type RateSigners<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, ()>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    SubscriptionPaid { who: T::AccountId, amount: Balance, fee: Balance, expire_at: Moment },
    VpnPaid { who: T::AccountId, amount: Balance, limit: u64 },
    StoragePaid { who: T::AccountId, amount: Balance, limit: u64 },
    ActivityChanged { who: T::AccountId, active: bool },
    /// Renewal from the account's coins failed; the account is deactivated
    AutoPayFailed { who: T::AccountId },
    TokenRateUpdated { old_rate: u32, new_rate: u32 },
    SubscriptionPriceUpdated { old_price: u32, new_price: u32 },
    VpnGbPriceUpdated { old_price: u32, new_price: u32 },
    StorageGbPriceUpdated { old_price: u32, new_price: u32 },
    RateSignerAdded { who: T::AccountId },
    RateSignerRemoved { who: T::AccountId },
  }

  #[pallet::error]
  pub enum Error<T> {
    ZeroAmount,
    /// The account has no running subscription
    InactiveSubscription,
    /// Storage limit below the space already used
    StorageBelowUsage,
    /// Storage limit below the amount included in the subscription
    StorageBelowBase,
    /// Signer is not on the rate signer list
    SignerNotAllowed,
    AlreadySigner,
    NotSigner,
    Overflow,
    /// Scheduled task payload is not an account
    MalformedPayload,
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// `(account, expire_at)` of the subscriptions running at genesis
    pub subscriptions: Vec<(T::AccountId, Moment)>,
    pub rate_signers: Vec<T::AccountId>,
    pub subscription_price: Option<u32>,
    pub token_rate: Option<u32>,
    pub vpn_gb_price: Option<u32>,
    pub storage_gb_price: Option<u32>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      for (who, expire_at) in &self.subscriptions {
        Activity::<T>::insert(who, ActivityInfo { active: true, expire_at: *expire_at });
        T::Scheduler::schedule(*expire_at, RENEW_HOOK, &who.encode())
          .expect("renewal must be schedulable at genesis");
      }
      for who in &self.rate_signers {
        RateSigners::<T>::insert(who, ());
      }
      if let Some(value) = self.subscription_price {
        SubscriptionPrice::<T>::put(value);
      }
      if let Some(value) = self.token_rate {
        assert!(value > 0, "token rate must be positive");
        TokenRate::<T>::put(value);
      }
      if let Some(value) = self.vpn_gb_price {
        VpnGbPrice::<T>::put(value);
      }
      if let Some(value) = self.storage_gb_price {
        StorageGbPrice::<T>::put(value);
      }
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Pay for one month, keeping `storage_gb` of storage.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::pay_subscription())]
    pub fn pay_subscription(origin: OriginFor<T>, storage_gb: u64) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let storage = storage_gb.checked_mul(GB).ok_or(Error::<T>::Overflow)?;
      Self::do_pay_subscription(&who, storage)
    }

    /// Buy `gb` of extra VPN traffic.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::pay_vpn())]
    pub fn pay_vpn(origin: OriginFor<T>, gb: u64) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(gb > 0, Error::<T>::ZeroAmount);
      let extra = gb.checked_mul(GB).ok_or(Error::<T>::Overflow)?;

      T::Vpn::add_limit(&who, extra);
      let amount = Self::charge_service(&who, extra, VpnGbPrice::<T>::get(), T::VpnAccount::get())?;
      Self::deposit_event(Event::VpnPaid { who: who.clone(), amount, limit: T::Vpn::limit(&who) });
      Ok(())
    }

    /// Set the storage limit to `gb`, paying for the increase until the subscription expires.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::pay_storage())]
    pub fn pay_storage(origin: OriginFor<T>, gb: u64) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let limit = gb.checked_mul(GB).ok_or(Error::<T>::Overflow)?;
      Self::ensure_storage_limit(&who, limit)?;

      let info = Activity::<T>::get(&who);
      let now = T::Scheduler::now();
      ensure!(info.active && info.expire_at > now, Error::<T>::InactiveSubscription);

      let paid_up = T::Storage::limit(&who).max(Self::base_storage());
      T::Storage::set_limit(&who, limit);
      let mut amount = 0;
      if limit > paid_up {
        let remaining = u128::from(info.expire_at - now);
        let month = u128::from(T::Scheduler::one_month().max(1));
        let prorated = u128::from(limit - paid_up).saturating_mul(remaining) / month;
        amount = Self::charge_service(
          &who,
          u64::try_from(prorated).map_err(|_| Error::<T>::Overflow)?,
          StorageGbPrice::<T>::get(),
          T::StorageAccount::get(),
        )?;
      }
      Self::deposit_event(Event::StoragePaid { who, amount, limit });
      Ok(())
    }

    /// Update the token rate. Restricted to rate signers.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::set_token_rate())]
    pub fn set_token_rate(origin: OriginFor<T>, new_rate: u32) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(RateSigners::<T>::contains_key(&who), Error::<T>::SignerNotAllowed);
      ensure!(new_rate > 0, Error::<T>::ZeroAmount);
      let old_rate = TokenRate::<T>::get();
      TokenRate::<T>::put(new_rate);
      Self::deposit_event(Event::TokenRateUpdated { old_rate, new_rate });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn is_active(who: &T::AccountId) -> bool {
      Activity::<T>::get(who).active
    }

    /// Subscription price in uARTR.
    pub fn price() -> Balance {
      Balance::from(SubscriptionPrice::<T>::get()).saturating_mul(TokenRate::<T>::get().into())
    }

    fn base_storage() -> u64 {
      T::BaseStorageGb::get().saturating_mul(GB)
    }

    fn ensure_storage_limit(who: &T::AccountId, limit: u64) -> DispatchResult {
      ensure!(limit >= T::Storage::current(who), Error::<T>::StorageBelowUsage);
      ensure!(limit >= Self::base_storage(), Error::<T>::StorageBelowBase);
      Ok(())
    }

    pub fn do_pay_subscription(who: &T::AccountId, storage: u64) -> DispatchResult {
      Self::ensure_storage_limit(who, storage)?;

      let amount = Self::price();
      let fee = T::Ledger::pay_transaction_fee(who, amount)?;
      let net = amount.saturating_sub(fee);
      let fees = T::Referral::subscription_fees(who)?;
      let mut outputs = fee_outputs(&fees, net);
      let paid = outputs.iter().fold(0 as Balance, |acc, (_, x)| acc.saturating_add(*x));
      let modules = net.saturating_sub(paid);
      let vpn = modules / 3;
      for (account, share) in [(T::VpnAccount::get(), vpn), (T::StorageAccount::get(), modules - vpn)] {
        if share > 0 {
          outputs.push((account, share));
        }
      }
      T::Ledger::input_output(who, &outputs)?;
      log::debug!(target: LOG_TARGET, "{:?} paid {} for a subscription, network {}", who, amount, paid);

      let now = T::Scheduler::now();
      let month = T::Scheduler::one_month();
      let mut info = Activity::<T>::get(who);
      let activated = !info.active;
      if activated {
        info = ActivityInfo { active: true, expire_at: now.saturating_add(month) };
        T::Scheduler::schedule(info.expire_at, RENEW_HOOK, &who.encode())?;
        Self::reset_limits(who);
      } else {
        info.expire_at = info.expire_at.max(now).saturating_add(month);
      }
      Activity::<T>::insert(who, info);

      // Storage above the base is paid a month at a time.
      T::Storage::set_limit(who, storage);
      let excess = storage.saturating_sub(Self::base_storage());
      let storage_amount =
        Self::charge_service(who, excess, StorageGbPrice::<T>::get(), T::StorageAccount::get())?;

      Self::deposit_event(Event::SubscriptionPaid {
        who: who.clone(),
        amount,
        fee,
        expire_at: info.expire_at,
      });
      if storage_amount > 0 {
        Self::deposit_event(Event::StoragePaid {
          who: who.clone(),
          amount: storage_amount,
          limit: storage,
        });
      }
      if activated {
        T::Referral::set_active(who, true)?;
        Self::deposit_event(Event::ActivityChanged { who: who.clone(), active: true });
      }
      Ok(())
    }

    /// Charges `bytes` at `price` per GB, withholding the transaction fee from what the module
    /// account receives. Returns the full price.
    fn charge_service(
      who: &T::AccountId,
      bytes: u64,
      price: u32,
      module: T::AccountId,
    ) -> Result<Balance, DispatchError> {
      let amount = u128::from(bytes)
        .saturating_mul(price.into())
        .saturating_mul(TokenRate::<T>::get().into())
        / u128::from(GB);
      if amount == 0 {
        return Ok(0);
      }
      let fee = T::Ledger::pay_transaction_fee(who, amount)?;
      T::Ledger::transfer(who, &module, amount.saturating_sub(fee))?;
      Ok(amount)
    }

    fn reset_limits(who: &T::AccountId) {
      T::Vpn::set_limit(who, T::BaseVpnGb::get().saturating_mul(GB));
      T::Vpn::set_current(who, 0);
      if T::Storage::limit(who) == 0 {
        T::Storage::set_limit(who, Self::base_storage());
      }
    }

    /// The referral structure is updated first so both records always agree.
    fn deactivate(who: &T::AccountId, mut info: ActivityInfo) -> DispatchResult {
      T::Referral::set_active(who, false)?;
      info.active = false;
      Activity::<T>::insert(who, info);
      Self::deposit_event(Event::ActivityChanged { who: who.clone(), active: false });
      Ok(())
    }

    fn decode_account(payload: &[u8]) -> Result<T::AccountId, DispatchError> {
      T::AccountId::decode(&mut &payload[..]).map_err(|_| Error::<T>::MalformedPayload.into())
    }

    fn perform_renewal(who: &T::AccountId) -> DispatchResult {
      let info = Activity::<T>::get(who);
      if !info.active {
        log::warn!(target: LOG_TARGET, "renewal of inactive {:?}", who);
        return Ok(());
      }

      let now = T::Scheduler::now();
      if info.expire_at > now {
        let next = now.saturating_add(T::Scheduler::one_month()).min(info.expire_at);
        T::Scheduler::schedule(next, RENEW_HOOK, &who.encode())?;
        Self::reset_limits(who);
        return Ok(());
      }

      if !T::Profiles::auto_pay(who) {
        return Self::deactivate(who, info);
      }
      let storage = T::Storage::limit(who).max(Self::base_storage());
      match with_storage_layer(|| Self::do_pay_subscription(who, storage)) {
        Ok(()) => {
          let next = now.saturating_add(T::Scheduler::one_month());
          T::Scheduler::schedule(next, RENEW_HOOK, &who.encode())?;
          Self::reset_limits(who);
          Ok(())
        },
        Err(e) => {
          log::debug!(target: LOG_TARGET, "auto-pay of {:?} failed: {:?}", who, e);
          Self::deposit_event(Event::AutoPayFailed { who: who.clone() });
          Self::deactivate(who, info)
        },
      }
    }
  }

  impl<T: Config> SubscriptionGovernance for Pallet<T> {
    fn set_subscription_price(new_price: u32) -> DispatchResult {
      let old_price = SubscriptionPrice::<T>::get();
      SubscriptionPrice::<T>::put(new_price);
      Self::deposit_event(Event::SubscriptionPriceUpdated { old_price, new_price });
      Ok(())
    }

    fn set_vpn_gb_price(new_price: u32) -> DispatchResult {
      let old_price = VpnGbPrice::<T>::get();
      VpnGbPrice::<T>::put(new_price);
      Self::deposit_event(Event::VpnGbPriceUpdated { old_price, new_price });
      Ok(())
    }

    fn set_storage_gb_price(new_price: u32) -> DispatchResult {
      let old_price = StorageGbPrice::<T>::get();
      StorageGbPrice::<T>::put(new_price);
      Self::deposit_event(Event::StorageGbPriceUpdated { old_price, new_price });
      Ok(())
    }
  }

  /// The token rate signer list.
  impl<T: Config> SignerRegistry<T::AccountId> for Pallet<T> {
    fn add_signer(who: &T::AccountId) -> DispatchResult {
      ensure!(!RateSigners::<T>::contains_key(who), Error::<T>::AlreadySigner);
      RateSigners::<T>::insert(who, ());
      Self::deposit_event(Event::RateSignerAdded { who: who.clone() });
      Ok(())
    }

    fn remove_signer(who: &T::AccountId) -> DispatchResult {
      ensure!(RateSigners::<T>::contains_key(who), Error::<T>::NotSigner);
      RateSigners::<T>::remove(who);
      Self::deposit_event(Event::RateSignerRemoved { who: who.clone() });
      Ok(())
    }
  }

  impl<T: Config> TaskHandler for Pallet<T> {
    fn handle(hook: &[u8], payload: &[u8], _at: Moment) -> Option<DispatchResult> {
      if hook != RENEW_HOOK {
        return None;
      }
      Some(Self::decode_account(payload).and_then(|who| Self::perform_renewal(&who)))
    }
  }
}
