//! Profile Pallet
//!
//! Keeps the display data and feature flags of every account and registers new accounts.
//! Creating an account appends it to the referral structure under the given referrer; the
//! creator pays the account creation fee unless it is on the free creator list.
//!
//! Nicknames are unique and may not impersonate addresses (the `ARTR-` prefix is reserved).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::profile";

/// Nicknames starting with this prefix are refused, in any letter case.
pub const RESERVED_PREFIX: &[u8] = b"ARTR-";

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// An account in the referral structure that accepts new referrals.
  fn referrer() -> AccountId;
}

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, RESERVED_PREFIX, WeightInfo};
  use alloc::vec::Vec;
  use frame::prelude::*;
  use primitives::{Balance, Ledger, ProfileInspect, ReferralNetwork, SignerRegistry};
  use serde::{Deserialize, Serialize};

  #[derive(
    Clone,
    Debug,
    Decode,
    DecodeWithMemTracking,
    Default,
    Encode,
    Eq,
    PartialEq,
    TypeInfo,
    Serialize,
    Deserialize,
  )]
  pub struct Profile {
    /// Renew the subscription from the account's coins when it expires
    pub auto_pay: bool,
    pub noding: bool,
    pub storage: bool,
    pub validator: bool,
    pub vpn: bool,
    pub nickname: Vec<u8>,
  }

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    type Ledger: Ledger<Self::AccountId>;

    type Referral: ReferralNetwork<Self::AccountId>;

    /// Receiver of the account creation fee
    #[pallet::constant]
    type FeeCollector: Get<Self::AccountId>;

    #[pallet::constant]
    type AccountCreationFee: Get<Balance>;

    #[pallet::constant]
    type MaxNicknameLength: Get<u32>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  #[pallet::without_storage_info]
  pub struct Pallet<T>(_);

  #[pallet::storage]
  #[pallet::getter(fn profile)]
  pub type Profiles<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, Profile>;

  /// Owner of each nickname in use.
  #[pallet::storage]
  #[pallet::getter(fn nickname_owner)]
  pub type Nicknames<T: Config> = StorageMap<_, Blake2_128Concat, Vec<u8>, T::AccountId>;

  /// Accounts creating accounts without paying the fee.
  #[pallet::storage]
  pub type FreeCreators<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, ()>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    AccountCreated { creator: T::AccountId, who: T::AccountId, referrer: T::AccountId, fee: Balance },
    ProfileUpdated { who: T::AccountId },
    FreeCreatorAdded { who: T::AccountId },
    FreeCreatorRemoved { who: T::AccountId },
  }

  #[pallet::error]
  pub enum Error<T> {
    AccountExists,
    ReferrerNotFound,
    /// The account has no profile yet
    AccountNotFound,
    NicknameTooLong,
    /// Nickname starts with the reserved prefix
    ReservedNickname,
    NicknameTaken,
    AlreadyFreeCreator,
    NotFreeCreator,
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    pub profiles: Vec<(T::AccountId, Profile)>,
    pub free_creators: Vec<T::AccountId>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      for (who, profile) in &self.profiles {
        Pallet::<T>::store_profile(who, profile.clone()).expect("genesis profiles must be valid");
      }
      for who in &self.free_creators {
        FreeCreators::<T>::insert(who, ());
      }
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Register `who` under `referrer`, optionally with a profile.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::create_account())]
    pub fn create_account(
      origin: OriginFor<T>,
      who: T::AccountId,
      referrer: T::AccountId,
      profile: Option<Profile>,
    ) -> DispatchResult {
      let creator = ensure_signed(origin)?;
      ensure!(
        !Profiles::<T>::contains_key(&who) && !T::Referral::exists(&who),
        Error::<T>::AccountExists
      );
      ensure!(T::Referral::exists(&referrer), Error::<T>::ReferrerNotFound);
      let profile = profile.unwrap_or_default();
      Self::validate_nickname(&who, &profile.nickname)?;

      let fee = if FreeCreators::<T>::contains_key(&creator) {
        0
      } else {
        let fee = T::AccountCreationFee::get();
        T::Ledger::transfer(&creator, &T::FeeCollector::get(), fee)?;
        fee
      };
      T::Referral::append_child(&referrer, &who)?;
      Self::store_profile(&who, profile)?;

      log::debug!(target: LOG_TARGET, "{:?} created {:?} under {:?}", creator, who, referrer);
      Self::deposit_event(Event::AccountCreated { creator, who, referrer, fee });
      Ok(())
    }

    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::update_profile())]
    pub fn update_profile(origin: OriginFor<T>, profile: Profile) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(Profiles::<T>::contains_key(&who), Error::<T>::AccountNotFound);
      Self::store_profile(&who, profile)?;
      Self::deposit_event(Event::ProfileUpdated { who });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn is_free_creator(who: &T::AccountId) -> bool {
      FreeCreators::<T>::contains_key(who)
    }

    fn validate_nickname(who: &T::AccountId, nickname: &[u8]) -> DispatchResult {
      if nickname.is_empty() {
        return Ok(());
      }
      ensure!(nickname.len() <= T::MaxNicknameLength::get() as usize, Error::<T>::NicknameTooLong);
      ensure!(
        !(nickname.len() >= RESERVED_PREFIX.len() &&
          nickname[..RESERVED_PREFIX.len()].eq_ignore_ascii_case(RESERVED_PREFIX)),
        Error::<T>::ReservedNickname
      );
      if let Some(owner) = Nicknames::<T>::get(nickname) {
        ensure!(owner == *who, Error::<T>::NicknameTaken);
      }
      Ok(())
    }

    fn store_profile(who: &T::AccountId, profile: Profile) -> DispatchResult {
      Self::validate_nickname(who, &profile.nickname)?;
      let old = Profiles::<T>::get(who).map(|p| p.nickname).unwrap_or_default();
      if old != profile.nickname {
        if !old.is_empty() {
          Nicknames::<T>::remove(&old);
        }
        if !profile.nickname.is_empty() {
          Nicknames::<T>::insert(&profile.nickname, who);
        }
      }
      Profiles::<T>::insert(who, profile);
      Ok(())
    }
  }

  impl<T: Config> ProfileInspect<T::AccountId> for Pallet<T> {
    fn auto_pay(who: &T::AccountId) -> bool {
      Profiles::<T>::get(who).is_some_and(|p| p.auto_pay)
    }
  }

  /// The free creator list.
  impl<T: Config> SignerRegistry<T::AccountId> for Pallet<T> {
    fn add_signer(who: &T::AccountId) -> DispatchResult {
      ensure!(!FreeCreators::<T>::contains_key(who), Error::<T>::AlreadyFreeCreator);
      FreeCreators::<T>::insert(who, ());
      Self::deposit_event(Event::FreeCreatorAdded { who: who.clone() });
      Ok(())
    }

    fn remove_signer(who: &T::AccountId) -> DispatchResult {
      ensure!(FreeCreators::<T>::contains_key(who), Error::<T>::NotFreeCreator);
      FreeCreators::<T>::remove(who);
      Self::deposit_event(Event::FreeCreatorRemoved { who: who.clone() });
      Ok(())
    }
  }
}
