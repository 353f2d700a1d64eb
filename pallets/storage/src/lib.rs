//! Storage Pallet
//!
//! Per-account storage quota (`limit`, `current`, both in bytes) and an opaque directory blob the
//! account keeps about its own files. The subscription pallet writes the limits; the owner reports
//! its usage together with the directory, and the listed signers may correct the usage of anyone.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::storage";

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, WeightInfo};
  use alloc::vec::Vec;
  use frame::prelude::*;
  use primitives::{ResourceQuota, SignerRegistry};

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Longest directory blob, in bytes
    #[pallet::constant]
    type MaxDataLength: Get<u32>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  #[pallet::without_storage_info]
  pub struct Pallet<T>(_);

  #[pallet::storage]
  pub type Limits<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u64, ValueQuery>;

  #[pallet::storage]
  pub type Current<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u64, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn data)]
  pub type Data<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, Vec<u8>>;

  /// Accounts allowed to report the usage of others.
  #[pallet::storage]
  pub type Signers<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, ()>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    DataUpdated { who: T::AccountId, size: u64 },
    CurrentUpdated { who: T::AccountId, current: u64 },
    SignerAdded { who: T::AccountId },
    SignerRemoved { who: T::AccountId },
  }

  #[pallet::error]
  pub enum Error<T> {
    DataTooLong,
    SignerNotAllowed,
    AlreadySigner,
    NotSigner,
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// `(account, limit, current)`
    pub quotas: Vec<(T::AccountId, u64, u64)>,
    pub signers: Vec<T::AccountId>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      for (who, limit, current) in &self.quotas {
        Limits::<T>::insert(who, limit);
        Current::<T>::insert(who, current);
      }
      for who in &self.signers {
        Signers::<T>::insert(who, ());
      }
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Store the caller's directory and report `size` bytes in use.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::set_storage_data())]
    pub fn set_storage_data(origin: OriginFor<T>, size: u64, data: Vec<u8>) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(data.len() <= T::MaxDataLength::get() as usize, Error::<T>::DataTooLong);

      if size > Limits::<T>::get(&who) {
        log::debug!(target: LOG_TARGET, "{:?} reports {} bytes over its limit", who, size);
      }
      Data::<T>::insert(&who, data);
      Current::<T>::insert(&who, size);
      Self::deposit_event(Event::DataUpdated { who, size });
      Ok(())
    }

    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::set_current())]
    pub fn set_current(origin: OriginFor<T>, who: T::AccountId, current: u64) -> DispatchResult {
      let signer = ensure_signed(origin)?;
      ensure!(Signers::<T>::contains_key(&signer), Error::<T>::SignerNotAllowed);
      Current::<T>::insert(&who, current);
      Self::deposit_event(Event::CurrentUpdated { who, current });
      Ok(())
    }
  }

  impl<T: Config> ResourceQuota<T::AccountId> for Pallet<T> {
    fn limit(who: &T::AccountId) -> u64 {
      Limits::<T>::get(who)
    }

    fn current(who: &T::AccountId) -> u64 {
      Current::<T>::get(who)
    }

    fn set_limit(who: &T::AccountId, limit: u64) {
      Limits::<T>::insert(who, limit);
    }

    fn add_limit(who: &T::AccountId, extra: u64) {
      Limits::<T>::mutate(who, |limit| *limit = limit.saturating_add(extra));
    }

    fn set_current(who: &T::AccountId, current: u64) {
      Current::<T>::insert(who, current);
    }
  }

  impl<T: Config> SignerRegistry<T::AccountId> for Pallet<T> {
    fn add_signer(who: &T::AccountId) -> DispatchResult {
      ensure!(!Signers::<T>::contains_key(who), Error::<T>::AlreadySigner);
      Signers::<T>::insert(who, ());
      Self::deposit_event(Event::SignerAdded { who: who.clone() });
      Ok(())
    }

    fn remove_signer(who: &T::AccountId) -> DispatchResult {
      ensure!(Signers::<T>::contains_key(who), Error::<T>::NotSigner);
      Signers::<T>::remove(who);
      Self::deposit_event(Event::SignerRemoved { who: who.clone() });
      Ok(())
    }
  }
}
