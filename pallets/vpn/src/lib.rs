//! VPN Pallet
//!
//! Per-account VPN traffic quota in bytes. Limits are bought through the subscription pallet;
//! traffic is reported by the VPN signers.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::vpn";

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, WeightInfo};
  use alloc::vec::Vec;
  use frame::prelude::*;
  use primitives::{ResourceQuota, SignerRegistry};

  /// Traffic quota of an account.
  #[derive(
    Clone, Copy, Debug, Decode, Default, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
  )]
  pub struct VpnInfo {
    pub limit: u64,
    pub current: u64,
  }

  impl VpnInfo {
    pub fn is_exhausted(&self) -> bool {
      self.current >= self.limit
    }
  }

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  #[pallet::storage]
  #[pallet::getter(fn info)]
  pub type Info<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, VpnInfo, ValueQuery>;

  #[pallet::storage]
  pub type Signers<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, ()>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    CurrentUpdated { who: T::AccountId, current: u64, limit: u64 },
    SignerAdded { who: T::AccountId },
    SignerRemoved { who: T::AccountId },
  }

  #[pallet::error]
  pub enum Error<T> {
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
        Info::<T>::insert(who, VpnInfo { limit: *limit, current: *current });
      }
      for who in &self.signers {
        Signers::<T>::insert(who, ());
      }
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Report the traffic `who` has used in the current period.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::set_current())]
    pub fn set_current(origin: OriginFor<T>, who: T::AccountId, current: u64) -> DispatchResult {
      let signer = ensure_signed(origin)?;
      ensure!(Signers::<T>::contains_key(&signer), Error::<T>::SignerNotAllowed);

      let info = Info::<T>::mutate(&who, |info| {
        info.current = current;
        *info
      });
      if info.is_exhausted() {
        log::debug!(target: LOG_TARGET, "{:?} used up its traffic", who);
      }
      Self::deposit_event(Event::CurrentUpdated { who, current, limit: info.limit });
      Ok(())
    }
  }

  impl<T: Config> ResourceQuota<T::AccountId> for Pallet<T> {
    fn limit(who: &T::AccountId) -> u64 {
      Info::<T>::get(who).limit
    }

    fn current(who: &T::AccountId) -> u64 {
      Info::<T>::get(who).current
    }

    fn set_limit(who: &T::AccountId, limit: u64) {
      Info::<T>::mutate(who, |info| info.limit = limit);
    }

    fn add_limit(who: &T::AccountId, extra: u64) {
      Info::<T>::mutate(who, |info| info.limit = info.limit.saturating_add(extra));
    }

    fn set_current(who: &T::AccountId, current: u64) {
      Info::<T>::mutate(who, |info| info.current = current);
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
