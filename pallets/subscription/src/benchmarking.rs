#![cfg(feature = "runtime-benchmarks")]

use crate::*;
use frame::prelude::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{Ledger, ResourceQuota, params::GB};

#[benchmarks]
mod benches {
  use super::*;

  /// A caller holding ten subscription prices.
  fn funded<T: Config>() -> T::AccountId {
    let caller: T::AccountId = whitelisted_caller();
    T::Ledger::mint(&caller, Pallet::<T>::price().saturating_mul(10)).unwrap();
    caller
  }

  #[benchmark]
  fn pay_subscription() {
    let caller = funded::<T>();
    let storage_gb = T::BaseStorageGb::get().saturating_add(5);

    #[extrinsic_call]
    pay_subscription(RawOrigin::Signed(caller.clone()), storage_gb);

    assert!(Activity::<T>::get(&caller).active);
    assert_eq!(T::Storage::limit(&caller), storage_gb * GB);
  }

  #[benchmark]
  fn pay_vpn() {
    let caller = funded::<T>();
    let before = T::Vpn::limit(&caller);

    #[extrinsic_call]
    pay_vpn(RawOrigin::Signed(caller.clone()), 10);

    assert_eq!(T::Vpn::limit(&caller), before + 10 * GB);
  }

  #[benchmark]
  fn pay_storage() {
    let caller = funded::<T>();
    let base = T::BaseStorageGb::get();
    Pallet::<T>::do_pay_subscription(&caller, base * GB).unwrap();

    #[extrinsic_call]
    pay_storage(RawOrigin::Signed(caller.clone()), base + 10);

    assert_eq!(T::Storage::limit(&caller), (base + 10) * GB);
  }

  #[benchmark]
  fn set_token_rate() {
    let caller: T::AccountId = whitelisted_caller();
    RateSigners::<T>::insert(&caller, ());
    let new_rate = TokenRate::<T>::get().saturating_add(1);

    #[extrinsic_call]
    set_token_rate(RawOrigin::Signed(caller), new_rate);

    assert_eq!(TokenRate::<T>::get(), new_rate);
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};

  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
