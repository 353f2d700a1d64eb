#![cfg(feature = "runtime-benchmarks")]

use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{Balance, Ledger};

#[benchmarks]
mod benches {
  use super::*;

  fn funded<T: Config>(amount: Balance) -> T::AccountId {
    let caller: T::AccountId = whitelisted_caller();
    T::Ledger::mint(&caller, amount).unwrap();
    caller
  }

  #[benchmark]
  fn delegate() {
    let amount = MinDelegate::<T>::get().max(1).saturating_mul(100);
    let caller = funded::<T>(amount);

    #[extrinsic_call]
    delegate(RawOrigin::Signed(caller.clone()), amount);

    assert!(T::Ledger::coins(&caller).delegated > 0);
    assert!(Records::<T>::get(&caller).next_accrue.is_some());
  }

  #[benchmark]
  fn revoke() {
    let amount = MinDelegate::<T>::get().max(1).saturating_mul(100);
    let caller = funded::<T>(amount);
    Pallet::<T>::do_delegate(&caller, amount).unwrap();
    let delegated = T::Ledger::coins(&caller).delegated;

    #[extrinsic_call]
    revoke(RawOrigin::Signed(caller.clone()), delegated);

    let coins = T::Ledger::coins(&caller);
    assert_eq!(coins.delegated, 0);
    assert!(coins.revoking > 0);
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};

  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
