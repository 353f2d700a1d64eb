#![cfg(feature = "runtime-benchmarks")]

use crate::*;
use polkadot_sdk::frame_benchmarking::{account, v2::*};
use polkadot_sdk::frame_system::RawOrigin;
use primitives::Ledger;

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn send() {
    let caller: T::AccountId = whitelisted_caller();
    let dest: T::AccountId = account("dest", 0, 0);
    let amount = MinSend::<T>::get().max(1);
    let funds = amount.saturating_add(Pallet::<T>::fee_for(amount));
    <Pallet<T> as Ledger<T::AccountId>>::mint(&caller, funds).unwrap();

    #[extrinsic_call]
    send(RawOrigin::Signed(caller.clone()), dest.clone(), amount);

    assert_eq!(Accounts::<T>::get(&dest).main, amount);
    assert_eq!(Accounts::<T>::get(&caller).main, 0);
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};

  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
