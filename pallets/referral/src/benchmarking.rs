#![cfg(feature = "runtime-benchmarks")]

use crate::*;
use alloc::vec::Vec;
use polkadot_sdk::frame_benchmarking::{account, v2::*};
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{LEVELS, Ledger, ReferralNetwork};

#[benchmarks]
mod benches {
  use super::*;

  /// A root with a chain of `LEVELS` nodes under it; the deepest node is returned last.
  fn chain<T: Config>() -> (T::AccountId, Vec<T::AccountId>) {
    let root: T::AccountId = account("root", 0, 0);
    Nodes::<T>::insert(&root, ReferralInfo::new(None, 0, 0));
    let mut parent = root.clone();
    let mut chain = Vec::new();
    for i in 0..LEVELS as u32 {
      let child: T::AccountId = account("node", i, 0);
      Pallet::<T>::append_child(&parent, &child).unwrap();
      chain.push(child.clone());
      parent = child;
    }
    (root, chain)
  }

  fn request<T: Config>(subject: &T::AccountId, destination: &T::AccountId) {
    T::Ledger::mint(subject, TransitionPrice::<T>::get()).unwrap();
    Pallet::<T>::request_transition(RawOrigin::Signed(subject.clone()).into(), destination.clone())
      .unwrap();
  }

  #[benchmark]
  fn request_transition() {
    let (root, chain) = chain::<T>();
    let subject = chain[chain.len() - 1].clone();
    T::Ledger::mint(&subject, TransitionPrice::<T>::get()).unwrap();

    #[extrinsic_call]
    request_transition(RawOrigin::Signed(subject.clone()), root.clone());

    let pending = Nodes::<T>::get(&subject).and_then(|info| info.transition);
    assert!(pending.is_some_and(|t| t.destination == root));
  }

  #[benchmark]
  fn resolve_transition() {
    let (root, chain) = chain::<T>();
    let subject = chain[chain.len() - 1].clone();
    let referrer = chain[chain.len() - 2].clone();
    request::<T>(&subject, &root);

    #[extrinsic_call]
    resolve_transition(RawOrigin::Signed(referrer.clone()), subject.clone(), false);

    assert_eq!(Nodes::<T>::get(&subject).and_then(|info| info.referrer), Some(root));
    assert!(Nodes::<T>::get(&referrer).is_some_and(|info| info.referrals.is_empty()));
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};

  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
