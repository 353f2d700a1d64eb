//! Buffered tree updates.
//!
//! A [`BunchUpdater`] collects every node touched by one tree operation together with the
//! callbacks the operation raises. Nothing reaches `Nodes` before [`BunchUpdater::commit`];
//! reads inside the batch see the buffered records. On commit the records are written and the
//! callbacks fire in `(account, callback)` order, each pair once.

use crate::{
  Callback, Config, DOWNGRADE_HOOK, Event, LOG_TARGET, Nodes, Pallet, ReferralInfoOf, status,
};
use alloc::collections::{BTreeMap, BTreeSet};
use codec::Encode;
use polkadot_sdk::sp_runtime::DispatchResult;
use primitives::{ReferralHooks, Scheduler, Status};

pub struct BunchUpdater<T: Config> {
  records: BTreeMap<T::AccountId, ReferralInfoOf<T>>,
  callbacks: BTreeSet<(T::AccountId, Callback)>,
}

impl<T: Config> Default for BunchUpdater<T> {
  fn default() -> Self {
    Self { records: BTreeMap::new(), callbacks: BTreeSet::new() }
  }
}

impl<T: Config> BunchUpdater<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, who: &T::AccountId) -> Option<ReferralInfoOf<T>> {
    self.records.get(who).cloned().or_else(|| Nodes::<T>::get(who))
  }

  pub fn set(&mut self, who: &T::AccountId, info: ReferralInfoOf<T>) {
    self.records.insert(who.clone(), info);
  }

  pub fn add_callback(&mut self, who: &T::AccountId, callback: Callback) {
    self.callbacks.insert((who.clone(), callback));
  }

  /// Applies `f` to the record of `who`, re-checking its status afterwards when `check_status`
  /// is set. Returns `None` without calling `f` when there is no such node.
  pub fn update<R>(
    &mut self,
    who: &T::AccountId,
    check_status: bool,
    f: impl FnOnce(&mut ReferralInfoOf<T>) -> R,
  ) -> Result<Option<R>, polkadot_sdk::sp_runtime::DispatchError> {
    let Some(mut info) = self.get(who) else {
      log::debug!(target: LOG_TARGET, "no referral node for {:?}, update skipped", who);
      return Ok(None);
    };
    let result = f(&mut info);
    if check_status {
      self.check_status(who, &mut info)?;
    }
    self.set(who, info);
    Ok(Some(result))
  }

  pub fn requirements_met(&self, status: Status, info: &ReferralInfoOf<T>) -> bool {
    status::requirements_met(status, info, |child| self.get(child))
  }

  fn check_status(&mut self, who: &T::AccountId, info: &mut ReferralInfoOf<T>) -> DispatchResult {
    if !self.requirements_met(info.status, info) {
      if info.status_downgrade_at.is_none() {
        let at = T::Scheduler::now().saturating_add(T::Scheduler::one_month());
        T::Scheduler::schedule(at, DOWNGRADE_HOOK, &who.encode())?;
        info.status_downgrade_at = Some(at);
        Pallet::<T>::deposit_event(Event::StatusWillBeDowngraded { who: who.clone(), at });
      }
      return Ok(());
    }

    if let Some(at) = info.status_downgrade_at.take() {
      T::Scheduler::delete(at, DOWNGRADE_HOOK, &who.encode());
      Pallet::<T>::deposit_event(Event::StatusDowngradeCanceled { who: who.clone() });
    }

    // Hero is no longer granted, but its requirements still gate AbsoluteChampion.
    let mut best = info.status;
    let mut candidate = info.status.next();
    while let Some(next) = candidate {
      if !self.requirements_met(next, info) {
        break;
      }
      if next != Status::Hero {
        best = next;
      }
      candidate = next.next();
    }
    if best > info.status {
      Pallet::<T>::set_status(who, info, best);
      self.add_callback(who, Callback::StatusUpdated);
    }
    Ok(())
  }

  pub fn commit(self) -> DispatchResult {
    for (who, info) in &self.records {
      Nodes::<T>::insert(who, info);
    }
    for (who, callback) in &self.callbacks {
      match callback {
        Callback::Banished => T::Hooks::on_banished(who)?,
        Callback::StakeChanged => T::Hooks::on_stake_changed(who)?,
        Callback::StatusUpdated => {
          let status = self.records.get(who).map(|info| info.status).unwrap_or_default();
          T::Hooks::on_status_updated(who, status)?
        },
      }
    }
    Ok(())
  }
}
