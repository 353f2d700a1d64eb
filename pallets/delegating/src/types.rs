use alloc::vec::Vec;
use codec::{Decode, Encode};
use polkadot_sdk::sp_runtime::Perbill;
use primitives::{Balance, Moment};
use scale_info::TypeInfo;

/// Coins waiting in `revoking` until `due`.
#[derive(Clone, Copy, Debug, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct RevokeRequest {
  pub due: Moment,
  pub amount: Balance,
}

#[derive(Clone, Debug, Decode, Default, Encode, Eq, PartialEq, TypeInfo)]
pub struct DelegationRecord {
  /// Block-of-day bucket the account accrues in
  pub cluster: Option<u32>,
  /// Pending revokes, ordered by due time
  pub requests: Vec<RevokeRequest>,
  pub next_accrue: Option<Moment>,
  /// Share of the next full accrual that is withheld
  pub missed_part: Option<Perbill>,
}

impl DelegationRecord {
  pub fn is_empty(&self) -> bool {
    self.cluster.is_none()
      && self.requests.is_empty()
      && self.next_accrue.is_none()
      && self.missed_part.is_none()
  }

  /// Adds a request, merging it into an existing one with the same due time. Returns whether a
  /// new request was created.
  pub fn push_request(&mut self, due: Moment, amount: Balance) -> bool {
    if let Some(request) = self.requests.iter_mut().find(|r| r.due == due) {
      request.amount = request.amount.saturating_add(amount);
      return false;
    }
    let index = self.requests.partition_point(|r| r.due < due);
    self.requests.insert(index, RevokeRequest { due, amount });
    true
  }

  /// Removes and returns the request due at `due`.
  pub fn take_request(&mut self, due: Moment) -> Option<RevokeRequest> {
    let index = self.requests.iter().position(|r| r.due == due)?;
    Some(self.requests.remove(index))
  }

  pub fn revoking(&self) -> Balance {
    self.requests.iter().fold(0, |acc, r| acc.saturating_add(r.amount))
  }
}

/// Progress of the running accrual period.
#[derive(Clone, Copy, Debug, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct Accumulation {
  pub start: Moment,
  pub end: Moment,
  /// Monthly percentage applied
  pub percent: u32,
  /// Interest due at `end`
  pub total: Balance,
  /// Interest accumulated so far
  pub current: Balance,
}
