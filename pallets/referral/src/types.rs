use alloc::vec::Vec;
use codec::{Decode, Encode};
use primitives::{Balance, LEVELS, Moment, Status};
use scale_info::TypeInfo;

/// Number of cells in an aggregate array: the node itself plus [`LEVELS`] levels below it.
pub const CELLS: usize = LEVELS + 1;

/// A transition requested by a node and waiting for its current referrer.
#[derive(Clone, Debug, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct PendingTransition<AccountId> {
  pub destination: AccountId,
  /// Time of the scheduled timeout
  pub deadline: Moment,
}

/// One node of the referral structure.
///
/// `coins[k]`, `delegated[k]` and `active_refs[k]` hold the totals over the node's descendants
/// exactly `k` levels below it; cell 0 is the node itself.
#[derive(Clone, Debug, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct ReferralInfo<AccountId> {
  pub referrer: Option<AccountId>,
  pub referrals: Vec<AccountId>,
  pub status: Status,
  pub active: bool,
  pub banished: bool,
  pub coins: [Balance; CELLS],
  pub delegated: [Balance; CELLS],
  pub active_refs: [u64; CELLS],
  pub compression_at: Option<Moment>,
  pub banishment_at: Option<Moment>,
  pub status_downgrade_at: Option<Moment>,
  pub transition: Option<PendingTransition<AccountId>>,
}

impl<AccountId: PartialEq> ReferralInfo<AccountId> {
  pub fn new(referrer: Option<AccountId>, coins: Balance, delegated: Balance) -> Self {
    let mut info = Self {
      referrer,
      referrals: Vec::new(),
      status: Status::Lucky,
      active: false,
      banished: false,
      coins: [0; CELLS],
      delegated: [0; CELLS],
      active_refs: [0; CELLS],
      compression_at: None,
      banishment_at: None,
      status_downgrade_at: None,
      transition: None,
    };
    info.coins[0] = coins;
    info.delegated[0] = delegated;
    info
  }

  /// Coins of the node and its first `lines` levels.
  pub fn coins_up_to(&self, lines: usize) -> Balance {
    self.coins[..=lines.min(LEVELS)]
      .iter()
      .fold(0, |acc, x| acc.saturating_add(*x))
  }

  pub fn total_active_refs(&self) -> u64 {
    self.active_refs.iter().fold(0, |acc, x| acc.saturating_add(*x))
  }

  pub fn subtree(&self) -> Subtree {
    Subtree { coins: self.coins, delegated: self.delegated, active_refs: self.active_refs }
  }

  pub fn remove_referral(&mut self, who: &AccountId) {
    self.referrals.retain(|x| x != who);
  }
}

/// Aggregates of a subtree as seen from its root, moved around as a unit whenever the subtree
/// changes its position.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Subtree {
  pub coins: [Balance; CELLS],
  pub delegated: [Balance; CELLS],
  pub active_refs: [u64; CELLS],
}

impl Subtree {
  /// A lone node with the given level-0 values.
  pub fn single(coins: Balance, delegated: Balance, active: bool) -> Self {
    let mut subtree = Self::default();
    subtree.coins[0] = coins;
    subtree.delegated[0] = delegated;
    subtree.active_refs[0] = u64::from(active);
    subtree
  }

  /// Adds the subtree to an ancestor at `distance` (1 = direct referrer).
  pub fn add_to<AccountId>(&self, ancestor: &mut ReferralInfo<AccountId>, distance: usize) {
    for level in distance..CELLS {
      let source = level - distance;
      ancestor.coins[level] = ancestor.coins[level].saturating_add(self.coins[source]);
      ancestor.delegated[level] = ancestor.delegated[level].saturating_add(self.delegated[source]);
      ancestor.active_refs[level] =
        ancestor.active_refs[level].saturating_add(self.active_refs[source]);
    }
  }

  /// Removes the subtree from an ancestor at `distance` (1 = direct referrer).
  pub fn remove_from<AccountId>(&self, ancestor: &mut ReferralInfo<AccountId>, distance: usize) {
    for level in distance..CELLS {
      let source = level - distance;
      ancestor.coins[level] = ancestor.coins[level].saturating_sub(self.coins[source]);
      ancestor.delegated[level] = ancestor.delegated[level].saturating_sub(self.delegated[source]);
      ancestor.active_refs[level] =
        ancestor.active_refs[level].saturating_sub(self.active_refs[source]);
    }
  }

  /// The same subtree once its root has been compressed: the root's referrals move up to the
  /// root's own level and every deeper level moves up by one.
  pub fn lifted(&self) -> Self {
    let mut lifted = Self::default();
    lifted.coins[0] = self.coins[0].saturating_add(self.coins[1]);
    lifted.delegated[0] = self.delegated[0].saturating_add(self.delegated[1]);
    lifted.active_refs[0] = self.active_refs[0].saturating_add(self.active_refs[1]);
    for level in 1..LEVELS {
      lifted.coins[level] = self.coins[level + 1];
      lifted.delegated[level] = self.delegated[level + 1];
      lifted.active_refs[level] = self.active_refs[level + 1];
    }
    lifted
  }

  /// Whether moving the subtree changes anybody's delegated totals.
  pub fn has_delegated(&self) -> bool {
    self.delegated.iter().any(|x| *x > 0)
  }
}

/// Callbacks fired once a batch of tree updates is committed.
///
/// Declaration order matches the lexical order of the event names, which is the order callbacks
/// for one account are fired in.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Callback {
  Banished,
  StakeChanged,
  StatusUpdated,
}
