//! Common Test Utilities for Runtime Integration Tests
//!
//! Genesis builder, a block driver that goes through the hooks of every pallet the way the
//! executive does, and checks of the cross-module invariants that must hold after any block.

use crate::{
  AccountId, AllPalletsWithSystem, Bank, Balance, BlockNumber, Delegating, Moment, Runtime,
  RuntimeEvent, Schedule, System, Timestamp, Voting,
};
use alloc::{vec, vec::Vec};
use codec::Encode;
use pallet_delegating::{ACCRUE_HOOK, REVOKE_HOOK};
use pallet_profile::Profile;
use pallet_referral::{BANISHMENT_HOOK, COMPRESSION_HOOK, Nodes};
use pallet_voting::{POLL_HOOK, VOTE_HOOK};
use polkadot_sdk::{
  frame_support::traits::{Get, OnFinalize, OnInitialize},
  frame_system,
  sp_io::TestExternalities,
  sp_runtime::BuildStorage,
};
use primitives::{ARTR, Coins, LEVELS, Status, time};

// Standard test accounts
pub const ROOT: AccountId = AccountId::new([1u8; 32]);
pub const ALICE: AccountId = AccountId::new([2u8; 32]);
pub const BOB: AccountId = AccountId::new([3u8; 32]);
pub const CHARLIE: AccountId = AccountId::new([4u8; 32]);
pub const DAVE: AccountId = AccountId::new([5u8; 32]);
pub const EVE: AccountId = AccountId::new([6u8; 32]);
pub const FERDIE: AccountId = AccountId::new([7u8; 32]);

/// Numbered account for larger structures.
pub fn account(n: u8) -> AccountId {
  AccountId::new([n; 32])
}

pub const INITIAL_BALANCE: Balance = 1_000_000 * ARTR;

pub fn fee_collector() -> AccountId {
  crate::configs::FeeCollector::get()
}

pub fn top_referrer() -> AccountId {
  crate::configs::TopReferrer::get()
}

/// Genesis of a test chain. `ROOT` always tops the structure and governs unless told otherwise.
pub struct ExtBuilder {
  tree: Vec<(AccountId, Option<AccountId>, Status, bool)>,
  coins: Vec<(AccountId, Coins)>,
  government: Vec<AccountId>,
  subscriptions: Vec<(AccountId, Moment)>,
  profiles: Vec<(AccountId, Profile)>,
  delegators: Vec<AccountId>,
}

impl Default for ExtBuilder {
  fn default() -> Self {
    Self {
      tree: vec![(ROOT, None, Status::Lucky, true)],
      coins: vec![(ROOT, Coins { main: INITIAL_BALANCE, ..Default::default() })],
      government: vec![ROOT],
      subscriptions: Vec::new(),
      profiles: Vec::new(),
      delegators: Vec::new(),
    }
  }
}

impl ExtBuilder {
  /// Adds a node to the structure. Referrers must be added before their referrals.
  pub fn account(
    mut self,
    who: AccountId,
    referrer: AccountId,
    status: Status,
    active: bool,
    main: Balance,
  ) -> Self {
    self.tree.push((who.clone(), Some(referrer), status, active));
    if main > 0 {
      self.coins.push((who, Coins { main, ..Default::default() }));
    }
    self
  }

  /// Genesis coins outside the structure, or delegated coins accruing from genesis.
  pub fn coins(mut self, who: AccountId, coins: Coins) -> Self {
    if coins.delegated > 0 {
      self.delegators.push(who.clone());
    }
    self.coins.retain(|(x, _)| *x != who);
    self.coins.push((who, coins));
    self
  }

  pub fn government(mut self, government: Vec<AccountId>) -> Self {
    self.government = government;
    self
  }

  /// A subscription running at genesis and expiring at `expire_at`.
  pub fn subscription(mut self, who: AccountId, expire_at: Moment) -> Self {
    self.subscriptions.push((who, expire_at));
    self
  }

  pub fn profile(mut self, who: AccountId, profile: Profile) -> Self {
    self.profiles.push((who, profile));
    self
  }

  pub fn build(self) -> TestExternalities {
    let mut t = frame_system::GenesisConfig::<Runtime>::default().build_storage().unwrap();

    pallet_bank::GenesisConfig::<Runtime> { accounts: self.coins }
      .assimilate_storage(&mut t)
      .unwrap();
    pallet_referral::GenesisConfig::<Runtime> { accounts: self.tree, transition_price: None }
      .assimilate_storage(&mut t)
      .unwrap();
    pallet_profile::GenesisConfig::<Runtime> { profiles: self.profiles, free_creators: vec![ROOT] }
      .assimilate_storage(&mut t)
      .unwrap();
    pallet_delegating::GenesisConfig::<Runtime> {
      delegators: self.delegators,
      ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();
    pallet_vpn::GenesisConfig::<Runtime> { quotas: Vec::new(), signers: vec![ROOT] }
      .assimilate_storage(&mut t)
      .unwrap();
    pallet_storage::GenesisConfig::<Runtime> { quotas: Vec::new(), signers: vec![ROOT] }
      .assimilate_storage(&mut t)
      .unwrap();
    pallet_subscription::GenesisConfig::<Runtime> {
      subscriptions: self.subscriptions,
      rate_signers: vec![ROOT],
      ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();
    pallet_voting::GenesisConfig::<Runtime> { government: self.government, ..Default::default() }
      .assimilate_storage(&mut t)
      .unwrap();

    let mut ext = TestExternalities::new(t);
    ext.execute_with(|| {
      System::set_block_number(1);
      Timestamp::set_timestamp(time::BLOCK_TIME);
      AllPalletsWithSystem::on_initialize(1);
    });
    ext
  }
}

pub fn new_test_ext() -> TestExternalities {
  ExtBuilder::default()
    .account(ALICE, ROOT, Status::Lucky, true, INITIAL_BALANCE)
    .account(BOB, ROOT, Status::Lucky, true, INITIAL_BALANCE)
    .build()
}

/// First block whose timestamp is not earlier than `moment`.
pub fn block_of(moment: Moment) -> BlockNumber {
  moment.div_ceil(time::BLOCK_TIME) as BlockNumber
}

/// Finalizes the current block and opens block `n`, whose timestamp is `n` block times.
///
/// Blocks in between are skipped: tasks due in them fire in time order once block `n` is
/// finalized.
pub fn skip_to_block(n: BlockNumber) {
  let current = System::block_number();
  assert!(n > current, "blocks only move forward");
  AllPalletsWithSystem::on_finalize(current);
  System::set_block_number(n);
  Timestamp::set_timestamp(Moment::from(n) * time::BLOCK_TIME);
  AllPalletsWithSystem::on_initialize(n);
}

pub fn next_block() {
  skip_to_block(System::block_number() + 1);
}

pub fn run_to_block(n: BlockNumber) {
  while System::block_number() < n {
    next_block();
  }
}

/// Finalizes the block carrying `moment`, so every task due by then has fired.
pub fn run_past(moment: Moment) {
  let target = block_of(moment);
  if target > System::block_number() {
    skip_to_block(target);
  }
  next_block();
}

pub fn now() -> Moment {
  Timestamp::get()
}

pub fn events() -> Vec<RuntimeEvent> {
  System::events().into_iter().map(|record| record.event).collect()
}

pub fn has_event(event: impl Into<RuntimeEvent>) -> bool {
  let event = event.into();
  System::events().iter().any(|record| record.event == event)
}

pub fn has_task(at: Moment, hook: &[u8], who: &AccountId) -> bool {
  Schedule::tasks_at(at).contains(&(hook.to_vec(), who.encode()))
}

pub fn coins(who: &AccountId) -> Coins {
  Bank::account(who)
}

pub fn node(who: &AccountId) -> pallet_referral::ReferralInfoOf<Runtime> {
  Nodes::<Runtime>::get(who).expect("node exists")
}

/// Every node caches its own coins and activity, and per level the sums of its referrals'
/// cells one level up.
pub fn assert_tree_consistent() {
  let mut listed = alloc::collections::BTreeSet::new();
  for (who, info) in Nodes::<Runtime>::iter() {
    for child in &info.referrals {
      assert!(listed.insert(child.clone()), "{child} is listed under two referrers");
    }
    let own = Bank::account(&who);
    assert_eq!(info.coins[0], own.total(), "own coins of {who}");
    assert_eq!(info.delegated[0], own.delegated, "own delegation of {who}");
    assert_eq!(info.active_refs[0], u64::from(info.active), "own activity of {who}");

    let children: Vec<_> = info
      .referrals
      .iter()
      .map(|child| {
        let node = Nodes::<Runtime>::get(child).expect("referral exists");
        assert_eq!(node.referrer.as_ref(), Some(&who), "referrer of {child}");
        assert!(!node.banished, "banished {child} is still listed under {who}");
        node
      })
      .collect();
    for level in 1..=LEVELS {
      let coins: Balance = children.iter().map(|c| c.coins[level - 1]).sum();
      let delegated: Balance = children.iter().map(|c| c.delegated[level - 1]).sum();
      let active: u64 = children.iter().map(|c| c.active_refs[level - 1]).sum();
      assert_eq!(info.coins[level], coins, "coins[{level}] of {who}");
      assert_eq!(info.delegated[level], delegated, "delegated[{level}] of {who}");
      assert_eq!(info.active_refs[level], active, "active_refs[{level}] of {who}");
    }
  }
}

/// The bank supply is the sum of all balances, denomination by denomination.
pub fn assert_supply_consistent() {
  let mut sum = Coins::default();
  for (_, coins) in pallet_bank::Accounts::<Runtime>::iter() {
    sum.main += coins.main;
    sum.delegated += coins.delegated;
    sum.revoking += coins.revoking;
  }
  assert_eq!(Bank::supply(), sum);
}

/// Revoke requests and scheduled releases match one to one, the revoking coins of every account
/// are covered by its requests, and a running accrual always has its task.
pub fn assert_delegations_scheduled() {
  let pending = Schedule::pending();
  for (who, record) in pallet_delegating::Records::<Runtime>::iter() {
    for request in &record.requests {
      let releases = pending
        .iter()
        .filter(|(at, hook, payload)| {
          *at == request.due && hook.as_slice() == REVOKE_HOOK && *payload == who.encode()
        })
        .count();
      assert_eq!(releases, 1, "releases of {who} at {}", request.due);
    }
    assert_eq!(record.revoking(), Bank::account(&who).revoking, "revoking coins of {who}");
    if let Some(at) = record.next_accrue {
      assert!(has_task(at, ACCRUE_HOOK, &who), "accrual of {who} at {at}");
      let cluster = record.cluster.expect("accruing delegator has a cluster");
      assert!(Delegating::delegators_in_cluster(cluster).contains(&who), "cluster of {who}");
    } else {
      assert_eq!(record.cluster, None, "{who} stays in a cluster without accruing");
    }
  }
  for (at, hook, payload) in pending {
    if hook.as_slice() != REVOKE_HOOK {
      continue;
    }
    let who = AccountId::new(payload.as_slice().try_into().expect("account payload"));
    let record = pallet_delegating::Records::<Runtime>::get(&who);
    assert!(record.requests.iter().any(|r| r.due == at), "orphan release of {who} at {at}");
  }
}

/// An unbanished inactive node waits for exactly one compression task at its `compression_at`,
/// unless it is already compressed and waits for banishment instead.
pub fn assert_compressions_scheduled() {
  for (who, info) in Nodes::<Runtime>::iter() {
    if let Some(at) = info.compression_at {
      assert!(!info.active && !info.banished, "{who} is active or banished with a compression");
      assert!(has_task(at, COMPRESSION_HOOK, &who), "compression of {who} at {at}");
    }
    if let Some(at) = info.banishment_at {
      assert!(!info.active && !info.banished, "{who} is active or banished with a banishment");
      assert!(info.compression_at.is_none(), "{who} waits for compression and banishment");
      assert!(has_task(at, BANISHMENT_HOOK, &who), "banishment of {who} at {at}");
    }
    if !info.active && !info.banished {
      assert!(
        info.compression_at.is_some() || info.banishment_at.is_some(),
        "inactive {who} has nothing scheduled"
      );
    }
  }
  for (at, hook, payload) in Schedule::pending() {
    if hook.as_slice() != COMPRESSION_HOOK {
      continue;
    }
    let who = AccountId::new(payload.as_slice().try_into().expect("account payload"));
    assert_eq!(node(&who).compression_at, Some(at), "orphan compression of {who} at {at}");
  }
}

/// The government is never empty and a running vote or poll always has its end scheduled.
pub fn assert_governance_consistent() {
  assert!(!Voting::government().is_empty(), "empty government");
  if let Some(proposal) = Voting::current_proposal() {
    assert!(Schedule::tasks_at(proposal.end_time).iter().any(|(hook, _)| hook == VOTE_HOOK));
  }
  if let Some(poll) = Voting::current_poll() {
    assert!(Schedule::tasks_at(poll.end).iter().any(|(hook, _)| hook == POLL_HOOK));
  }
}

pub fn assert_invariants() {
  assert_tree_consistent();
  assert_supply_consistent();
  assert_delegations_scheduled();
  assert_compressions_scheduled();
  assert_governance_consistent();
}
