use crate as pallet_subscription;
use polkadot_sdk::frame_support::{
  construct_runtime, derive_impl, parameter_types,
  traits::{ConstU32, ConstU64},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult, Perbill,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{
  Balance, Coins, Denom, Ledger, Moment, ProfileInspect, ReferralFee, ReferralNetwork,
  ResourceQuota, Scheduler, Status, TaskHandler, params,
};
use std::{
  cell::RefCell,
  collections::{BTreeMap, BTreeSet},
};

pub type AccountId = u64;

pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const SIGNER: AccountId = 7;
pub const FOR_SUBSCRIPTION: AccountId = 101;
pub const VPN_ACCOUNT: AccountId = 201;
pub const STORAGE_ACCOUNT: AccountId = 202;
pub const FEE_COLLECTOR: AccountId = 999;

pub const ARTR: Balance = 1_000_000;
pub const DAY: Moment = 1_000;
pub const MONTH: Moment = 30 * DAY;
pub const GB: u64 = params::GB;

/// 1990 price units at 100 000 uARTR each.
pub const PRICE: Balance = 199 * ARTR;

type Task = (Moment, Vec<u8>, Vec<u8>);

thread_local! {
  static NOW: RefCell<Moment> = const { RefCell::new(0) };
  static TASKS: RefCell<Vec<Task>> = const { RefCell::new(Vec::new()) };
  static COINS: RefCell<BTreeMap<AccountId, Coins>> = const { RefCell::new(BTreeMap::new()) };
  static ACTIVATIONS: RefCell<Vec<(AccountId, bool)>> = const { RefCell::new(Vec::new()) };
  static AUTO_PAY: RefCell<BTreeSet<AccountId>> = const { RefCell::new(BTreeSet::new()) };
  static DETACHED: RefCell<BTreeSet<AccountId>> = const { RefCell::new(BTreeSet::new()) };
  static QUOTAS: RefCell<BTreeMap<(u8, AccountId), (u64, u64)>> =
    const { RefCell::new(BTreeMap::new()) };
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Subscription: pallet_subscription,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = AccountId;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
}

pub struct MockScheduler;
impl Scheduler for MockScheduler {
  fn now() -> Moment {
    NOW.with(|n| *n.borrow())
  }

  fn one_day() -> Moment {
    DAY
  }

  fn one_month() -> Moment {
    MONTH
  }

  fn schedule(at: Moment, hook: &[u8], payload: &[u8]) -> DispatchResult {
    TASKS.with(|t| t.borrow_mut().push((at, hook.to_vec(), payload.to_vec())));
    Ok(())
  }

  fn delete(at: Moment, hook: &[u8], payload: &[u8]) {
    TASKS.with(|t| t.borrow_mut().retain(|(a, h, p)| !(*a == at && h == hook && p == payload)));
  }

  fn delete_all(at: Moment, hook: &[u8]) {
    TASKS.with(|t| t.borrow_mut().retain(|(a, h, _)| !(*a == at && h == hook)));
  }
}

/// In-memory ledger charging the 0.3 % transaction fee.
pub struct MockLedger;
impl Ledger<AccountId> for MockLedger {
  fn coins(who: &AccountId) -> Coins {
    COINS.with(|c| c.borrow().get(who).copied().unwrap_or_default())
  }

  fn transfer(from: &AccountId, to: &AccountId, amount: Balance) -> DispatchResult {
    Self::move_between(from, to, amount)
  }

  fn input_output(from: &AccountId, outputs: &[(AccountId, Balance)]) -> DispatchResult {
    let total: Balance = outputs.iter().map(|(_, x)| x).sum();
    if Self::coins(from).main < total {
      return Err(DispatchError::Other("insufficient funds"));
    }
    for (to, amount) in outputs {
      Self::move_between(from, to, *amount)?;
    }
    Ok(())
  }

  fn move_coins(_who: &AccountId, _from: Denom, _to: Denom, _amount: Balance) -> DispatchResult {
    Ok(())
  }

  fn mint(who: &AccountId, amount: Balance) -> DispatchResult {
    COINS.with(|c| c.borrow_mut().entry(*who).or_default().main += amount);
    Ok(())
  }

  fn transaction_fee(amount: Balance) -> Balance {
    Perbill::from_perthousand(3).mul_floor(amount).min(10 * ARTR)
  }

  fn pay_transaction_fee(who: &AccountId, amount: Balance) -> Result<Balance, DispatchError> {
    let fee = Self::transaction_fee(amount);
    Self::move_between(who, &FEE_COLLECTOR, fee)?;
    Ok(fee)
  }

  fn dust_delegation() -> Balance {
    0
  }
}

impl MockLedger {
  fn move_between(from: &AccountId, to: &AccountId, amount: Balance) -> DispatchResult {
    let mut source = Self::coins(from);
    source.main = source.main.checked_sub(amount).ok_or(DispatchError::Other("insufficient funds"))?;
    COINS.with(|c| {
      let mut coins = c.borrow_mut();
      coins.insert(*from, source);
      coins.entry(*to).or_default().main += amount;
    });
    Ok(())
  }
}

/// Referral stand-in: 10 % to the company, 75 % to BOB. Records activity changes.
pub struct MockReferral;
impl ReferralNetwork<AccountId> for MockReferral {
  fn exists(_who: &AccountId) -> bool {
    true
  }

  fn status(_who: &AccountId) -> Option<Status> {
    Some(Status::Lucky)
  }

  fn is_banished(_who: &AccountId) -> bool {
    false
  }

  fn append_child(_parent: &AccountId, _child: &AccountId) -> DispatchResult {
    Ok(())
  }

  fn set_active(who: &AccountId, active: bool) -> DispatchResult {
    if DETACHED.with(|d| d.borrow().contains(who)) {
      return Err(DispatchError::CannotLookup);
    }
    ACTIVATIONS.with(|a| a.borrow_mut().push((*who, active)));
    Ok(())
  }

  fn come_back(_who: &AccountId) -> DispatchResult {
    Ok(())
  }

  fn delegating_fees(_who: &AccountId) -> Result<Vec<ReferralFee<AccountId>>, DispatchError> {
    Ok(Vec::new())
  }

  fn subscription_fees(_who: &AccountId) -> Result<Vec<ReferralFee<AccountId>>, DispatchError> {
    Ok(vec![
      ReferralFee { beneficiary: FOR_SUBSCRIPTION, ratio: Perbill::from_percent(10) },
      ReferralFee { beneficiary: BOB, ratio: Perbill::from_percent(75) },
    ])
  }
}

pub struct MockProfiles;
impl ProfileInspect<AccountId> for MockProfiles {
  fn auto_pay(who: &AccountId) -> bool {
    AUTO_PAY.with(|a| a.borrow().contains(who))
  }
}

/// `(limit, current)` per account; `ID` tells the VPN and storage quotas apart.
pub struct MockQuota<const ID: u8>;
impl<const ID: u8> ResourceQuota<AccountId> for MockQuota<ID> {
  fn limit(who: &AccountId) -> u64 {
    QUOTAS.with(|q| q.borrow().get(&(ID, *who)).map_or(0, |(limit, _)| *limit))
  }

  fn current(who: &AccountId) -> u64 {
    QUOTAS.with(|q| q.borrow().get(&(ID, *who)).map_or(0, |(_, current)| *current))
  }

  fn set_limit(who: &AccountId, limit: u64) {
    QUOTAS.with(|q| q.borrow_mut().entry((ID, *who)).or_default().0 = limit);
  }

  fn add_limit(who: &AccountId, extra: u64) {
    QUOTAS.with(|q| q.borrow_mut().entry((ID, *who)).or_default().0 += extra);
  }

  fn set_current(who: &AccountId, current: u64) {
    QUOTAS.with(|q| q.borrow_mut().entry((ID, *who)).or_default().1 = current);
  }
}

pub type VpnQuota = MockQuota<0>;
pub type StorageQuota = MockQuota<1>;

parameter_types! {
  pub const VpnAccount: AccountId = VPN_ACCOUNT;
  pub const StorageAccount: AccountId = STORAGE_ACCOUNT;
}

impl pallet_subscription::Config for Test {
  type Ledger = MockLedger;
  type Scheduler = MockScheduler;
  type Referral = MockReferral;
  type Profiles = MockProfiles;
  type Vpn = VpnQuota;
  type Storage = StorageQuota;
  type VpnAccount = VpnAccount;
  type StorageAccount = StorageAccount;
  type BaseVpnGb = ConstU64<7>;
  type BaseStorageGb = ConstU64<5>;
  type DefaultSubscriptionPrice = ConstU32<1_990>;
  type DefaultTokenRate = ConstU32<100_000>;
  type DefaultVpnGbPrice = ConstU32<10>;
  type DefaultStorageGbPrice = ConstU32<10>;
  type WeightInfo = ();
}

pub fn set_now(now: Moment) {
  NOW.with(|n| *n.borrow_mut() = now);
}

pub fn tasks() -> Vec<Task> {
  TASKS.with(|t| t.borrow().clone())
}

pub fn has_task(at: Moment, hook: &[u8], who: AccountId) -> bool {
  use codec::Encode;
  tasks().iter().any(|(a, h, p)| *a == at && h == hook && *p == who.encode())
}

pub fn main_coins(who: AccountId) -> Balance {
  MockLedger::coins(&who).main
}

pub fn activations() -> Vec<(AccountId, bool)> {
  ACTIVATIONS.with(|a| a.borrow().clone())
}

/// Makes the referral stand-in refuse activity changes of `who`.
pub fn detach_from_structure(who: AccountId) {
  DETACHED.with(|d| d.borrow_mut().insert(who));
}

pub fn enable_auto_pay(who: AccountId) {
  AUTO_PAY.with(|a| a.borrow_mut().insert(who));
}

/// Moves the clock to `now` and fires every task due by then, earliest first.
pub fn advance_to(now: Moment) {
  set_now(now);
  loop {
    let next = TASKS.with(|t| {
      let mut tasks = t.borrow_mut();
      let index = tasks
        .iter()
        .enumerate()
        .filter(|(_, (at, _, _))| *at <= now)
        .min_by_key(|(i, (at, _, _))| (*at, *i))
        .map(|(i, _)| i);
      index.map(|i| tasks.remove(i))
    });
    let Some((at, hook, payload)) = next else { break };
    assert_eq!(<Subscription as TaskHandler>::handle(&hook, &payload, at), Some(Ok(())));
  }
}

#[derive(Default)]
pub struct ExtBuilder {
  coins: Vec<(AccountId, Balance)>,
  subscriptions: Vec<(AccountId, Moment)>,
}

impl ExtBuilder {
  pub fn coins(mut self, who: AccountId, main: Balance) -> Self {
    self.coins.push((who, main));
    self
  }

  pub fn subscription(mut self, who: AccountId, expire_at: Moment) -> Self {
    self.subscriptions.push((who, expire_at));
    self
  }

  pub fn build(self) -> polkadot_sdk::sp_io::TestExternalities {
    set_now(0);
    TASKS.with(|t| t.borrow_mut().clear());
    ACTIVATIONS.with(|a| a.borrow_mut().clear());
    AUTO_PAY.with(|a| a.borrow_mut().clear());
    QUOTAS.with(|q| q.borrow_mut().clear());
    COINS.with(|c| {
      *c.borrow_mut() =
        self.coins.into_iter().map(|(who, main)| (who, Coins { main, ..Default::default() })).collect()
    });

    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();
    pallet_subscription::GenesisConfig::<Test> {
      subscriptions: self.subscriptions,
      rate_signers: vec![SIGNER],
      ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext = polkadot_sdk::sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
  }
}

/// ALICE holds a thousand main coins.
pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  ExtBuilder::default().coins(ALICE, 1_000 * ARTR).build()
}
