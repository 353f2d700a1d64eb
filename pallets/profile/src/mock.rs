use crate as pallet_profile;
use polkadot_sdk::frame_support::{
  construct_runtime, derive_impl, parameter_types,
  traits::{ConstU32, ConstU128},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{Balance, Coins, Denom, Ledger, ReferralFee, ReferralNetwork, Status};
use std::{cell::RefCell, collections::BTreeMap};

pub type AccountId = u64;

pub const ROOT: AccountId = 1;
pub const ALICE: AccountId = 2;
pub const BOB: AccountId = 3;
pub const CHARLIE: AccountId = 4;
pub const CREATOR: AccountId = 9;
pub const FEE_COLLECTOR: AccountId = 999;

pub const ARTR: Balance = 1_000_000;
pub const CREATION_FEE: Balance = 99_000;

thread_local! {
  static COINS: RefCell<BTreeMap<AccountId, Balance>> = const { RefCell::new(BTreeMap::new()) };
  /// child -> parent
  static TREE: RefCell<BTreeMap<AccountId, AccountId>> = const { RefCell::new(BTreeMap::new()) };
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Profile: pallet_profile,
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

/// Main coins only.
pub struct MockLedger;
impl Ledger<AccountId> for MockLedger {
  fn coins(who: &AccountId) -> Coins {
    Coins { main: COINS.with(|c| c.borrow().get(who).copied().unwrap_or_default()), ..Default::default() }
  }

  fn transfer(from: &AccountId, to: &AccountId, amount: Balance) -> DispatchResult {
    let left = Self::coins(from).main.checked_sub(amount).ok_or(DispatchError::Other("insufficient funds"))?;
    COINS.with(|c| {
      let mut coins = c.borrow_mut();
      coins.insert(*from, left);
      *coins.entry(*to).or_default() += amount;
    });
    Ok(())
  }

  fn input_output(from: &AccountId, outputs: &[(AccountId, Balance)]) -> DispatchResult {
    for (to, amount) in outputs {
      Self::transfer(from, to, *amount)?;
    }
    Ok(())
  }

  fn move_coins(_who: &AccountId, _from: Denom, _to: Denom, _amount: Balance) -> DispatchResult {
    Ok(())
  }

  fn mint(who: &AccountId, amount: Balance) -> DispatchResult {
    COINS.with(|c| *c.borrow_mut().entry(*who).or_default() += amount);
    Ok(())
  }

  fn transaction_fee(_amount: Balance) -> Balance {
    0
  }

  fn pay_transaction_fee(_who: &AccountId, _amount: Balance) -> Result<Balance, DispatchError> {
    Ok(0)
  }

  fn dust_delegation() -> Balance {
    0
  }
}

/// Parent links only; ROOT is the sole account at start.
pub struct MockReferral;
impl ReferralNetwork<AccountId> for MockReferral {
  fn exists(who: &AccountId) -> bool {
    *who == ROOT || TREE.with(|t| t.borrow().contains_key(who))
  }

  fn status(who: &AccountId) -> Option<Status> {
    Self::exists(who).then_some(Status::Lucky)
  }

  fn is_banished(_who: &AccountId) -> bool {
    false
  }

  fn append_child(parent: &AccountId, child: &AccountId) -> DispatchResult {
    if !Self::exists(parent) {
      return Err(DispatchError::Other("parent not found"));
    }
    TREE.with(|t| t.borrow_mut().insert(*child, *parent));
    Ok(())
  }

  fn set_active(_who: &AccountId, _active: bool) -> DispatchResult {
    Ok(())
  }

  fn come_back(_who: &AccountId) -> DispatchResult {
    Ok(())
  }

  fn delegating_fees(_who: &AccountId) -> Result<Vec<ReferralFee<AccountId>>, DispatchError> {
    Ok(Vec::new())
  }

  fn subscription_fees(_who: &AccountId) -> Result<Vec<ReferralFee<AccountId>>, DispatchError> {
    Ok(Vec::new())
  }
}

parameter_types! {
  pub const FeeCollector: AccountId = FEE_COLLECTOR;
}

impl pallet_profile::Config for Test {
  type Ledger = MockLedger;
  type Referral = MockReferral;
  type FeeCollector = FeeCollector;
  type AccountCreationFee = ConstU128<CREATION_FEE>;
  type MaxNicknameLength = ConstU32<32>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = ProfileBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct ProfileBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl pallet_profile::BenchmarkHelper<AccountId> for ProfileBenchmarkHelper {
  fn referrer() -> AccountId {
    ROOT
  }
}

pub fn main_coins(who: AccountId) -> Balance {
  MockLedger::coins(&who).main
}

pub fn parent_of(who: AccountId) -> Option<AccountId> {
  TREE.with(|t| t.borrow().get(&who).copied())
}

pub fn nicknamed(nickname: &[u8]) -> crate::Profile {
  crate::Profile { nickname: nickname.to_vec(), ..Default::default() }
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  COINS.with(|c| {
    *c.borrow_mut() = [(ROOT, 10 * ARTR), (ALICE, 10 * ARTR), (CREATOR, 0)].into_iter().collect()
  });
  TREE.with(|t| t.borrow_mut().clear());

  let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();
  pallet_profile::GenesisConfig::<Test> {
    profiles: vec![(ROOT, nicknamed(b"root"))],
    free_creators: vec![CREATOR],
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext = polkadot_sdk::sp_io::TestExternalities::new(t);
  ext.execute_with(|| System::set_block_number(1));
  ext
}
