use crate as pallet_bank;
use polkadot_sdk::frame_support::{
  construct_runtime, derive_impl, parameter_types,
  traits::{ConstU64, ConstU128},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchResult, Perbill,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{Coins, OnBalanceChanged};
use std::cell::RefCell;

pub type AccountId = u64;

pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;
pub const FEE_COLLECTOR: AccountId = 999;

pub const ARTR: u128 = 1_000_000;

thread_local! {
  pub static CHANGES: RefCell<Vec<(AccountId, Coins)>> = const { RefCell::new(Vec::new()) };
}

pub fn changes() -> Vec<(AccountId, Coins)> {
  CHANGES.with(|c| c.borrow().clone())
}

pub fn clear_changes() {
  CHANGES.with(|c| c.borrow_mut().clear());
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Bank: pallet_bank,
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

pub struct RecordChanges;
impl OnBalanceChanged<AccountId> for RecordChanges {
  fn on_balance_changed(who: &AccountId, coins: &Coins) -> DispatchResult {
    CHANGES.with(|c| c.borrow_mut().push((*who, *coins)));
    Ok(())
  }
}

parameter_types! {
  pub const TransactionFeeRatio: Perbill = Perbill::from_perthousand(3);
}

impl pallet_bank::Config for Test {
  type OnBalanceChanged = RecordChanges;
  type FeeCollector = ConstU64<FEE_COLLECTOR>;
  type DefaultMinSend = ConstU128<1_000>;
  type DefaultDustDelegation = ConstU128<0>;
  type DefaultTransactionFee = TransactionFeeRatio;
  type DefaultMaxTransactionFee = ConstU128<{ 10 * ARTR }>;
  type WeightInfo = ();
}

pub fn main_coins(main: u128) -> Coins {
  Coins { main, ..Default::default() }
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = polkadot_sdk::frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  pallet_bank::GenesisConfig::<Test> {
    accounts: vec![
      (ALICE, main_coins(1_000_000 * ARTR)),
      (BOB, Coins { main: 100 * ARTR, delegated: 50 * ARTR, revoking: 0 }),
    ],
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext = polkadot_sdk::sp_io::TestExternalities::new(t);
  ext.execute_with(|| {
    clear_changes();
    System::set_block_number(1);
  });
  ext
}
