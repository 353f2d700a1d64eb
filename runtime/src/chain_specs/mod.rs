//! Genesis presets of the Artery network.
//!
//! Every preset describes a referral structure rooted in one account, the coins the accounts start
//! with, the government and the signer lists. The root also creates accounts for free and signs
//! token rates and usage counters until the government appoints somebody else.

use crate::{
  AccountId, BankConfig, DelegatingConfig, ProfileConfig, ReferralConfig, RuntimeGenesisConfig,
  StorageConfig, SubscriptionConfig, VotingConfig, VpnConfig,
};
use alloc::{vec, vec::Vec};
use frame_support::build_struct_json_patch;
use pallet_profile::Profile;
use polkadot_sdk::*;
use primitives::{ARTR, Balance, Coins, Status};
use serde_json::Value;
use sp_genesis_builder::PresetId;
use sp_keyring::Sr25519Keyring;

/// Genesis description of an Artery chain
pub struct ChainSpecBuilder {
  /// Top of the referral structure
  pub root_account: AccountId,
  /// Governors voting on proposals
  pub government: Vec<AccountId>,
  /// Accounts placed directly under the root, with their nicknames
  pub endowed_accounts: Vec<(AccountId, &'static str)>,
  /// Economic parameters
  pub economic_params: EconomicParams,
}

/// Coins handed out at genesis
#[derive(Debug, Clone)]
pub struct EconomicParams {
  /// Spendable coins of every endowed account and the root
  pub initial_endowment: Balance,
  /// Coins every endowed account starts with in delegation
  pub initial_delegation: Balance,
  /// Status the root starts with
  pub root_status: Status,
}

impl Default for EconomicParams {
  fn default() -> Self {
    Self { initial_endowment: 1_000_000 * ARTR, initial_delegation: 0, root_status: Status::Lucky }
  }
}

impl ChainSpecBuilder {
  pub fn new(root_account: AccountId) -> Self {
    Self {
      government: vec![root_account.clone()],
      root_account,
      endowed_accounts: Vec::new(),
      economic_params: EconomicParams::default(),
    }
  }

  pub fn with_government(mut self, government: Vec<AccountId>) -> Self {
    self.government = government;
    self
  }

  pub fn with_endowed_accounts(mut self, accounts: Vec<(AccountId, &'static str)>) -> Self {
    self.endowed_accounts = accounts;
    self
  }

  pub fn with_economic_params(mut self, params: EconomicParams) -> Self {
    self.economic_params = params;
    self
  }

  /// Build the genesis configuration as JSON patch
  pub fn build_genesis_patch(&self) -> Value {
    let params = &self.economic_params;
    let root = self.root_account.clone();
    let endowed = || self.endowed_accounts.iter().filter(|(who, _)| *who != root);

    let mut accounts =
      vec![(root.clone(), Coins { main: params.initial_endowment, ..Default::default() })];
    accounts.extend(endowed().map(|(who, _)| {
      let coins = Coins {
        main: params.initial_endowment,
        delegated: params.initial_delegation,
        ..Default::default()
      };
      (who.clone(), coins)
    }));

    let mut tree = vec![(root.clone(), None, params.root_status, true)];
    tree.extend(endowed().map(|(who, _)| (who.clone(), Some(root.clone()), Status::Lucky, true)));

    let delegators = if params.initial_delegation > 0 {
      endowed().map(|(who, _)| who.clone()).collect::<Vec<_>>()
    } else {
      Vec::new()
    };

    let profiles = self
      .endowed_accounts
      .iter()
      .map(|(who, nickname)| {
        (who.clone(), Profile { nickname: nickname.as_bytes().to_vec(), ..Default::default() })
      })
      .collect::<Vec<_>>();

    build_struct_json_patch!(RuntimeGenesisConfig {
      bank: BankConfig { accounts },
      referral: ReferralConfig { accounts: tree },
      profile: ProfileConfig { profiles, free_creators: vec![root.clone()] },
      delegating: DelegatingConfig { delegators },
      vpn: VpnConfig { signers: vec![root.clone()] },
      storage: StorageConfig { signers: vec![root.clone()] },
      subscription: SubscriptionConfig { rate_signers: vec![root.clone()] },
      voting: VotingConfig { government: self.government.clone() },
    })
  }

  /// Build and serialize the genesis configuration
  pub fn build(&self) -> Vec<u8> {
    let patch = self.build_genesis_patch();
    serde_json::to_string(&patch)
      .expect("JSON serialization should never fail")
      .into_bytes()
  }
}

fn keyring_accounts(keys: &[(Sr25519Keyring, &'static str)]) -> Vec<(AccountId, &'static str)> {
  keys.iter().map(|(key, nickname)| (key.to_account_id(), *nickname)).collect()
}

/// Development configuration: Alice roots the structure and governs alone.
pub fn development_config() -> ChainSpecBuilder {
  let endowed = keyring_accounts(&[
    (Sr25519Keyring::Alice, "alice"),
    (Sr25519Keyring::Bob, "bob"),
    (Sr25519Keyring::Charlie, "charlie"),
    (Sr25519Keyring::Dave, "dave"),
    (Sr25519Keyring::Eve, "eve"),
    (Sr25519Keyring::Ferdie, "ferdie"),
  ]);

  ChainSpecBuilder::new(Sr25519Keyring::Alice.to_account_id()).with_endowed_accounts(endowed)
}

/// Testnet configuration: three governors and delegations already accruing.
pub fn testnet_config() -> ChainSpecBuilder {
  let endowed = keyring_accounts(&[
    (Sr25519Keyring::Bob, "bob"),
    (Sr25519Keyring::Charlie, "charlie"),
    (Sr25519Keyring::Dave, "dave"),
    (Sr25519Keyring::Eve, "eve"),
  ]);
  let government = vec![
    Sr25519Keyring::Alice.to_account_id(),
    Sr25519Keyring::Bob.to_account_id(),
    Sr25519Keyring::Charlie.to_account_id(),
  ];
  let economic_params = EconomicParams {
    initial_endowment: 10_000 * ARTR,
    initial_delegation: 1_000 * ARTR,
    root_status: Status::Leader,
  };

  ChainSpecBuilder::new(Sr25519Keyring::Alice.to_account_id())
    .with_government(government)
    .with_endowed_accounts(endowed)
    .with_economic_params(economic_params)
}

/// Provides the JSON representation of predefined genesis config for given preset ID
pub fn get_preset(id: &PresetId) -> Option<Vec<u8>> {
  let builder = match id.as_ref() {
    sp_genesis_builder::DEV_RUNTIME_PRESET => development_config(),
    sp_genesis_builder::LOCAL_TESTNET_RUNTIME_PRESET => testnet_config(),
    _ => return None,
  };

  Some(builder.build())
}

/// List of supported preset names
pub fn preset_names() -> Vec<PresetId> {
  vec![
    PresetId::from(sp_genesis_builder::DEV_RUNTIME_PRESET),
    PresetId::from(sp_genesis_builder::LOCAL_TESTNET_RUNTIME_PRESET),
  ]
}
