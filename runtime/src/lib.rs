//! The Artery runtime.
//!
//! Composes the keepers of the Artery network with `frame_system` and `pallet_timestamp`. Block
//! production is driven by the FRAME `Executive`: every block sets the time, applies its
//! transactions and, when finalized, fires the scheduled tasks that have come due.

#![cfg_attr(not(feature = "std"), no_std)]
#![recursion_limit = "256"]

extern crate alloc;

use polkadot_sdk::{sp_runtime::traits::BlakeTwo256, *};
use sp_runtime::generic;

mod apis;
mod chain_specs;
pub mod configs;

#[cfg(any(test, feature = "std"))]
mod tests;

pub use primitives::{Balance, Moment};

/// Runtime version
#[sp_version::runtime_version]
pub const VERSION: sp_version::RuntimeVersion = sp_version::RuntimeVersion {
  spec_name: alloc::borrow::Cow::Borrowed("artery-runtime"),
  impl_name: alloc::borrow::Cow::Borrowed("artery-runtime"),
  apis: apis::RUNTIME_API_VERSIONS,
  authoring_version: 1,
  impl_version: 1,
  system_version: 1,
  spec_version: 100,
  transaction_version: 100,
};

/// The version information used to identify this runtime when compiled natively.
#[cfg(feature = "std")]
pub fn native_version() -> sp_version::NativeVersion {
  sp_version::NativeVersion {
    runtime_version: VERSION,
    can_author_with: Default::default(),
  }
}

// Type aliases
pub type AccountId = sp_runtime::AccountId32;
pub type BlockNumber = u32;
pub type Hash = sp_core::H256;
pub type Nonce = u32;
pub type Header = generic::Header<BlockNumber, BlakeTwo256>;
pub type Block = generic::Block<Header, UncheckedExtrinsic>;
pub type SignedBlock = generic::SignedBlock<Block>;
pub type BlockId = generic::BlockId<Block>;
pub type Address = sp_runtime::MultiAddress<AccountId, ()>;
pub type Signature = sp_runtime::MultiSignature;

/// The extension to the basic transaction logic.
///
/// Fees are not charged here: every keeper withholds its own transaction fee from the amount it
/// moves, through the bank.
pub type TxExtension = (
  frame_system::CheckNonZeroSender<Runtime>,
  frame_system::CheckSpecVersion<Runtime>,
  frame_system::CheckTxVersion<Runtime>,
  frame_system::CheckGenesis<Runtime>,
  frame_system::CheckEra<Runtime>,
  frame_system::CheckNonce<Runtime>,
  frame_system::CheckWeight<Runtime>,
);

/// Unchecked extrinsic type as expected by this runtime.
pub type UncheckedExtrinsic =
  generic::UncheckedExtrinsic<Address, RuntimeCall, Signature, TxExtension>;

/// Opaque types for CLI machinery that doesn't need runtime specifics.
pub mod opaque {
  use super::*;
  pub use sp_runtime::OpaqueExtrinsic as UncheckedExtrinsic;
  use sp_runtime::{
    generic,
    traits::{BlakeTwo256, Hash as HashT},
  };

  pub type Header = generic::Header<BlockNumber, BlakeTwo256>;
  pub type Block = generic::Block<Header, UncheckedExtrinsic>;
  pub type BlockId = generic::BlockId<Block>;
  pub type Hash = <BlakeTwo256 as HashT>::Output;
}

#[frame_support::runtime]
mod runtime {
  #[runtime::runtime]
  #[runtime::derive(
    RuntimeCall,
    RuntimeEvent,
    RuntimeError,
    RuntimeOrigin,
    RuntimeFreezeReason,
    RuntimeHoldReason,
    RuntimeSlashReason,
    RuntimeLockId,
    RuntimeTask,
    RuntimeViewFunction
  )]
  pub struct Runtime;

  #[runtime::pallet_index(0)]
  pub type System = frame_system;
  #[runtime::pallet_index(1)]
  pub type Timestamp = pallet_timestamp;

  // Bank precedes Referral: the referral genesis reads the genesis coins.
  #[runtime::pallet_index(10)]
  pub type Bank = pallet_bank;
  #[runtime::pallet_index(11)]
  pub type Referral = pallet_referral;
  #[runtime::pallet_index(12)]
  pub type Profile = pallet_profile;
  #[runtime::pallet_index(13)]
  pub type Delegating = pallet_delegating;

  // Paid services.
  #[runtime::pallet_index(20)]
  pub type Vpn = pallet_vpn;
  #[runtime::pallet_index(21)]
  pub type Storage = pallet_storage;
  #[runtime::pallet_index(22)]
  pub type Subscription = pallet_subscription;

  // Governance.
  #[runtime::pallet_index(30)]
  pub type Voting = pallet_voting;

  // Last, so due tasks fire after every other keeper has finalized the block.
  #[runtime::pallet_index(40)]
  pub type Schedule = pallet_schedule;
}

pub type Executive = frame_executive::Executive<
  Runtime,
  Block,
  frame_system::ChainContext<Runtime>,
  Runtime,
  AllPalletsWithSystem,
>;
