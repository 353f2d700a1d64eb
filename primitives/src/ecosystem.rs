//! Ecosystem Constants for the Artery Network
//!
//! This module centralizes the system-level constants: time units, the main denomination,
//! reserved module account identifiers and the default value of every parameter that
//! governance can later change.
//!
//! These constants are the single source of truth for the runtime configuration and for the
//! pallet test mocks.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Block timestamp in milliseconds since the Unix epoch.
pub type Moment = u64;

/// Smallest unit of the main denomination.
pub const UARTR: Balance = 1;

/// One ARTR (six decimals).
pub const ARTR: Balance = 1_000_000;

/// Time units.
///
/// A block is produced every 30 seconds; a day is 2880 blocks and a month is thirty days.
pub mod time {
  use super::Moment;

  /// Target block time in milliseconds.
  pub const BLOCK_TIME: Moment = 30_000;

  /// Blocks produced per day.
  pub const BLOCKS_PER_DAY: u32 = 2_880;

  /// Blocks produced per week.
  pub const BLOCKS_PER_WEEK: u32 = BLOCKS_PER_DAY * 7;

  /// One day in milliseconds.
  pub const DAY: Moment = BLOCK_TIME * BLOCKS_PER_DAY as Moment;

  /// One week in milliseconds.
  pub const WEEK: Moment = DAY * 7;

  /// One month (thirty days) in milliseconds.
  pub const MONTH: Moment = DAY * 30;
}

/// Pallet identifiers for deriving module-owned accounts.
///
/// These IDs are used by `PalletId::into_account_truncating()` to derive the reserved sink
/// accounts. Module accounts cannot sign, so user funds sent to them are only moved by the
/// owning module.
pub mod pallet_ids {
  /// Fee collector: transaction fees, transition and account creation fees
  pub const FEE_COLLECTOR_ID: &[u8; 8] = b"artr/fee";

  /// Top referrer: receives every undistributed referral share
  pub const TOP_REFERRER_ID: &[u8; 8] = b"artr/top";

  /// Company share of subscription payments
  pub const FOR_SUBSCRIPTION_ID: &[u8; 8] = b"artr/sub";

  /// Company share of delegation payments
  pub const FOR_DELEGATING_ID: &[u8; 8] = b"artr/dlg";

  /// Promo bonus fund
  pub const PROMO_BONUSES_ID: &[u8; 8] = b"artr/prm";

  /// Status bonus fund, paid out weekly to Businessman and above
  pub const STATUS_BONUSES_ID: &[u8; 8] = b"artr/sts";

  /// Leader bonus fund
  pub const LEADER_BONUSES_ID: &[u8; 8] = b"artr/ldr";

  /// VPN service revenue
  pub const VPN_PALLET_ID: &[u8; 8] = b"artr/vpn";

  /// Storage service revenue
  pub const STORAGE_PALLET_ID: &[u8; 8] = b"artr/sto";
}

/// Default values of the governance-tunable parameters.
pub mod params {
  use super::{ARTR, Balance, Moment, time};
  use sp_arithmetic::Perbill;

  /// Share of every fee-bearing amount taken as the transaction fee (0.3%).
  pub const TRANSACTION_FEE: Perbill = Perbill::from_perthousand(3);

  /// Upper bound of a single transaction fee (10 ARTR).
  pub const MAX_TRANSACTION_FEE: Balance = 10 * ARTR;

  /// Smallest amount accepted by `send`.
  pub const MIN_SEND: Balance = 1_000;

  /// Delegations at or below this value accrue nothing and are not scheduled.
  pub const DUST_DELEGATION: Balance = 0;

  /// Smallest amount accepted by `delegate`.
  pub const MIN_DELEGATE: Balance = ARTR;

  /// Days between a revoke and the release of the coins.
  pub const REVOKE_PERIOD_DAYS: u32 = 14;

  /// Revokes at or above this amount (100 000 ARTR) are announced with `MassiveRevoke`.
  pub const MASSIVE_REVOKE: Balance = 100_000 * ARTR;

  /// Monthly accrual percentage below 1 000 ARTR delegated.
  pub const ACCRUE_MINIMAL_PERCENT: u32 = 21;

  /// Monthly accrual percentage from 1 000 ARTR.
  pub const ACCRUE_THOUSAND_PLUS_PERCENT: u32 = 24;

  /// Monthly accrual percentage from 10 000 ARTR.
  pub const ACCRUE_TEN_K_PLUS_PERCENT: u32 = 27;

  /// Monthly accrual percentage from 100 000 ARTR.
  pub const ACCRUE_HUNDRED_K_PLUS_PERCENT: u32 = 30;

  /// Extra accrual rate for accounts that are active validators.
  pub const VALIDATOR_BONUS: Perbill = Perbill::from_percent(10);

  /// Cost of moving a subtree to another referrer (1 ARTR).
  pub const TRANSITION_PRICE: Balance = ARTR;

  /// Cost of registering a new account for non-free creators (1 ARTR).
  pub const ACCOUNT_CREATION_FEE: Balance = ARTR;

  /// Subscription price in internal price units.
  pub const SUBSCRIPTION_PRICE: u32 = 1_990;

  /// Token rate: uARTR per price unit.
  pub const TOKEN_RATE: u32 = 100_000;

  /// Price of one extra VPN gigabyte, in price units.
  pub const VPN_GB_PRICE: u32 = 10;

  /// Price of one extra storage gigabyte per month, in price units.
  pub const STORAGE_GB_PRICE: u32 = 10;

  /// VPN traffic included in the subscription, in gigabytes.
  pub const BASE_VPN_GB: u64 = 7;

  /// Storage included in the subscription, in gigabytes.
  pub const BASE_STORAGE_GB: u64 = 5;

  /// Bytes per gigabyte.
  pub const GB: u64 = 1024 * 1024 * 1024;

  /// Largest storage directory blob (10 KiB).
  pub const MAX_STORAGE_DATA: u32 = 10 * 1024;

  /// Duration of a proposal.
  pub const VOTING_PERIOD: Moment = time::DAY;

  /// Duration of a poll.
  pub const POLL_PERIOD: Moment = time::DAY;
}
