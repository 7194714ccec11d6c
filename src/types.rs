//! Unsigned integer type alias for token counts and event counts.
//!
//! This module defines `Uint` as the integer type used for bucket capacities,
//! accrued tokens and recorded event counts. The actual type is determined at
//! compile time via feature flags.
//!
//! # Features
//! - `count_u64` (default): uses [`u64`] as `Uint`
//! - `count_u128`: uses [`u128`] as `Uint`
//!   (Both features cannot be enabled at the same time.)
//! - If neither feature is enabled, `u64` is used as the default type.

#[cfg(all(feature = "count_u64", feature = "count_u128"))]
compile_error!("You cannot enable both `count_u64` and `count_u128` features at the same time");

/// Alias for the unsigned integer type used for tokens and event counts.
///
/// The type is selected at compile time using feature flags:
/// - **`count_u64`** (default): uses [`u64`]
/// - **`count_u128`**: uses [`u128`]
///
/// > **Note:** Enabling both `count_u64` and `count_u128` at the same time
///   will result in a compile error. If neither is enabled, [`u64`] is used.
#[cfg(all(feature = "count_u64", not(feature = "count_u128")))]
pub type Uint = u64;

/// Alias for the unsigned integer type used for tokens and event counts (`count_u128`).
#[cfg(all(feature = "count_u128", not(feature = "count_u64")))]
pub type Uint = u128;

/// Alias for the unsigned integer type used for tokens and event counts.
#[cfg(not(any(feature = "count_u64", feature = "count_u128")))]
pub type Uint = u64;
