//! # ubi-gateway
//!
//! UBI claim verification for GoodDollar (G$) on Celo.
//!
//! A wallet passes verification when it received G$ from the UBI proxy, or
//! appears in a UBI event emitted by it, within a recent block window.
//! Verdicts are cached per wallet for a few minutes so repeated logins do
//! not hit the chain again. All chain access goes through the
//! [`chain::ChainRpc`] trait.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── VerificationService (service/)
//!     │       cache → block range → log aggregation → verdict → store
//!     ├── LogAggregator, VerdictBuilder (service/)
//!     │
//!     ├── ResultCache, ContractSet, domain types (domain/)
//!     │
//!     └── ChainRpc / JsonRpcClient (chain/) ── Celo JSON-RPC
//! ```

pub mod api;
pub mod app_state;
pub mod chain;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
