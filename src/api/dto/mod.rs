//! Data Transfer Objects for REST request/response serialization.
//!
//! Token amounts are serialized as strings to prevent precision loss on
//! 256-bit values.

pub mod common_dto;
pub mod contract_dto;
pub mod verification_dto;
pub mod wallet_dto;

pub use common_dto::*;
pub use contract_dto::*;
pub use verification_dto::*;
pub use wallet_dto::*;
