//! # HTTP Surface
//!
//! JSON over HTTP for the registry RPC operations.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `/v1/transactions` | SendTransactions |
//! | GET | `/v1/transactions/:hash/status` | GetTransactionStatus |
//! | GET | `/v1/transactions/:hash/block` | GetBlock |
//! | GET | `/v1/transactions/:hash/proof` | GetMerkleProof |
//! | GET | `/v1/streams/:stream_id/transactions` | GetStreamTransactions |
//! | GET | `/v1/blocks?skip&take&include_transactions` | GetBlocks |
//! | GET | `/health` | liveness |
//! | GET | `/metrics` | Prometheus text |

pub mod dto;
mod error;
mod routes;

pub use error::ApiError;
pub use routes::router;
