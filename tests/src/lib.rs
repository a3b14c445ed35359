//! # Registry Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (ring lookup, Merkle root)
//! └── src/
//!     └── integration/  # Whole-instance flows over shared backends
//!         ├── lifecycle.rs   # Unknown → Pending → Committed → Finalized
//!         ├── rejection.rs   # Failed transactions, per-stream ordering
//!         └── rescale.rs     # Topology change, queue cleanup
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rg-tests
//! cargo test -p rg-tests integration::rescale
//! cargo bench -p rg-tests
//! ```

pub mod integration;
