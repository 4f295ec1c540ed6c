//! Ledger entries consumed from ingestion: standing offers and liquidity pools

pub mod offer;
pub mod pool;
