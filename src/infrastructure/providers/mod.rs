//! # Provider Adapters
//!
//! Live fare sources and the resilient adapter that wraps them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            ResilientFareAdapter               │
//! │    cache → timeout → parse → fallback         │
//! └──────────────────────┬───────────────────────┘
//!                        │ FareSource
//!        ┌───────────────┼────────────────┐
//!        ▼               ▼                ▼
//! ┌────────────┐  ┌────────────┐  ┌──────────────┐
//! │UberApiSource│ │OlaApiSource│  │RapidoScraper │
//! │  (reqwest) │  │  (reqwest) │  │ (PageSession)│
//! └────────────┘  └────────────┘  └──────────────┘
//! ```

pub mod adapter;
pub mod error;
pub mod fixed;
pub mod http_client;
pub mod ola;
pub mod parse;
pub mod scrape;
pub mod traits;
pub mod uber;

pub use adapter::ResilientFareAdapter;
pub use error::{ProviderError, ProviderResult};
pub use fixed::FixedFareSource;
pub use http_client::HttpClient;
pub use ola::OlaApiSource;
pub use parse::parse_fare;
pub use scrape::{HttpPageSessionFactory, PageSession, PageSessionFactory, RapidoScraper, ScrapeConfig};
pub use traits::{FareSource, RawFare};
pub use uber::UberApiSource;
