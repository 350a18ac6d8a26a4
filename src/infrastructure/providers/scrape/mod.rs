//! # Page Scraping
//!
//! The scraping live source and the page session it drives.

pub mod rapido;
pub mod session;

pub use rapido::{RapidoScraper, ScrapeConfig, ScrapeSelectors};
pub use session::{HttpPageSession, HttpPageSessionFactory, PageSession, PageSessionFactory};
