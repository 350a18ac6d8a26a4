//! # In-Memory Repositories
//!
//! - [`InMemoryBookingRepository`]: booking persistence
//!
//! ## Thread Safety
//!
//! Storage sits behind `Arc<RwLock<..>>`, so clones share one store.

pub mod booking_repository;

pub use booking_repository::InMemoryBookingRepository;
