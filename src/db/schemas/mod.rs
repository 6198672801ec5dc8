//! Document schemas
//!
//! Defines the MongoDB document structures for contacts, income entries,
//! info notes, and the externally owned users collection.

mod contact;
mod income;
mod info;
mod stamps;
mod user;

pub use contact::{ContactDoc, CONTACT_COLLECTION};
pub use income::{IncomeDoc, INCOME_COLLECTION};
pub use info::{InfoDoc, INFO_COLLECTION};
pub use stamps::Stamps;
pub use user::{UserDoc, USER_COLLECTION};
