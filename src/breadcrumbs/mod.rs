//! Breadcrumb records and the shared store they are appended to.
//!
//! ## Contents
//! - [`Breadcrumb`], [`Category`], [`Level`] the record data model
//! - [`BreadcrumbStore`] ordered, optionally bounded append log
//!
//! Records are built by the normalizers, stamped (`seq`, `at`) by the store at
//! append time and never mutated afterward.

mod level;
mod record;
mod store;

pub use level::{Level, ParseLevelError};
pub use record::{Breadcrumb, Category};
pub use store::BreadcrumbStore;
