//! Application provides a command line interface to the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod args;
pub mod config;
mod context;
pub mod data;
pub mod error;

use common::Page;
use serde::Serialize;
use service::domain::User;
// Used in binary.
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::{Context, EditState, Notice, NoticeLevel},
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Memory>;

/// Page of [`User`]s as printed by the command line interface.
#[derive(Clone, Debug, Serialize)]
pub struct Listing {
    /// [`User`]s on the listed page.
    pub items: Vec<User>,

    /// Number of [`User`]s matched by the search.
    pub total_count: usize,

    /// Zero-based index of the listed page.
    pub page: usize,

    /// Number of pages the matched [`User`]s span.
    pub page_count: usize,
}

impl From<Page<User>> for Listing {
    fn from(page: Page<User>) -> Self {
        let page_count = page.page_count();
        let Page {
            items,
            total_count,
            arguments,
        } = page;
        Self {
            items,
            total_count,
            page: arguments.index(),
            page_count,
        }
    }
}
