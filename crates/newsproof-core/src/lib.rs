//! Core types and trait definitions for newsproof.
//!
//! No HTTP, database or model-format dependencies live here. Fetching,
//! classification and storage are expressed as traits
//! ([`fetch::ArticleFetcher`], [`classify::Classifier`],
//! [`store::HistoryStore`]) and wired together by [`pipeline::Pipeline`].

// Native `async fn` in trait impls; the traits spell out their `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod article;
pub mod classify;
pub mod error;
pub mod fetch;
pub mod history;
pub mod pipeline;
pub mod store;
pub mod verdict;

pub use error::{Error, Result};
