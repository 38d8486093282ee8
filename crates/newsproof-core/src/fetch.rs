//! The `ArticleFetcher` trait.

use std::future::Future;

use url::Url;

use crate::article::Article;

/// Retrieves a page and parses it into an [`Article`].
///
/// Implementations perform one outbound retrieval per call and never retry.
/// Network errors, non-HTML responses and parse failures all surface as
/// `Self::Error`.
pub trait ArticleFetcher: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch<'a>(
    &'a self,
    url: &'a Url,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + 'a;
}
