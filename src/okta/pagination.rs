//! Link-header pagination
//!
//! Okta list endpoints return one page per response and advertise the next
//! page as `Link: <https://...&after=cursor>; rel="next"`. A list is read by
//! following that cursor until a response carries no `next` link.

use super::client::OktaClient;
use crate::error::Result;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

/// Extract the `rel="next"` target from one `Link` header value
///
/// A single header may carry several comma-separated links.
pub fn next_page_link(header: &str) -> Option<Url> {
    header.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let is_next = segments.any(|param| {
            let param = param.trim();
            param
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"') == "next")
                .unwrap_or(false)
        });
        if !is_next {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}

/// Lazily fetch pages starting at `first`, one stream item per page
///
/// The stream ends after the first error.
pub fn pages<'a, T>(
    client: &'a OktaClient,
    first: Url,
) -> impl Stream<Item = Result<Vec<T>>> + 'a
where
    T: DeserializeOwned + 'a,
{
    stream::try_unfold(Some(first), move |cursor| fetch_page(client, cursor))
}

async fn fetch_page<T: DeserializeOwned>(
    client: &OktaClient,
    cursor: Option<Url>,
) -> Result<Option<(Vec<T>, Option<Url>)>> {
    let Some(url) = cursor else {
        return Ok(None);
    };

    let response = client.http.execute(Method::GET, url, None).await?;
    let items: Option<Vec<T>> = response.json()?;
    let items = items.unwrap_or_default();
    tracing::debug!(
        "fetched page with {} items, more pages: {}",
        items.len(),
        response.has_next_page()
    );

    Ok(Some((items, response.next_page)))
}

/// Fetch every page and concatenate the results in server order
///
/// Fails fast: an error on any page discards everything collected so far.
pub async fn collect_all<'a, T>(client: &'a OktaClient, first: Url) -> Result<Vec<T>>
where
    T: DeserializeOwned + 'a,
{
    pages(client, first).try_concat().await
}
