use futures::Stream;
use serde::Deserialize;

use crate::client::{Client, DataResponse, Meta};
use crate::error::Result;
use crate::query::Params;
use crate::utils;
use crate::wallpaper::Wallpaper;

/// Description of a collection, as returned by the collections endpoint.
///
/// Note: this describes the collection itself, not the wallpapers in it;
/// those are listed through [`Client::collection`] or
/// [`Client::collection_page`].
#[derive(Debug, PartialEq, Eq, Deserialize, Clone)]
#[non_exhaustive]
pub struct Collection {
    pub id: u64,
    pub label: String,
    pub views: u64,
    // the API serves this as 0 or 1
    #[serde(deserialize_with = "utils::bool_from_int")]
    pub public: bool,
    pub count: u64,
}

impl Client {
    /// Returns the collections of the account the API key belongs to,
    /// including private ones.
    ///
    /// Fails with [`Error::MissingApiKey`][crate::error::Error::MissingApiKey]
    /// before any request is made if the client has no key.
    ///
    /// _Note: This function performs a request; it may sleep until the API
    /// rate limit allows another call._
    pub async fn get_collections(&self) -> Result<Vec<Collection>> {
        self.require_api_key()?;
        self.get_collection_list("/collections").await
    }

    /// Returns the public collections of the given user.
    ///
    /// _Note: This function performs a request; it may sleep until the API
    /// rate limit allows another call._
    pub async fn get_user_collections(&self, username: &str) -> Result<Vec<Collection>> {
        self.get_collection_list(&format!("/collections/{}", username))
            .await
    }

    async fn get_collection_list(&self, endpoint: &str) -> Result<Vec<Collection>> {
        let body = self.get_json_endpoint(endpoint).await?;
        let DataResponse { data } = serde_json::from_value(body)?;
        Ok(data)
    }

    /// Fetches one page of the wallpapers in a collection, with the page
    /// number under the caller's control (`params.set("page", n)`, first
    /// page when absent). Only the `purity` and `page` parameters apply
    /// here.
    ///
    /// _Note: This function performs a request; it may sleep until the API
    /// rate limit allows another call._
    pub async fn collection_page(
        &self,
        username: &str,
        id: u64,
        params: &Params,
    ) -> Result<(Vec<Wallpaper>, Meta)> {
        self.get_listing(&format!("/collections/{}/{}", username, id), params)
            .await
    }

    /// Returns a stream over every page of the wallpapers in a collection,
    /// as `(wallpapers, meta)` pairs.
    ///
    /// Pages are fetched on demand, one request per page, until the last
    /// page reported by the API. The stream owns the page cursor, so
    /// `params` must not carry a `page` key; parameters are validated here,
    /// before anything is sent.
    ///
    /// ```no_run
    /// # use wallhaven::client::Client;
    /// # use wallhaven::query::Params;
    /// use futures::prelude::*;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> wallhaven::error::Result<()> {
    /// let client = Client::new()?;
    /// let pages = client.collection("some_user", 1, Params::new())?;
    /// futures::pin_mut!(pages);
    ///
    /// while let Some(page) = pages.next().await {
    ///     let (wallpapers, _meta) = page?;
    ///     println!("{} wallpapers", wallpapers.len());
    /// }
    /// # Ok(()) }
    /// ```
    ///
    /// _Note: Every yielded page is a request; each may sleep until the API
    /// rate limit allows another call._
    pub fn collection(
        &self,
        username: &str,
        id: u64,
        params: Params,
    ) -> Result<impl Stream<Item = Result<(Vec<Wallpaper>, Meta)>> + '_> {
        self.page_stream(format!("/collections/{}/{}", username, id), params)
    }
}
