use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::Stream;
use serde::Deserialize;

use crate::client::{Client, DataResponse, Meta};
use crate::error::Result;
use crate::query::Params;
use crate::tag::Tag;
use crate::utils;

/// Content rating of a wallpaper or tag.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purity {
    Sfw,
    Sketchy,
    Nsfw,
}

/// Category of a wallpaper.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Anime,
    People,
}

/// Thumbnail URLs of a wallpaper.
#[derive(Debug, PartialEq, Eq, Deserialize, Clone)]
pub struct Thumbs {
    pub large: String,
    pub original: String,
    pub small: String,
}

/// The user who uploaded a wallpaper.
#[derive(Debug, PartialEq, Eq, Deserialize, Clone)]
pub struct Uploader {
    pub username: String,
    pub group: String,
    /// Avatar URLs keyed by size (`"200px"`, `"128px"`, ...).
    pub avatar: HashMap<String, String>,
}

/// Structure representing a wallpaper.
#[derive(Debug, PartialEq, Deserialize, Clone)]
#[non_exhaustive]
pub struct Wallpaper {
    pub id: String,
    pub url: String,
    pub short_url: String,
    pub views: u64,
    pub favorites: u64,
    pub source: String,
    pub purity: Purity,
    pub category: Category,
    pub dimension_x: u64,
    pub dimension_y: u64,
    pub resolution: String,
    pub ratio: String,
    pub file_size: u64,
    pub file_type: String,
    #[serde(deserialize_with = "utils::api_time")]
    pub created_at: DateTime<Utc>,
    pub colors: Vec<String>,
    pub path: String,
    pub thumbs: Thumbs,
    /// Search results don't include tags on wallpapers.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Collection listings don't include the uploader.
    #[serde(default)]
    pub uploader: Option<Uploader>,
}

impl Client {
    /// Returns the wallpaper with the given ID.
    ///
    /// ```no_run
    /// # use wallhaven::client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> wallhaven::error::Result<()> {
    /// let client = Client::new()?;
    /// let wallpaper = client.get_wallpaper("94x38z").await?;
    ///
    /// assert_eq!(wallpaper.id, "94x38z");
    /// # Ok(()) }
    /// ```
    ///
    /// _Note: This function performs a request; it may sleep until the API
    /// rate limit allows another call._
    pub async fn get_wallpaper(&self, id: &str) -> Result<Wallpaper> {
        let body = self.get_json_endpoint(&format!("/w/{}", id)).await?;
        let DataResponse { data } = serde_json::from_value(body)?;
        Ok(data)
    }

    /// Fetches one page of search results for `params`, with the page
    /// number under the caller's control (`params.set("page", n)`, first
    /// page when absent).
    ///
    /// The allowed parameters are described at
    /// <https://wallhaven.cc/help/api#search>; see
    /// [`Query`][crate::query::Query] for building the free-text `q` value.
    ///
    /// _Note: This function performs a request; it may sleep until the API
    /// rate limit allows another call._
    pub async fn search_page(&self, params: &Params) -> Result<(Vec<Wallpaper>, Meta)> {
        self.get_listing("/search", params).await
    }

    /// Returns a stream over every page of search results for `params`,
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
    /// let pages = client.search(Params::new().set("q", "mountains"))?;
    /// futures::pin_mut!(pages);
    ///
    /// while let Some(page) = pages.next().await {
    ///     let (wallpapers, meta) = page?;
    ///     println!("page {}/{}: {} results", meta.current_page, meta.last_page, wallpapers.len());
    /// }
    /// # Ok(()) }
    /// ```
    ///
    /// _Note: Every yielded page is a request; each may sleep until the API
    /// rate limit allows another call._
    pub fn search(
        &self,
        params: Params,
    ) -> Result<impl Stream<Item = Result<(Vec<Wallpaper>, Meta)>> + '_> {
        self.page_stream("/search".to_string(), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;
    use futures::StreamExt;
    use mockito::mock;

    #[test]
    fn wallpaper_from_json() {
        let body: DataResponse<Wallpaper> =
            serde_json::from_str(include_str!("mocked/wallpaper_94x38z.json")).unwrap();
        let wallpaper = body.data;

        assert_eq!(wallpaper.id, "94x38z");
        assert_eq!(wallpaper.purity, Purity::Sfw);
        assert_eq!(wallpaper.category, Category::Anime);
        assert_eq!(wallpaper.dimension_x, 6071);
        assert_eq!(
            wallpaper.created_at,
            Utc.with_ymd_and_hms(2018, 10, 31, 1, 23, 10).unwrap()
        );
        assert_eq!(wallpaper.thumbs.large, "https://th.wallhaven.cc/lg/94/94x38z.jpg");
        assert_eq!(wallpaper.tags.len(), 1);
        assert_eq!(wallpaper.tags[0].name, "anime");

        let uploader = wallpaper.uploader.unwrap();
        assert_eq!(uploader.username, "test-user");
        assert_eq!(uploader.group, "User");
        assert_eq!(uploader.avatar.len(), 4);
    }

    #[test]
    fn wallpaper_without_tags_or_uploader() {
        // the shape search results and collection listings come in
        let body: crate::client::ListResponse<Wallpaper> =
            serde_json::from_str(include_str!("mocked/search_page_1.json")).unwrap();

        assert_eq!(body.data.len(), 2);
        assert!(body.data[0].tags.is_empty());
        assert!(body.data[0].uploader.is_none());
    }

    #[tokio::test]
    async fn get_wallpaper_by_id() {
        let client = Client::with_base_url(&mockito::server_url(), None).unwrap();

        let _m = mock("GET", "/w/94x38z")
            .with_body(include_str!("mocked/wallpaper_94x38z.json"))
            .create();

        let wallpaper = client.get_wallpaper("94x38z").await.unwrap();
        assert_eq!(wallpaper.id, "94x38z");
    }

    #[tokio::test]
    async fn search_single_page() {
        let client = Client::with_base_url(&mockito::server_url(), None).unwrap();

        let _m = mock("GET", "/search?purity=110&page=2")
            .with_body(include_str!("mocked/search_page_2.json"))
            .create();

        let params = Params::new().set("purity", "110").set("page", 2);
        let (wallpapers, meta) = client.search_page(&params).await.unwrap();

        assert_eq!(wallpapers.len(), 2);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.last_page, 3);
    }

    #[tokio::test]
    async fn search_stops_after_the_last_page() {
        let client = Client::with_base_url(&mockito::server_url(), None).unwrap();

        let _m = [
            mock("GET", "/search?q=mountains&page=1")
                .with_body(include_str!("mocked/search_page_1.json"))
                .create(),
            mock("GET", "/search?q=mountains&page=2")
                .with_body(include_str!("mocked/search_page_2.json"))
                .create(),
            mock("GET", "/search?q=mountains&page=3")
                .with_body(include_str!("mocked/search_page_3.json"))
                .create(),
        ];

        let pages: Vec<_> = client
            .search(Params::new().set("q", "mountains"))
            .unwrap()
            .collect()
            .await;

        assert_eq!(pages.len(), 3);
        for (expected, page) in (1u64..).zip(&pages) {
            let (wallpapers, meta) = page.as_ref().unwrap();
            assert_eq!(wallpapers.len(), 2);
            assert_eq!(meta.current_page, expected);
        }
    }

    #[tokio::test]
    async fn search_yields_the_error_and_ends() {
        let client = Client::with_base_url(&mockito::server_url(), None).unwrap();

        let _m = mock("GET", "/search?q=broken&page=1")
            .with_status(404)
            .create();

        let pages: Vec<_> = client
            .search(Params::new().set("q", "broken"))
            .unwrap()
            .collect()
            .await;

        assert_eq!(pages.len(), 1);
        assert!(matches!(pages[0], Err(Error::BadRequest { .. })));
    }

    #[test]
    fn search_rejects_a_page_override() {
        let client = Client::new().unwrap();

        let result = client.search(Params::new().set("page", 4));
        assert!(matches!(result, Err(Error::PageParameterReserved)));
    }

    #[test]
    fn search_rejects_invalid_parameters() {
        let client = Client::new().unwrap();

        assert!(matches!(
            client.search(Params::new().set("purity", "1111")),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            client.search(Params::new().set("q", "id:r4e5tg")),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            client.search(Params::new().set("test_parameter", "1111")),
            Err(Error::UnknownParameter(_))
        ));
    }
}
