use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::client::{Client, DataResponse};
use crate::error::Result;
use crate::utils;
use crate::wallpaper::Purity;

/// Tags are keywords used to describe a
/// [`Wallpaper`][crate::wallpaper::Wallpaper]. They are included in
/// wallpaper responses and have their own endpoint.
#[derive(Debug, PartialEq, Deserialize, Clone)]
#[non_exhaustive]
pub struct Tag {
    pub id: u64,
    pub name: String,
    /// Comma-separated alias list; see [`Self::aliases`].
    pub alias: String,
    pub category_id: u64,
    pub category: String,
    pub purity: Purity,
    #[serde(deserialize_with = "utils::api_time")]
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Iterates over the entries of the comma-separated [`alias`][Self::alias]
    /// field.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.alias
            .split(',')
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
    }
}

impl Client {
    /// Returns the tag with the given ID.
    ///
    /// ```no_run
    /// # use wallhaven::client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> wallhaven::error::Result<()> {
    /// let client = Client::new()?;
    /// let tag = client.get_tag(2098).await?;
    ///
    /// assert_eq!(tag.id, 2098);
    /// # Ok(()) }
    /// ```
    ///
    /// _Note: This function performs a request; it may sleep until the API
    /// rate limit allows another call._
    pub async fn get_tag(&self, id: u64) -> Result<Tag> {
        let body = self.get_json_endpoint(&format!("/tag/{}", id)).await?;
        let DataResponse { data } = serde_json::from_value(body)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::mock;

    #[test]
    fn tag_from_json() {
        let body: DataResponse<Tag> =
            serde_json::from_str(include_str!("mocked/tag_2098.json")).unwrap();
        let tag = body.data;

        assert_eq!(tag.id, 2098);
        assert_eq!(tag.name, "Stardew Valley");
        assert_eq!(tag.category_id, 5);
        assert_eq!(tag.purity, Purity::Sfw);
        assert_eq!(
            tag.created_at,
            Utc.with_ymd_and_hms(2016, 3, 2, 15, 16, 17).unwrap()
        );
    }

    #[test]
    fn tag_aliases() {
        let body: DataResponse<Tag> =
            serde_json::from_str(include_str!("mocked/tag_2098.json")).unwrap();

        let aliases: Vec<_> = body.data.aliases().collect();
        assert_eq!(aliases, ["stardew", "stardewvalley"]);
    }

    #[tokio::test]
    async fn get_tag_by_id() {
        let client = Client::with_base_url(&mockito::server_url(), None).unwrap();

        let _m = mock("GET", "/tag/2098")
            .with_body(include_str!("mocked/tag_2098.json"))
            .create();

        let tag = client.get_tag(2098).await.unwrap();
        assert_eq!(tag.id, 2098);
        assert_eq!(tag.category, "Games");
    }
}
