use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::client::{Client, DataResponse};
use crate::error::Result;
use crate::wallpaper::{Category, Purity};

/// Browsing settings of the account owning the API key.
///
/// Useful to run searches matching what the user sees on the website; see
/// [`purity_mask`][crate::query::purity_mask] for turning the purity list
/// back into a query value.
#[serde_as]
#[derive(Debug, PartialEq, Deserialize, Clone)]
#[non_exhaustive]
pub struct UserSettings {
    pub thumb_size: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub per_page: u64,
    /// List form, not the numeric string queries use.
    pub purity: Vec<Purity>,
    pub categories: Vec<Category>,
    pub resolutions: Vec<String>,
    pub aspect_ratios: Vec<String>,
    pub toplist_range: String,
    pub tag_blacklist: Vec<String>,
    pub user_blacklist: Vec<String>,
}

impl Client {
    /// Returns the settings of the account the API key belongs to.
    ///
    /// Fails with [`Error::MissingApiKey`][crate::error::Error::MissingApiKey]
    /// before any request is made if the client has no key.
    ///
    /// _Note: This function performs a request; it may sleep until the API
    /// rate limit allows another call._
    pub async fn get_user_settings(&self) -> Result<UserSettings> {
        self.require_api_key()?;

        let body = self.get_json_endpoint("/settings").await?;
        let DataResponse { data } = serde_json::from_value(body)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::query::purity_mask;
    use mockito::mock;

    #[test]
    fn settings_from_json() {
        let body: DataResponse<UserSettings> =
            serde_json::from_str(include_str!("mocked/settings.json")).unwrap();
        let settings = body.data;

        assert_eq!(settings.per_page, 24);
        assert_eq!(settings.purity, [Purity::Sfw, Purity::Sketchy]);
        assert_eq!(
            settings.categories,
            [Category::General, Category::Anime, Category::People]
        );
        assert_eq!(settings.toplist_range, "6M");
        assert_eq!(purity_mask(&settings.purity), "110");
    }

    #[tokio::test]
    async fn get_user_settings_sends_the_key() {
        let client = Client::with_base_url(
            &mockito::server_url(),
            Some("testkeyisinvalid".to_string()),
        )
        .unwrap();

        let _m = mock("GET", "/settings")
            .match_header("x-api-key", "testkeyisinvalid")
            .with_body(include_str!("mocked/settings.json"))
            .create();

        let settings = client.get_user_settings().await.unwrap();
        assert_eq!(settings.thumb_size, "lg");
    }

    #[tokio::test]
    async fn get_user_settings_requires_a_key() {
        let client = Client::new().unwrap();

        assert!(matches!(
            client.get_user_settings().await,
            Err(Error::MissingApiKey)
        ));
    }
}
