//! Typed model of the TVMaze `/search/shows` payload.
//!
//! The proxy forwards upstream bodies verbatim; these types are only used on the
//! client side, where the body is decoded into [`SearchMatch`] values. Everything
//! beyond the fields the client actually reads is optional, since TVMaze returns
//! `null` liberally.

use chrono::NaiveDate;
use html_scraper::Html;
use serde::{Deserialize, Serialize};

/// TVMaze's numeric show identifier.
pub type ShowId = u64;

/// One hit of a show search: the relevance score and the embedded show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub score: f64,
    pub show: Show,
}

impl SearchMatch {
    pub fn id(&self) -> ShowId {
        self.show.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: ShowId,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub premiered: Option<NaiveDate>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<Image>,

    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub average_runtime: Option<u32>,
    #[serde(default)]
    pub ended: Option<NaiveDate>,
    #[serde(default)]
    pub official_site: Option<String>,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub network: Option<Network>,
    #[serde(default)]
    pub web_channel: Option<WebChannel>,
    #[serde(default)]
    pub dvd_country: Option<Country>,
    #[serde(default)]
    pub externals: Option<Externals>,
    #[serde(default)]
    pub updated: Option<i64>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

impl Show {
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// The summary with markup stripped and entities decoded, for plain-text output.
    pub fn summary_text(&self) -> Option<String> {
        let fragment = Html::parse_fragment(self.summary.as_deref()?);
        let text = fragment.root_element().text().collect::<String>();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_owned())
    }

    /// The poster URL suitable for a detail card.
    pub fn poster(&self) -> Option<&str> {
        self.image.as_ref().map(|image| image.medium.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub medium: String,
    pub original: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub days: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub official_site: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebChannel {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub official_site: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Externals {
    pub tvrage: Option<u64>,
    pub thetvdb: Option<u64>,
    pub imdb: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub this: LinkRef,
    #[serde(default)]
    pub previousepisode: Option<LinkRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkRef {
    pub href: String,
    #[serde(default)]
    pub name: Option<String>,
}
