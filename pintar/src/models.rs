//! The three record types of the service and their validation rules.
//!
//! Each type maps to one collection:
//!
//! | type | collection |
//! |---|---|
//! | [`Company`] | `company` |
//! | [`ProductApp`] | `productapp` |
//! | [`Document`] | `document` |

use pintar_core::{
    record::Record,
    validate::{Fields, ValidationError},
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Company profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
}

impl Record for Company {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "tagline",
        "description",
        "mission",
        "vision",
        "website",
        "email",
        "phone",
        "address",
        "logo_url",
    ];

    fn collection_name() -> &'static str {
        "company"
    }

    fn from_fields(map: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(map);
        let name = fields.required_text("name");
        let tagline = fields.text("tagline");
        let description = fields.text("description");
        let mission = fields.text("mission");
        let vision = fields.text("vision");
        let website = fields.url("website");
        let email = fields.email("email");
        let phone = fields.text("phone");
        let address = fields.text("address");
        let logo_url = fields.url("logo_url");

        fields.finish((|| {
            Some(Company {
                name: name?,
                tagline,
                description,
                mission,
                vision,
                website,
                email,
                phone,
                address,
                logo_url,
            })
        })())
    }
}

/// Product or app listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductApp {
    pub name: String,
    pub short_description: Option<String>,
    pub category: Option<String>,
    pub pricing: Option<String>,
    pub website: Option<String>,
}

impl Record for ProductApp {
    const FIELDS: &'static [&'static str] =
        &["name", "short_description", "category", "pricing", "website"];

    fn collection_name() -> &'static str {
        "productapp"
    }

    fn from_fields(map: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(map);
        let name = fields.required_text("name");
        let short_description = fields.text("short_description");
        let category = fields.text("category");
        let pricing = fields.text("pricing");
        let website = fields.url("website");

        fields.finish((|| {
            Some(ProductApp {
                name: name?,
                short_description,
                category,
                pricing,
                website,
            })
        })())
    }
}

/// Intelligent document: raw text content with tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl Record for Document {
    const FIELDS: &'static [&'static str] = &["title", "content", "tags"];

    fn collection_name() -> &'static str {
        "document"
    }

    fn from_fields(map: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(map);
        let title = fields.required_text("title");
        let content = fields.required_text("content");
        let tags = fields.text_list("tags");

        fields.finish((|| {
            Some(Document {
                title: title?,
                content: content?,
                tags,
            })
        })())
    }
}
