use http::HeaderMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Backing tagging subsystem.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Global Search and Tagging.
    Ghost,
    /// Infrastructure management system.
    Ims,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ghost => "ghost",
            Self::Ims => "ims",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ghost" => Ok(Self::Ghost),
            "ims" => Ok(Self::Ims),
            _ => Err(format!("unknown provider: {s}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderByName {
    Asc,
    Desc,
}

impl FromStr for OrderByName {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("unknown order: {s}")),
        }
    }
}

fn comma_separated<S>(providers: &Option<Vec<Provider>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match providers {
        Some(providers) => serializer.serialize_str(
            &providers
                .iter()
                .map(|provider| provider.as_str())
                .collect::<Vec<_>>()
                .join(","),
        ),
        None => serializer.serialize_none(),
    }
}

/// Query parameters of `list_tags`. `headers` are sent with the request and
/// override the generated ones.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ListTagsOptions {
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Option::is_none"
    )]
    pub providers: Option<Vec<Provider>>,
    /// CRN or IMS ID of a resource. Requires a single provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by_name: Option<OrderByName>,
    /// Search timeout in milliseconds, enforced by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_only: Option<bool>,
    #[serde(skip)]
    pub headers: HeaderMap,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DeleteTagAllOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub providers: Option<Provider>,
    #[serde(skip)]
    pub headers: HeaderMap,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DeleteTagOptions {
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Option::is_none"
    )]
    pub providers: Option<Vec<Provider>>,
    #[serde(skip)]
    pub headers: HeaderMap,
}

/// Body of `attach_tag` and `detach_tag`.
///
/// `tag_name` and `tag_names` are both sent when both are set; the server
/// decides whether the combination is valid.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TagRequest {
    pub resources: Vec<schemas::Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<String>>,
    #[serde(skip)]
    pub headers: HeaderMap,
}

impl TagRequest {
    pub fn new(resources: Vec<schemas::Resource>) -> Self {
        Self {
            resources,
            ..Default::default()
        }
    }

    pub fn tag_name<S>(mut self, tag_name: S) -> Self
    where
        S: Into<String>,
    {
        self.tag_name = Some(tag_name.into());
        self
    }

    pub fn tag_names<I>(mut self, tag_names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.tag_names = Some(tag_names.into_iter().map(Into::into).collect());
        self
    }
}
