use serde::{Deserialize, Serialize};
use std::fmt;

/// A required argument was missing or empty.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{0} must be provided")]
pub struct MissingArgument(pub &'static str);

macro_rules! impl_display_json {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let s = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
                    f.write_str(&s)
                }
            }
        )*
    };
}

impl_display_json!(
    Resource,
    Tag,
    TagList,
    TagResults,
    TagResultsItem,
    DeleteTagResults,
    DeleteTagResultsItem,
    DeleteTagsResult,
    DeleteTagsResultItem,
);

/// A resource that may have attached tags.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Resource {
    /// The CRN or IMS ID of the resource.
    pub resource_id: String,
    /// The IMS resource type of the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl Resource {
    pub fn new<S>(resource_id: S) -> Result<Self, MissingArgument>
    where
        S: Into<String>,
    {
        let resource_id = resource_id.into();
        if resource_id.is_empty() {
            return Err(MissingArgument("resource_id"));
        }
        Ok(Self {
            resource_id,
            resource_type: None,
        })
    }

    pub fn with_resource_type<S>(mut self, resource_type: S) -> Self
    where
        S: Into<String>,
    {
        self.resource_type = Some(resource_type.into());
        self
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    pub fn new<S>(name: S) -> Result<Self, MissingArgument>
    where
        S: Into<String>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(MissingArgument("name"));
        }
        Ok(Self { name })
    }
}

/// A page of tags. `items` holds the window described by `offset` and `limit`,
/// so its length is usually smaller than `total_count`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TagList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Tag>>,
}

/// Results of an attach or detach request, one item per submitted resource in
/// submission order.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TagResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<TagResultsItem>>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TagResultsItem {
    pub resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Results of a delete request for a single tag, one item per provider.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DeleteTagResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<DeleteTagResultsItem>>,
}

/// Outcome of deleting a tag from one provider.
///
/// Providers may report fields beyond `provider` and `is_error`. Those are kept
/// in the order they were received and written back out unchanged, `null`
/// values included. They are only reachable through the accessors, which keep
/// the named keys out of the map.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DeleteTagResultsItem {
    /// `ghost` or `ims`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    #[serde(flatten)]
    additional: serde_json::Map<String, serde_json::Value>,
}

/// An additional field was given the key of a named field.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{0} is a named field, not an additional one")]
pub struct NamedField(pub String);

impl DeleteTagResultsItem {
    /// Keys claimed by the named fields. They are never stored as additional
    /// fields.
    pub const PROPERTIES: [&'static str; 2] = ["provider", "is_error"];

    pub fn new(provider: Option<String>, is_error: Option<bool>) -> Self {
        Self {
            provider,
            is_error,
            additional: serde_json::Map::new(),
        }
    }

    pub fn additional(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.additional
    }

    /// Inserts an additional field, returning the previous value.
    pub fn insert_additional<K>(
        &mut self,
        key: K,
        value: serde_json::Value,
    ) -> Result<Option<serde_json::Value>, NamedField>
    where
        K: Into<String>,
    {
        let key = key.into();
        if Self::PROPERTIES.contains(&key.as_str()) {
            return Err(NamedField(key));
        }
        Ok(self.additional.insert(key, value))
    }

    pub fn remove_additional(&mut self, key: &str) -> Option<serde_json::Value> {
        self.additional.remove(key)
    }
}

/// Results of deleting every unattached tag.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DeleteTagsResult {
    /// Number of tags deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    /// `true` if at least one tag could not be deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<DeleteTagsResultItem>>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DeleteTagsResultItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;
    use serde_json::json;

    fn round_trip<T>(value: &T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        serde_json::from_value(serde_json::to_value(value).unwrap()).unwrap()
    }

    #[test]
    fn resource_requires_id() {
        assert_eq!(Resource::new(""), Err(MissingArgument("resource_id")));
        assert_eq!(
            Resource::new("").unwrap_err().to_string(),
            "resource_id must be provided"
        );

        let resource = Resource::new("crn:1").unwrap();
        assert_eq!(serde_json::to_value(&resource).unwrap(), json!({"resource_id": "crn:1"}));

        let resource = resource.with_resource_type("SoftLayer_Virtual_Guest");
        assert_eq!(
            serde_json::to_value(&resource).unwrap(),
            json!({"resource_id": "crn:1", "resource_type": "SoftLayer_Virtual_Guest"}),
        );
        assert_eq!(round_trip(&resource), resource);
    }

    #[test]
    fn resource_missing_id_in_json() {
        let e = serde_json::from_value::<Resource>(json!({"resource_type": "x"})).unwrap_err();
        assert!(e.to_string().contains("missing field `resource_id`"), "{e}");
    }

    #[test]
    fn tag_requires_name() {
        assert_eq!(Tag::new(""), Err(MissingArgument("name")));
        assert!(serde_json::from_value::<Tag>(json!({})).is_err());
        let tag = Tag::new("env:prod").unwrap();
        assert_eq!(round_trip(&tag), tag);
    }

    #[test]
    fn tag_list_pagination() {
        let list = serde_json::from_value::<TagList>(json!({
            "total_count": 3,
            "offset": 0,
            "limit": 2,
            "items": [{"name": "a"}, {"name": "b"}],
            "unknown": true,
        }))
        .unwrap();
        assert_eq!(list.total_count, Some(3));
        assert_eq!(list.items.as_ref().map(Vec::len), Some(2));
        assert_eq!(round_trip(&list), list);
        assert!(serde_json::to_value(&list).unwrap().get("unknown").is_none());
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        assert_eq!(serde_json::to_value(TagList::default()).unwrap(), json!({}));
        assert_eq!(serde_json::to_value(DeleteTagsResult::default()).unwrap(), json!({}));
        assert_eq!(
            serde_json::to_value(DeleteTagResultsItem::default()).unwrap(),
            json!({})
        );

        let list = serde_json::from_value::<TagList>(json!({"items": []})).unwrap();
        assert_eq!(list.total_count, None);
        assert_eq!(list.items, Some(Vec::new()));
    }

    #[test]
    fn tag_results_distinguish_absent_is_error() {
        let results = serde_json::from_value::<TagResults>(json!({
            "results": [
                {"resource_id": "crn:1", "is_error": false},
                {"resource_id": "crn:2"},
            ],
        }))
        .unwrap();
        let items = results.results.as_deref().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].resource_id, "crn:1");
        assert_eq!(items[0].is_error, Some(false));
        assert_eq!(items[1].resource_id, "crn:2");
        assert_eq!(items[1].is_error, None);
        assert_eq!(round_trip(&results), results);
    }

    #[test]
    fn tag_results_item_requires_resource_id() {
        let e = serde_json::from_value::<TagResults>(json!({"results": [{"is_error": true}]}))
            .unwrap_err();
        assert!(e.to_string().contains("missing field `resource_id`"), "{e}");
    }

    #[test]
    fn delete_tag_results_item_keeps_additional_fields() {
        let value = json!({"provider": "ghost", "is_error": true, "extra_field": "x"});
        let item = serde_json::from_value::<DeleteTagResultsItem>(value.clone()).unwrap();
        assert_eq!(item.provider.as_deref(), Some("ghost"));
        assert_eq!(item.is_error, Some(true));
        assert_eq!(item.additional().get("extra_field"), Some(&json!("x")));
        assert_eq!(item.additional().len(), 1);
        assert_eq!(serde_json::to_value(&item).unwrap(), value);
    }

    #[test]
    fn delete_tag_results_item_round_trip_arbitrary_values() {
        let mut item = DeleteTagResultsItem::new(Some("ims".to_owned()), None);
        item.insert_additional("message", json!("tag is attached")).unwrap();
        item.insert_additional("nested", json!({"a": [1, 2, {"b": null}]})).unwrap();
        item.insert_additional("nothing", serde_json::Value::Null).unwrap();
        assert_eq!(item.additional().len(), 3);

        assert_eq!(round_trip(&item), item);

        let results = DeleteTagResults {
            results: Some(vec![item.clone(), DeleteTagResultsItem::default()]),
        };
        assert_eq!(round_trip(&results), results);
    }

    #[test]
    fn named_keys_cannot_become_additional_fields() {
        let mut item = DeleteTagResultsItem::new(Some("ghost".to_owned()), None);
        assert_eq!(
            item.insert_additional("provider", json!("ims")),
            Err(NamedField("provider".to_owned()))
        );
        assert_eq!(
            item.insert_additional("is_error", json!(true)).unwrap_err().to_string(),
            "is_error is a named field, not an additional one"
        );
        assert!(item.additional().is_empty());
        assert_eq!(item.is_error, None);

        let s = serde_json::to_string(&item).unwrap();
        assert_eq!(s.matches("\"provider\"").count(), 1, "{s}");
        let back = serde_json::from_str::<DeleteTagResultsItem>(&s).unwrap();
        assert_eq!(back.provider.as_deref(), Some("ghost"));
        assert_eq!(back, item);
    }

    #[test]
    fn insert_and_remove_additional() {
        let mut item = DeleteTagResultsItem::default();
        assert_eq!(item.insert_additional("detail", json!(1)), Ok(None));
        assert_eq!(item.insert_additional("detail", json!(2)), Ok(Some(json!(1))));
        assert_eq!(item.remove_additional("detail"), Some(json!(2)));
        assert_eq!(item.remove_additional("detail"), None);
        assert_eq!(item, DeleteTagResultsItem::default());
    }

    #[test]
    fn additional_fields_take_part_in_equality() {
        let a = serde_json::from_value::<DeleteTagResultsItem>(json!({"x": 1})).unwrap();
        let b = serde_json::from_value::<DeleteTagResultsItem>(json!({"x": 2})).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn delete_tags_result() {
        let result = serde_json::from_value::<DeleteTagsResult>(json!({
            "total_count": 2,
            "errors": true,
            "items": [
                {"tag_name": "a", "is_error": false},
                {"tag_name": "b", "is_error": true},
            ],
        }))
        .unwrap();
        assert_eq!(result.errors, Some(true));
        assert_eq!(
            result.items.as_ref().unwrap()[1],
            DeleteTagsResultItem {
                tag_name: Some("b".to_owned()),
                is_error: Some(true),
            },
        );
        assert_eq!(round_trip(&result), result);
    }

    #[test]
    fn display_is_pretty_json() {
        let tag = Tag::new("env:prod").unwrap();
        assert_eq!(tag.to_string(), "{\n  \"name\": \"env:prod\"\n}");
    }
}
