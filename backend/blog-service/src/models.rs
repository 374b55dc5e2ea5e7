//! Stored records and request payloads
//!
//! Records are stored as JSON with snake_case names. Empty fields are left
//! out and missing ones default, so values written by older deployments
//! still decode.

use entity_repository::{Entity, ListOrder};
use link_preview::LinkPreview;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// `null` decodes like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub created_at: i64,
    /// Bumped by content updates and tag changes
    #[serde(skip_serializing_if = "is_zero")]
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_preview: Option<LinkPreview>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub tags: Vec<String>,
}

impl Entity for Post {
    const KIND: &'static str = "post";
    const KEY_PREFIX: &'static str = "post-";
    const LIST_ORDER: ListOrder = ListOrder::NewestFirst;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub post_id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_preview: Option<LinkPreview>,
}

impl Entity for Comment {
    const KIND: &'static str = "comment";
    const KEY_PREFIX: &'static str = "comment-";
    const LIST_ORDER: ListOrder = ListOrder::NewestFirst;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    /// Opaque hash supplied by the caller; never hashed or checked here
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Entity for User {
    const KIND: &'static str = "user";
    const KEY_PREFIX: &'static str = "user-";
    const LIST_ORDER: ListOrder = ListOrder::StoreOrder;

    fn id(&self) -> &str {
        &self.id
    }

    /// Users carry no creation time
    fn created_at(&self) -> i64 {
        0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateCommentRequest {
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub post_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCommentRequest {
    pub id: String,
    pub content: String,
    /// Becomes the comment's `author_id`
    pub user_id: String,
    pub post_id: String,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub id: String,
    pub name: String,
    pub email: String,
}
