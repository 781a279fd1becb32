//! Post data models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    Draft,
    Pending,
    Private,
}

impl Default for PostStatus {
    fn default() -> Self {
        PostStatus::Draft
    }
}

/// The content item an attachment belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwningPost {
    /// Post ID.
    pub id: u64,
    /// Post type, e.g. "post" or "page".
    pub post_type: String,
    /// Publication status.
    #[serde(default)]
    pub status: PostStatus,
    /// URL slug. May be empty for drafts.
    pub slug: String,
    /// Post title.
    pub title: String,
    /// Creation date.
    pub date: chrono::DateTime<chrono::Utc>,
    /// Body content.
    #[serde(default)]
    pub content: String,
    /// Taxonomy name -> assigned terms, in assignment order.
    #[serde(default)]
    pub terms: BTreeMap<String, Vec<Term>>,
    /// Featured image attachment ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<u64>,
}

/// A taxonomy term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term ID.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL slug. May be empty.
    pub slug: String,
}

impl OwningPost {
    /// First term assigned to this post in the given taxonomy.
    ///
    /// Only the first assigned term is honored even when several are set.
    pub fn first_term(&self, taxonomy: &str) -> Option<&Term> {
        self.terms.get(taxonomy).and_then(|terms| terms.first())
    }
}
