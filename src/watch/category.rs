// src/watch/category.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::watch::types::ParsedItem;

pub const SERVICE_DOMAIN: &str = "teamwork.com";

/// Resource categories exposed by the Teamwork API, one collection endpoint each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Projects,
    Posts,
    Tasks,
    Milestones,
    Comments,
    Notebooks,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Projects,
        Category::Posts,
        Category::Tasks,
        Category::Milestones,
        Category::Comments,
        Category::Notebooks,
    ];

    pub fn spec(self) -> &'static CategorySpec {
        match self {
            Category::Projects => &PROJECTS,
            Category::Posts => &POSTS,
            Category::Tasks => &TASKS,
            Category::Milestones => &MILESTONES,
            Category::Comments => &COMMENTS,
            Category::Notebooks => &NOTEBOOKS,
        }
    }
}

/// Everything category-specific in one place: where the collection lives,
/// which fields carry the label and timestamps, and how items deep-link.
/// Iterated uniformly by the cycle orchestrator.
pub struct CategorySpec {
    pub category: Category,
    /// Path segment of the collection, fetched as `/<endpoint>.json`.
    pub endpoint: &'static str,
    /// Key of the item array in the response body.
    pub collection_key: &'static str,
    /// Singular noun used in message lines.
    pub noun: &'static str,
    /// Item field holding the human-readable label.
    pub label_field: &'static str,
    /// Item field naming the parent project; projects themselves have none.
    pub project_field: Option<&'static str>,
    pub created_field: &'static str,
    pub changed_field: &'static str,
    /// Deep-link path around the item id, e.g. `#/messages/<id>`.
    item_path_prefix: &'static str,
    item_path_suffix: &'static str,
}

static PROJECTS: CategorySpec = CategorySpec {
    category: Category::Projects,
    endpoint: "projects",
    collection_key: "projects",
    noun: "project",
    label_field: "name",
    project_field: None,
    created_field: "created-on",
    changed_field: "last-changed-on",
    item_path_prefix: "#/projects/",
    item_path_suffix: "/overview/summary",
};

static POSTS: CategorySpec = CategorySpec {
    category: Category::Posts,
    endpoint: "posts",
    collection_key: "posts",
    noun: "post",
    label_field: "title",
    project_field: Some("project-name"),
    created_field: "created-on",
    changed_field: "last-changed-on",
    item_path_prefix: "#/messages/",
    item_path_suffix: "",
};

static TASKS: CategorySpec = CategorySpec {
    category: Category::Tasks,
    endpoint: "tasks",
    collection_key: "tasks",
    noun: "task",
    label_field: "content",
    project_field: Some("project-name"),
    created_field: "created-on",
    changed_field: "last-changed-on",
    item_path_prefix: "#/tasks/",
    item_path_suffix: "",
};

static MILESTONES: CategorySpec = CategorySpec {
    category: Category::Milestones,
    endpoint: "milestones",
    collection_key: "milestones",
    noun: "milestone",
    label_field: "title",
    project_field: Some("project-name"),
    created_field: "created-on",
    changed_field: "last-changed-on",
    item_path_prefix: "#/milestones/",
    item_path_suffix: "",
};

static COMMENTS: CategorySpec = CategorySpec {
    category: Category::Comments,
    endpoint: "comments",
    collection_key: "comments",
    noun: "comment",
    label_field: "body",
    project_field: Some("project-name"),
    created_field: "created-on",
    changed_field: "last-changed-on",
    item_path_prefix: "#/comments/",
    item_path_suffix: "",
};

static NOTEBOOKS: CategorySpec = CategorySpec {
    category: Category::Notebooks,
    endpoint: "notebooks",
    collection_key: "notebooks",
    noun: "notebook",
    label_field: "name",
    project_field: Some("project-name"),
    created_field: "created-on",
    changed_field: "last-changed-on",
    item_path_prefix: "#/notebooks/",
    item_path_suffix: "",
};

impl CategorySpec {
    /// Detail-page URL for a single item of this category.
    pub fn item_url(&self, subdomain: &str, id: &str) -> String {
        format!(
            "https://{subdomain}.{SERVICE_DOMAIN}/{}{id}{}",
            self.item_path_prefix, self.item_path_suffix
        )
    }

    /// Lift one raw collection entry into a `ParsedItem`. Items missing the
    /// id, label, or either timestamp are not classifiable and yield `None`;
    /// the caller logs and skips them.
    pub fn parse_item(&self, value: &Value) -> Option<ParsedItem> {
        let id = field_as_string(value, "id")?;
        let label = field_as_string(value, self.label_field)?;
        let project = self
            .project_field
            .and_then(|f| field_as_string(value, f));
        let created_on = field_as_instant(value, self.created_field)?;
        let changed_on = field_as_instant(value, self.changed_field)?;
        Some(ParsedItem {
            id,
            label,
            project,
            created_on,
            changed_on,
        })
    }
}

/// URL of the generic active-projects list, used once a cycle holds more than
/// one change.
pub fn active_list_url(subdomain: &str) -> String {
    format!("https://{subdomain}.{SERVICE_DOMAIN}/#/projects/list/active")
}

// The API serves ids as strings on some endpoints and numbers on others.
fn field_as_string(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field_as_instant(value: &Value, field: &str) -> Option<DateTime<Utc>> {
    let raw = value.get(field)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_urls_match_service_routes() {
        assert_eq!(
            Category::Projects.spec().item_url("acme", "77"),
            "https://acme.teamwork.com/#/projects/77/overview/summary"
        );
        assert_eq!(
            Category::Posts.spec().item_url("acme", "12"),
            "https://acme.teamwork.com/#/messages/12"
        );
        assert_eq!(
            active_list_url("acme"),
            "https://acme.teamwork.com/#/projects/list/active"
        );
    }

    #[test]
    fn parse_item_resolves_per_category_fields() {
        let raw = json!({
            "id": 42,
            "title": "Kickoff notes",
            "project-name": "Acme",
            "created-on": "2026-01-10T09:15:00Z",
            "last-changed-on": "2026-01-11T10:00:00Z"
        });
        let item = Category::Posts.spec().parse_item(&raw).expect("parses");
        assert_eq!(item.id, "42");
        assert_eq!(item.label, "Kickoff notes");
        assert_eq!(item.project.as_deref(), Some("Acme"));
        assert!(item.changed_on > item.created_on);
    }

    #[test]
    fn parse_item_rejects_missing_or_garbled_fields() {
        let spec = Category::Projects.spec();
        let no_label = json!({
            "id": "1",
            "created-on": "2026-01-10T09:15:00Z",
            "last-changed-on": "2026-01-10T09:15:00Z"
        });
        assert!(spec.parse_item(&no_label).is_none());

        let bad_stamp = json!({
            "id": "1",
            "name": "Acme",
            "created-on": "yesterday-ish",
            "last-changed-on": "2026-01-10T09:15:00Z"
        });
        assert!(spec.parse_item(&bad_stamp).is_none());
    }
}
