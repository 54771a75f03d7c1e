//! Category Model

use super::CategoryId;
use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: Option<CategoryId>,
    pub name: String,
}

/// Create category payload (`POST /api/categories`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

/// `GET /api/categories` has answered with a bare array as well as with
/// the list wrapped in `categories` or `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryListResponse {
    List(Vec<Category>),
    Categories { categories: Vec<Category> },
    Data { data: Vec<Category> },
}

impl CategoryListResponse {
    pub fn into_vec(self) -> Vec<Category> {
        match self {
            Self::List(list) => list,
            Self::Categories { categories } => categories,
            Self::Data { data } => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_list_shapes() {
        for body in [
            r#"[{"id": 1, "name": "Nuts"}]"#,
            r#"{"categories": [{"id": 1, "name": "Nuts"}]}"#,
            r#"{"data": [{"id": "1", "name": "Nuts"}]}"#,
        ] {
            let list = serde_json::from_str::<CategoryListResponse>(body)
                .unwrap()
                .into_vec();
            assert_eq!(list.len(), 1, "{body}");
            assert_eq!(list[0].name, "Nuts");
            assert_eq!(list[0].id, Some(CategoryId::from("1")));
        }
    }
}
