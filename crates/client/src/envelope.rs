//! Response envelopes and list parameters
//!
//! Single resources come back as `{"data": {...}}`, lists as
//! `{"data": [...], "meta": {...}}`.

use authplatform_transport::RequestOptions;
use serde::{Deserialize, Serialize};

/// `{"data": T}`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Whether the server reports pages after this one.
    pub fn has_more(&self) -> bool {
        match (self.meta.current_page, self.meta.last_page) {
            (Some(current), Some(last)) => current < last,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
}

/// Query parameters shared by list endpoints. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub(crate) fn apply(self, options: RequestOptions) -> RequestOptions {
        options
            .query_opt("page", self.page)
            .query_opt("per_page", self.per_page)
            .query_opt("search", self.search)
            .query_opt("sort", self.sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authplatform_transport::Method;

    #[test]
    fn paginated_without_meta() {
        let page: Paginated<u32> = serde_json::from_str(r#"{"data":[1,2,3]}"#).unwrap();
        assert_eq!(page.data, vec![1, 2, 3]);
        assert_eq!(page.meta, PageMeta::default());
        assert!(!page.has_more());
    }

    #[test]
    fn paginated_has_more() {
        let page: Paginated<u32> = serde_json::from_str(
            r#"{"data":[],"meta":{"total":40,"per_page":20,"current_page":1,"last_page":2}}"#,
        )
        .unwrap();
        assert_eq!(page.meta.total, Some(40));
        assert!(page.has_more());
    }

    #[test]
    fn list_params_skip_unset_fields() {
        let prepared = ListParams::new()
            .page(2)
            .search("ada")
            .apply(RequestOptions::new())
            .prepare(Method::Get, "https://auth.example.com/users")
            .unwrap();
        assert_eq!(prepared.url().query(), Some("page=2&search=ada"));
    }
}
