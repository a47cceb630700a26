//! Client-side search, status and date filters plus pagination over already-fetched records.
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::api::{AccessRequest, AccessStatus, Product, ProductStatus, Report, Role, UserProfile};

pub trait Listable {
    /// Text the search box matches against.
    fn search_text(&self) -> String;
    fn status(&self) -> Option<&'static str>;
    /// Instant used by the date range filter.
    fn timestamp(&self) -> Option<DateTime<Utc>>;
}

impl Listable for Product {
    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }

    fn status(&self) -> Option<&'static str> {
        Some(match self.status {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        })
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl Listable for AccessRequest {
    fn search_text(&self) -> String {
        format!("{} {}", self.product_name, self.user_email)
    }

    fn status(&self) -> Option<&'static str> {
        Some(match self.status {
            AccessStatus::Pending => "pending",
            AccessStatus::Approved => "approved",
            AccessStatus::Rejected => "rejected",
        })
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.requested_at)
    }
}

impl Listable for UserProfile {
    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.email)
    }

    fn status(&self) -> Option<&'static str> {
        Some(match self.role {
            Role::User => "user",
            Role::Admin => "admin",
        })
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Listable for Report {
    fn search_text(&self) -> String {
        format!("{} {}", self.title, self.kind)
    }

    fn status(&self) -> Option<&'static str> {
        None
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { search: None, status: None, from: None, to: None, page: 1, per_page: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl ListQuery {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Inclusive on both ends.
    pub fn between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    pub fn matches<T: Listable>(&self, item: &T) -> bool {
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if !item.search_text().to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(status) = self.status.as_deref() {
            if item.status() != Some(status) {
                return false;
            }
        }
        if self.from.is_some() || self.to.is_some() {
            let Some(ts) = item.timestamp() else {
                return false;
            };
            if self.from.is_some_and(|from| ts < from) || self.to.is_some_and(|to| ts > to) {
                return false;
            }
        }
        true
    }

    /// Filters, then slices out the requested page. Out-of-range pages are clamped.
    pub fn apply<'a, T: Listable>(&self, items: &'a [T]) -> Page<&'a T> {
        let filtered: Vec<&T> = items.iter().filter(|item| self.matches(*item)).collect();
        let per_page = self.per_page.max(1);
        let total_items = filtered.len();
        let total_pages = total_items.div_ceil(per_page).max(1);
        let page = self.page.clamp(1, total_pages);

        let items = filtered.into_iter().skip((page - 1) * per_page).take(per_page).collect();
        Page { items, page, total_pages, total_items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    /// Day `n` of May 2024, midnight UTC.
    fn day(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, n, 0, 0, 0).unwrap()
    }

    fn product(id: u64, name: &str, status: ProductStatus, created: u32) -> Product {
        Product { id, name: name.into(), description: format!("{name} suite"), status, created_at: day(created) }
    }

    fn catalogue() -> Vec<Product> {
        vec![
            product(1, "Atlas", ProductStatus::Active, 1),
            product(2, "Beacon", ProductStatus::Inactive, 2),
            product(3, "Compass", ProductStatus::Active, 3),
            product(4, "Atlas Pro", ProductStatus::Active, 4),
            product(5, "Delta", ProductStatus::Active, 5),
        ]
    }

    #[test]
    fn search_is_case_insensitive() {
        let items = catalogue();
        let page = ListQuery::default().search("atlas").apply(&items);
        let ids: Vec<u64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn blank_search_matches_everything() {
        let items = catalogue();
        assert_eq!(ListQuery::default().search("   ").apply(&items).total_items, 5);
    }

    #[test]
    fn status_and_date_range_combine() {
        let items = catalogue();
        let page = ListQuery::default()
            .status("active")
            .between(Some(day(1)), Some(day(4)))
            .apply(&items);
        let ids: Vec<u64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);

        // One second past the upper bound drops the last day.
        let page = ListQuery::default()
            .between(None, Some(day(4) - TimeDelta::seconds(1)))
            .apply(&items);
        assert_eq!(page.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn pagination_clamps_out_of_range_pages() {
        let items = catalogue();
        let page = ListQuery::default().page(9, 2).apply(&items);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 1);

        let page = ListQuery::default().page(0, 2).apply(&items);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let items = catalogue();
        let page = ListQuery::default().search("zebra").apply(&items);
        assert_eq!((page.total_items, page.total_pages, page.page), (0, 1, 1));
        assert!(page.items.is_empty());
    }

    #[test]
    fn undated_records_drop_out_of_date_filters() {
        let users = vec![
            UserProfile { id: 1, name: "A".into(), email: "a@x.io".into(), role: Role::Admin, created_at: None },
            UserProfile { id: 2, name: "B".into(), email: "b@x.io".into(), role: Role::User, created_at: Some(day(10)) },
        ];
        let page = ListQuery::default().between(Some(day(1)), None).apply(&users);
        assert_eq!(page.items.len(), 1);
        assert_eq!(ListQuery::default().status("admin").apply(&users).items[0].id, 1);
    }
}
