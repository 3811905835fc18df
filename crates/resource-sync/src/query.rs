//! # Resource Queries
//!
//! A [`ResourceQuery`] names a resource and describes what to read from it: either a page of
//! the collection (filters, sorters, pagination) or one record by id. Its [`QueryKey`] is the
//! structural identity of the request; the sync actor re-issues a subscription only when
//! the key (or the `enabled` flag) changes.
//!
//! Filter and sorter evaluation is also defined here so that every in-process backend
//! interprets parameters the same way.

use crate::record::{Record, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    In,
    Null,
    Nnull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    /// Evaluates the filter against one record. A missing field reads as `null`.
    pub fn matches(&self, record: &Record) -> bool {
        let field = record.get(&self.field).unwrap_or(&Value::Null);
        match self.operator {
            FilterOperator::Eq => loose_eq(field, &self.value),
            FilterOperator::Ne => !loose_eq(field, &self.value),
            FilterOperator::Lt => compare_values(field, &self.value) == Some(Ordering::Less),
            FilterOperator::Lte => matches!(
                compare_values(field, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOperator::Gt => compare_values(field, &self.value) == Some(Ordering::Greater),
            FilterOperator::Gte => matches!(
                compare_values(field, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOperator::Contains => contains(field, &self.value),
            FilterOperator::In => match &self.value {
                Value::Array(options) => options.iter().any(|o| loose_eq(field, o)),
                other => loose_eq(field, other),
            },
            FilterOperator::Null => field.is_null(),
            FilterOperator::Nnull => !field.is_null(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sorter {
    pub field: String,
    pub order: SortOrder,
}

impl Sorter {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Orders two records by this sorter. Missing and `null` values sort last in both
    /// directions; values that cannot be compared are treated as equal.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let left = a.get(&self.field).filter(|v| !v.is_null());
        let right = b.get(&self.field).filter(|v| !v.is_null());
        match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(l), Some(r)) => {
                let ord = compare_values(l, r).unwrap_or(Ordering::Equal);
                match self.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub page_size: u32,
    /// 1-based page number.
    pub current: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            current: 1,
        }
    }
}

impl Pagination {
    pub fn offset(&self) -> usize {
        self.current.saturating_sub(1) as usize * self.page_size as usize
    }
}

/// Parameters of a collection read, as handed to a data provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    pub filters: Vec<Filter>,
    pub sorters: Vec<Sorter>,
    pub pagination: Pagination,
}

impl ListParams {
    /// Applies filters (all must match), sorters (in order, stable) and pagination.
    pub fn apply<'a, I>(&self, records: I) -> Vec<Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut selected: Vec<&Record> = records
            .into_iter()
            .filter(|r| self.filters.iter().all(|f| f.matches(r)))
            .collect();
        if !self.sorters.is_empty() {
            selected.sort_by(|a, b| {
                self.sorters
                    .iter()
                    .map(|s| s.compare(a, b))
                    .find(|o| *o != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }
        selected
            .into_iter()
            .skip(self.pagination.offset())
            .take(self.pagination.page_size as usize)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryTarget {
    List,
    One(RecordId),
}

/// A read request against one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQuery {
    pub resource: String,
    pub target: QueryTarget,
    pub filters: Vec<Filter>,
    pub sorters: Vec<Sorter>,
    pub pagination: Pagination,
    /// While false the query is inert: no provider call, no state change out of idle.
    pub enabled: bool,
}

/// Structural identity of a query: resource plus serialized parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize)]
struct KeyParts<'a> {
    resource: &'a str,
    target: &'a QueryTarget,
    filters: &'a [Filter],
    sorters: &'a [Sorter],
    pagination: &'a Pagination,
}

impl ResourceQuery {
    pub fn list(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            target: QueryTarget::List,
            filters: Vec::new(),
            sorters: Vec::new(),
            pagination: Pagination::default(),
            enabled: true,
        }
    }

    pub fn one(resource: impl Into<String>, id: impl Into<RecordId>) -> Self {
        Self {
            target: QueryTarget::One(id.into()),
            ..Self::list(resource)
        }
    }

    pub fn filter(mut self, field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::new(field, operator, value));
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sorters.push(Sorter::new(field, order));
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.pagination.page_size = page_size;
        self
    }

    pub fn page(mut self, current: u32) -> Self {
        self.pagination.current = current.max(1);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn list_params(&self) -> ListParams {
        ListParams {
            filters: self.filters.clone(),
            sorters: self.sorters.clone(),
            pagination: self.pagination,
        }
    }

    pub fn key(&self) -> QueryKey {
        let parts = KeyParts {
            resource: &self.resource,
            target: &self.target,
            filters: &self.filters,
            sorters: &self.sorters,
            pagination: &self.pagination,
        };
        let serialized = serde_json::to_string(&parts).unwrap_or_else(|_| format!("{:?}", self));
        QueryKey(serialized)
    }
}

/// Equality used by filters. Strings compare equal to booleans and numbers with the same
/// textual value, since view code passes filter values as strings.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::String(s), Value::Bool(flag)) | (Value::Bool(flag), Value::String(s)) => {
            s.eq_ignore_ascii_case(if *flag { "true" } else { "false" })
        }
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            s.trim().parse::<f64>().ok() == n.as_f64()
        }
        _ => a == b,
    }
}

/// Ordering between two scalar values, or `None` when they are not comparable.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(n), Value::String(s)) => n.as_f64()?.partial_cmp(&s.trim().parse::<f64>().ok()?),
        (Value::String(s), Value::Number(n)) => s.trim().parse::<f64>().ok()?.partial_cmp(&n.as_f64()?),
        _ => None,
    }
}

fn contains(field: &Value, needle: &Value) -> bool {
    match (field, needle) {
        (Value::String(hay), Value::String(n)) => hay.to_lowercase().contains(&n.to_lowercase()),
        (Value::Array(items), n) => items.iter().any(|i| loose_eq(i, n)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record;
    use serde_json::json;

    fn fuelings() -> Vec<Record> {
        vec![
            record(json!({ "id": 1, "uid": "U1", "created_at": "2024-01-01" })),
            record(json!({ "id": 2, "uid": "U1", "created_at": "2024-02-01" })),
            record(json!({ "id": 3, "uid": "U2", "created_at": "2024-03-01" })),
        ]
    }

    fn ids(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .filter_map(RecordId::of)
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn filters_and_sorts_user_history() {
        let params = ResourceQuery::list("fuelings")
            .filter("uid", FilterOperator::Eq, "U1")
            .sort("created_at", SortOrder::Desc)
            .list_params();
        let result = params.apply(&fuelings());
        assert_eq!(ids(&result), vec!["2", "1"]);
    }

    #[test]
    fn string_filter_matches_boolean_field() {
        let active = record(json!({ "id": 1, "is_active": true }));
        let inactive = record(json!({ "id": 2, "is_active": false }));
        let filter = Filter::eq("is_active", "true");
        assert!(filter.matches(&active));
        assert!(!filter.matches(&inactive));
        assert!(Filter::eq("id", "1").matches(&active));
    }

    #[test]
    fn range_contains_in_and_null_operators() {
        let r = record(json!({ "amount": 42.5, "aircraft": "OH-ABC", "fuel": "jet-a", "note": null }));
        assert!(Filter::new("amount", FilterOperator::Gt, 40).matches(&r));
        assert!(Filter::new("amount", FilterOperator::Lte, 42.5).matches(&r));
        assert!(!Filter::new("amount", FilterOperator::Lt, 42.5).matches(&r));
        assert!(Filter::new("aircraft", FilterOperator::Contains, "oh-").matches(&r));
        assert!(Filter::new("fuel", FilterOperator::In, json!(["avgas", "jet-a"])).matches(&r));
        assert!(Filter::new("note", FilterOperator::Null, Value::Null).matches(&r));
        assert!(Filter::new("missing", FilterOperator::Null, Value::Null).matches(&r));
        assert!(Filter::new("fuel", FilterOperator::Nnull, Value::Null).matches(&r));
        assert!(Filter::new("fuel", FilterOperator::Ne, "avgas").matches(&r));
    }

    #[test]
    fn missing_sort_values_go_last_in_both_directions() {
        let records = vec![
            record(json!({ "id": 1 })),
            record(json!({ "id": 2, "severity": "high" })),
            record(json!({ "id": 3, "severity": "critical" })),
        ];
        let asc = ListParams {
            sorters: vec![Sorter::new("severity", SortOrder::Asc)],
            ..Default::default()
        };
        assert_eq!(ids(&asc.apply(&records)), vec!["3", "2", "1"]);
        let desc = ListParams {
            sorters: vec![Sorter::new("severity", SortOrder::Desc)],
            ..Default::default()
        };
        assert_eq!(ids(&desc.apply(&records)), vec!["2", "3", "1"]);
    }

    #[test]
    fn pagination_pages_through_results() {
        let records: Vec<Record> = (1..=25).map(|i| record(json!({ "id": i }))).collect();
        let page = ResourceQuery::list("alerts").page_size(10).page(3).list_params();
        assert_eq!(ids(&page.apply(&records)), vec!["21", "22", "23", "24", "25"]);
    }

    #[test]
    fn keys_follow_structure_not_enabled_flag() {
        let a = ResourceQuery::list("fuelings").filter("uid", FilterOperator::Eq, "U1");
        let b = ResourceQuery::list("fuelings")
            .filter("uid", FilterOperator::Eq, "U1")
            .enabled(false);
        let c = ResourceQuery::list("fuelings").filter("uid", FilterOperator::Eq, "U2");
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_ne!(ResourceQuery::one("sms", "1").key(), ResourceQuery::list("sms").key());
    }
}
