/// Typed query description for document stores
///
/// A [`QuerySpec`] carries zero or more equality filters (ANDed together)
/// and zero or more order-by keys. Both backends filter on exact JSON
/// equality and apply the same stable multi-key sort, so ordering is
/// identical whether documents come from Postgres or the file fallback.
///
/// # Example
///
/// ```
/// use tasktrack_shared::store::{QuerySpec, SortDirection};
///
/// let spec = QuerySpec::new()
///     .filter("userId", "user-1")
///     .filter("status", "todo")
///     .order_by("createdAt", SortDirection::Descending);
///
/// assert_eq!(spec.filters.len(), 2);
/// ```
use std::cmp::Ordering;

use serde_json::{Map, Value};

/// Sort direction for one order-by key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One equality condition: `document[field] == value`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

/// One sort key
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// Filters and ordering for a collection query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub filters: Vec<Filter>,
    pub order_by: Vec<OrderBy>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter. Filters are ANDed.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a sort key; earlier keys take precedence.
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// True when the document satisfies every filter.
    pub fn matches(&self, document: &Value) -> bool {
        self.filters
            .iter()
            .all(|filter| document.get(&filter.field) == Some(&filter.value))
    }

    /// The filters as one JSON object, usable for JSONB containment.
    pub fn filter_object(&self) -> Value {
        let mut object = Map::new();
        for filter in &self.filters {
            object.insert(filter.field.clone(), filter.value.clone());
        }
        Value::Object(object)
    }
}

/// Compares two JSON field values: numbers numerically, strings
/// lexicographically. Values of different types order by type so the sort
/// stays total; missing fields compare as null.
pub fn compare_fields(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Stable multi-key sort: keys apply in listed order, ascending unless the
/// key says otherwise.
pub fn sort_documents(documents: &mut [Value], order_by: &[OrderBy]) {
    if order_by.is_empty() {
        return;
    }

    documents.sort_by(|a, b| {
        for key in order_by {
            let left = a.get(&key.field).unwrap_or(&Value::Null);
            let right = b.get(&key.field).unwrap_or(&Value::Null);

            let ordering = match key.direction {
                SortDirection::Ascending => compare_fields(left, right),
                SortDirection::Descending => compare_fields(right, left),
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}
