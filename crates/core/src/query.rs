//! Listing query: optional city filter plus optional single-field sort.

use core::str::FromStr;

use crate::error::DomainError;

/// Sort direction of a listing query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    /// Accepts the spellings document stores commonly accept:
    /// `asc`/`ascending`/`1` and `desc`/`descending`/`-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(Self::Asc),
            "desc" | "descending" | "-1" => Ok(Self::Desc),
            other => Err(DomainError::validation(format!(
                "sortOrder must be one of asc, desc, 1, -1 (got '{other}')"
            ))),
        }
    }
}

/// Sort on one top-level document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

/// Filter and ordering for listing houses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HouseQuery {
    /// Exact match on `city`.
    pub city: Option<String>,
    pub sort: Option<SortSpec>,
}

impl HouseQuery {
    /// Build a query from raw query-string values.
    ///
    /// Empty strings count as absent. A sort is applied only when both the
    /// field and the direction are given.
    pub fn from_params(
        city: Option<&str>,
        sort_field: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<Self, DomainError> {
        let present = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);

        let sort = match (present(sort_field), present(sort_order)) {
            (Some(field), Some(order)) => Some(SortSpec {
                field,
                order: order.parse()?,
            }),
            _ => None,
        };

        Ok(Self {
            city: present(city),
            sort,
        })
    }
}
