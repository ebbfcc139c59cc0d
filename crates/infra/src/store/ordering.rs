//! Cross-type ordering of JSON field values, as document stores sort them:
//! missing/null < numbers < strings < objects < arrays < booleans.

use std::cmp::Ordering;

use serde_json::Value;

use househunter_core::{HouseDocument, SortOrder, SortSpec};

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

/// Total order over optional field values.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let by_rank = type_rank(a).cmp(&type_rank(b));
    if by_rank != Ordering::Equal {
        return by_rank;
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x @ (Value::Object(_) | Value::Array(_))), Some(y)) => x.to_string().cmp(&y.to_string()),
        _ => Ordering::Equal,
    }
}

/// Stable sort of `docs` by one field. Ties keep their incoming order.
pub fn sort_documents(docs: Vec<HouseDocument>, spec: &SortSpec) -> Vec<HouseDocument> {
    let mut keyed: Vec<(Option<Value>, HouseDocument)> = docs
        .into_iter()
        .map(|doc| (doc.field(&spec.field), doc))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ord = compare_values(a.as_ref(), b.as_ref());
        match spec.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    keyed.into_iter().map(|(_, doc)| doc).collect()
}
