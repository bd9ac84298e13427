//! Parameterized query construction.
//!
//! SQLite binds single positional `?` placeholders only, so templates
//! spell list-valued filters as a bare `IN ?`. Before execution each
//! `IN ?` site is widened to `IN (?, ?, ...)` with one placeholder per
//! list element, and the mixed scalar/list parameter sequence is
//! flattened in its original order.

use landsat_common::{LandsatError, LandsatResult};

/// A filter parameter, scalar or list-valued.
#[derive(Debug, Clone)]
pub enum QueryParam {
    Int(i64),
    Real(f64),
    Text(String),
    IntList(Vec<i64>),
    TextList(Vec<String>),
}

/// A single flattened bind value.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Real(f64),
    Text(String),
}

/// Expand `IN ?` sites and flatten the parameter sequence.
///
/// The n-th list-valued parameter replaces the n-th remaining `IN ?`
/// occurrence, so lists and sites pair up in order of appearance. An
/// empty list, or a count mismatch between lists and `IN ?` sites, is
/// a configuration error reported before any SQL runs.
pub fn expand(template: &str, params: Vec<QueryParam>) -> LandsatResult<(String, Vec<BindValue>)> {
    let list_lens: Vec<usize> = params
        .iter()
        .filter_map(|p| match p {
            QueryParam::IntList(v) => Some(v.len()),
            QueryParam::TextList(v) => Some(v.len()),
            _ => None,
        })
        .collect();

    let sites = template.matches("IN ?").count();
    if sites != list_lens.len() {
        return Err(LandsatError::PlaceholderMismatch {
            lists: list_lens.len(),
            sites,
        });
    }
    if list_lens.iter().any(|&n| n == 0) {
        return Err(LandsatError::EmptyListParameter);
    }

    let mut query = template.to_string();
    for n in list_lens {
        let placeholders = vec!["?"; n].join(", ");
        query = query.replacen("IN ?", &format!("IN ({})", placeholders), 1);
    }

    let mut values = Vec::new();
    for param in params {
        match param {
            QueryParam::Int(v) => values.push(BindValue::Int(v)),
            QueryParam::Real(v) => values.push(BindValue::Real(v)),
            QueryParam::Text(v) => values.push(BindValue::Text(v)),
            QueryParam::IntList(list) => values.extend(list.into_iter().map(BindValue::Int)),
            QueryParam::TextList(list) => values.extend(list.into_iter().map(BindValue::Text)),
        }
    }

    Ok((query, values))
}
