use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::{
    constants::api::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE},
    error::Error,
};

// NOTE: we use i64 because the db uses i64
/// Page parameters of a history request, with defaults applied
///
/// The query parameters used for the requests are the ones described in [`PageQuery`].
/// Range validation is left to the history service.
#[derive(Debug, PartialEq, Eq)]
pub struct PageParams {
    pub page_number: i64,
    pub page_size: i64,
}

impl From<PageQuery> for PageParams {
    fn from(value: PageQuery) -> Self {
        Self {
            page_number: value.page_number.unwrap_or(DEFAULT_PAGE_NUMBER),
            page_size: value.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// Page query parameters for the history endpoints
///
/// Parameters:
/// * `pageNumber`: 1-based page to respond with (defaults to [`DEFAULT_PAGE_NUMBER`])
/// * `pageSize`: the maximum amount of items in the page (defaults to [`DEFAULT_PAGE_SIZE`])
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    page_number: Option<i64>,
    page_size: Option<i64>,
}

impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| Error::InvalidPageRequest(rejection.body_text()))?;

        Ok(query.0.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_per_parameter() {
        let params: PageParams = PageQuery {
            page_number: None,
            page_size: Some(5),
        }
        .into();

        assert_eq!(
            params,
            PageParams {
                page_number: DEFAULT_PAGE_NUMBER,
                page_size: 5
            }
        );
    }
}
