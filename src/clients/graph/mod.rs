//! Base client for Microsoft Graph endpoints.
//!
//! This module provides the shared client every endpoint client is built on,
//! layered over [`HttpClient`](crate::clients::HttpClient).
//!
//! # Overview
//!
//! - [`GraphClient`]: `get()`, `post()`, `patch()`, `delete()` against a [`Uri`]
//! - [`Uri`]: Entity path, query parameters and tenant scoping
//! - [`RequestOptions`]: Valid status codes, consistency hook, paging, headers
//! - [`GraphError`]: Error type for base client operations
//!
//! # Tenant scoping
//!
//! Tenant-scoped URIs resolve to `{endpoint}/{version}/{tenant}/{entity}`,
//! e.g. `https://graph.microsoft.com/beta/contoso/identity/conditionalAccess/policies`.
//!
//! # Paging
//!
//! GET requests follow `@odata.nextLink` and concatenate every page's `value`
//! array into the first response. Set [`RequestOptions::disable_paging`] to
//! receive only the first page.

mod client;
mod errors;

pub use client::{GraphClient, RequestOptions, Uri};
pub use errors::GraphError;
