//! Graph resource infrastructure.
//!
//! - **[`GraphResource`] trait**: list/create/get/update/delete for an entity type
//! - **[`ResourceResponse<T>`]**: Deref-based wrapper carrying the HTTP status
//! - **Path building**: [`ResourcePath`] templates per [`ResourceOperation`]
//! - **[`ResourceError`]**: Error type for resource operations
//!
//! Entity types live in submodules named after their Graph namespace, e.g.
//! [`identity`] for `/identity/conditionalAccess/policies`.
//!
//! # Example
//!
//! ```rust,ignore
//! use msgraph_api::odata::Query;
//! use msgraph_api::resources::identity::ConditionalAccessPolicyClient;
//!
//! let client = ConditionalAccessPolicyClient::new(&token, &config)?;
//!
//! let policy = client.get("35e3e3bf-3c6f-4e5b-b4c4-5a5c6e3a8e2d", &Query::default()).await?;
//! println!("{:?} (status {})", policy.display_name, policy.status());
//!
//! let status = client.delete("35e3e3bf-3c6f-4e5b-b4c4-5a5c6e3a8e2d").await?;
//! assert_eq!(status, 204);
//! ```

mod errors;
mod path;
mod resource;
mod response;

pub mod identity;

pub use errors::ResourceError;
pub use path::{build_path, get_path, ResourceOperation, ResourcePath};
pub use resource::GraphResource;
pub use response::ResourceResponse;
