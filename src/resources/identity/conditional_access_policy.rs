//! Conditional access policy resource.
//!
//! Conditional access policies live under
//! `/identity/conditionalAccess/policies` and are served from the **beta**
//! Graph endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use msgraph_api::odata::Query;
//! use msgraph_api::resources::identity::{
//!     ConditionalAccessPolicy, ConditionalAccessPolicyClient, ConditionalAccessPolicyState,
//! };
//!
//! let client = ConditionalAccessPolicyClient::new(&token, &config)?;
//!
//! // List all policies
//! let policies = client.list(&Query::default()).await?;
//! for policy in policies.iter() {
//!     println!("{:?}: {:?}", policy.display_name, policy.state);
//! }
//!
//! // Create, then disable
//! let policy = ConditionalAccessPolicy {
//!     display_name: Some("Require MFA for admins".to_string()),
//!     state: Some(ConditionalAccessPolicyState::EnabledForReportingButNotEnforced),
//!     ..Default::default()
//! };
//! let mut created = client.create(&policy).await?.into_inner();
//! created.state = Some(ConditionalAccessPolicyState::Disabled);
//! client.update(&created).await?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::auth::AccessToken;
use crate::clients::{GraphClient, HttpMethod};
use crate::config::{ApiVersion, GraphConfig};
use crate::odata::Query;
use crate::resources::{
    GraphResource, ResourceError, ResourceOperation, ResourcePath, ResourceResponse,
};

/// Whether a policy is enforced.
///
/// States this SDK does not know are kept verbatim in
/// [`ConditionalAccessPolicyState::Other`] and sent back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ConditionalAccessPolicyState {
    /// The policy is evaluated and enforced.
    Enabled,
    /// The policy is not evaluated.
    Disabled,
    /// Evaluated and logged at sign-in, never enforced.
    EnabledForReportingButNotEnforced,
    /// A state value not modelled by this SDK.
    #[serde(untagged)]
    Other(String),
}

/// A conditional access policy.
///
/// # Fields
///
/// ## Read-Only Fields
/// - `created_date_time` - When the policy was created
/// - `modified_date_time` - When the policy was last modified
///
/// ## Identifier
/// - `id` - Assigned by Graph on create, required by update
///
/// ## Writable Fields
/// - `display_name` - The name shown in the portal
/// - `state` - Whether the policy is enforced
/// - `conditions` - Who and what the policy applies to
/// - `grant_controls` - What must be satisfied to be granted access
/// - `session_controls` - Restrictions applied to the signed-in session
///
/// Properties this type does not model are kept in `additional` and sent
/// back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalAccessPolicy {
    /// The policy's object ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The name of the policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Whether the policy is enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ConditionalAccessPolicyState>,

    /// When the policy was created.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub created_date_time: Option<DateTime<Utc>>,

    /// When the policy was last modified.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub modified_date_time: Option<DateTime<Utc>>,

    /// Who and what the policy applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<ConditionalAccessConditionSet>,

    /// What must be satisfied to be granted access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_controls: Option<ConditionalAccessGrantControls>,

    /// Restrictions applied to the session after access is granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_controls: Option<ConditionalAccessSessionControls>,

    /// Unmodelled properties. OData annotations are dropped when sending.
    #[serde(flatten, serialize_with = "serialize_without_annotations")]
    pub additional: Map<String, Value>,
}

fn serialize_without_annotations<S: Serializer>(
    properties: &Map<String, Value>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        properties
            .iter()
            .filter(|(key, _)| !key.starts_with("@odata.")),
    )
}

/// The conditions under which a policy applies.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalAccessConditionSet {
    /// Cloud apps and user actions in scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications: Option<ConditionalAccessApplications>,

    /// Users, groups and roles in scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<ConditionalAccessUsers>,

    /// Client application types in scope.
    /// For example `browser`, `mobileAppsAndDesktopClients`,
    /// `exchangeActiveSync` or `all`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_app_types: Option<Vec<String>>,

    /// Device platforms in scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<ConditionalAccessPlatforms>,

    /// Named locations in scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<ConditionalAccessLocations>,

    /// Sign-in risk levels in scope (`low`, `medium`, `high`, `none`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_in_risk_levels: Option<Vec<String>>,

    /// User risk levels in scope (`low`, `medium`, `high`, `none`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_risk_levels: Option<Vec<String>>,
}

/// Cloud apps and user actions in scope.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalAccessApplications {
    /// Application IDs, or `All` / `Office365` / `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_applications: Option<Vec<String>>,

    /// Application IDs excluded from the policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_applications: Option<Vec<String>>,

    /// User actions in scope, such as `urn:user:registersecurityinfo`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_user_actions: Option<Vec<String>>,
}

/// Users, groups and directory roles in scope.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalAccessUsers {
    /// User IDs, or `All` / `GuestsOrExternalUsers` / `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_users: Option<Vec<String>>,

    /// User IDs excluded from the policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_users: Option<Vec<String>>,

    /// Group IDs in scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_groups: Option<Vec<String>>,

    /// Group IDs excluded from the policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_groups: Option<Vec<String>>,

    /// Directory role template IDs in scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_roles: Option<Vec<String>>,

    /// Directory role template IDs excluded from the policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_roles: Option<Vec<String>>,
}

/// Device platforms in scope.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalAccessPlatforms {
    /// Platforms in scope, such as `android`, `iOS`, `windows` or `all`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_platforms: Option<Vec<String>>,

    /// Platforms excluded from the policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_platforms: Option<Vec<String>>,
}

/// Named locations in scope.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalAccessLocations {
    /// Named location IDs, or `All` / `AllTrusted`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_locations: Option<Vec<String>>,

    /// Named location IDs excluded from the policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_locations: Option<Vec<String>>,
}

/// Controls that must be satisfied to grant access.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalAccessGrantControls {
    /// How the controls combine: `AND` or `OR`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    /// Built-in controls.
    /// For example `block`, `mfa`, `compliantDevice` or `domainJoinedDevice`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_in_controls: Option<Vec<String>>,

    /// Custom authentication factor IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_authentication_factors: Option<Vec<String>>,

    /// Terms of use agreement IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_use: Option<Vec<String>>,
}

/// Controls applied to the session after access is granted.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalAccessSessionControls {
    /// Pass device information to the application for limited access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_enforced_restrictions: Option<ApplicationEnforcedRestrictionsSessionControl>,

    /// Route the session through Cloud App Security.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_app_security: Option<CloudAppSecuritySessionControl>,

    /// Whether browser sessions persist after closing the browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_browser: Option<PersistentBrowserSessionControl>,

    /// How often users must sign in again.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_in_frequency: Option<SignInFrequencySessionControl>,
}

/// Application enforced restrictions session control.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationEnforcedRestrictionsSessionControl {
    /// Whether the control is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

/// Cloud App Security session control.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CloudAppSecuritySessionControl {
    /// Whether the control is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,

    /// The Cloud App Security policy.
    /// For example `mcasConfigured`, `monitorOnly` or `blockDownloads`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_app_security_type: Option<String>,
}

/// Persistent browser session control.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistentBrowserSessionControl {
    /// Whether the control is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,

    /// `always` or `never`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Sign-in frequency session control.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignInFrequencySessionControl {
    /// Whether the control is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,

    /// Unit of `value`: `days` or `hours`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub frequency_type: Option<String>,

    /// Number of days or hours between sign-ins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

impl GraphResource for ConditionalAccessPolicy {
    const NAME: &'static str = "ConditionalAccessPolicy";
    const API_VERSION: ApiVersion = ApiVersion::Beta;

    const PATHS: &'static [ResourcePath] = &[
        ResourcePath::new(
            HttpMethod::Get,
            ResourceOperation::List,
            &[],
            "identity/conditionalAccess/policies",
        ),
        ResourcePath::new(
            HttpMethod::Post,
            ResourceOperation::Create,
            &[],
            "identity/conditionalAccess/policies",
        ),
        ResourcePath::new(
            HttpMethod::Get,
            ResourceOperation::Get,
            &["id"],
            "identity/conditionalAccess/policies/{id}",
        ),
        ResourcePath::new(
            HttpMethod::Patch,
            ResourceOperation::Update,
            &["id"],
            "identity/conditionalAccess/policies/{id}",
        ),
        ResourcePath::new(
            HttpMethod::Delete,
            ResourceOperation::Delete,
            &["id"],
            "identity/conditionalAccess/policies/{id}",
        ),
    ];

    fn get_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Client for conditional access policies in one tenant.
///
/// Bound to the beta API version regardless of the configured default.
///
/// # Thread Safety
///
/// `ConditionalAccessPolicyClient` is `Send + Sync`.
#[derive(Debug)]
pub struct ConditionalAccessPolicyClient {
    base_client: GraphClient,
}

// Verify ConditionalAccessPolicyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConditionalAccessPolicyClient>();
};

impl ConditionalAccessPolicyClient {
    /// Creates a client for the tenant in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Graph`] if the HTTP client cannot be initialized.
    pub fn new(token: &AccessToken, config: &GraphConfig) -> Result<Self, ResourceError> {
        let base_client =
            GraphClient::with_version(token, config, ConditionalAccessPolicy::API_VERSION)?;
        Ok(Self { base_client })
    }

    /// Returns the underlying base client.
    #[must_use]
    pub const fn base_client(&self) -> &GraphClient {
        &self.base_client
    }

    /// Lists policies. All pages are fetched unless `query.top` is set.
    ///
    /// # Errors
    ///
    /// See [`GraphResource::list`].
    pub async fn list(
        &self,
        query: &Query,
    ) -> Result<ResourceResponse<Vec<ConditionalAccessPolicy>>, ResourceError> {
        ConditionalAccessPolicy::list(&self.base_client, query).await
    }

    /// Creates a policy, returning it with its server-assigned ID.
    ///
    /// # Errors
    ///
    /// See [`GraphResource::create`].
    pub async fn create(
        &self,
        policy: &ConditionalAccessPolicy,
    ) -> Result<ResourceResponse<ConditionalAccessPolicy>, ResourceError> {
        policy.create(&self.base_client).await
    }

    /// Fetches a policy by ID.
    ///
    /// # Errors
    ///
    /// See [`GraphResource::get`].
    pub async fn get(
        &self,
        id: &str,
        query: &Query,
    ) -> Result<ResourceResponse<ConditionalAccessPolicy>, ResourceError> {
        ConditionalAccessPolicy::get(&self.base_client, id, query).await
    }

    /// Updates a policy. Its `id` must be set.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without sending a request when
    /// `policy.id` is `None`; otherwise see [`GraphResource::update`].
    pub async fn update(&self, policy: &ConditionalAccessPolicy) -> Result<u16, ResourceError> {
        policy.update(&self.base_client).await
    }

    /// Deletes a policy by ID.
    ///
    /// # Errors
    ///
    /// See [`GraphResource::delete`].
    pub async fn delete(&self, id: &str) -> Result<u16, ResourceError> {
        ConditionalAccessPolicy::delete(&self.base_client, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TenantId;
    use crate::resources::get_path;
    use serde_json::json;

    fn sample_policy_json() -> Value {
        json!({
            "@odata.context": "https://graph.microsoft.com/beta/$metadata#identity/conditionalAccess/policies/$entity",
            "id": "35e3e3bf-3c6f-4e5b-b4c4-5a5c6e3a8e2d",
            "displayName": "Require MFA for admins",
            "createdDateTime": "2024-03-01T10:15:30.123Z",
            "modifiedDateTime": null,
            "state": "enabledForReportingButNotEnforced",
            "conditions": {
                "clientAppTypes": ["all"],
                "signInRiskLevels": [],
                "applications": {
                    "includeApplications": ["All"],
                    "excludeApplications": [],
                    "includeUserActions": []
                },
                "users": {
                    "includeUsers": [],
                    "excludeUsers": [],
                    "includeGroups": [],
                    "excludeGroups": [],
                    "includeRoles": ["62e90394-69f5-4237-9190-012177145e10"],
                    "excludeRoles": []
                },
                "platforms": null,
                "locations": null
            },
            "grantControls": {
                "operator": "OR",
                "builtInControls": ["mfa"],
                "customAuthenticationFactors": [],
                "termsOfUse": []
            },
            "sessionControls": {
                "signInFrequency": {"value": 4, "type": "hours", "isEnabled": true}
            }
        })
    }

    #[test]
    fn test_policy_deserialization() {
        let policy: ConditionalAccessPolicy = serde_json::from_value(sample_policy_json()).unwrap();

        assert_eq!(
            policy.id.as_deref(),
            Some("35e3e3bf-3c6f-4e5b-b4c4-5a5c6e3a8e2d")
        );
        assert_eq!(
            policy.state,
            Some(ConditionalAccessPolicyState::EnabledForReportingButNotEnforced)
        );
        assert!(policy.created_date_time.is_some());
        assert!(policy.modified_date_time.is_none());

        let conditions = policy.conditions.as_ref().unwrap();
        assert_eq!(conditions.client_app_types, Some(vec!["all".to_string()]));
        assert!(conditions.platforms.is_none());
        assert_eq!(
            conditions.users.as_ref().unwrap().include_roles,
            Some(vec!["62e90394-69f5-4237-9190-012177145e10".to_string()])
        );

        let frequency = policy
            .session_controls
            .as_ref()
            .and_then(|s| s.sign_in_frequency.as_ref())
            .unwrap();
        assert_eq!(frequency.frequency_type.as_deref(), Some("hours"));
        assert_eq!(frequency.value, Some(4));
    }

    #[test]
    fn test_unknown_state_is_kept_verbatim() {
        let policy: ConditionalAccessPolicy =
            serde_json::from_value(json!({"id": "p1", "state": "enabledForTesting"})).unwrap();

        assert_eq!(
            policy.state,
            Some(ConditionalAccessPolicyState::Other(
                "enabledForTesting".to_string()
            ))
        );
        assert_eq!(
            serde_json::to_value(&policy).unwrap()["state"],
            "enabledForTesting"
        );

        let known: ConditionalAccessPolicyState = serde_json::from_value(json!("disabled")).unwrap();
        assert_eq!(known, ConditionalAccessPolicyState::Disabled);
    }

    #[test]
    fn test_policy_serialization_omits_read_only_and_unset_fields() {
        let policy: ConditionalAccessPolicy = serde_json::from_value(sample_policy_json()).unwrap();
        let value = serde_json::to_value(&policy).unwrap();

        assert!(value.get("createdDateTime").is_none());
        assert!(value.get("modifiedDateTime").is_none());
        assert_eq!(value["displayName"], "Require MFA for admins");
        assert_eq!(value["state"], "enabledForReportingButNotEnforced");
        assert_eq!(value["grantControls"]["builtInControls"], json!(["mfa"]));
        assert!(value["conditions"].get("platforms").is_none());
        assert_eq!(value["sessionControls"]["signInFrequency"]["type"], "hours");
    }

    #[test]
    fn test_unknown_properties_are_preserved() {
        let mut raw = sample_policy_json();
        raw["templateId"] = json!("tmpl-1");

        let policy: ConditionalAccessPolicy = serde_json::from_value(raw).unwrap();
        assert_eq!(policy.additional.get("templateId"), Some(&json!("tmpl-1")));

        let value = serde_json::to_value(&policy).unwrap();
        assert_eq!(value["templateId"], "tmpl-1");
        assert!(value.get("@odata.context").is_none());
    }

    #[test]
    fn test_new_policy_serializes_without_id() {
        let policy = ConditionalAccessPolicy {
            display_name: Some("Block legacy auth".to_string()),
            state: Some(ConditionalAccessPolicyState::Disabled),
            ..Default::default()
        };

        let value = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            value,
            json!({"displayName": "Block legacy auth", "state": "disabled"})
        );
        assert!(policy.get_id().is_none());
    }

    #[test]
    fn test_policy_paths() {
        let list = get_path(ConditionalAccessPolicy::PATHS, ResourceOperation::List, &[]).unwrap();
        assert_eq!(list.template, "identity/conditionalAccess/policies");
        assert_eq!(list.http_method, HttpMethod::Get);

        let create =
            get_path(ConditionalAccessPolicy::PATHS, ResourceOperation::Create, &[]).unwrap();
        assert_eq!(create.http_method, HttpMethod::Post);

        for operation in [
            ResourceOperation::Get,
            ResourceOperation::Update,
            ResourceOperation::Delete,
        ] {
            let path = get_path(ConditionalAccessPolicy::PATHS, operation, &["id"]).unwrap();
            assert_eq!(path.template, "identity/conditionalAccess/policies/{id}");
            assert_eq!(path.http_method, operation.http_method());
        }

        // Item operations need an ID
        assert!(get_path(ConditionalAccessPolicy::PATHS, ResourceOperation::Update, &[]).is_none());
    }

    #[test]
    fn test_client_binds_beta() {
        let config = GraphConfig::builder()
            .tenant_id(TenantId::new("contoso").unwrap())
            .build()
            .unwrap();
        let client = ConditionalAccessPolicyClient::new(&AccessToken::new("t"), &config).unwrap();

        assert_eq!(client.base_client().api_version(), ApiVersion::Beta);
        assert_eq!(client.base_client().tenant_id().as_ref(), "contoso");
    }

    #[tokio::test]
    async fn test_update_without_id_fails_locally() {
        let config = GraphConfig::builder()
            .tenant_id(TenantId::new("contoso").unwrap())
            .build()
            .unwrap();
        let client = ConditionalAccessPolicyClient::new(&AccessToken::new("t"), &config).unwrap();

        let result = client.update(&ConditionalAccessPolicy::default()).await;

        match result {
            Err(error @ ResourceError::MissingId { .. }) => {
                assert_eq!(
                    error.to_string(),
                    "cannot update ConditionalAccessPolicy with nil ID"
                );
            }
            other => panic!("Expected MissingId, got {other:?}"),
        }
    }
}
