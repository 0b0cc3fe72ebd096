//! Identity and access resources (`/identity/...`).
//!
//! - [`ConditionalAccessPolicy`] and its condition/control types
//! - [`ConditionalAccessPolicyClient`] for list/create/get/update/delete

mod conditional_access_policy;

pub use conditional_access_policy::{
    ApplicationEnforcedRestrictionsSessionControl, CloudAppSecuritySessionControl,
    ConditionalAccessApplications, ConditionalAccessConditionSet, ConditionalAccessGrantControls,
    ConditionalAccessLocations, ConditionalAccessPlatforms, ConditionalAccessPolicy,
    ConditionalAccessPolicyClient, ConditionalAccessPolicyState,
    ConditionalAccessSessionControls, ConditionalAccessUsers, PersistentBrowserSessionControl,
    SignInFrequencySessionControl,
};
