//! Management policy semantics as seen by a caller of the library

use grantsync::catalog::{RoleObservation, UserObservation};
use grantsync::policy::{ManagementPolicy, default_privilege, filter};
use grantsync::GrantError;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_lax_filter_passes_other_fields_through() {
    let observed = RoleObservation {
        name: "READER".to_string(),
        schema: Some("SALES".to_string()),
        ldap_groups: strings(&["cn=readers"]),
        privileges: strings(&["SELECT ON SCHEMA SALES", "AUDIT ADMIN"]),
        roles: strings(&["MONITORING"]),
    };

    let filtered = filter(
        Some(&observed),
        &strings(&["SELECT ON SCHEMA SALES"]),
        &[],
        "lax",
        "SALES",
    )
    .unwrap();

    assert_eq!(filtered.privileges, strings(&["SELECT ON SCHEMA SALES"]));
    assert_eq!(filtered.ldap_groups, observed.ldap_groups);
    assert_eq!(filtered.roles, observed.roles);
    assert_eq!(filtered.schema, observed.schema);
}

#[test]
fn test_policy_is_checked_before_observation() {
    let err = filter::<UserObservation>(None, &[], &[], "permissive", "APP").unwrap_err();
    assert!(matches!(err, GrantError::UnknownPolicy(_)));
}

#[test]
fn test_default_privilege_names_the_schema() {
    assert_eq!(default_privilege("APP_USER"), "CREATE ANY ON SCHEMA APP_USER");
    assert_eq!("strict".parse::<ManagementPolicy>().unwrap(), ManagementPolicy::Strict);
}
