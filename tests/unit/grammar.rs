//! Parsing and grouping through the public API

use grantsync::GrantError;
use grantsync::privilege::{Privilege, PrivilegeType, group, parse, parse_all};
use rstest::rstest;

#[rstest]
#[case::system("CATALOG READ", PrivilegeType::System, "CATALOG READ", "")]
#[case::schema("select on schema sales", PrivilegeType::Schema, "select", "sales")]
#[case::qualified_object("SELECT ON SALES.ORDERS", PrivilegeType::Object, "SELECT", "SALES.ORDERS")]
#[case::unqualified_object("DELETE ON ORDERS", PrivilegeType::Object, "DELETE", "APP.ORDERS")]
#[case::remote_source(
    "CREATE VIRTUAL TABLE ON REMOTE SOURCE HADOOP",
    PrivilegeType::Source,
    "CREATE VIRTUAL TABLE",
    "HADOOP"
)]
#[case::structured("STRUCTURED PRIVILEGE AP_REGION", PrivilegeType::Structured, "STRUCTURED PRIVILEGE", "AP_REGION")]
fn test_parse(
    #[case] raw: &str,
    #[case] privilege_type: PrivilegeType,
    #[case] name: &str,
    #[case] identifier: &str,
) {
    let privilege = parse(raw, "APP").unwrap();
    assert_eq!(privilege, Privilege::new(privilege_type, name, identifier));
}

#[test]
fn test_parse_all_reports_first_failure_verbatim() {
    let err = parse_all(
        &["SELECT", "INSERT ON CLIENTSIDE ENCRYPTION COLUMN KEY K", "ALTER ON CLIENTSIDE ENCRYPTION COLUMN KEY K"],
        "APP",
    )
    .unwrap_err();

    assert!(
        matches!(err, GrantError::UnknownPrivilege(ref raw) if raw == "INSERT ON CLIENTSIDE ENCRYPTION COLUMN KEY K")
    );
}

#[test]
fn test_grouping_is_order_independent() {
    let clauses = [
        "UPDATE ON SALES.ORDERS",
        "SELECT ON SCHEMA SALES",
        "CREATE ANY",
        "DELETE ON SALES.ORDERS",
        "INSERT ON SCHEMA SALES",
        "CATALOG READ",
    ];
    let mut reversed = clauses;
    reversed.reverse();

    let forward = group(&parse_all(&clauses, "APP").unwrap());
    let backward = group(&parse_all(&reversed, "APP").unwrap());

    assert_eq!(forward, backward);
    insta::assert_debug_snapshot!(forward, @r#"
    [
        "CATALOG READ, CREATE ANY",
        "INSERT, SELECT ON SCHEMA SALES",
        "DELETE, UPDATE ON SALES.ORDERS",
    ]
    "#);
}
