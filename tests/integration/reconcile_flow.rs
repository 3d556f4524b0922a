use crate::helpers::catalog::{catalog_with_role, catalog_with_user, schema_privilege, system_privilege};
use anyhow::Result;
use grantsync::catalog::{observe_role, observe_user};
use grantsync::db::DryRunExecutor;
use grantsync::grantor::Grantor;
use grantsync::policy::ManagementPolicy;
use grantsync::reconcile::{DesiredGrants, plan, reconcile};
use grantsync::state::ManagedState;
use tempfile::TempDir;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_user_reconciliation_under_lax_policy() -> Result<()> {
    let catalog = catalog_with_user(
        "APP_USER",
        vec![
            schema_privilege("CREATE ANY", "APP_USER"),
            system_privilege("AUDIT ADMIN"),
            schema_privilege("SELECT", "SALES"),
            schema_privilege("INSERT", "SALES"),
        ],
        &["OLD_ROLE"],
    );
    let desired = DesiredGrants {
        privileges: strings(&["SELECT ON SCHEMA SALES", "CATALOG READ"]),
        roles: strings(&["MONITORING"]),
        ..Default::default()
    };
    let previous = strings(&["SELECT ON SCHEMA SALES", "INSERT ON SCHEMA SALES"]);

    let observed = observe_user(&catalog, "APP_USER").await?.expect("user exists");
    let grantor = Grantor::new(&catalog, "APP_USER");
    let outcome = reconcile(
        &grantor,
        "APP_USER",
        &desired,
        &observed,
        &previous,
        ManagementPolicy::Lax,
    )
    .await?;

    // AUDIT ADMIN and the default schema privilege are not managed and stay
    assert_eq!(
        catalog.executed(),
        vec![
            "REVOKE INSERT ON SCHEMA SALES FROM APP_USER",
            "GRANT CATALOG READ TO APP_USER",
            "REVOKE OLD_ROLE FROM APP_USER",
            "GRANT MONITORING TO APP_USER",
        ]
    );
    assert_eq!(outcome.managed, desired.privileges);
    Ok(())
}

#[tokio::test]
async fn test_strict_policy_revokes_unmanaged_privileges() -> Result<()> {
    let catalog = catalog_with_user(
        "APP_USER",
        vec![system_privilege("AUDIT ADMIN"), system_privilege("CATALOG READ")],
        &[],
    );
    let desired = DesiredGrants {
        privileges: strings(&["CATALOG READ"]),
        ..Default::default()
    };

    let observed = observe_user(&catalog, "APP_USER").await?.expect("user exists");
    let grantor = Grantor::new(&catalog, "APP_USER");
    reconcile(&grantor, "APP_USER", &desired, &observed, &[], ManagementPolicy::Strict).await?;

    assert_eq!(catalog.executed(), vec!["REVOKE AUDIT ADMIN FROM APP_USER"]);
    Ok(())
}

#[tokio::test]
async fn test_role_ldap_groups_follow_declaration() -> Result<()> {
    let catalog = catalog_with_role("READER", &["cn=old,dc=example"]);
    let desired = DesiredGrants {
        ldap_groups: strings(&["cn=readers,dc=example"]),
        ..Default::default()
    };

    let observed = observe_role(&catalog, "READER").await?.expect("role exists");
    let grantor = Grantor::new(&catalog, "ADMIN");
    reconcile(&grantor, "READER", &desired, &observed, &[], ManagementPolicy::Lax).await?;

    assert_eq!(
        catalog.executed(),
        vec![
            "ALTER ROLE READER DROP LDAP GROUP 'cn=old,dc=example'",
            "ALTER ROLE READER ADD LDAP GROUP 'cn=readers,dc=example'",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_dry_run_preview_matches_execution() -> Result<()> {
    let catalog = catalog_with_user("APP_USER", vec![], &[]);
    let desired = DesiredGrants {
        privileges: strings(&["INSERT ON ORDERS", "SELECT ON ORDERS", "CATALOG READ"]),
        ..Default::default()
    };
    let observed = observe_user(&catalog, "APP_USER").await?.expect("user exists");
    let pending = plan(&desired, &observed, &[], ManagementPolicy::Lax, "SALES");

    let dry_run = DryRunExecutor::new(&catalog);
    grantsync::reconcile::apply(&Grantor::new(&dry_run, "SALES"), "APP_USER", &pending).await?;
    let preview = dry_run.take();
    assert!(catalog.executed().is_empty());

    grantsync::reconcile::apply(&Grantor::new(&catalog, "SALES"), "APP_USER", &pending).await?;
    assert_eq!(preview, catalog.executed());
    insta::assert_debug_snapshot!(preview, @r#"
    [
        "GRANT CATALOG READ TO APP_USER",
        "GRANT INSERT, SELECT ON SALES.ORDERS TO APP_USER",
    ]
    "#);
    Ok(())
}

#[tokio::test]
async fn test_second_pass_revokes_dropped_declaration() -> Result<()> {
    let dir = TempDir::new()?;
    let state_path = dir.path().join(".grantsync").join("state.yaml");

    // First pass: CATALOG READ is declared and granted
    let catalog = catalog_with_user("APP_USER", vec![], &[]);
    let desired = DesiredGrants {
        privileges: strings(&["CATALOG READ"]),
        ..Default::default()
    };
    let observed = observe_user(&catalog, "APP_USER").await?.expect("user exists");
    let mut state = ManagedState::load(&state_path)?;
    let outcome = reconcile(
        &Grantor::new(&catalog, "APP_USER"),
        "APP_USER",
        &desired,
        &observed,
        state.get("APP_USER"),
        ManagementPolicy::Lax,
    )
    .await?;
    state.set("APP_USER", outcome.managed);
    state.save(&state_path)?;

    // Second pass: the declaration is gone, the catalog still shows the grant
    let catalog = catalog_with_user("APP_USER", vec![system_privilege("CATALOG READ")], &[]);
    let observed = observe_user(&catalog, "APP_USER").await?.expect("user exists");
    let state = ManagedState::load(&state_path)?;
    reconcile(
        &Grantor::new(&catalog, "APP_USER"),
        "APP_USER",
        &DesiredGrants::default(),
        &observed,
        state.get("APP_USER"),
        ManagementPolicy::Lax,
    )
    .await?;

    assert_eq!(catalog.executed(), vec!["REVOKE CATALOG READ FROM APP_USER"]);
    Ok(())
}
