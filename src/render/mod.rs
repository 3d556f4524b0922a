//! SQL text rendering for grant clauses and statements

pub mod grant;

pub use grant::{
    render_add_ldap_groups, render_drop_ldap_groups, render_grant_roles,
    render_grant_statement, render_privilege_clause, render_revoke_roles,
    render_revoke_statement,
};

pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Render a principal name, quoting it only when it is not a plain identifier.
///
/// Plain identifiers stay bare so the database applies its usual case folding.
/// `SCHEMA.ROLE` names schema-local roles when both parts are plain, and names
/// already written in double quotes are kept as written.
pub fn principal_ident(name: &str) -> String {
    let is_plain = |part: &str| {
        let mut chars = part.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '#' | '$'))
    };

    let quoted = name.len() >= 2 && name.starts_with('"') && name.ends_with('"');
    let qualified = name
        .split_once('.')
        .is_some_and(|(schema, role)| is_plain(schema) && is_plain(role));

    if quoted || qualified || is_plain(name) {
        name.to_string()
    } else {
        quote_ident(name)
    }
}
