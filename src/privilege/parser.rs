//! Parser for the grant clause grammar
//!
//! A clause is split into whitespace-separated tokens, where a double-quoted
//! section (with `""` as the escaped quote) never splits. Keywords match
//! case-insensitively and only against unquoted tokens. Identifiers are kept
//! exactly as written, quotes included, so that a parsed clause renders back to
//! the text the database will accept.
//!
//! The grammar is an ordered list of rules tried most specific first:
//!
//! 1. `USERGROUP OPERATOR ON USERGROUP <name>`
//! 2. `USAGE ON CLIENTSIDE ENCRYPTION COLUMN KEY <name>`
//! 3. `<names> ON REMOTE SOURCE <name>`
//! 4. `<names> ON SCHEMA <name>`
//! 5. `<names> ON <schema>.<object>`
//! 6. `<names> ON <object>` (qualified with the default schema)
//! 7. `STRUCTURED PRIVILEGE <name>`
//! 8. `<names>` (system privilege)

use tracing::debug;

use super::{Privilege, PrivilegeType, normalize_names};
use crate::error::{GrantError, Result};

/// Parse a single grant clause.
///
/// `default_schema` qualifies object privileges written without a schema.
pub fn parse(raw: &str, default_schema: &str) -> Result<Privilege> {
    let unknown = || GrantError::UnknownPrivilege(raw.to_string());

    let tokens = tokenize(raw).ok_or_else(unknown)?;
    if tokens.is_empty() {
        return Err(unknown());
    }
    let clause = Clause { tokens };

    for rule in GRAMMAR.iter() {
        match (rule.matcher)(&clause, default_schema) {
            Outcome::Matched(privilege) => {
                debug!("Parsed {:?} as {} privilege", raw, rule.form);
                return Ok(privilege);
            }
            Outcome::Rejected => break,
            Outcome::NoMatch => continue,
        }
    }

    Err(unknown())
}

/// Parse every clause, stopping at the first one that does not match the grammar.
pub fn parse_all<S: AsRef<str>>(raws: &[S], default_schema: &str) -> Result<Vec<Privilege>> {
    raws.iter()
        .map(|raw| parse(raw.as_ref(), default_schema))
        .collect()
}

enum Outcome {
    Matched(Privilege),
    /// The clause has this rule's shape but is invalid; no later rule may claim it.
    Rejected,
    NoMatch,
}

struct GrammarRule {
    form: &'static str,
    matcher: fn(&Clause<'_>, &str) -> Outcome,
}

/// Rules in match priority. Several forms share the `<words> ON <words>` shape,
/// so a looser rule placed before a stricter one would claim its clauses.
/// `system` accepts any clause without `ON` and must stay last.
const GRAMMAR: [GrammarRule; 8] = [
    GrammarRule {
        form: "usergroup operator",
        matcher: usergroup_operator,
    },
    GrammarRule {
        form: "column key",
        matcher: column_key,
    },
    GrammarRule {
        form: "remote source",
        matcher: remote_source,
    },
    GrammarRule {
        form: "schema",
        matcher: schema,
    },
    GrammarRule {
        form: "qualified object",
        matcher: qualified_object,
    },
    GrammarRule {
        form: "object",
        matcher: object,
    },
    GrammarRule {
        form: "structured",
        matcher: structured,
    },
    GrammarRule {
        form: "system",
        matcher: system,
    },
];

struct Clause<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> Clause<'a> {
    /// Split at the first `ON` keyword into the names and the target tokens.
    fn split_on(&self) -> Option<(String, &[&'a str])> {
        let at = self.tokens.iter().position(|t| is_keyword(t, "ON"))?;
        let names = normalize_names(&self.tokens[..at].join(" "));
        if names.is_empty() {
            return None;
        }
        Some((names, &self.tokens[at + 1..]))
    }

    fn matches(&self, keywords: &[&str]) -> bool {
        self.tokens.len() == keywords.len() + 1
            && self
                .tokens
                .iter()
                .zip(keywords)
                .all(|(token, keyword)| is_keyword(token, keyword))
    }

    fn last(&self) -> &'a str {
        self.tokens[self.tokens.len() - 1]
    }
}

fn target_matches(target: &[&str], keywords: &[&str]) -> bool {
    target.len() == keywords.len() + 1
        && target
            .iter()
            .zip(keywords)
            .all(|(token, keyword)| is_keyword(token, keyword))
}

fn usergroup_operator(clause: &Clause<'_>, _: &str) -> Outcome {
    if clause.matches(&["USERGROUP", "OPERATOR", "ON", "USERGROUP"]) {
        return Outcome::Matched(Privilege::new(
            PrivilegeType::UserGroup,
            "USERGROUP OPERATOR",
            clause.last(),
        ));
    }
    Outcome::NoMatch
}

fn column_key(clause: &Clause<'_>, _: &str) -> Outcome {
    let Some((names, target)) = clause.split_on() else {
        return Outcome::NoMatch;
    };
    if !target_matches(target, &["CLIENTSIDE", "ENCRYPTION", "COLUMN", "KEY"]) {
        return Outcome::NoMatch;
    }
    // USAGE is the only privilege that exists on a column key.
    if !names.eq_ignore_ascii_case("USAGE") {
        return Outcome::Rejected;
    }
    Outcome::Matched(Privilege::new(
        PrivilegeType::ColumnKey,
        "USAGE",
        target[target.len() - 1],
    ))
}

fn remote_source(clause: &Clause<'_>, _: &str) -> Outcome {
    match clause.split_on() {
        Some((names, target)) if target_matches(target, &["REMOTE", "SOURCE"]) => {
            Outcome::Matched(Privilege::new(PrivilegeType::Source, names, target[2]))
        }
        _ => Outcome::NoMatch,
    }
}

fn schema(clause: &Clause<'_>, _: &str) -> Outcome {
    match clause.split_on() {
        Some((names, target)) if target_matches(target, &["SCHEMA"]) => {
            Outcome::Matched(Privilege::new(PrivilegeType::Schema, names, target[1]))
        }
        _ => Outcome::NoMatch,
    }
}

fn qualified_object(clause: &Clause<'_>, _: &str) -> Outcome {
    match clause.split_on() {
        Some((names, [target])) if has_unquoted_dot(target) => {
            Outcome::Matched(Privilege::new(PrivilegeType::Object, names, *target))
        }
        _ => Outcome::NoMatch,
    }
}

fn object(clause: &Clause<'_>, default_schema: &str) -> Outcome {
    match clause.split_on() {
        Some((names, [target])) => Outcome::Matched(Privilege::new(
            PrivilegeType::Object,
            names,
            format!("{}.{}", default_schema, target),
        )),
        _ => Outcome::NoMatch,
    }
}

fn structured(clause: &Clause<'_>, _: &str) -> Outcome {
    if clause.matches(&["STRUCTURED", "PRIVILEGE"]) {
        return Outcome::Matched(Privilege::new(
            PrivilegeType::Structured,
            "STRUCTURED PRIVILEGE",
            clause.last(),
        ));
    }
    Outcome::NoMatch
}

fn system(clause: &Clause<'_>, _: &str) -> Outcome {
    if clause.tokens.iter().any(|t| is_keyword(t, "ON")) {
        return Outcome::NoMatch;
    }
    let names = normalize_names(&clause.tokens.join(" "));
    if names.is_empty() {
        return Outcome::NoMatch;
    }
    Outcome::Matched(Privilege::system(names))
}

fn is_keyword(token: &str, keyword: &str) -> bool {
    !token.starts_with('"') && token.eq_ignore_ascii_case(keyword)
}

fn has_unquoted_dot(token: &str) -> bool {
    let mut in_quotes = false;
    for c in token.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '.' if !in_quotes => return true,
            _ => {}
        }
    }
    false
}

/// Split on whitespace outside double quotes. Returns `None` for an unterminated quote.
fn tokenize(raw: &str) -> Option<Vec<&str>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_quotes = false;

    for (idx, c) in raw.char_indices() {
        if c == '"' {
            // A doubled quote inside a quoted section toggles twice and stays quoted.
            in_quotes = !in_quotes;
            start.get_or_insert(idx);
        } else if c.is_whitespace() && !in_quotes {
            if let Some(begin) = start.take() {
                tokens.push(&raw[begin..idx]);
            }
        } else {
            start.get_or_insert(idx);
        }
    }

    if in_quotes {
        return None;
    }
    if let Some(begin) = start {
        tokens.push(&raw[begin..]);
    }
    Some(tokens)
}
