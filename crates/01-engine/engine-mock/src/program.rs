//! Fact-program parsing for the mock engine.

use engine_abi::EngineError;

/// One parsed, deduplicated fact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedFact {
    /// Predicate name, without arguments.
    pub name: String,
    /// Canonical rendering of the atom, without the terminating period.
    pub text: String,
}

fn parse_error(message: impl Into<String>) -> EngineError {
    EngineError::Parse {
        message: message.into(),
    }
}

/// Strips `%` line comments.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        match line.find('%') {
            Some(idx) => out.push_str(&line[..idx]),
            None => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

fn valid_predicate(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_statement(statement: &str) -> Result<ParsedFact, EngineError> {
    if statement.contains(":-") {
        return Err(parse_error(format!(
            "rules are not supported: `{statement}`"
        )));
    }
    let name = match statement.find('(') {
        Some(open) => {
            if !statement.ends_with(')') {
                return Err(parse_error(format!(
                    "unbalanced argument list in `{statement}`"
                )));
            }
            statement[..open].trim_end()
        }
        None => statement,
    };
    if !valid_predicate(name) {
        return Err(parse_error(format!(
            "invalid predicate name `{name}` in `{statement}`"
        )));
    }
    Ok(ParsedFact {
        name: name.to_string(),
        text: statement.to_string(),
    })
}

/// Parses a program consisting solely of facts.
///
/// Statements are period-terminated; repeated facts collapse to their first
/// occurrence, preserving order.
pub(crate) fn parse_facts(program: &str) -> Result<Vec<ParsedFact>, EngineError> {
    let stripped = strip_comments(program);
    let mut facts: Vec<ParsedFact> = Vec::new();
    let mut rest = stripped.as_str();

    loop {
        match rest.find('.') {
            Some(end) => {
                let statement = rest[..end].trim();
                rest = &rest[end + 1..];
                if statement.is_empty() {
                    continue;
                }
                let fact = parse_statement(statement)?;
                if !facts.iter().any(|known| known.text == fact.text) {
                    facts.push(fact);
                }
            }
            None => {
                let trailing = rest.trim();
                if !trailing.is_empty() {
                    return Err(parse_error(format!(
                        "statement `{trailing}` is missing its terminating `.`"
                    )));
                }
                break;
            }
        }
    }

    Ok(facts)
}
