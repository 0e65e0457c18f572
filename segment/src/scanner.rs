//! Boundary search: walk the text one code point at a time and ask the rule
//! table whether each position is a boundary.
use unicorn_core::{Error, Result, Text};

use crate::classify::Classifier;
use crate::pikevm::{Direction, Simulator};
use crate::rules::{Rule, RuleTable};

/// Does `rule` match at `position`? The right context is only tried once
/// the left context has matched.
pub fn rule_fires<C: Classifier + ?Sized>(
    rule: &Rule,
    table: &RuleTable,
    text: Text<'_>,
    classifier: &C,
    position: usize,
) -> Result<bool> {
    let kind = table.kind();
    if !Simulator::new(&rule.left, text, classifier, kind).run(position, Direction::Backward)? {
        return Ok(false);
    }
    Simulator::new(&rule.right, text, classifier, kind).run(position, Direction::Forward)
}

/// First rule of the table that fires at `position`.
fn deciding_rule<'t, C: Classifier + ?Sized>(
    table: &'t RuleTable,
    text: Text<'_>,
    classifier: &C,
    position: usize,
) -> Result<&'t Rule> {
    for rule in table.rules() {
        if rule_fires(rule, table, text, classifier, position)? {
            tracing::trace!(rule = rule.name, position, breaks = rule.breaks, "rule fired");
            return Ok(rule);
        }
    }
    tracing::error!(kind = %table.kind(), position, "no rule matched");
    Err(Error::internal(format!(
        "no {} rule matched at index {position}",
        table.kind()
    )))
}

/// Nearest boundary strictly after `cursor`, or `None` at the end of text.
pub fn next_boundary<C: Classifier + ?Sized>(
    table: &RuleTable,
    text: Text<'_>,
    classifier: &C,
    cursor: usize,
) -> Result<Option<usize>> {
    scan(table, text, classifier, cursor, Direction::Forward)
}

/// Nearest boundary strictly before `cursor`, or `None` at the start of text.
pub fn previous_boundary<C: Classifier + ?Sized>(
    table: &RuleTable,
    text: Text<'_>,
    classifier: &C,
    cursor: usize,
) -> Result<Option<usize>> {
    scan(table, text, classifier, cursor, Direction::Backward)
}

fn scan<C: Classifier + ?Sized>(
    table: &RuleTable,
    text: Text<'_>,
    classifier: &C,
    cursor: usize,
    direction: Direction,
) -> Result<Option<usize>> {
    let step = |index: usize| match direction {
        Direction::Forward => text.next(index),
        Direction::Backward => text.prev(index),
    };

    let mut position = match step(cursor)? {
        Some(decoded) => decoded.index,
        None => return Ok(None),
    };
    loop {
        if deciding_rule(table, text, classifier, position)?.breaks {
            return Ok(Some(position));
        }
        position = match step(position)? {
            Some(decoded) => decoded.index,
            None => return Ok(None),
        };
    }
}
