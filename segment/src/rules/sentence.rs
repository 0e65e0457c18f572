//! Sentence boundary rules (UAX #29, SB1 to SB998).
use crate::classify::SentenceClass::{self, *};
use crate::inst::ProgramError;
use crate::pattern::*;

use super::Rule;

const PARA_SEP: [SentenceClass; 3] = [Sep, CR, LF];
const S_A_TERM: [SentenceClass; 2] = [STerm, ATerm];

/// `x (Extend | Format)*`, see SB5.
fn w(x: Pattern) -> Pattern {
    seq([x, star(any_of([Extend, Format]))])
}

/// `SATerm Close* Sp*` with SB5 absorption.
fn terminated(term: Pattern) -> Pattern {
    seq([w(term), star(w(class(Close))), star(w(class(Sp)))])
}

pub(super) fn rules() -> Result<Vec<Rule>, ProgramError> {
    Ok(vec![
        Rule::split("SB1", sot(), empty())?,
        Rule::split("SB2", empty(), eot())?,
        Rule::join("SB3", class(CR), class(LF))?,
        Rule::split("SB4", any_of(PARA_SEP), empty())?,
        Rule::join("SB5", empty(), any_of([Format, Extend]))?,
        Rule::join("SB6", w(class(ATerm)), class(Numeric))?,
        Rule::join(
            "SB7",
            seq([w(any_of([Upper, Lower])), w(class(ATerm))]),
            class(Upper),
        )?,
        Rule::join(
            "SB8",
            terminated(class(ATerm)),
            seq([
                star(w(none_of([OLetter, Upper, Lower, Sep, CR, LF, STerm, ATerm]))),
                class(Lower),
            ]),
        )?,
        Rule::join(
            "SB8a",
            terminated(any_of(S_A_TERM)),
            any_of([SContinue, STerm, ATerm]),
        )?,
        Rule::join(
            "SB9",
            seq([w(any_of(S_A_TERM)), star(w(class(Close)))]),
            any_of([Close, Sp, Sep, CR, LF]),
        )?,
        Rule::join(
            "SB10",
            terminated(any_of(S_A_TERM)),
            any_of([Sp, Sep, CR, LF]),
        )?,
        Rule::split(
            "SB11",
            seq([terminated(any_of(S_A_TERM)), opt(any_of(PARA_SEP))]),
            empty(),
        )?,
        Rule::join("SB998", empty(), empty())?,
    ])
}
