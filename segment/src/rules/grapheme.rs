//! Extended grapheme cluster rules (UAX #29, GB1 to GB999).
use crate::classify::GraphemeClass::*;
use crate::inst::ProgramError;
use crate::pattern::*;

use super::Rule;

pub(super) fn rules() -> Result<Vec<Rule>, ProgramError> {
    Ok(vec![
        Rule::split("GB1", sot(), empty())?,
        Rule::split("GB2", empty(), eot())?,
        Rule::join("GB3", class(CR), class(LF))?,
        Rule::split("GB4", any_of([Control, CR, LF]), empty())?,
        Rule::split("GB5", empty(), any_of([Control, CR, LF]))?,
        // Hangul syllable sequences.
        Rule::join("GB6", class(L), any_of([L, V, LV, LVT]))?,
        Rule::join("GB7", any_of([LV, V]), any_of([V, T]))?,
        Rule::join("GB8", any_of([LVT, T]), class(T))?,
        Rule::join("GB9", empty(), any_of([Extend, ZWJ]))?,
        Rule::join("GB9a", empty(), class(SpacingMark))?,
        Rule::join("GB9b", class(Prepend), empty())?,
        Rule::join(
            "GB9c",
            seq([
                class(ConjunctConsonant),
                star(any_of([ConjunctExtend, ConjunctLinker])),
                class(ConjunctLinker),
                star(any_of([ConjunctExtend, ConjunctLinker])),
            ]),
            class(ConjunctConsonant),
        )?,
        Rule::join(
            "GB11",
            seq([class(ExtendedPictographic), star(class(Extend)), class(ZWJ)]),
            class(ExtendedPictographic),
        )?,
        // GB12 and GB13: only pair up regional indicators.
        Rule::join(
            "GB12",
            seq([
                alt([sot(), not_class(RegionalIndicator)]),
                star(seq([class(RegionalIndicator), class(RegionalIndicator)])),
                class(RegionalIndicator),
            ]),
            class(RegionalIndicator),
        )?,
        Rule::split("GB999", empty(), empty())?,
    ])
}
