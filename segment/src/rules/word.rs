//! Word boundary rules (UAX #29, WB1 to WB999).
//!
//! WB4 makes Extend, Format and ZWJ transparent: once WB4 has attached them
//! to the preceding character, later rules see through them. Each context
//! element that may be followed by such characters is written `w(x)`, which
//! is `x` followed by any number of them.
use crate::classify::WordClass::{self, *};
use crate::inst::ProgramError;
use crate::pattern::*;

use super::Rule;

const IGNORABLE: [WordClass; 3] = [Extend, Format, ZWJ];
const AH_LETTER: [WordClass; 2] = [ALetter, HebrewLetter];
const MID_LETTER: [WordClass; 3] = [MidLetter, MidNumLet, SingleQuote];
const MID_NUM: [WordClass; 3] = [MidNum, MidNumLet, SingleQuote];
const NEWLINE: [WordClass; 3] = [Newline, CR, LF];

/// `x (Extend | Format | ZWJ)*`
fn w(x: Pattern) -> Pattern {
    seq([x, star(any_of(IGNORABLE))])
}

pub(super) fn rules() -> Result<Vec<Rule>, ProgramError> {
    let ah_letter = || any_of(AH_LETTER);

    Ok(vec![
        Rule::split("WB1", sot(), empty())?,
        Rule::split("WB2", empty(), eot())?,
        Rule::join("WB3", class(CR), class(LF))?,
        Rule::split("WB3a", any_of(NEWLINE), empty())?,
        Rule::split("WB3b", empty(), any_of(NEWLINE))?,
        Rule::join("WB3c", class(ZWJ), class(ExtendedPictographic))?,
        Rule::join("WB3d", class(WSegSpace), class(WSegSpace))?,
        Rule::join("WB4", empty(), any_of(IGNORABLE))?,
        Rule::join("WB5", w(ah_letter()), ah_letter())?,
        Rule::join(
            "WB6",
            w(ah_letter()),
            seq([w(any_of(MID_LETTER)), ah_letter()]),
        )?,
        Rule::join(
            "WB7",
            seq([w(ah_letter()), w(any_of(MID_LETTER))]),
            ah_letter(),
        )?,
        Rule::join("WB7a", w(class(HebrewLetter)), class(SingleQuote))?,
        Rule::join(
            "WB7b",
            w(class(HebrewLetter)),
            seq([w(class(DoubleQuote)), class(HebrewLetter)]),
        )?,
        Rule::join(
            "WB7c",
            seq([w(class(HebrewLetter)), w(class(DoubleQuote))]),
            class(HebrewLetter),
        )?,
        Rule::join("WB8", w(class(Numeric)), class(Numeric))?,
        Rule::join("WB9", w(ah_letter()), class(Numeric))?,
        Rule::join("WB10", w(class(Numeric)), ah_letter())?,
        Rule::join(
            "WB11",
            seq([w(class(Numeric)), w(any_of(MID_NUM))]),
            class(Numeric),
        )?,
        Rule::join(
            "WB12",
            w(class(Numeric)),
            seq([w(any_of(MID_NUM)), class(Numeric)]),
        )?,
        Rule::join("WB13", w(class(Katakana)), class(Katakana))?,
        Rule::join(
            "WB13a",
            w(any_of([ALetter, HebrewLetter, Numeric, Katakana, ExtendNumLet])),
            class(ExtendNumLet),
        )?,
        Rule::join(
            "WB13b",
            w(class(ExtendNumLet)),
            any_of([ALetter, HebrewLetter, Numeric, Katakana]),
        )?,
        // WB15 and WB16: only pair up regional indicators.
        Rule::join(
            "WB15",
            seq([
                w(alt([
                    sot(),
                    none_of([RegionalIndicator, Extend, Format, ZWJ]),
                ])),
                star(seq([w(class(RegionalIndicator)), w(class(RegionalIndicator))])),
                w(class(RegionalIndicator)),
            ]),
            class(RegionalIndicator),
        )?,
        Rule::split("WB999", empty(), empty())?,
    ])
}
