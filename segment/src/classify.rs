//! Character classes consumed by the rule automata.
//!
//! Every boundary kind has its own class vocabulary. A code point is mapped
//! to a [`TagSet`] holding one or more classes of that vocabulary; the
//! automaton's class instructions test membership in that set.
use icu_properties::props::{
    ExtendedPictographic, GraphemeClusterBreak, IndicConjunctBreak, SentenceBreak, WordBreak,
};
use icu_properties::{CodePointMapData, CodePointSetData};

use crate::BoundaryKind;

/// Identifier of one character class within a boundary kind's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct ClassId(pub u8);

/// Set of class ids, one bit per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TagSet(u64);

impl TagSet {
    pub const EMPTY: TagSet = TagSet(0);

    pub fn of(class: impl Into<ClassId>) -> Self {
        TagSet::EMPTY.with(class)
    }

    /// Add a class. Ids of 64 and above cannot be represented and are
    /// ignored, so `contains` stays false for them.
    #[must_use]
    pub fn with(self, class: impl Into<ClassId>) -> Self {
        match 1u64.checked_shl(u32::from(class.into().0)) {
            Some(bit) => TagSet(self.0 | bit),
            None => self,
        }
    }

    pub fn insert(&mut self, class: impl Into<ClassId>) {
        *self = self.with(class);
    }

    pub fn contains(self, id: ClassId) -> bool {
        id.0 < 64 && self.0 & (1u64 << id.0) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ClassId> {
        (0..64u8).filter(move |&i| self.0 & (1u64 << i) != 0).map(ClassId)
    }
}

/// Maps code points to the classes of a boundary kind.
pub trait Classifier {
    fn classify(&self, scalar: u32, kind: BoundaryKind) -> TagSet;
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn classify(&self, scalar: u32, kind: BoundaryKind) -> TagSet {
        (**self).classify(scalar, kind)
    }
}

macro_rules! break_classes {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every class, in id order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn id(self) -> ClassId {
                ClassId(self as u8)
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            pub fn from_id(id: ClassId) -> Option<Self> {
                Self::ALL.get(usize::from(id.0)).copied()
            }
        }

        impl From<$name> for ClassId {
            fn from(class: $name) -> ClassId {
                class.id()
            }
        }
    };
}

break_classes! {
    /// Grapheme_Cluster_Break values plus Extended_Pictographic and
    /// Indic_Conjunct_Break tags.
    GraphemeClass {
        Other,
        CR,
        LF,
        Control,
        Extend,
        ZWJ,
        RegionalIndicator,
        Prepend,
        SpacingMark,
        L,
        V,
        T,
        LV,
        LVT,
        ExtendedPictographic,
        ConjunctConsonant,
        ConjunctExtend,
        ConjunctLinker,
    }
}

break_classes! {
    /// Word_Break values plus Extended_Pictographic.
    WordClass {
        Other,
        CR,
        LF,
        Newline,
        Extend,
        ZWJ,
        RegionalIndicator,
        Format,
        Katakana,
        HebrewLetter,
        ALetter,
        SingleQuote,
        DoubleQuote,
        MidNumLet,
        MidLetter,
        MidNum,
        Numeric,
        ExtendNumLet,
        WSegSpace,
        ExtendedPictographic,
    }
}

break_classes! {
    /// Sentence_Break values.
    SentenceClass {
        Other,
        CR,
        LF,
        Extend,
        Sep,
        Format,
        Sp,
        Lower,
        Upper,
        OLetter,
        Numeric,
        ATerm,
        SContinue,
        STerm,
        Close,
    }
}

const _: () = assert!(GraphemeClass::ALL.len() <= 64);
const _: () = assert!(WordClass::ALL.len() <= 64);
const _: () = assert!(SentenceClass::ALL.len() <= 64);

/// Display name of a class id in the vocabulary of `kind`.
pub fn class_name(kind: BoundaryKind, id: ClassId) -> &'static str {
    let name = match kind {
        BoundaryKind::Grapheme => GraphemeClass::from_id(id).map(GraphemeClass::name),
        BoundaryKind::Word => WordClass::from_id(id).map(WordClass::name),
        BoundaryKind::Sentence => SentenceClass::from_id(id).map(SentenceClass::name),
    };
    name.unwrap_or("?")
}

/// Classifier backed by the Unicode Character Database compiled into
/// `icu_properties`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeClassifier;

impl UnicodeClassifier {
    pub const fn new() -> Self {
        UnicodeClassifier
    }

    fn extended_pictographic(scalar: u32) -> bool {
        CodePointSetData::new::<ExtendedPictographic>().contains32(scalar)
    }

    fn grapheme(scalar: u32) -> TagSet {
        let gcb = CodePointMapData::<GraphemeClusterBreak>::new().get32(scalar);
        let class = match gcb {
            GraphemeClusterBreak::CR => GraphemeClass::CR,
            GraphemeClusterBreak::LF => GraphemeClass::LF,
            GraphemeClusterBreak::Control => GraphemeClass::Control,
            // Emoji modifiers have been Extend since Unicode 11.
            GraphemeClusterBreak::Extend | GraphemeClusterBreak::EModifier => {
                GraphemeClass::Extend
            }
            GraphemeClusterBreak::ZWJ => GraphemeClass::ZWJ,
            GraphemeClusterBreak::RegionalIndicator => GraphemeClass::RegionalIndicator,
            GraphemeClusterBreak::Prepend => GraphemeClass::Prepend,
            GraphemeClusterBreak::SpacingMark => GraphemeClass::SpacingMark,
            GraphemeClusterBreak::L => GraphemeClass::L,
            GraphemeClusterBreak::V => GraphemeClass::V,
            GraphemeClusterBreak::T => GraphemeClass::T,
            GraphemeClusterBreak::LV => GraphemeClass::LV,
            GraphemeClusterBreak::LVT => GraphemeClass::LVT,
            _ => GraphemeClass::Other,
        };

        let mut tags = TagSet::of(class);
        if Self::extended_pictographic(scalar) {
            tags.insert(GraphemeClass::ExtendedPictographic);
        }
        match CodePointMapData::<IndicConjunctBreak>::new().get32(scalar) {
            IndicConjunctBreak::Consonant => tags.insert(GraphemeClass::ConjunctConsonant),
            IndicConjunctBreak::Extend => tags.insert(GraphemeClass::ConjunctExtend),
            IndicConjunctBreak::Linker => tags.insert(GraphemeClass::ConjunctLinker),
            _ => {}
        }
        tags
    }

    fn word(scalar: u32) -> TagSet {
        let wb = CodePointMapData::<WordBreak>::new().get32(scalar);
        let class = match wb {
            WordBreak::CR => WordClass::CR,
            WordBreak::LF => WordClass::LF,
            WordBreak::Newline => WordClass::Newline,
            WordBreak::Extend | WordBreak::EModifier => WordClass::Extend,
            WordBreak::ZWJ => WordClass::ZWJ,
            WordBreak::RegionalIndicator => WordClass::RegionalIndicator,
            WordBreak::Format => WordClass::Format,
            WordBreak::Katakana => WordClass::Katakana,
            WordBreak::HebrewLetter => WordClass::HebrewLetter,
            WordBreak::ALetter => WordClass::ALetter,
            WordBreak::SingleQuote => WordClass::SingleQuote,
            WordBreak::DoubleQuote => WordClass::DoubleQuote,
            WordBreak::MidNumLet => WordClass::MidNumLet,
            WordBreak::MidLetter => WordClass::MidLetter,
            WordBreak::MidNum => WordClass::MidNum,
            WordBreak::Numeric => WordClass::Numeric,
            WordBreak::ExtendNumLet => WordClass::ExtendNumLet,
            WordBreak::WSegSpace => WordClass::WSegSpace,
            _ => WordClass::Other,
        };

        let mut tags = TagSet::of(class);
        if Self::extended_pictographic(scalar) {
            tags.insert(WordClass::ExtendedPictographic);
        }
        tags
    }

    fn sentence(scalar: u32) -> TagSet {
        let sb = CodePointMapData::<SentenceBreak>::new().get32(scalar);
        let class = match sb {
            SentenceBreak::CR => SentenceClass::CR,
            SentenceBreak::LF => SentenceClass::LF,
            SentenceBreak::Extend => SentenceClass::Extend,
            SentenceBreak::Sep => SentenceClass::Sep,
            SentenceBreak::Format => SentenceClass::Format,
            SentenceBreak::Sp => SentenceClass::Sp,
            SentenceBreak::Lower => SentenceClass::Lower,
            SentenceBreak::Upper => SentenceClass::Upper,
            SentenceBreak::OLetter => SentenceClass::OLetter,
            SentenceBreak::Numeric => SentenceClass::Numeric,
            SentenceBreak::ATerm => SentenceClass::ATerm,
            SentenceBreak::SContinue => SentenceClass::SContinue,
            SentenceBreak::STerm => SentenceClass::STerm,
            SentenceBreak::Close => SentenceClass::Close,
            _ => SentenceClass::Other,
        };
        TagSet::of(class)
    }
}

impl Classifier for UnicodeClassifier {
    fn classify(&self, scalar: u32, kind: BoundaryKind) -> TagSet {
        match kind {
            BoundaryKind::Grapheme => Self::grapheme(scalar),
            BoundaryKind::Word => Self::word(scalar),
            BoundaryKind::Sentence => Self::sentence(scalar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grapheme(c: char) -> TagSet {
        UnicodeClassifier.classify(c as u32, BoundaryKind::Grapheme)
    }

    #[test]
    fn test_tag_set_membership() {
        let tags = TagSet::of(WordClass::ALetter).with(WordClass::ExtendedPictographic);
        assert!(tags.contains(WordClass::ALetter.id()));
        assert!(tags.contains(WordClass::ExtendedPictographic.id()));
        assert!(!tags.contains(WordClass::Numeric.id()));
        assert_eq!(tags.iter().count(), 2);
        assert!(TagSet::EMPTY.is_empty());
    }

    #[test]
    fn test_tag_set_ignores_wide_ids() {
        let tags = TagSet::of(ClassId(64)).with(ClassId(200));
        assert!(tags.is_empty());
        assert!(!tags.contains(ClassId(0)));
        assert!(!tags.contains(ClassId(64)));

        let mut tags = TagSet::of(ClassId(63));
        tags.insert(ClassId(64));
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec![ClassId(63)]);
    }

    #[test]
    fn test_class_ids_follow_declaration_order() {
        for (i, class) in GraphemeClass::ALL.iter().enumerate() {
            assert_eq!(class.id(), ClassId(i as u8));
            assert_eq!(GraphemeClass::from_id(class.id()), Some(*class));
        }
        assert_eq!(class_name(BoundaryKind::Sentence, SentenceClass::STerm.id()), "STerm");
        assert_eq!(class_name(BoundaryKind::Word, ClassId(60)), "?");
    }

    #[test]
    fn test_grapheme_classes() {
        assert!(grapheme('\r').contains(GraphemeClass::CR.id()));
        assert!(grapheme('\u{301}').contains(GraphemeClass::Extend.id()));
        assert!(grapheme('\u{200D}').contains(GraphemeClass::ZWJ.id()));
        assert!(grapheme('\u{1F1FA}').contains(GraphemeClass::RegionalIndicator.id()));
        assert!(grapheme('\u{1100}').contains(GraphemeClass::L.id()));
        assert!(grapheme('\u{AC00}').contains(GraphemeClass::LV.id()));
        assert!(grapheme('\u{1F3FC}').contains(GraphemeClass::Extend.id()));
        assert!(grapheme('a').contains(GraphemeClass::Other.id()));
    }

    #[test]
    fn test_code_points_can_carry_several_tags() {
        let rocket = grapheme('\u{1F680}');
        assert!(rocket.contains(GraphemeClass::Other.id()));
        assert!(rocket.contains(GraphemeClass::ExtendedPictographic.id()));

        let ka = grapheme('\u{915}');
        assert!(ka.contains(GraphemeClass::ConjunctConsonant.id()));
        let virama = grapheme('\u{94D}');
        assert!(virama.contains(GraphemeClass::Extend.id()));
        assert!(virama.contains(GraphemeClass::ConjunctLinker.id()));
    }

    #[test]
    fn test_word_and_sentence_classes() {
        let c = UnicodeClassifier::new();
        assert!(c.classify('a' as u32, BoundaryKind::Word).contains(WordClass::ALetter.id()));
        assert!(c.classify('7' as u32, BoundaryKind::Word).contains(WordClass::Numeric.id()));
        assert!(c.classify(' ' as u32, BoundaryKind::Word).contains(WordClass::WSegSpace.id()));
        assert!(c.classify('.' as u32, BoundaryKind::Sentence).contains(SentenceClass::ATerm.id()));
        assert!(c.classify('?' as u32, BoundaryKind::Sentence).contains(SentenceClass::STerm.id()));
        assert!(c.classify('H' as u32, BoundaryKind::Sentence).contains(SentenceClass::Upper.id()));
    }
}
