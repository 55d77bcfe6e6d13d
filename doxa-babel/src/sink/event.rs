//! Defines the flat event stream representation of a document.

use super::attributes::Attributes;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Heading depth of a section, restricted to the six levels every target
/// format can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SectionLevel {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
}

impl SectionLevel {
    pub const ALL: [SectionLevel; 6] = [
        SectionLevel::One,
        SectionLevel::Two,
        SectionLevel::Three,
        SectionLevel::Four,
        SectionLevel::Five,
        SectionLevel::Six,
    ];

    /// Returns the level for a 1-based depth, or `None` outside `1..=6`.
    pub fn new(level: usize) -> Option<Self> {
        match level {
            1 => Some(SectionLevel::One),
            2 => Some(SectionLevel::Two),
            3 => Some(SectionLevel::Three),
            4 => Some(SectionLevel::Four),
            5 => Some(SectionLevel::Five),
            6 => Some(SectionLevel::Six),
            _ => None,
        }
    }

    pub fn get(self) -> usize {
        self as usize
    }

    fn section_tag(self) -> &'static str {
        match self {
            SectionLevel::One => "section1",
            SectionLevel::Two => "section2",
            SectionLevel::Three => "section3",
            SectionLevel::Four => "section4",
            SectionLevel::Five => "section5",
            SectionLevel::Six => "section6",
        }
    }

    fn title_tag(self) -> &'static str {
        match self {
            SectionLevel::One => "sectionTitle1",
            SectionLevel::Two => "sectionTitle2",
            SectionLevel::Three => "sectionTitle3",
            SectionLevel::Four => "sectionTitle4",
            SectionLevel::Five => "sectionTitle5",
            SectionLevel::Six => "sectionTitle6",
        }
    }
}

impl From<SectionLevel> for u8 {
    fn from(level: SectionLevel) -> Self {
        level as u8
    }
}

impl TryFrom<u8> for SectionLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SectionLevel::new(value as usize)
            .ok_or_else(|| format!("section level {value} is outside 1..=6"))
    }
}

/// Numbering style of an ordered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Numbering {
    #[default]
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
}

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justification {
    #[default]
    Default,
    Left,
    Center,
    Right,
}

impl Justification {
    /// Reads an `align` attribute value.
    pub fn from_align(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Justification::Left),
            "center" | "centre" => Some(Justification::Center),
            "right" => Some(Justification::Right),
            _ => None,
        }
    }
}

/// Stack effect of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Pushes the tag; must later be matched by a closer with the same tag.
    Open(&'static str),
    /// Pops the tag opened most recently.
    Close(&'static str),
    /// No stack effect.
    Leaf,
}

/// Represents a single event in the document stream.
///
/// Producers emit these in document order; every `Start*` must be matched by
/// the corresponding `End*` in strict LIFO order (see [`Event::kind`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Event {
    StartHead(Attributes),
    EndHead,
    StartTitle(Attributes),
    EndTitle,
    StartAuthor(Attributes),
    EndAuthor,
    StartDate(Attributes),
    EndDate,
    StartBody(Attributes),
    EndBody,
    StartSection {
        level: SectionLevel,
        attributes: Attributes,
    },
    EndSection(SectionLevel),
    StartSectionTitle {
        level: SectionLevel,
        attributes: Attributes,
    },
    EndSectionTitle(SectionLevel),
    StartParagraph(Attributes),
    EndParagraph,
    StartList(Attributes),
    EndList,
    StartListItem(Attributes),
    EndListItem,
    StartNumberedList {
        numbering: Numbering,
        attributes: Attributes,
    },
    EndNumberedList,
    StartNumberedListItem(Attributes),
    EndNumberedListItem,
    StartDefinitionList(Attributes),
    EndDefinitionList,
    StartDefinitionListItem(Attributes),
    EndDefinitionListItem,
    StartDefinedTerm(Attributes),
    EndDefinedTerm,
    StartDefinition(Attributes),
    EndDefinition,
    StartTable(Attributes),
    EndTable,
    StartTableRows {
        justification: Vec<Justification>,
        grid: bool,
    },
    EndTableRows,
    StartTableRow(Attributes),
    EndTableRow,
    StartTableCell(Attributes),
    EndTableCell,
    StartTableHeaderCell(Attributes),
    EndTableHeaderCell,
    StartTableCaption(Attributes),
    EndTableCaption,
    StartFigure(Attributes),
    EndFigure,
    FigureGraphics {
        src: String,
        attributes: Attributes,
    },
    StartFigureCaption(Attributes),
    EndFigureCaption,
    StartBlockquote(Attributes),
    EndBlockquote,
    StartVerbatim(Attributes),
    EndVerbatim,
    StartBold,
    EndBold,
    StartItalic,
    EndItalic,
    StartMonospaced,
    EndMonospaced,
    StartInline(Attributes),
    EndInline,
    StartLink {
        target: String,
        attributes: Attributes,
    },
    EndLink,
    StartAnchor {
        name: String,
        attributes: Attributes,
    },
    EndAnchor,
    Text {
        value: String,
        attributes: Attributes,
    },
    RawText(String),
    Comment(String),
    LineBreak,
    NonBreakingSpace,
    HorizontalRule,
    PageBreak,
    Unknown {
        name: String,
        params: Vec<String>,
        attributes: Attributes,
    },
}

impl Event {
    pub fn text(value: impl Into<String>) -> Self {
        Event::Text {
            value: value.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn start_section(level: SectionLevel) -> Self {
        Event::StartSection {
            level,
            attributes: Attributes::new(),
        }
    }

    pub fn start_section_title(level: SectionLevel) -> Self {
        Event::StartSectionTitle {
            level,
            attributes: Attributes::new(),
        }
    }

    pub fn start_numbered_list(numbering: Numbering) -> Self {
        Event::StartNumberedList {
            numbering,
            attributes: Attributes::new(),
        }
    }

    pub fn start_table_rows(justification: Vec<Justification>) -> Self {
        Event::StartTableRows {
            justification,
            grid: false,
        }
    }

    pub fn start_link(target: impl Into<String>) -> Self {
        Event::StartLink {
            target: target.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn start_anchor(name: impl Into<String>) -> Self {
        Event::StartAnchor {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn figure_graphics(src: impl Into<String>, attributes: Attributes) -> Self {
        Event::FigureGraphics {
            src: src.into(),
            attributes,
        }
    }

    /// Classifies the event by its stack effect.
    pub fn kind(&self) -> EventKind {
        use EventKind::{Close, Leaf, Open};

        match self {
            Event::StartHead(_) => Open("head"),
            Event::EndHead => Close("head"),
            Event::StartTitle(_) => Open("title"),
            Event::EndTitle => Close("title"),
            Event::StartAuthor(_) => Open("author"),
            Event::EndAuthor => Close("author"),
            Event::StartDate(_) => Open("date"),
            Event::EndDate => Close("date"),
            Event::StartBody(_) => Open("body"),
            Event::EndBody => Close("body"),
            Event::StartSection { level, .. } => Open(level.section_tag()),
            Event::EndSection(level) => Close(level.section_tag()),
            Event::StartSectionTitle { level, .. } => Open(level.title_tag()),
            Event::EndSectionTitle(level) => Close(level.title_tag()),
            Event::StartParagraph(_) => Open("paragraph"),
            Event::EndParagraph => Close("paragraph"),
            Event::StartList(_) => Open("list"),
            Event::EndList => Close("list"),
            Event::StartListItem(_) => Open("listItem"),
            Event::EndListItem => Close("listItem"),
            Event::StartNumberedList { .. } => Open("numberedList"),
            Event::EndNumberedList => Close("numberedList"),
            Event::StartNumberedListItem(_) => Open("numberedListItem"),
            Event::EndNumberedListItem => Close("numberedListItem"),
            Event::StartDefinitionList(_) => Open("definitionList"),
            Event::EndDefinitionList => Close("definitionList"),
            Event::StartDefinitionListItem(_) => Open("definitionListItem"),
            Event::EndDefinitionListItem => Close("definitionListItem"),
            Event::StartDefinedTerm(_) => Open("definedTerm"),
            Event::EndDefinedTerm => Close("definedTerm"),
            Event::StartDefinition(_) => Open("definition"),
            Event::EndDefinition => Close("definition"),
            Event::StartTable(_) => Open("table"),
            Event::EndTable => Close("table"),
            Event::StartTableRows { .. } => Open("tableRows"),
            Event::EndTableRows => Close("tableRows"),
            Event::StartTableRow(_) => Open("tableRow"),
            Event::EndTableRow => Close("tableRow"),
            Event::StartTableCell(_) => Open("tableCell"),
            Event::EndTableCell => Close("tableCell"),
            Event::StartTableHeaderCell(_) => Open("tableHeaderCell"),
            Event::EndTableHeaderCell => Close("tableHeaderCell"),
            Event::StartTableCaption(_) => Open("tableCaption"),
            Event::EndTableCaption => Close("tableCaption"),
            Event::StartFigure(_) => Open("figure"),
            Event::EndFigure => Close("figure"),
            Event::StartFigureCaption(_) => Open("figureCaption"),
            Event::EndFigureCaption => Close("figureCaption"),
            Event::StartBlockquote(_) => Open("blockquote"),
            Event::EndBlockquote => Close("blockquote"),
            Event::StartVerbatim(_) => Open("verbatim"),
            Event::EndVerbatim => Close("verbatim"),
            Event::StartBold => Open("bold"),
            Event::EndBold => Close("bold"),
            Event::StartItalic => Open("italic"),
            Event::EndItalic => Close("italic"),
            Event::StartMonospaced => Open("monospaced"),
            Event::EndMonospaced => Close("monospaced"),
            Event::StartInline(_) => Open("inline"),
            Event::EndInline => Close("inline"),
            Event::StartLink { .. } => Open("link"),
            Event::EndLink => Close("link"),
            Event::StartAnchor { .. } => Open("anchor"),
            Event::EndAnchor => Close("anchor"),
            Event::FigureGraphics { .. }
            | Event::Text { .. }
            | Event::RawText(_)
            | Event::Comment(_)
            | Event::LineBreak
            | Event::NonBreakingSpace
            | Event::HorizontalRule
            | Event::PageBreak
            | Event::Unknown { .. } => Leaf,
        }
    }

    /// Vocabulary name of the event; closers carry a trailing `_`.
    pub fn name(&self) -> Cow<'static, str> {
        match self.kind() {
            EventKind::Open(tag) => Cow::Borrowed(tag),
            EventKind::Close(tag) => Cow::Owned(format!("{tag}_")),
            EventKind::Leaf => Cow::Borrowed(match self {
                Event::FigureGraphics { .. } => "figureGraphics",
                Event::Text { .. } => "text",
                Event::RawText(_) => "rawText",
                Event::Comment(_) => "comment",
                Event::LineBreak => "lineBreak",
                Event::NonBreakingSpace => "nonBreakingSpace",
                Event::HorizontalRule => "horizontalRule",
                Event::PageBreak => "pageBreak",
                _ => "unknown",
            }),
        }
    }

    /// Whether the event opens or closes a block-level element.
    pub fn is_block(&self) -> bool {
        let tag = match self.kind() {
            EventKind::Open(tag) | EventKind::Close(tag) => tag,
            EventKind::Leaf => {
                return matches!(self, Event::HorizontalRule | Event::PageBreak);
            }
        };
        !matches!(
            tag,
            "bold" | "italic" | "monospaced" | "inline" | "link" | "anchor"
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
