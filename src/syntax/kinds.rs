//! Node kinds produced by the SevenMark parser
//!
//! Kinds are closed enums so the mapper dispatches by `match` instead of
//! inspecting keys at runtime. Anything the parser emits that is not listed
//! here lands in [`ElementKind::Other`] and still gets a fallback class.

/// Markup constructs the general mapper decorates
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Header,
    Bold,
    Italic,
    BoldItalic,
    Strikethrough,
    Underline,
    Superscript,
    Subscript,
    CodeElement,
    Comment,
    Error,
    LiteralElement,
    Escape,
    Text,
    NewLine,
    HLine,
    FoldElement,
    TableElement,
    ListElement,
    BlockQuoteElement,
    StyledElement,
    Include,
    IncludeElement,
    CategoryElement,
    RedirectElement,
    RubyElement,
    FootnoteElement,
    TeXElement,
    MediaElement,
    FootNote,
    TimeNow,
    Age,
    Variable,
    IfElement,
    DefineElement,
    Conditional,
    Other(String),
}

impl ElementKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Header" => Self::Header,
            "Bold" => Self::Bold,
            "Italic" => Self::Italic,
            "BoldItalic" => Self::BoldItalic,
            "Strikethrough" => Self::Strikethrough,
            "Underline" => Self::Underline,
            "Superscript" => Self::Superscript,
            "Subscript" => Self::Subscript,
            "CodeElement" => Self::CodeElement,
            "Comment" => Self::Comment,
            "Error" => Self::Error,
            "LiteralElement" => Self::LiteralElement,
            "Escape" => Self::Escape,
            "Text" => Self::Text,
            "NewLine" => Self::NewLine,
            "HLine" => Self::HLine,
            "FoldElement" => Self::FoldElement,
            "TableElement" => Self::TableElement,
            "ListElement" => Self::ListElement,
            "BlockQuoteElement" => Self::BlockQuoteElement,
            "StyledElement" => Self::StyledElement,
            "Include" => Self::Include,
            "IncludeElement" => Self::IncludeElement,
            "CategoryElement" => Self::CategoryElement,
            "RedirectElement" => Self::RedirectElement,
            "RubyElement" => Self::RubyElement,
            "FootnoteElement" => Self::FootnoteElement,
            "TeXElement" => Self::TeXElement,
            "MediaElement" => Self::MediaElement,
            "FootNote" => Self::FootNote,
            "TimeNow" => Self::TimeNow,
            "Age" => Self::Age,
            "Variable" => Self::Variable,
            "IfElement" => Self::IfElement,
            "DefineElement" => Self::DefineElement,
            "Conditional" => Self::Conditional,
            other => Self::Other(other.to_string()),
        }
    }

    /// The kind name as it appears in the serialized tree
    pub fn name(&self) -> &str {
        match self {
            Self::Header => "Header",
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::BoldItalic => "BoldItalic",
            Self::Strikethrough => "Strikethrough",
            Self::Underline => "Underline",
            Self::Superscript => "Superscript",
            Self::Subscript => "Subscript",
            Self::CodeElement => "CodeElement",
            Self::Comment => "Comment",
            Self::Error => "Error",
            Self::LiteralElement => "LiteralElement",
            Self::Escape => "Escape",
            Self::Text => "Text",
            Self::NewLine => "NewLine",
            Self::HLine => "HLine",
            Self::FoldElement => "FoldElement",
            Self::TableElement => "TableElement",
            Self::ListElement => "ListElement",
            Self::BlockQuoteElement => "BlockQuoteElement",
            Self::StyledElement => "StyledElement",
            Self::Include => "Include",
            Self::IncludeElement => "IncludeElement",
            Self::CategoryElement => "CategoryElement",
            Self::RedirectElement => "RedirectElement",
            Self::RubyElement => "RubyElement",
            Self::FootnoteElement => "FootnoteElement",
            Self::TeXElement => "TeXElement",
            Self::MediaElement => "MediaElement",
            Self::FootNote => "FootNote",
            Self::TimeNow => "TimeNow",
            Self::Age => "Age",
            Self::Variable => "Variable",
            Self::IfElement => "IfElement",
            Self::DefineElement => "DefineElement",
            Self::Conditional => "Conditional",
            Self::Other(name) => name,
        }
    }

    /// Plain text runs, line breaks and rules carry no decoration
    pub fn is_invisible(&self) -> bool {
        matches!(self, Self::Text | Self::NewLine | Self::HLine)
    }

    /// Constructs whose `condition` field holds an expression
    pub fn is_conditional(&self) -> bool {
        matches!(self, Self::IfElement | Self::Conditional)
    }
}

/// Expression constructs, reachable only through a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Or,
    And,
    Not,
    Comparison,
    Group,
    FunctionCall,
    StringLiteral,
    NumberLiteral,
    BoolLiteral,
    Null,
    /// Escape back into ordinary markup
    Element,
}

impl ExprKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Or" => Self::Or,
            "And" => Self::And,
            "Not" => Self::Not,
            "Comparison" => Self::Comparison,
            "Group" => Self::Group,
            "FunctionCall" => Self::FunctionCall,
            "StringLiteral" => Self::StringLiteral,
            "NumberLiteral" => Self::NumberLiteral,
            "BoolLiteral" => Self::BoolLiteral,
            "Null" => Self::Null,
            "Element" => Self::Element,
            _ => return None,
        })
    }

    /// Whether a tagged value of this kind found outside a condition is
    /// kept out of the general walk.
    ///
    /// `Element` only wraps markup, so outside an expression it is walked
    /// like any other construct.
    pub fn is_skipped_by_general_walk(self) -> bool {
        !matches!(self, Self::Element)
    }
}

/// Kind names are PascalCase, payload field names are snake_case
pub fn is_kind_name(key: &str) -> bool {
    key.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind_round_trips_known_names() {
        for name in ["Header", "BoldItalic", "TeXElement", "IfElement", "Conditional"] {
            assert_eq!(ElementKind::from_name(name).name(), name);
        }
    }

    #[test]
    fn test_unknown_kind_is_other() {
        let kind = ElementKind::from_name("Spoiler");
        assert_eq!(kind, ElementKind::Other("Spoiler".to_string()));
        assert_eq!(kind.name(), "Spoiler");
    }

    #[test]
    fn test_invisible_kinds() {
        assert!(ElementKind::Text.is_invisible());
        assert!(ElementKind::NewLine.is_invisible());
        assert!(ElementKind::HLine.is_invisible());
        assert!(!ElementKind::Bold.is_invisible());
    }

    #[test]
    fn test_expression_family() {
        assert_eq!(ExprKind::from_name("Comparison"), Some(ExprKind::Comparison));
        assert_eq!(ExprKind::from_name("Null"), Some(ExprKind::Null));
        assert_eq!(ExprKind::from_name("Bold"), None);
        assert!(ExprKind::Or.is_skipped_by_general_walk());
        assert!(!ExprKind::Element.is_skipped_by_general_walk());
    }

    #[test]
    fn test_is_kind_name() {
        assert!(is_kind_name("Header"));
        assert!(!is_kind_name("parameters"));
        assert!(!is_kind_name(""));
        assert!(!is_kind_name("_private"));
    }
}
