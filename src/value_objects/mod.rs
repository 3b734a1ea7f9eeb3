//! Graph value objects
//!
//! Value objects are immutable types that represent concepts in the standards graph.
//! They are compared by value rather than identity and encapsulate domain validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder label rendered for standards that have no displayable code
pub const BLANK_STANDARD_LABEL: &str = "          ";

/// Label rendered inside resource nodes
pub const BLANK_RESOURCE_LABEL: &str = "      ";

/// A school grade, K = 0 through 12
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Grade(u8);

impl Grade {
    pub const KINDERGARTEN: Grade = Grade(0);
    pub const MAX: Grade = Grade(12);

    /// Create a grade, rejecting anything above 12
    pub fn new(value: u8) -> Result<Self, String> {
        if value > Self::MAX.0 {
            return Err(format!("grade {value} is out of range K..12"));
        }
        Ok(Self(value))
    }

    /// Parse a grade as it appears in the source records ("K", "0".."12")
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("k") {
            return Ok(Self::KINDERGARTEN);
        }
        let value = trimmed
            .parse::<u8>()
            .map_err(|_| format!("unparsable grade '{raw}'"))?;
        Self::new(value)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            write!(f, "K")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Inclusive grade range of a standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradeRange {
    pub low: Grade,
    pub high: Grade,
}

impl GradeRange {
    pub fn new(low: Grade, high: Grade) -> Self {
        Self { low, high }
    }

    /// Gradeband label, e.g. "K-2" or "6-8"
    pub fn label(&self) -> String {
        format!("{}-{}", self.low, self.high)
    }

    /// Whether this range lies entirely within `[low, high]`
    pub fn is_within(&self, low: u8, high: u8) -> bool {
        self.low.value() >= low && self.high.value() <= high
    }
}

/// The fixed grade progression used to bundle 3D standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeBucket {
    Kindergarten,
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    SixToEight,
    NineToTwelve,
}

impl GradeBucket {
    /// All buckets in progression order
    pub const ALL: [GradeBucket; 8] = [
        GradeBucket::Kindergarten,
        GradeBucket::First,
        GradeBucket::Second,
        GradeBucket::Third,
        GradeBucket::Fourth,
        GradeBucket::Fifth,
        GradeBucket::SixToEight,
        GradeBucket::NineToTwelve,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GradeBucket::Kindergarten => "K",
            GradeBucket::First => "1",
            GradeBucket::Second => "2",
            GradeBucket::Third => "3",
            GradeBucket::Fourth => "4",
            GradeBucket::Fifth => "5",
            GradeBucket::SixToEight => "6-8",
            GradeBucket::NineToTwelve => "9-12",
        }
    }

    /// Inclusive overlap between `[low, high]` and this bucket
    pub fn overlaps(&self, high: u8, low: u8) -> bool {
        match self {
            GradeBucket::Kindergarten => high == 0,
            GradeBucket::First => high >= 1 && low <= 1,
            GradeBucket::Second => high >= 2 && low <= 2,
            GradeBucket::Third => high >= 3 && low <= 3,
            GradeBucket::Fourth => high >= 4 && low <= 4,
            GradeBucket::Fifth => high >= 5 && low <= 5,
            GradeBucket::SixToEight => high >= 6 && low <= 8,
            GradeBucket::NineToTwelve => high >= 9 && low <= 12,
        }
    }
}

impl fmt::Display for GradeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Type of a curriculum standard record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardType {
    /// Topic grouping of performance expectations
    Topic,
    /// Performance expectation
    Pe,
    /// Crosscutting concept
    Cc,
    /// Disciplinary core idea
    Dci,
    /// Science and engineering practice
    Sep,
    /// A type string the loader did not recognize
    Unrecognized(String),
}

impl From<&str> for StandardType {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Topic" => StandardType::Topic,
            "PE" => StandardType::Pe,
            "CC" => StandardType::Cc,
            "DCI" => StandardType::Dci,
            "SEP" => StandardType::Sep,
            other => StandardType::Unrecognized(other.to_string()),
        }
    }
}

impl StandardType {
    pub fn as_str(&self) -> &str {
        match self {
            StandardType::Topic => "Topic",
            StandardType::Pe => "PE",
            StandardType::Cc => "CC",
            StandardType::Dci => "DCI",
            StandardType::Sep => "SEP",
            StandardType::Unrecognized(s) => s,
        }
    }
}

impl fmt::Display for StandardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three NGSS dimensions that can be browsed by category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Cc,
    Dci,
    Sep,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Cc => "CC",
            Dimension::Dci => "DCI",
            Dimension::Sep => "SEP",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category bucket a category record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    Topic,
    Dimension(Dimension),
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Topic" => Ok(CategoryKind::Topic),
            "CC" => Ok(CategoryKind::Dimension(Dimension::Cc)),
            "DCI" => Ok(CategoryKind::Dimension(Dimension::Dci)),
            "SEP" => Ok(CategoryKind::Dimension(Dimension::Sep)),
            other => Err(format!("unknown category type '{other}'")),
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKind::Topic => f.write_str("Topic"),
            CategoryKind::Dimension(d) => d.fmt(f),
        }
    }
}

/// Closed set of node kinds a working graph can hold
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Standard(StandardType),
    TopicBundle,
    CategoryBundle(Dimension),
    Resource,
}

impl NodeKind {
    /// Render order used by the standards table; synthesized kinds have none
    pub fn order(&self) -> Option<u8> {
        match self {
            NodeKind::Standard(StandardType::Topic) => Some(1),
            NodeKind::Standard(StandardType::Pe) => Some(2),
            NodeKind::Standard(StandardType::Dci) => Some(3),
            NodeKind::Standard(StandardType::Cc) => Some(4),
            NodeKind::Standard(StandardType::Sep) => Some(5),
            _ => None,
        }
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, NodeKind::Standard(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Standard(t) => t.fmt(f),
            NodeKind::TopicBundle => f.write_str("topic_gradeband"),
            NodeKind::CategoryBundle(d) => write!(f, "{}_category", d.as_str().to_lowercase()),
            NodeKind::Resource => f.write_str("resource"),
        }
    }
}

/// Which identifier standards are labeled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// ASN identifier (the record Id)
    Asn,
    /// NGSS code
    #[default]
    Ngss,
}

/// Traversal depth, limited to 1..=3 hops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Depth(u8);

impl Depth {
    pub fn new(value: u8) -> Result<Self, String> {
        if !(1..=3).contains(&value) {
            return Err(format!("depth must be 1, 2 or 3, got {value}"));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth(2)
    }
}

impl TryFrom<u8> for Depth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Depth::new(value)
    }
}

impl From<Depth> for u8 {
    fn from(depth: Depth) -> Self {
        depth.0
    }
}

/// Represents the position of a node in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiply both coordinates by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl Default for Position2D {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Marker shape used for a provider's resource nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shape {
    Circle,
    Diamond,
    Square,
    Triangle,
    TriangleDown,
    Star,
}

/// Shapes available to providers, in assignment order
pub const PROVIDER_SHAPES: [Shape; 6] = [
    Shape::Circle,
    Shape::Diamond,
    Shape::Square,
    Shape::Triangle,
    Shape::TriangleDown,
    Shape::Star,
];

/// (color, highlight color) pairs available to providers, in assignment order
pub const PROVIDER_PALETTE: [(&str, &str); 9] = [
    ("#F3C300", "#FFDF63"),
    ("#A1CAF1", "#C9E4FF"),
    ("#F38400", "#F6B764"),
    ("#C1A784", "#CDB99E"),
    ("#79A99E", "#9FC6BD"),
    ("#FF6BA1", "#FFA4C5"),
    ("#9ACD32", "#BAE85F"),
    ("#E295E0", "#F5C6F3"),
    ("#C0C0C0", "#DEDEDE"),
];

/// Color, highlight color and shape assigned to a resource provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderStyle {
    pub color: &'static str,
    pub highlight_color: &'static str,
    pub shape: Shape,
}

impl ProviderStyle {
    /// Number of distinct styles the palette can hand out
    pub const CAPACITY: usize = PROVIDER_PALETTE.len() * PROVIDER_SHAPES.len();

    /// Style for the `index`-th provider: palette outer, shapes inner
    pub fn nth(index: usize) -> Option<Self> {
        if index >= Self::CAPACITY {
            return None;
        }
        let (color, highlight_color) = PROVIDER_PALETTE[index / PROVIDER_SHAPES.len()];
        Some(Self {
            color,
            highlight_color,
            shape: PROVIDER_SHAPES[index % PROVIDER_SHAPES.len()],
        })
    }
}

const ORANGE: (&str, &str) = ("#FBC08C", "#FFE4CB");
const GREEN: (&str, &str) = ("#CDE49F", "#E8F3D6");
const BLUE: (&str, &str) = ("#9FBDE4", "#C2DAF9");
const PURPLE: (&str, &str) = ("#EFB2F2", "#FEE2FF");
const GREY: (&str, &str) = ("#D4D4D4", "#EFEFEF");

/// Visual style of a rendered node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStyle {
    pub color: Option<&'static str>,
    pub highlight_color: Option<&'static str>,
    pub shape: Option<Shape>,
    pub order: Option<u8>,
    pub size: u32,
    pub highlight_size: u32,
    pub font_size: u32,
    pub highlight_font_size: u32,
}

impl NodeStyle {
    /// Style for a node kind; resources take their colors from the provider
    pub fn for_kind(kind: &NodeKind, provider: Option<&ProviderStyle>) -> Self {
        let colors = match kind {
            NodeKind::Standard(StandardType::Dci) | NodeKind::CategoryBundle(Dimension::Dci) => {
                Some(ORANGE)
            }
            NodeKind::Standard(StandardType::Sep) | NodeKind::CategoryBundle(Dimension::Sep) => {
                Some(BLUE)
            }
            NodeKind::Standard(StandardType::Cc) | NodeKind::CategoryBundle(Dimension::Cc) => {
                Some(GREEN)
            }
            NodeKind::Standard(StandardType::Pe) => Some(GREY),
            NodeKind::Standard(StandardType::Topic) | NodeKind::TopicBundle => Some(PURPLE),
            NodeKind::Resource => provider.map(|p| (p.color, p.highlight_color)),
            NodeKind::Standard(StandardType::Unrecognized(_)) => None,
        };
        Self {
            color: colors.map(|(c, _)| c),
            highlight_color: colors.map(|(_, h)| h),
            shape: match kind {
                NodeKind::Resource => provider.map(|p| p.shape),
                _ => None,
            },
            order: kind.order(),
            ..Self::default()
        }
    }
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            color: None,
            highlight_color: None,
            shape: None,
            order: None,
            size: 100,
            highlight_size: 150,
            font_size: 13,
            highlight_font_size: 18,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test Coverage
    ///
    /// ```mermaid
    /// graph TD
    ///     VO[Value Objects] --> G[Grade]
    ///     VO --> GB[GradeBucket]
    ///     VO --> ST[StandardType]
    ///     VO --> D[Depth]
    ///     VO --> PS[ProviderStyle]
    ///     VO --> NS[NodeStyle]
    /// ```

    #[test]
    fn test_grade_parsing() {
        assert_eq!(Grade::parse("K").unwrap(), Grade::KINDERGARTEN);
        assert_eq!(Grade::parse(" 7 ").unwrap().value(), 7);
        assert!(Grade::parse("13").is_err());
        assert!(Grade::parse("sixth").is_err());
    }

    #[test]
    fn test_gradeband_label() {
        let range = GradeRange::new(Grade::KINDERGARTEN, Grade::new(2).unwrap());
        assert_eq!(range.label(), "K-2");
        let range = GradeRange::new(Grade::new(6).unwrap(), Grade::new(8).unwrap());
        assert_eq!(range.label(), "6-8");
    }

    #[test]
    fn test_bucket_overlap_rules() {
        assert!(GradeBucket::Kindergarten.overlaps(0, 0));
        assert!(!GradeBucket::Kindergarten.overlaps(2, 0));
        assert!(GradeBucket::Third.overlaps(5, 2));
        assert!(!GradeBucket::Third.overlaps(2, 0));
        assert!(GradeBucket::SixToEight.overlaps(8, 5));
        assert!(GradeBucket::Fifth.overlaps(8, 5));
        assert!(!GradeBucket::NineToTwelve.overlaps(8, 5));
        assert!(GradeBucket::NineToTwelve.overlaps(12, 9));
    }

    #[test]
    fn test_standard_type_round_trip() {
        assert_eq!(StandardType::from("PE"), StandardType::Pe);
        assert_eq!(StandardType::Dci.to_string(), "DCI");
        assert_eq!(
            StandardType::from("Category"),
            StandardType::Unrecognized("Category".to_string())
        );
    }

    #[test]
    fn test_category_kind_parsing() {
        assert_eq!("Topic".parse(), Ok(CategoryKind::Topic));
        assert_eq!(" SEP ".parse(), Ok(CategoryKind::Dimension(Dimension::Sep)));
        assert!("Strand".parse::<CategoryKind>().is_err());
    }

    #[test]
    fn test_depth_validation() {
        assert!(Depth::new(0).is_err());
        assert!(Depth::new(4).is_err());
        assert_eq!(Depth::new(3).unwrap().value(), 3);
        let parsed: Result<Depth, _> = serde_json::from_str("5");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_provider_styles_palette_outer_shapes_inner() {
        let first = ProviderStyle::nth(0).unwrap();
        let second = ProviderStyle::nth(1).unwrap();
        let seventh = ProviderStyle::nth(6).unwrap();
        assert_eq!(first.color, second.color);
        assert_eq!(first.shape, Shape::Circle);
        assert_eq!(second.shape, Shape::Diamond);
        assert_eq!(seventh.color, "#A1CAF1");
        assert_eq!(seventh.shape, Shape::Circle);
        assert!(ProviderStyle::nth(ProviderStyle::CAPACITY - 1).is_some());
        assert!(ProviderStyle::nth(ProviderStyle::CAPACITY).is_none());
    }

    #[test]
    fn test_node_style_table() {
        let pe = NodeStyle::for_kind(&NodeKind::Standard(StandardType::Pe), None);
        assert_eq!(pe.color, Some("#D4D4D4"));
        assert_eq!(pe.order, Some(2));

        let bundle = NodeStyle::for_kind(&NodeKind::CategoryBundle(Dimension::Sep), None);
        assert_eq!(bundle.color, Some("#9FBDE4"));
        assert_eq!(bundle.order, None);

        let provider = ProviderStyle::nth(3).unwrap();
        let resource = NodeStyle::for_kind(&NodeKind::Resource, Some(&provider));
        assert_eq!(resource.color, Some(provider.color));
        assert_eq!(resource.shape, Some(Shape::Triangle));
        assert_eq!(resource.size, 100);
    }
}
