// Structured version identifiers (major.minor[.build[.revision]][-tag])

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Smallest number of numeric fields a version can be formatted with
pub const MIN_FIELD_COUNT: usize = 2;
/// Largest number of numeric fields a version can carry
pub const MAX_FIELD_COUNT: usize = 4;

/// One of the numeric fields of a [`Version`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Major,
    Minor,
    Build,
    Revision,
}

impl Component {
    /// Lowercase field name, as used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Component::Major => "major",
            Component::Minor => "minor",
            Component::Build => "build",
            Component::Revision => "revision",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while constructing, parsing or formatting a [`Version`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// The text contains no `.` at all
    #[error("Version string has no '.' separator")]
    MissingSeparator,

    /// More than four numeric components
    #[error("Version string has more than 4 numeric components")]
    TooManyComponents,

    /// A component is not a base-10 integer that fits in 32 signed bits
    #[error("Invalid {component} component: '{text}'")]
    InvalidComponent { component: Component, text: String },

    /// A component was written with a leading minus sign
    #[error("Negative {component} component: '{text}'")]
    NegativeComponent { component: Component, text: String },

    /// A direct constructor received a negative value
    #[error("Version {0} component must be non-negative")]
    Range(Component),

    /// Requested field count is not in `2..=4`
    #[error("Field count {0} is out of range (2 to 4)")]
    FieldCountOutOfRange(usize),

    /// Requested field count needs a component the version does not have
    #[error("Cannot format {requested} fields: {missing} component is absent")]
    MissingOptionalComponent { requested: usize, missing: Component },

    /// Caller-supplied buffer cannot hold the formatted text
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Optional trailing components. A revision can only exist alongside a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trailing {
    None,
    Build(u32),
    BuildRevision(u32, u32),
}

/// Dotted numeric version with 2 to 4 components and an optional free-text tag
///
/// Values are immutable once built. Every numeric component fits in a 32-bit
/// signed integer, and an empty tag is the same as no tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    major: u32,
    minor: u32,
    trailing: Trailing,
    tag: String,
}

impl Version {
    /// Create a `major.minor` version
    pub fn new(major: i32, minor: i32) -> Result<Self, VersionError> {
        Ok(Self::from_parts(
            checked(major, Component::Major)?,
            checked(minor, Component::Minor)?,
            Trailing::None,
            "",
        ))
    }

    /// Create a `major.minor.build` version
    pub fn with_build(major: i32, minor: i32, build: i32) -> Result<Self, VersionError> {
        Ok(Self::from_parts(
            checked(major, Component::Major)?,
            checked(minor, Component::Minor)?,
            Trailing::Build(checked(build, Component::Build)?),
            "",
        ))
    }

    /// Create a `major.minor.build.revision` version
    pub fn with_revision(
        major: i32,
        minor: i32,
        build: i32,
        revision: i32,
    ) -> Result<Self, VersionError> {
        Ok(Self::from_parts(
            checked(major, Component::Major)?,
            checked(minor, Component::Minor)?,
            Trailing::BuildRevision(
                checked(build, Component::Build)?,
                checked(revision, Component::Revision)?,
            ),
            "",
        ))
    }

    /// Return a copy of this version carrying the given tag
    #[must_use]
    pub fn tagged(self, tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..self
        }
    }

    fn from_parts(major: u32, minor: u32, trailing: Trailing, tag: &str) -> Self {
        Self {
            major,
            minor,
            trailing,
            tag: tag.to_string(),
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn build(&self) -> Option<u32> {
        match self.trailing {
            Trailing::None => None,
            Trailing::Build(build) | Trailing::BuildRevision(build, _) => Some(build),
        }
    }

    pub fn revision(&self) -> Option<u32> {
        match self.trailing {
            Trailing::BuildRevision(_, revision) => Some(revision),
            _ => None,
        }
    }

    /// Free-text suffix, empty when the version has none
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// High 16 bits of the revision
    #[allow(clippy::cast_possible_truncation)]
    pub fn major_revision(&self) -> Option<i16> {
        self.revision().map(|revision| (revision >> 16) as i16)
    }

    /// Low 16 bits of the revision, reinterpreted as signed
    #[allow(clippy::cast_possible_truncation)]
    pub fn minor_revision(&self) -> Option<i16> {
        self.revision().map(|revision| (revision & 0xFFFF) as u16 as i16)
    }

    /// Number of numeric components present (2, 3 or 4)
    pub fn component_count(&self) -> usize {
        match self.trailing {
            Trailing::None => 2,
            Trailing::Build(_) => 3,
            Trailing::BuildRevision(..) => 4,
        }
    }

    /// Smallest field count that still shows every present component
    pub fn default_field_count(&self) -> usize {
        self.component_count()
    }

    /// Parse a version string, failing on any malformed input
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let major_end = input.find('.').ok_or(VersionError::MissingSeparator)?;
        let minor_end = find_from(input, major_end + 1, '.');
        let build_end = minor_end.and_then(|end| find_from(input, end + 1, '.'));

        if let Some(end) = build_end {
            if input[end + 1..].contains('.') {
                return Err(VersionError::TooManyComponents);
            }
        }

        // First '-' after the minor boundary starts the tag and ends the numeric scan
        let scan_from = minor_end.unwrap_or(major_end) + 1;
        let (tag_start, tag) = match find_from(input, scan_from, '-') {
            Some(pos) => (pos, &input[pos + 1..]),
            None => (input.len(), ""),
        };

        let major = parse_component(&input[..major_end], Component::Major)?;

        let version = match (minor_end, build_end) {
            (None, _) => {
                let minor = parse_tail(input, major_end + 1, tag_start, Component::Minor)?;
                Self::from_parts(major, minor, Trailing::None, tag)
            }
            (Some(minor_end), None) => {
                let minor = parse_component(&input[major_end + 1..minor_end], Component::Minor)?;
                let build = parse_tail(input, minor_end + 1, tag_start, Component::Build)?;
                Self::from_parts(major, minor, Trailing::Build(build), tag)
            }
            (Some(minor_end), Some(build_end)) => {
                let minor = parse_component(&input[major_end + 1..minor_end], Component::Minor)?;
                let build = parse_component(&input[minor_end + 1..build_end], Component::Build)?;
                let revision = parse_tail(input, build_end + 1, tag_start, Component::Revision)?;
                Self::from_parts(major, minor, Trailing::BuildRevision(build, revision), tag)
            }
        };

        Ok(version)
    }

    /// Parse a version string, treating malformed input as absent
    pub fn try_parse(input: &str) -> Option<Self> {
        Self::parse(input).ok()
    }

    /// Format the first `field_count` components plus the tag.
    ///
    /// `None` uses [`Version::default_field_count`].
    pub fn format(&self, field_count: Option<usize>) -> Result<String, VersionError> {
        let (fields, count) = self.fields(field_count)?;
        Ok(Rendered {
            fields: &fields[..count],
            tag: self.rendered_tag(),
        }
        .to_string())
    }

    /// Format into a caller-supplied buffer without allocating.
    ///
    /// Returns the number of bytes written. When the buffer is too small
    /// nothing is written and `BufferTooSmall` reports the size needed.
    pub fn format_into(
        &self,
        buf: &mut [u8],
        field_count: Option<usize>,
    ) -> Result<usize, VersionError> {
        let (fields, count) = self.fields(field_count)?;
        let fields = &fields[..count];
        let tag = self.rendered_tag();

        let needed = fields.iter().map(|&value| decimal_len(value)).sum::<usize>()
            + (count - 1)
            + tag.map_or(0, |tag| tag.len() + 1);
        if buf.len() < needed {
            return Err(VersionError::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }

        let mut pos = 0;
        for (i, &value) in fields.iter().enumerate() {
            if i != 0 {
                buf[pos] = b'.';
                pos += 1;
            }
            pos += write_decimal(&mut buf[pos..], value);
        }
        if let Some(tag) = tag {
            buf[pos] = b'-';
            pos += 1;
            buf[pos..pos + tag.len()].copy_from_slice(tag.as_bytes());
            pos += tag.len();
        }

        Ok(pos)
    }

    /// Cheap bit-packed digest: 4 bits of major, 8 of minor, 8 of build, 12 of revision.
    ///
    /// Absent components fill their window with ones. The tag is not included,
    /// so equal versions always share a digest.
    pub fn digest(&self) -> u32 {
        let build = self.build().unwrap_or(u32::MAX);
        let revision = self.revision().unwrap_or(u32::MAX);
        ((self.major & 0xF) << 28) | ((self.minor & 0xFF) << 20) | ((build & 0xFF) << 12) | (revision & 0xFFF)
    }

    fn fields(
        &self,
        field_count: Option<usize>,
    ) -> Result<([u32; MAX_FIELD_COUNT], usize), VersionError> {
        let count = field_count.unwrap_or_else(|| self.default_field_count());
        if !(MIN_FIELD_COUNT..=MAX_FIELD_COUNT).contains(&count) {
            return Err(VersionError::FieldCountOutOfRange(count));
        }

        let build = self.build();
        let revision = self.revision();
        if count >= 3 && build.is_none() {
            return Err(VersionError::MissingOptionalComponent {
                requested: count,
                missing: Component::Build,
            });
        }
        if count == MAX_FIELD_COUNT && revision.is_none() {
            return Err(VersionError::MissingOptionalComponent {
                requested: count,
                missing: Component::Revision,
            });
        }

        Ok((
            [
                self.major,
                self.minor,
                build.unwrap_or_default(),
                revision.unwrap_or_default(),
            ],
            count,
        ))
    }

    fn rendered_tag(&self) -> Option<&str> {
        (!self.tag.trim().is_empty()).then_some(self.tag.as_str())
    }
}

fn checked(value: i32, component: Component) -> Result<u32, VersionError> {
    u32::try_from(value).map_err(|_| VersionError::Range(component))
}

fn find_from(input: &str, start: usize, needle: char) -> Option<usize> {
    input.get(start..)?.find(needle).map(|pos| pos + start)
}

fn slice(input: &str, start: usize, end: usize) -> &str {
    input.get(start..end).unwrap_or_default()
}

/// Parse the last numeric component, which ends where the tag starts.
///
/// When the tag opens right where the component should be (`1.2.3.-4`), the
/// error reports the text written there rather than the empty slice.
fn parse_tail(
    input: &str,
    start: usize,
    tag_start: usize,
    component: Component,
) -> Result<u32, VersionError> {
    let text = slice(input, start, tag_start);
    if text.is_empty() {
        let written = input
            .get(start..)
            .and_then(|rest| rest.split('.').next())
            .unwrap_or_default();
        // `written` is empty or starts with '-', so this always fails
        return parse_component(written, component);
    }
    parse_component(text, component)
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_component(text: &str, component: Component) -> Result<u32, VersionError> {
    if text.strip_prefix('-').is_some_and(is_digits) {
        return Err(VersionError::NegativeComponent {
            component,
            text: text.to_string(),
        });
    }

    let invalid = || VersionError::InvalidComponent {
        component,
        text: text.to_string(),
    };
    if !is_digits(text) {
        return Err(invalid());
    }
    text.parse::<i32>()
        .ok()
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(invalid)
}

fn decimal_len(mut value: u32) -> usize {
    let mut len = 1;
    while value >= 10 {
        value /= 10;
        len += 1;
    }
    len
}

#[allow(clippy::cast_possible_truncation)]
fn write_decimal(buf: &mut [u8], value: u32) -> usize {
    let len = decimal_len(value);
    let mut rest = value;
    for slot in buf[..len].iter_mut().rev() {
        *slot = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
    len
}

struct Rendered<'a> {
    fields: &'a [u32],
    tag: Option<&'a str>,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.fields.iter().enumerate() {
            if i != 0 {
                f.write_str(".")?;
            }
            write!(f, "{value}")?;
        }
        if let Some(tag) = self.tag {
            write!(f, "-{tag}")?;
        }
        Ok(())
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::from_parts(0, 0, Trailing::None, "")
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fields, count) = self.fields(None).map_err(|_| fmt::Error)?;
        Rendered {
            fields: &fields[..count],
            tag: self.rendered_tag(),
        }
        .fmt(f)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.digest());
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Component-wise ordering where an absent build or revision sorts first.
/// Ties on the numbers fall back to the tag text.
impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.build().cmp(&other.build()))
            .then_with(|| self.revision().cmp(&other.revision()))
            .then_with(|| self.tag.cmp(&other.tag))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}
