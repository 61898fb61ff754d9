use serde::{Deserialize, Serialize};

const FIELD_SEPARATOR: char = '-';
const SUFFIX_SEPARATOR: char = '_';

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Move,
    Click,
    Text,
    Enter,
    Finger,
    Other(String),
}

impl TagKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Move => "move",
            Self::Click => "click",
            Self::Text => "text",
            Self::Enter => "enter",
            Self::Finger => "finger",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for TagKind {
    fn from(value: &str) -> Self {
        match value {
            "move" => Self::Move,
            "click" => Self::Click,
            "text" => Self::Text,
            "enter" => Self::Enter,
            "finger" => Self::Finger,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic label carried by a scene node, written as `type-target[-extra]`.
///
/// The target field may carry a `_suffix` (`click-42_v2`); `target` holds the
/// part before the first underscore and `suffix` the rest. Only the third
/// field is kept as `extra`; anything after it is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub kind: TagKind,
    pub target: String,
    pub suffix: Option<String>,
    pub extra: Option<String>,
}

impl Tag {
    /// Returns `None` when the string has fewer than two `-` separated fields.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut fields = raw.split(FIELD_SEPARATOR);
        let kind = fields.next()?;
        let second = fields.next()?;
        let extra = fields.next().map(str::to_string);

        let (target, suffix) = match second.split_once(SUFFIX_SEPARATOR) {
            Some((target, suffix)) => (target, Some(suffix.to_string())),
            None => (second, None),
        };

        Some(Self {
            kind: TagKind::from(kind),
            target: target.to_string(),
            suffix,
            extra,
        })
    }

    /// Display text for a label sprite built from a `finger` tag.
    pub fn label_text(&self) -> Option<&str> {
        let extra = self.extra.as_deref()?;
        extra.split(SUFFIX_SEPARATOR).next()
    }

    pub fn is(&self, kind: &TagKind) -> bool {
        &self.kind == kind
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{FIELD_SEPARATOR}{}", self.kind, self.target)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "{SUFFIX_SEPARATOR}{suffix}")?;
        }
        if let Some(extra) = &self.extra {
            write!(f, "{FIELD_SEPARATOR}{extra}")?;
        }
        Ok(())
    }
}
