//! Error taxonomy for fetching, decoding and normalizing BIND statistics

use std::error::Error as StdError;
use std::fmt;

use derive_more::{Display, Error, From};

/// A response body that could not be parsed in the expected dialect
#[derive(Debug, Display, From, Error)]
pub enum DecodeError {
    Json(serde_json::Error),
    Xml(quick_xml::DeError),
}

/// Why a histogram bucket label was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketErrorKind {
    /// Not of the form `lower-upper`
    Shape,
    /// A bound is not a number
    Bound,
    /// `upper + 1` is not a multiple of the bucket width
    Width(u64),
    /// The bucket ends before the first reported bucket
    BelowFirstBucket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedBucketError {
    pub label: String,
    pub kind: BucketErrorKind,
}

impl MalformedBucketError {
    pub fn new(label: &str, kind: BucketErrorKind) -> MalformedBucketError {
        MalformedBucketError {
            label: label.to_string(),
            kind,
        }
    }
}

impl fmt::Display for MalformedBucketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BucketErrorKind::Shape => write!(f, "malformed bucket range {:?}", self.label),
            BucketErrorKind::Bound => {
                write!(f, "cannot convert bucket bound to a number: {:?}", self.label)
            }
            BucketErrorKind::Width(width) => write!(
                f,
                "upper bound of bucket {:?} is not a multiple of {} minus one",
                self.label, width
            ),
            BucketErrorKind::BelowFirstBucket => {
                write!(f, "bucket {:?} precedes the first histogram slot", self.label)
            }
        }
    }
}

impl StdError for MalformedBucketError {}

#[derive(Debug, Display)]
pub enum BindError {
    #[display(fmt = "invalid statistics URL {:?}: {}", url, reason)]
    InvalidUrl { url: String, reason: String },
    #[display(fmt = "error querying stats from {}: {}", url, source)]
    Transport { url: String, source: reqwest::Error },
    #[display(fmt = "unexpected status {} from {}", status, url)]
    HttpStatus { url: String, status: u16 },
    #[display(fmt = "failed to decode response from {}: {}", path, source)]
    Decode { path: String, source: DecodeError },
    #[display(fmt = "{}", _0)]
    MalformedBucket(MalformedBucketError),
    #[display(fmt = "unknown stats group {:?}", _0)]
    UnsupportedGroup(String),
    #[display(fmt = "stats group {:?} given more than once", _0)]
    DuplicateGroup(String),
    #[display(fmt = "unknown stats version {:?}", _0)]
    UnsupportedVersion(String),
}

impl BindError {
    pub fn decode(path: &str, source: DecodeError) -> BindError {
        BindError::Decode {
            path: path.to_string(),
            source,
        }
    }
}

impl From<MalformedBucketError> for BindError {
    fn from(err: MalformedBucketError) -> Self {
        BindError::MalformedBucket(err)
    }
}

impl StdError for BindError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            BindError::Transport { source, .. } => Some(source),
            BindError::Decode { source, .. } => Some(source),
            BindError::MalformedBucket(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BindError>;
