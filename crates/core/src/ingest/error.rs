use std::fmt;

#[derive(Debug)]
pub enum FeedError {
    Xml(quick_xml::Error),
    MissingField { field: &'static str },
    InvalidCoordinate { field: &'static str, value: String },
    InvalidTimestamp { field: &'static str, value: String },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Xml(e) => write!(f, "malformed feed XML: {e}"),
            FeedError::MissingField { field } => {
                write!(f, "feed entry is missing field {field}")
            }
            FeedError::InvalidCoordinate { field, value } => {
                write!(f, "feed entry has non-numeric {field}: {value:?}")
            }
            FeedError::InvalidTimestamp { field, value } => {
                write!(f, "feed entry has unparseable {field}: {value:?}")
            }
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Xml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for FeedError {
    fn from(e: quick_xml::Error) -> Self {
        FeedError::Xml(e)
    }
}
