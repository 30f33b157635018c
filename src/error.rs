use std::fmt;

#[derive(Debug)]
pub enum LeaseGenError {
    UnknownTenant(u32),
    UnknownProperty(u32),
    MissingRequiredFields(Vec<&'static str>),
    MissingSnapshotRegion,
    Snapshot(String),
    InvalidConfiguration(String),
    Font(String),
    Pdf(lopdf::Error),
    Io(std::io::Error),
}

impl fmt::Display for LeaseGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaseGenError::UnknownTenant(id) => {
                write!(f, "tenant id {} is not in the supplied tenant list", id)
            }
            LeaseGenError::UnknownProperty(id) => {
                write!(f, "property id {} is not in the supplied property list", id)
            }
            LeaseGenError::MissingRequiredFields(fields) => {
                write!(f, "required fields are empty: {}", fields.join(", "))
            }
            LeaseGenError::MissingSnapshotRegion => {
                write!(f, "no rendered snapshot region to export")
            }
            LeaseGenError::Snapshot(message) => write!(f, "snapshot export failed: {}", message),
            LeaseGenError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
            LeaseGenError::Font(message) => write!(f, "font error: {}", message),
            LeaseGenError::Pdf(err) => write!(f, "pdf error: {}", err),
            LeaseGenError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for LeaseGenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeaseGenError::Pdf(err) => Some(err),
            LeaseGenError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LeaseGenError {
    fn from(value: std::io::Error) -> Self {
        LeaseGenError::Io(value)
    }
}

impl From<lopdf::Error> for LeaseGenError {
    fn from(value: lopdf::Error) -> Self {
        LeaseGenError::Pdf(value)
    }
}
