use std::fmt;

/// Where an operation was started from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    /// Library caller (embedding application)
    Service,

    /// Operator command line
    CLI,
}

impl fmt::Display for RequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestSource::Service => f.write_str("service"),
            RequestSource::CLI => f.write_str("cli"),
        }
    }
}
