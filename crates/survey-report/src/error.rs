use core::fmt;
use std::{borrow::Cow, ops::Deref};

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field of the survey record is absent or blank.
    MalformedRecord,
    /// The document backend failed to produce its byte stream.
    Serialization,
    /// Reading an input or writing the output failed.
    Io,
    /// Anything else, e.g. an invalid configuration file.
    Msg,
}

/// An error that can occur while building a report.
///
/// Per-image and per-font failures never surface here. They are absorbed by
/// the component that hit them and only show up in the log.
#[derive(Clone)]
pub struct Error(Box<Repr>);

#[derive(Clone)]
enum Repr {
    /// A record failed validation at the orchestrator boundary.
    MalformedRecord(Cow<'static, str>),
    /// The document could not be serialized.
    Serialization(Cow<'static, str>),
    /// An I/O error, kept as its message so the error stays `Clone`.
    Io(Cow<'static, str>),
    /// Just a message.
    Msg(Cow<'static, str>),
}

impl Error {
    /// Creates an error for a record whose `field` is missing or blank.
    pub fn malformed(field: impl Into<Cow<'static, str>>) -> Self {
        Error(Box::new(Repr::MalformedRecord(field.into())))
    }

    /// Creates an error for a failed document build step.
    pub fn serialization(msg: impl Into<Cow<'static, str>>) -> Self {
        Error(Box::new(Repr::Serialization(msg.into())))
    }

    /// Returns the category of the error.
    pub fn kind(&self) -> ErrorKind {
        match self.0.deref() {
            Repr::MalformedRecord(..) => ErrorKind::MalformedRecord,
            Repr::Serialization(..) => ErrorKind::Serialization,
            Repr::Io(..) => ErrorKind::Io,
            Repr::Msg(..) => ErrorKind::Msg,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.deref() {
            Repr::MalformedRecord(field) => {
                write!(f, "malformed survey record: `{field}` is required")
            }
            Repr::Serialization(s) => write!(f, "failed to serialize report: {s}"),
            Repr::Io(s) => write!(f, "io error: {s}"),
            Repr::Msg(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error(Box::new(Repr::Io(e.to_string().into())))
    }
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<Cow<'static, str>> for Error {
    fn from(s: Cow<'static, str>) -> Self {
        Error(Box::new(Repr::Msg(s)))
    }
}
