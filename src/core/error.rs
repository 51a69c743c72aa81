//! Purpose: Define the single error type returned by every decode path.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Carries the failure taxonomy plus where it happened (entity, field, shape).
//! Invariants: The first failure wins; callers add context, never replace the kind.
//! Invariants: Exit codes are stable once published.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    Io,
    Parse,
    MalformedIdentifier,
    UndeterminedType,
    UnknownDiscriminator,
    StructuralMappingFailed,
    MissingRequiredSubobject,
    MissingContainer,
    MalformedElement,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    entity: Option<String>,
    field: Option<String>,
    shape: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            entity: None,
            field: None,
            shape: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Sets the entity family, keeping the innermost one if already present.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        if self.entity.is_none() {
            self.entity = Some(entity.into());
        }
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Prefixes the field path with an outer segment (`edges[2]` + `node` -> `edges[2].node`).
    pub fn within(mut self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        self.field = Some(match self.field.take() {
            Some(inner) => format!("{segment}.{inner}"),
            None => segment,
        });
        self
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        if self.shape.is_none() {
            self.shape = Some(shape.into());
        }
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {entity})")?;
        }
        if let Some(shape) = &self.shape {
            write!(f, " (shape: {shape})")?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::Io => 3,
        ErrorKind::Parse => 4,
        ErrorKind::MalformedIdentifier => 10,
        ErrorKind::UndeterminedType => 11,
        ErrorKind::UnknownDiscriminator => 12,
        ErrorKind::StructuralMappingFailed => 13,
        ErrorKind::MissingRequiredSubobject => 14,
        ErrorKind::MissingContainer => 15,
        ErrorKind::MalformedElement => 16,
    }
}
