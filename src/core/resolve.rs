//! Purpose: Pick the concrete shape for a polymorphic field map.
//! Exports: `DiscriminatorRule`, `DiscriminatorSource`, `discriminator`, `resolve`.
//! Role: Leaf of the decode pipeline; pure function of the map, the rule, and the registry.
//! Invariants: An explicit string discriminator field always wins over the identifier.
//! Invariants: A string identifier that does not match the GID pattern is a hard error.

use tracing::trace;

use crate::core::error::{Error, ErrorKind};
use crate::core::fields::{Fields, str_field};
use crate::core::gid::GidPattern;
use crate::core::registry::{Shape, ShapeRegistry};

/// Names the keys a family reads its type signal from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DiscriminatorRule {
    pub discriminator_field: &'static str,
    pub id_field: &'static str,
}

impl DiscriminatorRule {
    pub const TYPENAME_OR_ID: Self = Self {
        discriminator_field: "__typename",
        id_field: "id",
    };
}

impl Default for DiscriminatorRule {
    fn default() -> Self {
        Self::TYPENAME_OR_ID
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DiscriminatorSource {
    Field,
    Gid,
}

pub fn discriminator<'a>(
    fields: &'a Fields,
    rule: DiscriminatorRule,
    gid: &GidPattern,
) -> Result<(&'a str, DiscriminatorSource), Error> {
    if let Some(tag) = str_field(fields, rule.discriminator_field) {
        return Ok((tag, DiscriminatorSource::Field));
    }
    if let Some(id) = str_field(fields, rule.id_field) {
        let tag = gid
            .type_fragment(id)
            .map_err(|err| err.with_field(rule.id_field))?;
        return Ok((tag, DiscriminatorSource::Gid));
    }
    Err(Error::new(ErrorKind::UndeterminedType)
        .with_message(format!(
            "no `{}` or `{}` to determine the type from",
            rule.discriminator_field, rule.id_field
        ))
        .with_hint(format!(
            "Query `{}` or `{}` on this selection",
            rule.discriminator_field, rule.id_field
        )))
}

pub fn resolve<T: 'static>(
    fields: &Fields,
    rule: DiscriminatorRule,
    gid: &GidPattern,
    registry: &ShapeRegistry<T>,
) -> Result<&'static Shape<T>, Error> {
    let (tag, source) =
        discriminator(fields, rule, gid).map_err(|err| err.with_entity(registry.family()))?;
    let shape = registry.lookup(tag)?;
    trace!(family = registry.family(), shape = tag, ?source, "resolved shape");
    Ok(shape)
}
