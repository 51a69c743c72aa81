//! Purpose: Decode raw field maps into family entities.
//! Exports: `Decoder`, `Family`, `NestedField`, `deserialize_family`.
//! Role: Runs extract -> resolve -> map -> assemble for every polymorphic entity.
//! Invariants: The returned runtime shape is exactly the one the resolver selected.
//! Invariants: A polymorphic sub-object is pulled out before generic mapping and decoded on its own.
//! Invariants: Decoders hold only immutable configuration; one can be shared across threads.

use std::sync::LazyLock;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::error::{Error, ErrorKind};
use crate::core::fields::{Fields, into_object, map_fields, take_object};
use crate::core::gid::GidPattern;
use crate::core::registry::ShapeRegistry;
use crate::core::resolve::{DiscriminatorRule, resolve};

/// An independent instantiation of the decode algorithm for one polymorphic domain.
pub trait Family: Sized {
    /// Label used in error context and logs.
    const NAME: &'static str;

    fn decode_fields(decoder: &Decoder, fields: Fields) -> Result<Self, Error>;
}

/// A required sub-object whose concrete shape is selected by its own discriminator.
pub struct NestedField<T: 'static> {
    pub key: &'static str,
    pub rule: DiscriminatorRule,
    pub registry: &'static ShapeRegistry<T>,
}

static SHARED: LazyLock<Decoder> = LazyLock::new(Decoder::default);

#[derive(Clone, Debug, Default)]
pub struct Decoder {
    gid: GidPattern,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gid_pattern(gid: GidPattern) -> Self {
        Self { gid }
    }

    /// Process-wide decoder with the default GID pattern; backs the serde hooks.
    pub fn shared() -> &'static Decoder {
        &SHARED
    }

    pub fn gid_pattern(&self) -> &GidPattern {
        &self.gid
    }

    pub fn decode<F: Family>(&self, fields: Fields) -> Result<F, Error> {
        F::decode_fields(self, fields).map_err(|err| err.with_entity(F::NAME))
    }

    pub fn decode_value<F: Family>(&self, value: Value) -> Result<F, Error> {
        let fields = into_object(value).map_err(|err| err.with_entity(F::NAME))?;
        self.decode(fields)
    }

    /// Decodes an entity whose own shape comes from the registry.
    pub fn decode_polymorphic<T: 'static>(
        &self,
        fields: Fields,
        rule: DiscriminatorRule,
        registry: &ShapeRegistry<T>,
    ) -> Result<T, Error> {
        let shape = resolve(&fields, rule, &self.gid, registry)?;
        (shape.build)(fields).map_err(|err| {
            err.with_entity(registry.family())
                .with_shape(shape.discriminator)
        })
    }

    /// Decodes a fixed parent shape `P` that owns one required polymorphic sub-object,
    /// then hands both to `assemble`.
    pub fn decode_with_nested<P, T: 'static, R>(
        &self,
        mut fields: Fields,
        nested: &NestedField<T>,
        assemble: impl FnOnce(P, T) -> R,
    ) -> Result<R, Error>
    where
        P: DeserializeOwned,
    {
        let sub = take_object(&mut fields, nested.key)?.ok_or_else(|| {
            Error::new(ErrorKind::MissingRequiredSubobject)
                .with_message(format!("`{}` is required to decode this entity", nested.key))
                .with_field(nested.key)
        })?;

        let shape = resolve(&sub, nested.rule, &self.gid, nested.registry)
            .map_err(|err| err.within(nested.key))?;
        let parent: P = map_fields(fields)?;
        let child = (shape.build)(sub).map_err(|err| {
            err.with_entity(nested.registry.family())
                .with_shape(shape.discriminator)
                .within(nested.key)
        })?;
        Ok(assemble(parent, child))
    }
}

/// `Deserialize` body for family types: buffer the map, then run the shared decoder.
pub fn deserialize_family<'de, D, F>(deserializer: D) -> Result<F, D::Error>
where
    D: Deserializer<'de>,
    F: Family,
{
    let fields = Fields::deserialize(deserializer)?;
    Decoder::shared().decode(fields).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::{Decoder, Family, NestedField};
    use crate::core::error::{Error, ErrorKind};
    use crate::core::fields::{Fields, into_object};
    use crate::core::gid::GidPattern;
    use crate::core::registry::{Shape, ShapeRegistry, build_variant};
    use crate::core::resolve::DiscriminatorRule;
    use serde::Deserialize;
    use serde_json::{Value, json};

    #[derive(Clone, Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Plain {
        url: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Part {
        Plain(Plain),
    }

    impl From<Plain> for Part {
        fn from(value: Plain) -> Self {
            Part::Plain(value)
        }
    }

    static PARTS: ShapeRegistry<Part> = ShapeRegistry::new(
        "Part",
        &[Shape {
            discriminator: "Plain",
            build: build_variant::<Plain, Part>,
        }],
    );

    static PART_FIELD: NestedField<Part> = NestedField {
        key: "part",
        rule: DiscriminatorRule::TYPENAME_OR_ID,
        registry: &PARTS,
    };

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Holder {
        id: String,
        #[serde(skip)]
        part: Option<Part>,
    }

    impl Family for Holder {
        const NAME: &'static str = "Holder";

        fn decode_fields(decoder: &Decoder, fields: Fields) -> Result<Self, Error> {
            decoder.decode_with_nested(fields, &PART_FIELD, |mut holder: Holder, part| {
                holder.part = Some(part);
                holder
            })
        }
    }

    fn fields(value: Value) -> Fields {
        into_object(value).expect("object")
    }

    #[test]
    fn nested_part_is_attached() {
        let holder: Holder = Decoder::new()
            .decode(fields(json!({
                "id": "h1",
                "part": {"__typename": "Plain", "url": "x"}
            })))
            .expect("decoded");
        assert_eq!(holder.id, "h1");
        assert_eq!(
            holder.part,
            Some(Part::Plain(Plain {
                url: "x".to_string()
            }))
        );
    }

    #[test]
    fn missing_nested_part_fails() {
        let err = Decoder::new()
            .decode::<Holder>(fields(json!({"id": "h1"})))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredSubobject);
        assert_eq!(err.field(), Some("part"));
        assert_eq!(err.entity(), Some("Holder"));
    }

    #[test]
    fn nested_errors_carry_the_sub_object_path() {
        let decoder = Decoder::with_gid_pattern(GidPattern::new(r"gid://app/(\w+)/\d+").unwrap());
        let err = decoder
            .decode::<Holder>(fields(json!({"part": {"id": "bogus"}})))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedIdentifier);
        assert_eq!(err.field(), Some("part.id"));
        assert_eq!(err.entity(), Some("Part"));

        let err = decoder
            .decode::<Holder>(fields(json!({"part": {"__typename": "Plain", "url": 4}})))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMappingFailed);
        assert_eq!(err.shape(), Some("Plain"));
        assert_eq!(err.field(), Some("part"));
    }

    #[test]
    fn non_object_value_is_malformed() {
        let err = Decoder::new()
            .decode_value::<Holder>(json!(["not", "a", "map"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedElement);
        assert_eq!(err.entity(), Some("Holder"));
    }

    #[test]
    fn polymorphic_decode_tags_shape_on_failure() {
        let err = Decoder::new()
            .decode_polymorphic(
                fields(json!({"__typename": "Plain", "url": []})),
                DiscriminatorRule::default(),
                &PARTS,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMappingFailed);
        assert_eq!(err.entity(), Some("Part"));
        assert_eq!(err.shape(), Some("Plain"));
    }
}
