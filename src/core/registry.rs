//! Purpose: Static discriminator -> shape tables for each entity family.
//! Exports: `Shape`, `ShapeRegistry`, `BuildFn`, `build_variant`.
//! Role: Replaces name-based type construction with factories fixed at compile time.
//! Invariants: Registries are immutable `'static` data and safe to share across threads.
//! Invariants: Lookup is exact and case-sensitive; several tags may share one factory.

use serde::de::DeserializeOwned;

use crate::core::error::{Error, ErrorKind};
use crate::core::fields::{Fields, map_fields};

/// Allocates one concrete shape from a field map and wraps it in the family's sum type.
pub type BuildFn<T> = fn(Fields) -> Result<T, Error>;

pub struct Shape<T: 'static> {
    pub discriminator: &'static str,
    pub build: BuildFn<T>,
}

pub struct ShapeRegistry<T: 'static> {
    family: &'static str,
    shapes: &'static [Shape<T>],
}

impl<T: 'static> ShapeRegistry<T> {
    pub const fn new(family: &'static str, shapes: &'static [Shape<T>]) -> Self {
        Self { family, shapes }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn discriminators(&self) -> impl Iterator<Item = &'static str> {
        self.shapes.iter().map(|shape| shape.discriminator)
    }

    pub fn lookup(&self, discriminator: &str) -> Result<&'static Shape<T>, Error> {
        self.shapes
            .iter()
            .find(|shape| shape.discriminator == discriminator)
            .ok_or_else(|| {
                Error::new(ErrorKind::UnknownDiscriminator)
                    .with_message(format!("unknown {} type `{discriminator}`", self.family))
                    .with_entity(self.family)
                    .with_hint(format!(
                        "known types: {}",
                        self.discriminators().collect::<Vec<_>>().join(", ")
                    ))
            })
    }
}

pub fn build_variant<S, T>(fields: Fields) -> Result<T, Error>
where
    S: DeserializeOwned + Into<T>,
{
    map_fields::<S>(fields).map(Into::into)
}

#[cfg(test)]
mod tests {
    use super::{Shape, ShapeRegistry, build_variant};
    use crate::core::error::ErrorKind;
    use crate::core::fields::into_object;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Circle {
        radius: f64,
    }

    #[derive(Debug, PartialEq)]
    enum Figure {
        Circle(Circle),
    }

    impl From<Circle> for Figure {
        fn from(value: Circle) -> Self {
            Figure::Circle(value)
        }
    }

    static FIGURES: ShapeRegistry<Figure> = ShapeRegistry::new(
        "Figure",
        &[
            Shape {
                discriminator: "Circle",
                build: build_variant::<Circle, Figure>,
            },
            Shape {
                discriminator: "Round",
                build: build_variant::<Circle, Figure>,
            },
        ],
    );

    #[test]
    fn lookup_builds_the_registered_variant() {
        let shape = FIGURES.lookup("Round").expect("alias registered");
        let fields = into_object(json!({"radius": 2.5})).expect("object");
        assert_eq!(
            (shape.build)(fields).expect("built"),
            Figure::Circle(Circle { radius: 2.5 })
        );
    }

    #[test]
    fn unknown_discriminator_lists_known_types() {
        let err = FIGURES.lookup("circle").err().expect("case-sensitive");
        assert_eq!(err.kind(), ErrorKind::UnknownDiscriminator);
        assert_eq!(err.entity(), Some("Figure"));
        assert_eq!(err.hint(), Some("known types: Circle, Round"));
    }
}
