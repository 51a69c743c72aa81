//! Purpose: The webhook subscription family.
//! Exports: `WebhookSubscription`, `WebhookSubscriptionEndpoint`, `EndpointKind`, endpoint shapes,
//!   `ENDPOINT_SHAPES`, `ENDPOINT_FIELD`.
//! Role: Fixed top-level shape owning one required polymorphic `endpoint`.
//! Invariants: A subscription always carries its endpoint; a payload without one fails, including
//!   when the subscription is embedded in a caller's serde type.
//! Invariants: The endpoint shape comes from the endpoint's own `__typename` or `id`, never the
//!   parent's id.

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::decode::{Decoder, Family, NestedField, deserialize_family};
use crate::core::error::Error;
use crate::core::fields::Fields;
use crate::core::registry::{Shape, ShapeRegistry, build_variant};
use crate::core::resolve::DiscriminatorRule;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookSubscriptionFormat {
    Json,
    Xml,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiVersion {
    pub handle: String,
    pub display_name: Option<String>,
    pub supported: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookHttpEndpoint {
    pub callback_url: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookEventBridgeEndpoint {
    pub arn: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookPubSubEndpoint {
    pub pub_sub_project: String,
    pub pub_sub_topic: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EndpointKind {
    Http,
    EventBridge,
    PubSub,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "__typename")]
pub enum WebhookSubscriptionEndpoint {
    #[serde(rename = "WebhookHttpEndpoint")]
    Http(WebhookHttpEndpoint),
    #[serde(rename = "WebhookEventBridgeEndpoint")]
    EventBridge(WebhookEventBridgeEndpoint),
    #[serde(rename = "WebhookPubSubEndpoint")]
    PubSub(WebhookPubSubEndpoint),
}

impl WebhookSubscriptionEndpoint {
    pub fn kind(&self) -> EndpointKind {
        match self {
            WebhookSubscriptionEndpoint::Http(_) => EndpointKind::Http,
            WebhookSubscriptionEndpoint::EventBridge(_) => EndpointKind::EventBridge,
            WebhookSubscriptionEndpoint::PubSub(_) => EndpointKind::PubSub,
        }
    }

    /// Delivery target in the form the admin UI shows it.
    pub fn address(&self) -> String {
        match self {
            WebhookSubscriptionEndpoint::Http(endpoint) => endpoint.callback_url.clone(),
            WebhookSubscriptionEndpoint::EventBridge(endpoint) => endpoint.arn.clone(),
            WebhookSubscriptionEndpoint::PubSub(endpoint) => format!(
                "pubsub://{}:{}",
                endpoint.pub_sub_project, endpoint.pub_sub_topic
            ),
        }
    }
}

impl From<WebhookHttpEndpoint> for WebhookSubscriptionEndpoint {
    fn from(value: WebhookHttpEndpoint) -> Self {
        WebhookSubscriptionEndpoint::Http(value)
    }
}

impl From<WebhookEventBridgeEndpoint> for WebhookSubscriptionEndpoint {
    fn from(value: WebhookEventBridgeEndpoint) -> Self {
        WebhookSubscriptionEndpoint::EventBridge(value)
    }
}

impl From<WebhookPubSubEndpoint> for WebhookSubscriptionEndpoint {
    fn from(value: WebhookPubSubEndpoint) -> Self {
        WebhookSubscriptionEndpoint::PubSub(value)
    }
}

pub static ENDPOINT_SHAPES: ShapeRegistry<WebhookSubscriptionEndpoint> = ShapeRegistry::new(
    "WebhookSubscriptionEndpoint",
    &[
        Shape {
            discriminator: "WebhookHttpEndpoint",
            build: build_variant::<WebhookHttpEndpoint, WebhookSubscriptionEndpoint>,
        },
        Shape {
            discriminator: "WebhookEventBridgeEndpoint",
            build: build_variant::<WebhookEventBridgeEndpoint, WebhookSubscriptionEndpoint>,
        },
        Shape {
            discriminator: "WebhookPubSubEndpoint",
            build: build_variant::<WebhookPubSubEndpoint, WebhookSubscriptionEndpoint>,
        },
    ],
);

pub static ENDPOINT_FIELD: NestedField<WebhookSubscriptionEndpoint> = NestedField {
    key: "endpoint",
    rule: DiscriminatorRule::TYPENAME_OR_ID,
    registry: &ENDPOINT_SHAPES,
};

impl Family for WebhookSubscriptionEndpoint {
    const NAME: &'static str = "WebhookSubscriptionEndpoint";

    fn decode_fields(decoder: &Decoder, fields: Fields) -> Result<Self, Error> {
        decoder.decode_polymorphic(fields, ENDPOINT_FIELD.rule, &ENDPOINT_SHAPES)
    }
}

impl<'de> Deserialize<'de> for WebhookSubscriptionEndpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_family(deserializer)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscription {
    pub id: String,
    pub topic: String,
    pub format: Option<WebhookSubscriptionFormat>,
    pub include_fields: Vec<String>,
    pub metafield_namespaces: Vec<String>,
    pub filter: Option<String>,
    pub api_version: Option<ApiVersion>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Legacy top-level delivery URL; newer payloads carry it on `endpoint`.
    pub callback_url: Option<String>,
    pub endpoint: WebhookSubscriptionEndpoint,
}

/// Everything on a subscription except `endpoint`, mapped structurally.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SubscriptionFields {
    id: String,
    topic: String,
    format: Option<WebhookSubscriptionFormat>,
    include_fields: Vec<String>,
    metafield_namespaces: Vec<String>,
    filter: Option<String>,
    api_version: Option<ApiVersion>,
    created_at: Option<String>,
    updated_at: Option<String>,
    callback_url: Option<String>,
}

impl SubscriptionFields {
    fn with_endpoint(self, endpoint: WebhookSubscriptionEndpoint) -> WebhookSubscription {
        WebhookSubscription {
            id: self.id,
            topic: self.topic,
            format: self.format,
            include_fields: self.include_fields,
            metafield_namespaces: self.metafield_namespaces,
            filter: self.filter,
            api_version: self.api_version,
            created_at: self.created_at,
            updated_at: self.updated_at,
            callback_url: self.callback_url,
            endpoint,
        }
    }
}

impl Family for WebhookSubscription {
    const NAME: &'static str = "WebhookSubscription";

    fn decode_fields(decoder: &Decoder, fields: Fields) -> Result<Self, Error> {
        decoder.decode_with_nested(fields, &ENDPOINT_FIELD, SubscriptionFields::with_endpoint)
    }
}

impl<'de> Deserialize<'de> for WebhookSubscription {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_family(deserializer)
    }
}
