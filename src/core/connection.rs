//! Purpose: Unwrap cursor-paginated connections whose elements are polymorphic.
//! Exports: `Connection`, `Edge`, `PageInfo`; `Decoder::{unwrap_connection, decode_connection, decode_edge}`.
//! Role: Routes every edge node and bare node through the family decoder instead of the generic mapper.
//! Invariants: Element order is preserved; edges and nodes are independent and independently sized.
//! Invariants: Absent, null, and empty element lists all yield empty vectors.
//! Invariants: Any malformed element fails the whole connection; no partial results.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::decode::{Decoder, Family};
use crate::core::error::{Error, ErrorKind};
use crate::core::fields::{
    Fields, into_object, map_fields, optional_str, take_array, take_object,
};

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub nodes: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            nodes: Vec::new(),
            page_info: None,
        }
    }
}

impl<T> Connection<T> {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.nodes.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.page_info
            .as_ref()
            .is_some_and(|page_info| page_info.has_next_page)
    }

    /// Cursor to resume after this page: `pageInfo.endCursor`, else the last edge's cursor.
    pub fn end_cursor(&self) -> Option<&str> {
        self.page_info
            .as_ref()
            .and_then(|page_info| page_info.end_cursor.as_deref())
            .or_else(|| {
                self.edges
                    .last()
                    .map(|edge| edge.cursor.as_str())
                    .filter(|cursor| !cursor.is_empty())
            })
    }

    /// Bare nodes when the payload requested them, otherwise the edge nodes in order.
    pub fn into_nodes(self) -> Vec<T> {
        if self.nodes.is_empty() {
            self.edges.into_iter().map(|edge| edge.node).collect()
        } else {
            self.nodes
        }
    }
}

impl<'de, T: Family> Deserialize<'de> for Connection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Fields::deserialize(deserializer)?;
        Decoder::shared()
            .decode_connection(fields)
            .map_err(de::Error::custom)
    }
}

impl<'de, T: Family> Deserialize<'de> for Edge<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Decoder::shared()
            .decode_edge(value)
            .map_err(de::Error::custom)
    }
}

impl Decoder {
    /// Decodes the connection stored under `container_key` of a response document.
    pub fn unwrap_connection<F: Family>(
        &self,
        document: Value,
        container_key: &str,
    ) -> Result<Connection<F>, Error> {
        let container = match document {
            Value::Object(mut root) => root.remove(container_key),
            _ => None,
        };
        let fields = match container {
            Some(Value::Object(fields)) => fields,
            _ => {
                return Err(Error::new(ErrorKind::MissingContainer)
                    .with_message(format!("no `{container_key}` connection object in document"))
                    .with_entity(F::NAME)
                    .with_field(container_key));
            }
        };
        self.decode_connection(fields)
            .map_err(|err| err.within(container_key))
    }

    /// Decodes a document whose root is itself the connection object.
    pub fn decode_connection_value<F: Family>(
        &self,
        document: Value,
    ) -> Result<Connection<F>, Error> {
        let fields = into_object(document).map_err(|err| err.with_entity(F::NAME))?;
        self.decode_connection(fields)
    }

    /// Decodes a connection object (`edges`, `nodes`, `pageInfo`) held directly in `fields`.
    pub fn decode_connection<F: Family>(&self, mut fields: Fields) -> Result<Connection<F>, Error> {
        let edges = match take_array(&mut fields, "edges")? {
            Some(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    self.decode_edge::<F>(item)
                        .map_err(|err| err.within(format!("edges[{idx}]")))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let nodes = match take_array(&mut fields, "nodes")? {
            Some(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    self.decode_value::<F>(item)
                        .map_err(|err| err.within(format!("nodes[{idx}]")))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let page_info = take_object(&mut fields, "pageInfo")?
            .map(map_fields::<PageInfo>)
            .transpose()
            .map_err(|err| err.with_field("pageInfo"))?;

        debug!(
            family = F::NAME,
            edges = edges.len(),
            nodes = nodes.len(),
            has_page_info = page_info.is_some(),
            "decoded connection"
        );
        Ok(Connection {
            edges,
            nodes,
            page_info,
        })
    }

    pub fn decode_edge<F: Family>(&self, value: Value) -> Result<Edge<F>, Error> {
        let mut fields = into_object(value).map_err(|err| err.with_entity(F::NAME))?;
        let cursor = optional_str(&fields, "cursor")?
            .unwrap_or_default()
            .to_string();
        let node = take_object(&mut fields, "node")?.ok_or_else(|| {
            Error::new(ErrorKind::MalformedElement)
                .with_message("edge has no node")
                .with_entity(F::NAME)
                .with_field("node")
        })?;
        let node = self
            .decode::<F>(node)
            .map_err(|err| err.within("node"))?;
        Ok(Edge { cursor, node })
    }
}
