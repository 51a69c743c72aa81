// Core modules implementing discriminator resolution, entity decoding, and connection unwrapping.
pub mod connection;
pub mod decode;
pub mod error;
pub mod fields;
pub mod gid;
pub mod registry;
pub mod resolve;
