#![warn(clippy::pedantic)]

pub mod blob;
pub mod config;
pub mod error;
pub mod shape;
pub mod stream;

mod base64_stage;

pub use blob::{DEFAULT_GENESIS_BLOB, default_blob};
pub use config::DecoderConfig;
pub use error::{GenesisError, ShapeError};
pub use shape::{DocumentShape, check_shape};
pub use stream::{
    GenesisStream, GzipMember, open_default_genesis, open_genesis, open_genesis_with,
    read_default_genesis,
};
