// fritzmesh-api: wire model and fetch sources for the Fritz!Box mesh topology feed

pub mod error;
pub mod file;
pub mod http;
pub mod models;
pub mod source;

pub use error::Error;
pub use file::JsonFileSource;
pub use http::{HttpSource, HttpSourceConfig};
pub use models::{
    HostEntry, RawInterface, RawIpAddress, RawLink, RawNode, RawSnapshot, parse_host_list,
};
pub use source::MeshSource;
