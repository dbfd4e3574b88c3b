//! restbridge provider runtime
//!
//! Translates declarative check/create/read/update/delete requests into REST
//! calls against the API described by a generated package schema.
//!
//! # Overview
//!
//! - **Property model**: [`PropertyValue`] keeps secret and unknown markers
//! - **Transport**: [`Transport`] seam with a retrying [`ReqwestTransport`]
//! - **Lifecycle protocol**: [`ResourceProvider`] trait answered by [`RestProvider`]
//! - **Logging**: [`init_logging`] installs a `tracing` subscriber
//!
//! # Quick Start
//!
//! ```ignore
//! use restbridge_provider::{
//!     init_logging, PropertyMap, ReqwestTransport, ResourceProvider, RestProvider,
//!     TransportConfig,
//! };
//!
//! init_logging();
//! let transport = ReqwestTransport::new(&TransportConfig::default())?;
//! let provider = RestProvider::from_artifact_dir("out/provider".as_ref(), transport)?;
//!
//! let mut inputs = PropertyMap::new();
//! inputs.insert("title".to_string(), "buy milk".into());
//! let created = provider.create("urn:pulumi:dev::todo::xyz:index:Todo::milk", inputs)?;
//! println!("created {}", created.id);
//! ```
//!
//! # Identity
//!
//! A created resource is addressed by `creationPath + "/" + id`, where `id`
//! is the field the API returned on create. Read, update and delete append
//! that identity to the base URL unchanged.

pub mod error;
pub mod logging;
pub mod protocol;
pub mod provider;
pub mod transport;
pub mod urn;
pub mod value;

pub use error::{ProviderError, Result};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use protocol::{
    CheckFailure, CheckResult, CreateResult, DiffChanges, DiffResult, PluginInfo, ReadResult,
    ResourceProvider, UpdateResult,
};
pub use provider::{RestProvider, METADATA_FILE, SCHEMA_FILE};
pub use transport::{
    HttpRequest, HttpResponse, Method, ReqwestTransport, RetryPolicy, Transport, TransportConfig,
};
pub use urn::Urn;
pub use value::{
    carry_secrets, map_from_json, map_to_json, map_to_redacted_json, PropertyMap, PropertyValue,
};

// Re-export commonly used external types
pub use tracing;
