//! Swagger 2.0 (OpenAPI 2.0) description loading
//!
//! Loads an API description from a file or URL into a typed document plus the
//! raw JSON tree used for `$ref` resolution.
//!
//! ## Usage
//! ```rust,ignore
//! use restbridge_parser::swagger::ApiDescription;
//!
//! let api = ApiDescription::load("open-api-spec/todo-backend.json")?;
//! println!("{}", api.base_url());
//! for (path, method, operation) in api.operations() {
//!     println!("{} {} {}", method, path, operation.id());
//! }
//! ```

mod loader;
mod types;

pub use loader::{is_url, ApiDescription, ConnectionInfo};
pub use types::*;
