//! Form resources: configuration, assembly, linked forms and routes

pub mod assembler;
pub mod config;
pub mod context;
pub mod linked;
pub mod registry;
pub mod request;
pub mod response;
pub mod routes;

pub use assembler::FormResource;
pub use config::{
    defaults, defaults_from_value, DefaultsMap, DefaultsSource, FormConfig, FormSpec, FormTitle,
    LayoutSource, LinkedForm,
};
pub use context::FormContext;
pub use linked::linked_base_path;
pub use registry::ResourceRegistry;
pub use request::FormRequest;
pub use response::{Action, Method, ResolvedForm};
pub use routes::{RouteCache, RouteTable, ROUTE_CACHE_CAPACITY};
