//! iiko server REST client with session token lifecycle management.
//!
//! The server issues opaque session keys through `/resto/api/auth` and
//! expires them at will; every authenticated call carries the key in the
//! `iikoCookieAuth` cookie. This crate wraps the REST endpoints behind a
//! client facade whose token handling is fully automatic:
//!
//! - tokens are acquired lazily on the first call, never at construction;
//! - a 401 on a business call triggers exactly one coordinated refresh,
//!   no matter how many callers hit it concurrently, and the call is
//!   retried once;
//! - clients and token authorities are deduplicated per `(host, login)`
//!   through registries, so concurrent users of one account share a single
//!   session (and a single license seat).
//!
//! # Example
//!
//! ```no_run
//! use iikoserver_api::{ClientRegistry, Credentials, ReqwestHttpTransport};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), iikoserver_api::IikoServerError> {
//! let registry = ClientRegistry::new();
//! let credentials = Credentials::new("https://example.iiko.it", "admin", "secret");
//! let client = registry
//!     .get_or_create(&credentials, Arc::new(ReqwestHttpTransport::new()))
//!     .await?;
//!
//! let order_types = client.get_order_types_list(false).await?;
//! println!("{} order types", order_types.len());
//!
//! registry.close_all().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod registry;
pub mod token;

pub use api::models::{
    AssemblyChartDto, AssemblyChartItemDto, AssemblyChartSaveResponse, BaseEntityDto,
    ChartResultDto, EntityDto, EntityInfo, ProductCategoryUnitResponse, ProductDto,
    ProductGroupDto, ProductGroupSaveDto, ProductGroupUnitOperationResponse, ProductSaveDto,
    ProductSizeAssemblyStrategy, ProductType, ProductUnitOperationResponse,
    ProductWriteoffStrategy, SaveAssemblyChartDto, UnitOperationResponse,
};
pub use api::ProductSearchParams;
pub use client::IikoServerClient;
pub use config::IikoServerConfig;
pub use core::{
    hash_password, CredentialKey, Credentials, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
};
pub use error::{
    ApiError, AuthError, ConfigError, IikoServerError, IikoServerResult, NetworkError,
    ProtocolError,
};
pub use registry::ClientRegistry;
pub use token::{AuthorityRegistry, RefreshOutcome, TokenAuthority};
