//! API surface: typed wrappers over the iiko server REST endpoints.

pub mod assembly;
pub mod models;
pub mod nomenclature;
pub mod reference;
pub mod session;

pub use assembly::AssemblyChartApi;
pub use nomenclature::{
    CategoryListRequest, GroupListRequest, NomenclatureApi, ProductListRequest,
    ProductSearchParams,
};
pub use reference::ReferenceDataApi;
pub use session::SessionApi;
