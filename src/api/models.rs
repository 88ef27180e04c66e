//! API Models
//!
//! Wire DTOs for the iiko server REST API (camelCase field names).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Product type in the nomenclature tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductType {
    Dish,
    Goods,
    Prepared,
    Modifier,
    Service,
    Rate,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dish => "DISH",
            Self::Goods => "GOODS",
            Self::Prepared => "PREPARED",
            Self::Modifier => "MODIFIER",
            Self::Service => "SERVICE",
            Self::Rate => "RATE",
        }
    }
}

/// Reference-data entity (discount types, payment types, ...).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
}

/// Generic entity (user categories).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDto {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
}

/// Minimal entity payload for create operations.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEntityDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sale_price: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSaveDto {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sale_price: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroupDto {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroupSaveDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Outcome of a unit save operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOperationResponse<R> {
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<R>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

pub type ProductUnitOperationResponse = UnitOperationResponse<ProductDto>;
pub type ProductGroupUnitOperationResponse = UnitOperationResponse<ProductGroupDto>;
pub type ProductCategoryUnitResponse = UnitOperationResponse<EntityDto>;
pub type AssemblyChartSaveResponse = UnitOperationResponse<AssemblyChartDto>;

/// How ingredients are written off when the assembled product is sold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductWriteoffStrategy {
    Assemble,
    Writeoff,
}

/// Whether one chart covers all product sizes or each size has its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductSizeAssemblyStrategy {
    Common,
    Individual,
}

/// One ingredient line of an assembly chart.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyChartItemDto {
    pub sort_weight: i32,
    pub product_id: String,
    /// Gross amount in the ingredient's measurement unit.
    pub amount_in: f64,
    /// Net amount after cold processing.
    pub amount_middle: f64,
    /// Final output amount.
    pub amount_out: f64,
    #[serde(default)]
    pub amount_in1: f64,
    #[serde(default)]
    pub amount_out1: f64,
    #[serde(default)]
    pub amount_in2: f64,
    #[serde(default)]
    pub amount_out2: f64,
    #[serde(default)]
    pub amount_in3: f64,
    #[serde(default)]
    pub amount_out3: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_size_specification: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_specification: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyChartDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub assembled_product_id: String,
    pub date_from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    pub assembled_amount: f64,
    #[serde(default)]
    pub items: Vec<AssemblyChartItemDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_writeoff_strategy: Option<ProductWriteoffStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_size_assembly_strategy: Option<ProductSizeAssemblyStrategy>,
}

/// Payload for creating or updating an assembly chart.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAssemblyChartDto {
    pub assembled_product_id: String,
    pub date_from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    pub assembled_amount: f64,
    pub items: Vec<AssemblyChartItemDto>,
    pub product_writeoff_strategy: ProductWriteoffStrategy,
    pub product_size_assembly_strategy: ProductSizeAssemblyStrategy,
}

/// Result of an assembly-chart read.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResultDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_revision: Option<i64>,
    #[serde(default)]
    pub assembly_charts: Vec<AssemblyChartDto>,
    #[serde(default)]
    pub prepared_charts: Vec<AssemblyChartDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_wire_names() {
        assert_eq!(serde_json::to_string(&ProductType::Dish).unwrap(), "\"DISH\"");
        assert_eq!(
            serde_json::from_str::<ProductType>("\"GOODS\"").unwrap(),
            ProductType::Goods
        );
    }

    #[test]
    fn test_product_dto_camel_case() {
        let json = r#"{"id":"p1","name":"Soup","type":"DISH","mainUnit":"u1","defaultSalePrice":9.5}"#;
        let dto: ProductDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.product_type, Some(ProductType::Dish));
        assert_eq!(dto.main_unit.as_deref(), Some("u1"));
        assert_eq!(dto.default_sale_price, Some(9.5));
    }

    #[test]
    fn test_save_dto_omits_absent_fields() {
        let dto = ProductGroupSaveDto {
            name: "Drinks".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&dto).unwrap();
        assert_eq!(json, r#"{"name":"Drinks"}"#);
    }

    #[test]
    fn test_chart_result_defaults() {
        let result: ChartResultDto = serde_json::from_str(r#"{"knownRevision":7}"#).unwrap();
        assert_eq!(result.known_revision, Some(7));
        assert!(result.assembly_charts.is_empty());
        assert!(result.prepared_charts.is_empty());
    }
}
