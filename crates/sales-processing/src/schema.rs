//! Column layout and value catalogs of the sales dataset.

use serde::{Deserialize, Serialize};

pub const ORDER_ID: &str = "Order_ID";
pub const DATE: &str = "Date";
pub const PRODUCT: &str = "Product";
pub const QUANTITY: &str = "Quantity";
pub const UNIT_PRICE: &str = "Unit_Price";
pub const REGION: &str = "Region";
pub const SALES_REP: &str = "Sales_Rep";
pub const CUSTOMER_EMAIL: &str = "Customer_Email";
pub const DISCOUNT: &str = "Discount";

pub const TOTAL_SALES: &str = "Total_Sales";
pub const MONTH: &str = "Month";
pub const MONTH_NAME: &str = "Month_Name";
pub const QUARTER: &str = "Quarter";

/// The nine raw input columns, in file order.
pub const INPUT_COLUMNS: [&str; 9] = [
    ORDER_ID,
    DATE,
    PRODUCT,
    QUANTITY,
    UNIT_PRICE,
    REGION,
    SALES_REP,
    CUSTOMER_EMAIL,
    DISCOUNT,
];

/// Columns computed by the derive step, appended after the input columns.
pub const DERIVED_COLUMNS: [&str; 4] = [TOTAL_SALES, MONTH, MONTH_NAME, QUARTER];

/// Rows missing any of these are dropped.
pub const REQUIRED_COLUMNS: [&str; 4] = [ORDER_ID, DATE, QUANTITY, UNIT_PRICE];

/// Free-text columns that get trimmed and title-cased.
pub const NORMALIZED_COLUMNS: [&str; 2] = [REGION, SALES_REP];

/// Marker the generator writes in place of a real email address.
pub const INVALID_EMAIL_SENTINEL: &str = "INVALID";

/// Cell spellings read as missing when loading a raw CSV.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Replacement for [`INVALID_EMAIL_SENTINEL`] after cleaning.
pub const PLACEHOLDER_EMAIL: &str = "unknown@email.com";

pub const PRODUCTS: [&str; 7] = [
    "Laptop",
    "Mouse",
    "Keyboard",
    "Monitor",
    "Headphones",
    "Webcam",
    "USB Cable",
];

/// Region candidates, including case variants of the same region.
pub const REGION_VARIANTS: [&str; 7] = ["North", "South", "East", "West", "NORTH", "south", "east"];

/// Sales rep candidates, including a repeated name and a lowercase variant.
pub const SALES_REP_VARIANTS: [&str; 6] = [
    "John Doe",
    "Jane Smith",
    "Bob Johnson",
    "Alice Williams",
    "John Doe",
    "jane smith",
];

/// One raw, pre-clean sales row as the generator produces it.
///
/// `None` becomes an empty CSV cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSalesRecord {
    pub order_id: Option<String>,
    pub date: Option<String>,
    pub product: String,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
    pub region: String,
    pub sales_rep: String,
    pub customer_email: String,
    pub discount: Option<f64>,
}
