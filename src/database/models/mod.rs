pub mod price;
pub mod product;
pub mod tenant;
pub mod user;

pub use price::{PriceAuditEntry, PriceRow, PriceView};
pub use product::Product;
pub use tenant::Tenant;
pub use user::User;
