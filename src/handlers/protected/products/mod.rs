// handlers/protected/products/mod.rs - Supplier product and price management
//
// Reads are open to any user of the supplier tenant; writes need
// supplier_admin.

pub mod prices;
pub mod product;

pub use prices::{
    default_prices_get, default_prices_put, price_history_get, price_views_get, private_prices_delete,
    private_prices_list, private_prices_put,
};
pub use product::{product_create, product_delete, product_get, product_patch, products_list};
