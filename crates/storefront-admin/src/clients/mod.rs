//! Typed wrappers over the CRUD stores. Resources with no operations beyond
//! plain CRUD use the store client directly.

pub mod order_client;
pub mod post_client;
pub mod product_client;
pub mod user_client;

use crate::model::{Brand, Category, Tag};
use admin_framework::CrudClient;

pub use order_client::{OrderClient, OrderError};
pub use post_client::{PostClient, PostError};
pub use product_client::{ProductClient, ProductError};
pub use user_client::{UserClient, UserError};

pub type BrandStore = CrudClient<Brand>;
pub type CategoryStore = CrudClient<Category>;
pub type TagStore = CrudClient<Tag>;
