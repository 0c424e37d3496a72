pub mod comment_ops;
pub mod restaurant_ops;
pub mod review_ops;
pub mod store;
pub mod user_ops;

pub use store::Store;
