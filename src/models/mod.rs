pub mod alert;
pub mod quote;
pub mod response;
pub mod store;

pub use alert::*;
pub use quote::*;
pub use response::*;
pub use store::*;
