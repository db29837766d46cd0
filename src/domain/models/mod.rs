mod api;
mod cart;
mod error;
mod menu;
mod order;
mod session;

pub use api::*;
pub use cart::*;
pub use error::*;
pub use menu::*;
pub use order::*;
pub use session::*;
