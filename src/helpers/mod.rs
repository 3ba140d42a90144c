//! Helper functions for dates, URLs and images
//!
//! These are shared by the content store, the router and the server.

mod date;
mod images;
mod url;

pub use date::*;
pub use images::*;
pub use url::*;
