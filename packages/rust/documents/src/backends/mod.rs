//! Built-in PDF text-extraction backends.

mod layout;
mod pages;

pub use layout::LayoutTextBackend;
pub use pages::PageTextBackend;
