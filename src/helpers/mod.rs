//! Small shared helpers

mod url;

pub use url::full_url_for;
