//! Interpreter for robots exclusion policy documents.
//!
//! Parse a document with [`PolicyDocument::parse`], then ask whether an agent
//! may fetch a path:
//!
//! ```
//! use robots_policy::PolicyDocument;
//!
//! let document = PolicyDocument::parse(
//!     "User-agent: *\nDisallow: /private\nSitemap: https://example.com/sitemap.xml\n",
//! )?;
//! assert!(!document.allowed("/private/page.html", "my-crawler"));
//! assert!(document.allowed("/public/page.html", "my-crawler"));
//! assert_eq!(document.sitemaps(), ["https://example.com/sitemap.xml"]);
//! # Ok::<(), robots_policy::PolicyError>(())
//! ```

pub mod robots;

pub use robots::*;
