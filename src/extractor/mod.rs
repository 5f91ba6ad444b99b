//! Content-extraction engine.
//!
//! # Module Structure
//!
//! - `state`: Page context (URL, host, social domains) and the link/media inventory
//! - `classify`: Link and media classification, domain-based exclusion
//! - `pruning`: Recursive keep/discard walker plus the excluded-tag and scope pre-pass
//! - `images`: Image validity filter and parallel usefulness scoring
//! - `flatten`: Collapsing of redundant same-tag nesting
//!
//! # Usage
//!
//! ```rust
//! use rs_pagesift::dom;
//! use rs_pagesift::extractor::{flatten, PageContext, Pruner};
//! use rs_pagesift::tree::Tree;
//! use rs_pagesift::ExtractionOptions;
//!
//! let doc = dom::parse("<div><div><p>Hello <a href=\"/x\">there</a></p></div></div>");
//! let (mut tree, _) = Tree::from_document(&doc);
//! let body = tree.find_first(tree.root(), "body").unwrap();
//!
//! let options = ExtractionOptions::default();
//! let ctx = PageContext::new("https://example.com/", &options);
//! let mut pruner = Pruner::new(&ctx, &options);
//! pruner.prune(&mut tree, body);
//!
//! let root = flatten::flatten(&mut tree, body);
//! assert_eq!(pruner.into_inventory().links.internal.len(), 1);
//! assert_eq!(
//!     tree.serialize(root, 64).unwrap(),
//!     "<body><div><p>Hello <a href=\"/x\">there</a></p></div></body>"
//! );
//! ```

pub mod classify;
pub mod flatten;
pub mod images;
pub mod pruning;
pub mod state;

pub use images::{score_images, ImageSnapshot, ParentSnapshot};
pub use pruning::{Outcome, Pruner};
pub use state::{Inventory, PageContext};
