//! # splice-engine
//!
//! The Splice resolution engine: conditional block stripping, variable
//! placeholder substitution, and recursive file inclusion with per-include
//! local scopes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use splice_engine::{Preprocessor, Settings};
//!
//! fn render(page: &Path) {
//!     let settings = Settings::default();
//!     if let Ok(engine) = Preprocessor::new(settings) {
//!         match engine.process_file(page) {
//!             Ok(output) => println!("{output}"),
//!             Err(e) => eprintln!("{e}"),
//!         }
//!     }
//! }
//! ```

pub mod conditional;
pub mod docroot;
pub mod error;
pub mod include;
pub mod preprocessor;
pub mod scope;
pub mod substitute;

pub use error::PreprocessError;
pub use include::IncludeDirective;
pub use preprocessor::{PostIncludeHook, Preprocessor, Settings, DEFAULT_MAX_DEPTH, DOCROOT_VAR};
pub use scope::{is_truthy, GlobalScope, LocalScope, VariableScope};
