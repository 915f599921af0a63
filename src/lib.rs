//! Compile JSON Schema documents (a Draft-07 subset) into interactive form
//! models: a tree of editable widgets whose state round-trips to and from
//! schema-valid JSON data.
//!
//! The entry point is [`Form`]: validate a schema, compile it into a
//! [`compile::FormElement`] tree, then read ([`Form::data`]), write
//! ([`Form::set_data`]), reset, and observe the whole document.

pub mod cli;
pub mod compile;
pub mod config;
pub mod error;
pub mod form;
pub mod load;
pub mod oracle;
pub mod schema;
pub mod ui;

pub use config::FormConfig;
pub use error::FormError;
pub use form::Form;
