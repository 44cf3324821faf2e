//! Course-module catalog and section content.

pub mod handlers;
