//! User financial goals. Hard-deleted on removal, unlike journal entries.

pub mod handlers;
