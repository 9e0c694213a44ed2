pub mod concatenate;
pub mod rewrite_externals;
