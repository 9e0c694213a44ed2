pub mod build_meta;
pub mod dependency;
pub mod exports_info;
pub mod module_id;
pub mod module_table;
pub mod raw_idx;
pub mod runtime_spec;
pub mod source_joiner;
