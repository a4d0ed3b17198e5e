pub mod entry_point;
pub mod import_kind;
pub mod module_graph;
pub mod module_id;
pub mod module_idx;
pub mod output_asset;
pub mod source_joiner;
