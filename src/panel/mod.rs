//! Tool panel model and validity filtering

pub mod filter;
pub mod types;

pub use filter::{
    assemble_panel, build_panel_view, filter_tool_sections, filter_tools, valid_tool_ids,
    valid_tools, ValidityOptions,
};
pub use types::{Panel, PanelEntry, SectionItem, Tool, ToolSection, ToolSectionLabel};
