pub mod bulk_actions;
pub mod confidence_badge;
pub mod history_panel;
pub mod input_panel;
pub mod results_table;
pub mod stats_bar;
pub mod toast;
