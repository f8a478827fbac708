//! UIコンポーネント

pub mod analyze_button;
pub mod coming_soon;
pub mod download_prompt;
pub mod header;
pub mod notices;
pub mod results_panel;
pub mod review_form;
pub mod upload_area;
