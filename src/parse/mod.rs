pub mod csv;
pub mod data_file;
pub mod task_line;
pub mod text_export;

pub use csv::{parse_csv, serialize_csv};
pub use data_file::{ParseIssue, ParsedTasks, parse_data_file, serialize_data_file, validate_data_file};
pub use task_line::LineIssue;
pub use text_export::serialize_text_export;
