mod result;
mod track;

pub use result::ScriptResult;
pub use track::{FieldValue, Metadata, Track};
