pub mod trans_file;
pub mod transcription;
pub mod utility;
