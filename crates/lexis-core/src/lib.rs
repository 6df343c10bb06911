pub mod controller;
pub mod decode;
pub mod error;
pub mod state;

pub use controller::{QueryController, SubmitOutcome, validate_word};
pub use decode::{StreamDecoder, Utf8Accumulator};
pub use error::{DecodeError, QueryError, ValidationError};
pub use state::{ActiveWord, SelectionState, SessionId, ViewState};
