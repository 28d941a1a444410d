//! # Error Types
//!
//! Errors only appear at text and configuration boundaries: parsing a note
//! name, a key, a mode or a drill module from user text, and loading a
//! session config. Wrong answers, empty input and unknown keys inside the
//! engine are not errors; they come back as `DrillResult` values, empty
//! vectors or sentinel questions.
//!
//! ## Usage
//! ```rust
//! use pianodrill::{DrillError, NoteName};
//!
//! match "H#".parse::<NoteName>() {
//!     Ok(note) => println!("parsed {}", note),
//!     Err(DrillError::InvalidNote(text)) => eprintln!("not a note: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrillError {
    /// Text that does not spell a note name.
    ///
    /// # Example
    /// ```
    /// # use pianodrill::DrillError;
    /// let err = DrillError::InvalidNote("H".to_string());
    /// assert_eq!(err.to_string(), "Invalid note name: H");
    /// ```
    #[error("Invalid note name: {0}")]
    InvalidNote(String),

    /// A key root or key id that is not one of the selectable roots.
    ///
    /// # Example
    /// ```
    /// # use pianodrill::DrillError;
    /// let err = DrillError::UnknownKey("E#".to_string());
    /// assert_eq!(err.to_string(), "Unknown key: E#");
    /// ```
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    /// A mode name that is not one of the seven supported modes.
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// A drill module name that does not exist.
    #[error("Unknown drill module: {0}")]
    UnknownModule(String),

    /// A drill option (range, difficulty, ...) with an unsupported value.
    ///
    /// # Example
    /// ```
    /// # use pianodrill::DrillError;
    /// let err = DrillError::InvalidOption {
    ///     option: "range".to_string(),
    ///     value: "huge".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid value for range: huge");
    /// ```
    #[error("Invalid value for {option}: {value}")]
    InvalidOption { option: String, value: String },

    /// Malformed session configuration (YAML syntax or bad field value).
    #[error("Invalid session config: {0}")]
    Config(String),
}
