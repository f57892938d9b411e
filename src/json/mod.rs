//! JSON sidecar handling
//!
//! Sidecars are the small key/value metadata files written next to converted
//! images. They are formatted with [`pretty_print`] so that regenerating one
//! yields byte-identical output and version control diffs stay small:
//!
//! - objects get one `"key": value` pair per line, indented by two spaces
//! - an empty object is `{}`
//! - arrays are always written on one line with `, ` separators
//! - keys keep their insertion order
//! - strings are never reinterpreted, whatever they look like
//!
//! # Example
//!
//! ```
//! use heudiconv::json::pretty_print;
//! use serde_json::json;
//!
//! let text = pretty_print(&json!({"a": -1, "c": [1, 2, 3]})).unwrap();
//! assert_eq!(text, "{\n  \"a\": -1,\n  \"c\": [1, 2, 3]\n}");
//! ```

pub mod codec;
pub mod formatter;

pub use codec::{
    load_json, load_json_as, save_json, save_json_with, sort_keys, update_json, JsonCodec,
    SaveOptions,
};
pub use formatter::SidecarFormatter;

use crate::error::JsonError;
use serde::Serialize;

/// Serializes `value` in the sidecar layout
pub fn pretty_print<T: Serialize + ?Sized>(value: &T) -> Result<String, JsonError> {
    let mut buf = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SidecarFormatter::new());
    value.serialize(&mut serializer).map_err(JsonError::Encode)?;

    // serde_json only ever writes UTF-8
    String::from_utf8(buf).map_err(|e| JsonError::Encode(serde::ser::Error::custom(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object() {
        assert_eq!(pretty_print(&json!({})).unwrap(), "{}");
    }

    #[test]
    fn test_colons_in_strings_survive() {
        assert_eq!(
            pretty_print(&json!({"SeriesDescription": "Trace:Nov 13 2017 14-36-14 EST"})).unwrap(),
            "{\n  \"SeriesDescription\": \"Trace:Nov 13 2017 14-36-14 EST\"\n}"
        );
    }

    #[test]
    fn test_struct_serialization() {
        #[derive(Serialize)]
        struct Sidecar<'a> {
            #[serde(rename = "RepetitionTime")]
            repetition_time: f64,
            #[serde(rename = "SliceTiming")]
            slice_timing: &'a [f64],
        }

        let text = pretty_print(&Sidecar {
            repetition_time: 2.0,
            slice_timing: &[0.0, 0.5, 1.0],
        })
        .unwrap();
        assert_eq!(
            text,
            "{\n  \"RepetitionTime\": 2.0,\n  \"SliceTiming\": [0.0, 0.5, 1.0]\n}"
        );
    }

    #[test]
    fn test_deterministic() {
        let doc = json!({"z": 1, "a": [true, null], "m": {"x": "y"}});
        assert_eq!(pretty_print(&doc).unwrap(), pretty_print(&doc).unwrap());
        assert!(pretty_print(&doc).unwrap().starts_with("{\n  \"z\": 1,"));
    }
}
