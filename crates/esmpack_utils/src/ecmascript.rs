use oxc::syntax::identifier;

use crate::concat_string;

pub fn is_validate_identifier_name(name: &str) -> bool {
  identifier::is_identifier_name(name)
}

pub fn property_access_str(obj: &str, prop: &str) -> String {
  if is_validate_identifier_name(prop) {
    concat_string!(obj, ".", prop)
  } else {
    concat_string!(obj, "[", to_string_literal(prop), "]")
  }
}

pub fn to_module_import_export_name(name: &str) -> String {
  if is_validate_identifier_name(name) { name.into() } else { to_string_literal(name) }
}

/// Quotes `value` as a JavaScript string literal.
pub fn to_string_literal(value: &str) -> String {
  serde_json::to_string(value).unwrap_or_else(|_| concat_string!("\"", value, "\""))
}

/// Turns an arbitrary export name into something usable as part of a binding name.
///
/// Every character that can't appear in an identifier becomes `_`, and a leading digit is
/// prefixed with `_`.
pub fn to_identifier(name: &str) -> String {
  let mut ret = String::with_capacity(name.len() + 1);
  for (idx, ch) in name.chars().enumerate() {
    let valid = if idx == 0 {
      identifier::is_identifier_start(ch)
    } else {
      identifier::is_identifier_part(ch)
    };
    if valid {
      ret.push(ch);
    } else if idx == 0 && identifier::is_identifier_part(ch) {
      ret.push('_');
      ret.push(ch);
    } else {
      ret.push('_');
    }
  }
  ret
}

#[test]
fn test_is_validate_identifier_name() {
  assert!(is_validate_identifier_name("foo"));
  assert!(!is_validate_identifier_name("1aaaa"));
  assert!(!is_validate_identifier_name("😈"));
}

#[test]
fn test_to_identifier() {
  assert_eq!(to_identifier("default"), "default");
  assert_eq!(to_identifier("a-b"), "a_b");
  assert_eq!(to_identifier("1st"), "_1st");
  assert_eq!(to_identifier(""), "");
}

#[test]
fn test_property_access_str() {
  assert_eq!(property_access_str("exports", "foo"), "exports.foo");
  assert_eq!(property_access_str("exports", "a-b"), "exports[\"a-b\"]");
}
