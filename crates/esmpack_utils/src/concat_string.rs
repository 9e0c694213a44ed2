/// Concatenates string-like values into a `String`.
///
/// ```ignore
/// let name = concat_string!("exports", "_", "default");
/// ```
#[macro_export]
macro_rules! concat_string {
  () => { String::new() };
  ($($s:expr),+ $(,)?) => {{
    let mut buf = String::new();
    $(buf.push_str(::core::convert::AsRef::<str>::as_ref(&$s));)+
    buf
  }};
}

#[test]
fn test_concat_string() {
  let owned = String::from("b");
  assert_eq!(concat_string!("a", owned, "c"), "abc");
  assert_eq!(concat_string!("n", itoa::Buffer::new().format(12_u32)), "n12");
  assert_eq!(concat_string!(), "");
}
