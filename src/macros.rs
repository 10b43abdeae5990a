//! Record-building macros.
//!
//! # Examples
//!
//! ```
//! use typed_log_system::fields;
//!
//! let record = fields! {
//!     "orderId" => "A1",
//!     "amount" => 100,
//!     "paid" => true,
//! };
//! assert_eq!(record.len(), 3);
//! ```

/// Build a [`LogRecord`](crate::LogRecord) from `key => value` pairs.
///
/// Values are converted with `Into<FieldValue>`, so nested records,
/// numbers, booleans, text and `Option`s can be mixed freely. Keys keep the
/// order they are written in.
///
/// # Examples
///
/// ```
/// use typed_log_system::{fields, FieldValue};
///
/// let record = fields! {
///     "uri" => "/orders",
///     "client" => fields! { "ip" => "10.0.0.1" },
///     "referer" => None::<String>,
/// };
/// assert_eq!(record.keys().collect::<Vec<_>>(), vec!["uri", "client", "referer"]);
/// assert_eq!(record.get("referer"), Some(&FieldValue::Null));
///
/// let empty = fields! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::LogRecord::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::LogRecord::new();
        $(
            record.insert($key, $value);
        )+
        record
    }};
}
