mod error_kind;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `sym_error::ErrorKind` for a struct.
///
/// The report is described by the `error` attribute:
///
/// ```ignore
/// use sym_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     message = "unknown variable",
///     labels = [format!("`{}` is not registered", name)],
///     help = "register the variable before parsing",
/// )]
/// pub struct UnknownVariable {
///     name: String,
/// }
/// ```
///
/// | Tag       | Required | Description                                                   |
/// | --------- | -------- | ------------------------------------------------------------- |
/// | `message` | yes      | The summary at the top of the report, also used by `Display`. |
/// | `labels`  | no       | An iterable of label texts, matched to the error's spans in order. An empty text labels the span without a message. |
/// | `help`    | no       | What the user can do to fix the error.                        |
/// | `note`    | no       | Extra context shown below the help.                           |
///
/// Each tag takes an expression, evaluated with the named fields of the struct bound by name.
/// Tuple structs and enums are rejected. The generated code names `ariadne` and `sym_error` by
/// path, so both must be dependencies of the crate using the derive.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error_kind::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
