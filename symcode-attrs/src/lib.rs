mod structures;

use proc_macro::TokenStream;
use quote::quote;
use structures::ErrorKindTarget;
use syn::parse_macro_input;

/// Implements `symcode_error::ErrorKind` for a struct, from an `error` attribute listing what
/// the report should say:
///
/// ```
/// use symcode_attrs::ErrorKind;
/// use symcode_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     message = format!("`{}` is not defined", name),
///     labels = ["used here"],
///     help = "check the spelling",
/// )]
/// pub struct Undefined {
///     name: String,
/// }
/// ```
///
/// - `message` (required): the headline of the report.
/// - `labels`: one label per span of the error, matched up in order. Surplus labels or spans
///   are dropped.
/// - `help`: a note printed below the source snippet.
///
/// Each value is an arbitrary expression that can name the fields of the struct, which are bound
/// by reference. `message` and `help` need [`ToString`], and `labels` must iterate over values
/// that implement it. Tuple structs are rejected at compile time.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl ErrorKind for #name {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            #target
        }
    }.into()
}
