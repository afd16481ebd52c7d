use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Ident, Result};

/// The tags given to the `error` attribute.
#[derive(Default)]
struct Tags {
    message: Option<Expr>,
    labels: Option<Expr>,
    help: Option<Expr>,
    note: Option<Expr>,
}

impl Tags {
    /// Reads the tags from the `#[error(...)]` attribute among `attributes`.
    fn from_attributes(name: &Ident, attributes: &[Attribute]) -> Result<Self> {
        let attr = attributes
            .iter()
            .find(|attr| attr.path().is_ident("error"))
            .ok_or_else(|| syn::Error::new_spanned(name, "missing `#[error(...)]` attribute"))?;

        let mut tags = Self::default();
        attr.parse_nested_meta(|meta| {
            let slot = if meta.path.is_ident("message") {
                &mut tags.message
            } else if meta.path.is_ident("labels") {
                &mut tags.labels
            } else if meta.path.is_ident("help") {
                &mut tags.help
            } else if meta.path.is_ident("note") {
                &mut tags.note
            } else {
                return Err(meta.error("unknown tag, expected `message`, `labels`, `help` or `note`"));
            };

            if slot.is_some() {
                return Err(meta.error("tag given more than once"));
            }
            *slot = Some(meta.value()?.parse()?);
            Ok(())
        })?;

        if tags.message.is_none() {
            return Err(syn::Error::new_spanned(attr, "the `message` tag is required"));
        }
        Ok(tags)
    }
}

/// A `let` statement binding each named field of `self` to a local of the same name.
fn bind_fields(name: &Ident, fields: &Fields) -> Result<TokenStream2> {
    match fields {
        Fields::Named(fields) => {
            let names = fields.named.iter().map(|field| &field.ident);
            Ok(quote! {
                #[allow(unused_variables)]
                let Self { #(#names),* } = self;
            })
        },
        Fields::Unnamed(_) => Err(syn::Error::new_spanned(name, "`ErrorKind` cannot be derived for tuple structs")),
        Fields::Unit => Ok(TokenStream2::new()),
    }
}

/// Generates the `sym_error::ErrorKind` impl for a struct.
pub fn expand(input: DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(name, "`ErrorKind` can only be derived for structs"));
    };

    let tags = Tags::from_attributes(name, &input.attrs)?;
    let bind = bind_fields(name, &data.fields)?;
    let message = &tags.message;
    let labels = match &tags.labels {
        Some(labels) => quote! { #labels },
        None => quote! { [""] },
    };
    let help = tags.help.as_ref().map(|help| quote! { builder.set_help(#help); });
    let note = tags.note.as_ref().map(|note| quote! { builder.set_note(#note); });
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics sym_error::ErrorKind for #name #ty_generics #where_clause {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn message(&self) -> String {
                #bind
                (#message).to_string()
            }

            fn build_report<'a>(
                &self,
                src_id: &'a str,
                spans: &[std::ops::Range<usize>],
            ) -> sym_error::SourceReport<'a> {
                #bind

                let offset = spans.first().map(|span| span.start).unwrap_or_default();
                let mut builder = ariadne::Report::build(ariadne::ReportKind::Error, src_id, offset)
                    .with_message(#message);

                // one label per span; extra labels or spans are ignored
                for (text, span) in (#labels).into_iter().zip(spans) {
                    let text = text.to_string();
                    let mut label = ariadne::Label::new((src_id, span.clone()))
                        .with_color(sym_error::EXPR);
                    if !text.is_empty() {
                        label = label.with_message(text);
                    }
                    builder.add_label(label);
                }

                #help
                #note
                builder.finish()
            }
        }
    })
}
