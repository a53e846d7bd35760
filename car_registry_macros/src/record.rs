use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Expr, Fields, Ident, LitStr, Token, Type};

struct RecordField {
    ident: Ident,
    ty: Type,
    extend: bool,
    flatten: bool,
}

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let vis = &input.vis;

    let (collection, patch_name) = parse_struct_attrs(&input);
    let rename_all = extract_serde_rename_all(&input).map(|rule| {
        quote! { #[serde(rename_all = #rule)] }
    });
    let patch_name = patch_name
        .map(|p| format_ident!("{}", p))
        .unwrap_or_else(|| format_ident!("{}Patch", name));

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("Record derive only supports structs with named fields"),
        },
        _ => panic!("Record derive only supports structs"),
    };

    let mut id_field: Option<Ident> = None;
    let mut featured_field: Option<Ident> = None;
    let mut patch_fields = Vec::new();

    for field in fields {
        let ident = field.ident.clone().unwrap();
        let flags = parse_field_flags(&field.attrs);

        if flags.id {
            id_field = Some(ident);
            continue;
        }
        if flags.featured {
            featured_field = Some(ident.clone());
        }

        patch_fields.push(RecordField {
            ident,
            ty: field.ty.clone(),
            extend: flags.extend,
            flatten: has_serde_flatten(&field.attrs),
        });
    }

    // Default: a field named "id"
    let id_field = match id_field {
        Some(ident) => ident,
        None => {
            let position = patch_fields.iter().position(|f| f.ident == "id");
            match position {
                Some(index) => patch_fields.remove(index).ident,
                None => panic!(
                    "Record derive: no field marked with #[record(id)] and no field named `id`"
                ),
            }
        }
    };

    // Extend fields are plain collections in the patch (empty means "no
    // change"); every other field is wrapped in Option.
    let patch_defs = patch_fields.iter().map(|f| {
        let (ident, ty) = (&f.ident, &f.ty);
        if f.extend && f.flatten {
            quote! {
                #[serde(flatten)]
                pub #ident: #ty
            }
        } else if f.extend {
            quote! {
                #[serde(skip_serializing_if = "car_registry::__private::is_empty_collection")]
                pub #ident: #ty
            }
        } else if is_option(ty) {
            // An explicit JSON null must reach the record as Some(None).
            quote! {
                #[serde(
                    skip_serializing_if = "Option::is_none",
                    deserialize_with = "car_registry::__private::present"
                )]
                pub #ident: Option<#ty>
            }
        } else {
            quote! {
                #[serde(skip_serializing_if = "Option::is_none")]
                pub #ident: Option<#ty>
            }
        }
    });

    let setters = patch_fields.iter().map(|f| {
        let (ident, ty) = (&f.ident, &f.ty);
        if f.extend {
            quote! {
                pub fn #ident(mut self, value: #ty) -> Self {
                    self.#ident.extend(value);
                    self
                }
            }
        } else {
            quote! {
                pub fn #ident(mut self, value: #ty) -> Self {
                    self.#ident = Some(value);
                    self
                }
            }
        }
    });

    let apply_stmts = patch_fields.iter().map(|f| {
        let ident = &f.ident;
        if f.extend {
            quote! {
                self.#ident.extend(patch.#ident);
            }
        } else {
            quote! {
                if let Some(value) = patch.#ident {
                    self.#ident = value;
                }
            }
        }
    });

    let empty_checks = patch_fields.iter().map(|f| {
        let ident = &f.ident;
        if f.extend {
            quote! { car_registry::__private::is_empty_collection(&self.#ident) }
        } else {
            quote! { self.#ident.is_none() }
        }
    });

    // With a flattened bag, a record-shaped patch document still carries the
    // identifier key; consume it here so it never lands in the bag.
    let id_sink = patch_fields
        .iter()
        .any(|f| f.extend && f.flatten)
        .then(|| {
            quote! {
                #[doc(hidden)]
                #[serde(skip_serializing)]
                pub #id_field: Option<serde::de::IgnoredAny>,
            }
        });

    let featured_impl = featured_field.map(|ident| {
        quote! {
            fn is_featured(&self) -> bool {
                self.#ident
            }
        }
    });

    let expanded = quote! {
        #[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        #rename_all
        #vis struct #patch_name {
            #id_sink
            #(#patch_defs),*
        }

        impl #patch_name {
            pub fn new() -> Self {
                Self::default()
            }

            /// True when applying this patch would change nothing.
            pub fn is_empty(&self) -> bool {
                true #(&& #empty_checks)*
            }

            #(#setters)*
        }

        impl car_registry::Record for #name {
            type Patch = #patch_name;

            const COLLECTION: &'static str = #collection;

            fn id(&self) -> &str {
                &self.#id_field
            }

            fn apply(&mut self, patch: #patch_name) {
                #(#apply_stmts)*
            }

            #featured_impl
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct FieldFlags {
    id: bool,
    featured: bool,
    extend: bool,
}

fn parse_field_flags(attrs: &[syn::Attribute]) -> FieldFlags {
    let mut flags = FieldFlags::default();
    for attr in attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                flags.id = true;
            } else if meta.path.is_ident("featured") {
                flags.featured = true;
            } else if meta.path.is_ident("extend") {
                flags.extend = true;
            }
            Ok(())
        });
    }
    flags
}

fn parse_struct_attrs(input: &DeriveInput) -> (String, Option<String>) {
    let mut collection = None;
    let mut patch = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
            } else if meta.path.is_ident("patch") {
                let value: LitStr = meta.value()?.parse()?;
                patch = Some(value.value());
            }
            Ok(())
        });
    }

    // Default: snake_case struct name + "s"
    let collection =
        collection.unwrap_or_else(|| format!("{}s", to_snake_case(&input.ident.to_string())));
    (collection, patch)
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}

fn has_serde_flatten(attrs: &[syn::Attribute]) -> bool {
    let mut flatten = false;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("flatten") {
                flatten = true;
            } else {
                skip_meta_value(&meta)?;
            }
            Ok(())
        });
    }
    flatten
}

fn skip_meta_value(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta_value(&inner))?;
    }
    Ok(())
}

/// Carry `#[serde(rename_all = "...")]` over to the patch; together with
/// the forwarded `flatten` on extend fields, records and patches share one
/// JSON shape.
fn extract_serde_rename_all(input: &DeriveInput) -> Option<LitStr> {
    let mut rule = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                rule = Some(meta.value()?.parse::<LitStr>()?);
            } else {
                skip_meta_value(&meta)?;
            }
            Ok(())
        });
    }
    rule
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
